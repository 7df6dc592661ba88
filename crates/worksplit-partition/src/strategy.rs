//! Remainder policies

use rand::seq::{index, SliceRandom};
use rand::RngCore;
use worksplit_core::RemainderPolicy;

/// Strategy for splitting problems `1..=total` among members
pub trait PartitionStrategy: Send + Sync {
    /// Split the problems into one list per member, in member order.
    ///
    /// Callers guarantee `total >= 1` and `member_count >= 1`. The lists
    /// returned need not be sorted.
    fn split(&self, total: u32, member_count: usize, rng: &mut dyn RngCore) -> Vec<Vec<u32>>;

    /// The policy this strategy implements
    fn policy(&self) -> RemainderPolicy;
}

/// Look up the strategy for a policy
pub fn strategy_for(policy: RemainderPolicy) -> &'static dyn PartitionStrategy {
    match policy {
        RemainderPolicy::Random => &RandomStrategy,
        RemainderPolicy::RandomExtra => &RandomExtraStrategy,
        RemainderPolicy::RoundRobin => &RoundRobinStrategy,
    }
}

/// Per-member problem counts: `base`, plus one for `extra` randomly chosen members
fn random_shares(total: u32, member_count: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let total = total as usize;
    let base = total / member_count;
    let extra = total % member_count;

    let mut shares = vec![base; member_count];
    for i in index::sample(rng, member_count, extra) {
        shares[i] += 1;
    }
    shares
}

/// Cut `problems` into consecutive slices of the given sizes
fn deal(problems: &[u32], shares: &[usize]) -> Vec<Vec<u32>> {
    let mut rest = problems;
    shares
        .iter()
        .map(|&take| {
            let (chunk, tail) = rest.split_at(take.min(rest.len()));
            rest = tail;
            chunk.to_vec()
        })
        .collect()
}

/// Random extra members, random problem numbers.
///
/// Draws the extra members first, then shuffles the problem range and hands
/// out consecutive slices of the permutation in member order.
pub struct RandomStrategy;

impl PartitionStrategy for RandomStrategy {
    fn split(&self, total: u32, member_count: usize, rng: &mut dyn RngCore) -> Vec<Vec<u32>> {
        let shares = random_shares(total, member_count, rng);

        let mut problems: Vec<u32> = (1..=total).collect();
        problems.shuffle(rng);

        deal(&problems, &shares)
    }

    fn policy(&self) -> RemainderPolicy {
        RemainderPolicy::Random
    }
}

/// Random extra members, problems dealt in contiguous ascending blocks
pub struct RandomExtraStrategy;

impl PartitionStrategy for RandomExtraStrategy {
    fn split(&self, total: u32, member_count: usize, rng: &mut dyn RngCore) -> Vec<Vec<u32>> {
        let shares = random_shares(total, member_count, rng);
        let problems: Vec<u32> = (1..=total).collect();
        deal(&problems, &shares)
    }

    fn policy(&self) -> RemainderPolicy {
        RemainderPolicy::RandomExtra
    }
}

/// Problem `p` goes to member `(p - 1) % n`. Uses no randomness.
pub struct RoundRobinStrategy;

impl PartitionStrategy for RoundRobinStrategy {
    fn split(&self, total: u32, member_count: usize, _rng: &mut dyn RngCore) -> Vec<Vec<u32>> {
        let mut lists = vec![Vec::new(); member_count];
        for (i, problem) in (1..=total).enumerate() {
            lists[i % member_count].push(problem);
        }
        lists
    }

    fn policy(&self) -> RemainderPolicy {
        RemainderPolicy::RoundRobin
    }
}
