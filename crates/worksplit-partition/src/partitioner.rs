//! Assignment partitioning

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};
use worksplit_core::{Assignment, AssignmentConfig, Member, MemberAssignment, RemainderPolicy};

use crate::strategy::strategy_for;

/// Split problems `1..=total_problems` among `members`.
///
/// Every problem lands with exactly one member, counts differ by at most one,
/// and each member's list is ascending. With no members the result is empty;
/// with `total_problems <= 0` every member gets an empty list. Counts above
/// `u32::MAX` are clamped, so callers should bound the input first.
pub fn partition<R>(
    total_problems: i64,
    members: &[Member],
    policy: RemainderPolicy,
    rng: &mut R,
) -> Assignment
where
    R: RngCore + ?Sized,
{
    if members.is_empty() {
        return Assignment::empty();
    }
    if total_problems <= 0 {
        return Assignment {
            total_problems: 0,
            entries: members
                .iter()
                .map(|member| MemberAssignment {
                    member: member.clone(),
                    problems: Vec::new(),
                })
                .collect(),
        };
    }

    let total = u32::try_from(total_problems).unwrap_or(u32::MAX);
    let mut rng = rng;
    let lists = strategy_for(policy).split(total, members.len(), &mut rng);

    let entries = members
        .iter()
        .zip(lists)
        .map(|(member, mut problems)| {
            problems.sort_unstable();
            MemberAssignment {
                member: member.clone(),
                problems,
            }
        })
        .collect();

    Assignment {
        total_problems: total,
        entries,
    }
}

/// Hands out assignments with a configured policy.
///
/// A fresh generator is built for every call, so a `Partitioner` can be
/// shared across request handlers without locking.
#[derive(Debug, Clone)]
pub struct Partitioner {
    /// Policy used when the caller doesn't pick one
    policy: RemainderPolicy,
    /// Seed used when the caller doesn't pass one
    seed: Option<u64>,
}

impl Partitioner {
    /// Create a new partitioner drawing from the thread RNG
    pub fn new(policy: RemainderPolicy) -> Self {
        Self { policy, seed: None }
    }

    /// Create a partitioner from the assignment configuration
    pub fn from_config(config: &AssignmentConfig) -> Self {
        info!(
            policy = %config.policy,
            seeded = config.seed.is_some(),
            "Partitioner initialized"
        );
        Self::new(config.policy).with_seed(config.seed)
    }

    /// Use a fixed seed for reproducible output
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Default policy
    pub fn policy(&self) -> RemainderPolicy {
        self.policy
    }

    /// Default seed, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Assign with the configured policy and seed
    pub fn assign(&self, total_problems: i64, members: &[Member]) -> Assignment {
        self.assign_with(total_problems, members, self.policy, None)
    }

    /// Assign with an explicit policy, and a seed overriding the configured one
    pub fn assign_with(
        &self,
        total_problems: i64,
        members: &[Member],
        policy: RemainderPolicy,
        seed: Option<u64>,
    ) -> Assignment {
        let seed = seed.or(self.seed);

        let assignment = match seed {
            Some(seed) => partition(
                total_problems,
                members,
                policy,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => partition(total_problems, members, policy, &mut rand::rng()),
        };

        debug!(
            counts = ?assignment.entries.iter().map(MemberAssignment::count).collect::<Vec<_>>(),
            "Problem counts per member"
        );
        info!(
            members = members.len(),
            total_problems = total_problems,
            policy = %policy,
            seeded = seed.is_some(),
            "Assignment generated"
        );

        assignment
    }
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new(RemainderPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POLICIES: [RemainderPolicy; 3] = [
        RemainderPolicy::Random,
        RemainderPolicy::RandomExtra,
        RemainderPolicy::RoundRobin,
    ];

    fn members(names: &[&str]) -> Vec<Member> {
        Member::from_names(names.iter().copied())
    }

    fn counts(assignment: &Assignment) -> Vec<usize> {
        let mut counts: Vec<usize> = assignment.entries.iter().map(|e| e.count()).collect();
        counts.sort_unstable();
        counts
    }

    #[test]
    fn test_one_each() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = partition(4, &members(&["A", "B", "C", "D"]), RemainderPolicy::Random, &mut rng);

        assert!(a.is_partition());
        assert_eq!(counts(&a), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_uneven_split() {
        for policy in POLICIES {
            let mut rng = StdRng::seed_from_u64(2);
            let a = partition(10, &members(&["A", "B", "C"]), policy, &mut rng);

            assert!(a.is_partition(), "{policy}");
            assert_eq!(counts(&a), vec![3, 3, 4], "{policy}");
        }
    }

    #[test]
    fn test_single_problem_two_members() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = partition(1, &members(&["A", "B"]), RemainderPolicy::Random, &mut rng);

        assert!(a.is_partition());
        assert_eq!(counts(&a), vec![0, 1]);
        let winner = a.entries.iter().find(|e| e.count() == 1).unwrap();
        assert_eq!(winner.problems, vec![1]);
    }

    #[test]
    fn test_zero_and_negative_totals() {
        let list = members(&["A", "B"]);
        for total in [0, -5] {
            let mut rng = StdRng::seed_from_u64(4);
            let a = partition(total, &list, RemainderPolicy::Random, &mut rng);

            assert_eq!(a.len(), 2);
            assert_eq!(a.find("A").unwrap().problems, Vec::<u32>::new());
            assert_eq!(a.find("B").unwrap().problems, Vec::<u32>::new());
        }
    }

    #[test]
    fn test_no_members() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = partition(5, &[], RemainderPolicy::Random, &mut rng);
        assert!(a.is_empty());
    }

    #[test]
    fn test_duplicate_names_are_distinct() {
        let mut rng = StdRng::seed_from_u64(6);
        let a = partition(6, &members(&["Ito", "Ito"]), RemainderPolicy::Random, &mut rng);

        assert_eq!(a.len(), 2);
        assert_eq!(a.get(0).unwrap().count(), 3);
        assert_eq!(a.get(1).unwrap().count(), 3);
        assert!(a.is_partition());
    }

    #[test]
    fn test_entries_keep_member_order() {
        let list = members(&["Sawa", "Ito", "Nishikawa"]);
        let a = Partitioner::default().assign(9, &list);

        let names: Vec<&str> = a.entries.iter().map(|e| e.member.name.as_str()).collect();
        assert_eq!(names, vec!["Sawa", "Ito", "Nishikawa"]);
    }

    #[test]
    fn test_round_robin_is_exact() {
        let a = Partitioner::new(RemainderPolicy::RoundRobin).assign(7, &members(&["A", "B", "C"]));

        assert_eq!(a.find("A").unwrap().problems, vec![1, 4, 7]);
        assert_eq!(a.find("B").unwrap().problems, vec![2, 5]);
        assert_eq!(a.find("C").unwrap().problems, vec![3, 6]);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let list = members(&["A", "B", "C"]);
        let partitioner = Partitioner::new(RemainderPolicy::Random).with_seed(Some(42));

        let first = partitioner.assign(20, &list);
        let second = partitioner.assign(20, &list);
        assert_eq!(first, second);

        let explicit =
            Partitioner::default().assign_with(20, &list, RemainderPolicy::Random, Some(42));
        assert_eq!(first, explicit);
    }

    #[test]
    fn test_explicit_seed_overrides_configured_seed() {
        let list = members(&["A", "B", "C", "D"]);
        let partitioner = Partitioner::new(RemainderPolicy::Random).with_seed(Some(1));

        let runs: Vec<Assignment> = (0..8)
            .map(|seed| partitioner.assign_with(40, &list, RemainderPolicy::Random, Some(seed)))
            .collect();
        assert!(runs.iter().any(|a| *a != runs[0]));
    }

    #[test]
    fn test_from_config() {
        let config = AssignmentConfig {
            policy: RemainderPolicy::RandomExtra,
            seed: Some(9),
            ..AssignmentConfig::default()
        };
        let partitioner = Partitioner::from_config(&config);
        assert_eq!(partitioner.policy(), RemainderPolicy::RandomExtra);
        assert_eq!(partitioner.seed(), Some(9));
    }

    proptest! {
        #[test]
        fn prop_partition_invariants(
            total in 1i64..300,
            member_count in 1usize..12,
            seed in any::<u64>(),
            policy_index in 0usize..3,
        ) {
            let names: Vec<String> = (0..member_count).map(|i| format!("m{}", i)).collect();
            let list = Member::from_names(names);
            let policy = POLICIES[policy_index];
            let mut rng = StdRng::seed_from_u64(seed);

            let a = partition(total, &list, policy, &mut rng);

            prop_assert_eq!(a.len(), member_count);
            prop_assert!(a.is_partition());
            prop_assert_eq!(a.assigned_count() as i64, total);

            let base = total as usize / member_count;
            let extra = total as usize % member_count;
            for entry in &a.entries {
                prop_assert!(entry.count() == base || entry.count() == base + 1);
            }
            let with_extra = a.entries.iter().filter(|e| e.count() == base + 1).count();
            prop_assert_eq!(with_extra, extra);
        }

        #[test]
        fn prop_same_seed_same_assignment(
            total in 1i64..100,
            member_count in 1usize..8,
            seed in any::<u64>(),
        ) {
            let names: Vec<String> = (0..member_count).map(|i| format!("m{}", i)).collect();
            let list = Member::from_names(names);

            let a = partition(total, &list, RemainderPolicy::Random, &mut StdRng::seed_from_u64(seed));
            let b = partition(total, &list, RemainderPolicy::Random, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(a, b);
        }
    }
}
