//! worksplit-partition: Problem partitioner for worksplit
//!
//! This crate splits a numbered problem set among members:
//! - Remainder policies (random, random-extra, round-robin)
//! - The `partition` function with an injected random source
//! - A seedable `Partitioner` shared by the web form and the CLI

pub mod partitioner;
pub mod strategy;

pub use partitioner::{partition, Partitioner};
pub use strategy::{strategy_for, PartitionStrategy};
