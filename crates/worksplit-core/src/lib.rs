//! worksplit-core: Core types for worksplit
//!
//! This crate provides the types shared by the partitioner, the web form and
//! the CLI:
//! - Members, assignments and request validation
//! - Share text rendering
//! - Configuration types
//! - Error handling

pub mod config;
pub mod error;
pub mod model;
pub mod share;

pub use config::*;
pub use error::*;
pub use model::*;
pub use share::*;
