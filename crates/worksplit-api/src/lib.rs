//! worksplit-api: HTTP surface for worksplit
//!
//! This crate provides the router served by `worksplitd`:
//! - The HTML assignment form
//! - JSON endpoints for assignments, subjects and status

pub mod form;
pub mod rest;

pub use rest::{create_router, AppState};
