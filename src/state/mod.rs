//! State module for tracking traversal progress
//!
//! # Components
//!
//! - `PaginationState`: page number, empty-page streak and numbering scheme
//!   of a Blog-mode listing walk
//! - `WalkDecision`: whether a walk continues after a listing page

mod pagination;

// Re-export main types
pub use pagination::{PaginationState, WalkDecision, WalkLimits};
