//! Ballot Common - Shared error types and utilities
//!
//! This crate provides the foundational types used across all Ballot components:
//! - Error types and error codes
//! - Utility functions
//! - Common constants

pub mod error;
pub mod utils;

pub use error::{BallotError, ErrorCode, find_ballot_error};
pub use utils::{is_valid_nin, non_blank, page_bounds};

/// Separator between the segments of a position path
pub const POSITION_PATH_SEPARATOR: char = '.';

pub const DEFAULT_PAGE_NO: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 500;

