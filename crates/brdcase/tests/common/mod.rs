//! Shared test utilities for brdcase integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated pipeline runs over a temp upload directory
//! - Scripted fakes for the generative API and the spreadsheet API
//! - Synthetic PDF builders

pub mod fakes;
pub mod harness;
pub mod pdf;

pub use fakes::*;
pub use harness::TestHarness;
pub use pdf::*;
