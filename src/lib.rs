//! clubapply - Club Application Assistant Library
//!
//! Collects club, applicant and short-answer details through a three-step
//! wizard and runs coaching agents against an HTTP backend.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
