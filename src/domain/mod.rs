//! Domain layer: form data, agent tables, validation and result shapes.
//!
//! Nothing in here performs I/O.

pub mod constants;
pub mod errors;
pub mod models;
pub mod report;
pub mod requests;
pub mod selection;
pub mod validation;

pub use constants::*;
pub use errors::*;
pub use models::*;
pub use report::*;
pub use requests::*;
pub use selection::*;
pub use validation::*;
