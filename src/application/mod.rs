//! Application layer managing state and workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the wizard, agent executions, the agent pages and the focus model the
//! terminal interface renders.

pub mod agent_panel;
pub mod execution;
pub mod fields;
pub mod state;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

pub use agent_panel::*;
pub use execution::*;
pub use fields::*;
pub use state::*;
pub use wizard::*;
