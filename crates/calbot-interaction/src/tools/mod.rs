//! Tool registry module.
//!
//! # Module Structure
//!
//! - `catalog`: `ToolName` and the parameter schemas advertised to the model
//! - `registry`: `ToolRegistry`, which executes invocations by name

mod catalog;
mod registry;

pub use catalog::{ToolName, all_definitions};
pub use registry::ToolRegistry;
