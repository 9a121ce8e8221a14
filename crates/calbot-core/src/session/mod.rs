//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ChatMessage`,
//!   `ToolInvocation`) and tool advertisement types (`ToolDefinition`)

mod message;

// Re-export public API
pub use message::{
    ChatMessage, FunctionCall, FunctionDefinition, MessageRole, ToolDefinition, ToolInvocation,
};
