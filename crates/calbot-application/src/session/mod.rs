//! Session application services.
//!
//! - `cache`: keyed, lazily-populated map of per-session state
//! - `factory`: builds fresh conversations from shared collaborators
//! - `store`: the `send` / `reset` entry points used by adapters

mod cache;
mod factory;
mod store;

pub use cache::SessionCache;
pub use factory::SessionFactory;
pub use store::SessionStore;
