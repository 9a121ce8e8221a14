//! Infrastructure layer for Calbot.
//!
//! Adapters to the outside world: the Cal.com HTTP client, and file-backed
//! configuration and secret storage under `~/.config/calbot/`.

pub mod cal_api_client;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use crate::cal_api_client::CalApiClient;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::storage::{ConfigStorage, SecretStorage};
