//! Livestock Identity Registry
//!
//! This crate records livestock identity records keyed by an opaque content
//! hash, tracks who owns each animal, and gates registration, status changes
//! and transfers. Callers supply the acting principal and current block height
//! on every operation through a [`CallContext`]; the registry never stores them.

pub mod config;
pub mod errors;
pub mod registry;
pub mod shared;
pub mod types;

pub use config::RegistryConfig;
pub use errors::*;
pub use registry::{LivestockRegistry, RegistrySnapshot};
pub use shared::SharedRegistry;
pub use types::*;
