//! Configuration types
//!
//! Board-agnostic driver configuration. Every type has a `Default` that
//! matches the legacy ESP8266 firmware timing; with the `serde` feature
//! the whole set can be stored as postcard binary data.

pub mod stored;
pub mod types;

pub use stored::{ConfigError, DriverConfig};
pub use types::*;
