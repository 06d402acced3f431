//! Value objects used across the verification services.

pub mod caller;

pub use caller::Caller;
