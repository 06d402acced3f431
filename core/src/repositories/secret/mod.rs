//! Secret store abstraction shared by the code and token flows.

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::MemorySecretStore;
pub use r#trait::{SecretRecord, SecretStore};
