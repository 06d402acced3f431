//! Persistence interfaces for verification secrets and user profiles.

pub mod profile;
pub mod secret;

pub use profile::{MockUserProfileStore, UserProfileStore};
pub use secret::{MemorySecretStore, SecretRecord, SecretStore};
