//! User profile store contract and in-memory mock.

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockUserProfileStore;
pub use r#trait::UserProfileStore;
