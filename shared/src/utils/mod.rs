//! Utility functions shared across the workspace.

pub mod email;
