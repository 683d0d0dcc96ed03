//! Credential types shared by signers and verifiers.

pub mod id;
pub mod secret;

pub use id::*;
pub use secret::*;
