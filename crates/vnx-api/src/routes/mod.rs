//! # API Route Modules
//!
//! - `verify`: proof verification, normalization and storage.
//! - `providers`: the provider catalog.
//! - `verifications`: latest stored verification per social account.

pub mod providers;
pub mod verifications;
pub mod verify;
