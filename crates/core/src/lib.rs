//! Portfolio Admin Core - Shared types library.
//!
//! This crate provides the types shared by every portfolio admin component:
//! - `admin` - Backend gateway, session store, auth service and query cache
//! - `cli` - Command-line surface over the admin library
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for record IDs and emails, plus role, language
//!   and project status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

#[doc(hidden)]
pub use uuid;
