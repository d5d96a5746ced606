//! Core types for the portfolio admin.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod language;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use language::{Direction, Language};
pub use status::*;
