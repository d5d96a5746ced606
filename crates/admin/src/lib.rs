//! Portfolio admin dashboard core.
//!
//! Everything the dashboard does apart from drawing pages:
//!
//! - `backend` - REST client for the hosted database
//! - `gateway` - typed CRUD for each content domain
//! - `session` / `storage` - the persisted admin session
//! - `services` - authentication and the media storage contract
//! - `query` - read cache with deduplication and invalidation
//! - `i18n` - English/Arabic message table
//! - `state` - [`AdminContext`], which wires the above together
//!
//! # Security
//!
//! The backend API key is held as a `SecretString` and never logged.
//! Passwords are only exposed while a remote call is being serialized.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod i18n;
pub mod models;
pub mod query;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
pub mod validation;

pub use error::AppError;
pub use state::AdminContext;
