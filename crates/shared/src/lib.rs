//! Shared types, errors, and configuration for Lendwise.
//!
//! This crate provides common types used across all other crates:
//! - Session and user profile wire types
//! - The uniform backend response envelope
//! - Money types with decimal precision
//! - Client-wide error taxonomy
//! - Configuration management

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod types;

pub use auth::{Session, TokenPair, UserProfile, UserStatus, UserType};
pub use config::AppConfig;
pub use envelope::{ApiEnvelope, FieldError};
pub use error::{ApiError, ApiResult, ErrorKind};
