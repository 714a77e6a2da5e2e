//! Common types used across the client.

pub mod money;

pub use money::{Currency, Money};
