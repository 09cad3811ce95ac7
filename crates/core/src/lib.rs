//! Threadline Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront:
//! product identifiers, decimal prices, and catalog product records.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no session access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
