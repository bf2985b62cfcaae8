//! Teslo Core - Shared checkout types.
//!
//! This crate provides the types the storefront and the shop API agree on:
//! - Opaque identifiers issued by the shop API (carts, orders)
//! - The shipping address persisted between checkout pages
//! - Cart snapshots, order summaries and the new-order payload
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no session
//! access, no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, addresses, countries and order types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
