//! Core types for the Teslo checkout.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod country;
pub mod id;
pub mod order;
pub mod price;

pub use address::ShippingAddress;
pub use country::Country;
pub use id::*;
pub use order::{CartLine, CartSnapshot, NewOrder, OrderSummary};
pub use price::Price;
