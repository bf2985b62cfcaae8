//! Session-related types.
//!
//! Keys for the data stored in the tower-sessions record.

/// Session keys for checkout data.
pub mod keys {
    /// Key for the shop API cart ID.
    pub const CART_ID: &str = "cart_id";

    /// Key for the JSON-serialized shipping address.
    pub const CHECKOUT_ADDRESS: &str = "checkout_address";
}
