//! Checkout summary flow.
//!
//! # Pieces
//!
//! - [`CheckoutSession`] - the single owned checkout state (cart + address),
//!   loaded from the session once per request and saved on change
//! - [`guard`] - redirects away from the summary when no deliverable
//!   address has been collected yet
//! - [`SubmissionController`] - the "confirm order" state machine:
//!   `idle -> posting -> placed (navigate away) | (idle with error)`

pub mod guard;
pub mod store;
pub mod submission;

pub use guard::{ADDRESS_ROUTE, require_address};
pub use store::CheckoutSession;
pub use submission::{Blocked, Placement, SubmissionController};
