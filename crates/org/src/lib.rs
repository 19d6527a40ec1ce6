//! `staffhub-org` — organizational staffing domain model.
//!
//! Staff records, posts, and the assignment records linking them. All
//! state transitions that span more than one of these go through the
//! lifecycle coordinator in `staffhub-infra`; this crate holds the pure
//! model and its invariants.

pub mod assignment;
pub mod post;
pub mod staff;

pub use assignment::StaffPost;
pub use post::Post;
pub use staff::{PostStatus, Staff, StaffFragment};
