//! `staffhub-provisioning` — external identity provisioning.
//!
//! The employment workflow keeps an external identity service consistent
//! with employment state: sign-up on join, sign-down on leave. This crate
//! holds the client contract, the bind canonicalization rules, and the
//! HTTP implementation. Both remote operations are made idempotent by the
//! caller via lookup-before-write, so a failed call is safe to repeat.

pub mod bind;
pub mod client;
pub mod error;
pub mod http;
pub mod sign;

pub use bind::{BindType, canonical_bind_value};
pub use client::ProvisioningClient;
pub use error::ProvisioningError;
pub use http::HttpProvisioningClient;
pub use sign::{Account, SignUpForm, SignUpResult};
