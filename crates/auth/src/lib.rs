//! `registrar-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Token
//! decoding and password verification live in the external credential store;
//! what arrives here is an already-verified claims object.

pub mod claims;
pub mod policy;
pub mod roles;

pub use claims::{AuthClaims, TokenValidationError, validate_claims};
pub use policy::{Action, Caller, authorize};
pub use roles::Role;
