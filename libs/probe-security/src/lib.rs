#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod claim_types;
pub mod claims;
pub mod identity;
pub mod principal;

pub use claims::Claim;
pub use identity::{ClaimsIdentity, ClaimsIdentityBuilder};
pub use principal::{ClaimsPrincipal, PrincipalError};
