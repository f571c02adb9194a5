//! `preset-export-auth`: authentication/authorization boundary for exports.
//!
//! Decoupled from HTTP and storage: the API turns a bearer token into
//! [`JwtClaims`], derives a [`Principal`] and checks it with [`authorize`].

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, Principal, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use permissions::Permission;
pub use principal::{PrincipalId, RoleGrants};
pub use roles::Role;
