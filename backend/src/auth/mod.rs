//! Authentication module
//!
//! Credential checks, access tokens and the extractors that guard the
//! admin and member routes.

mod gate;
mod jwt;
mod middleware;

pub use gate::AuthGate;
pub use jwt::{Claims, JwtService};
pub use middleware::{AdminUser, AuthUser, MemberUser};
