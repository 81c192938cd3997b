pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{validate_bearer, AuthenticatedUser};
pub use permissions::{is_authorized, require_admin, Action, Authored};
