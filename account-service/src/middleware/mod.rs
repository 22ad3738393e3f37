mod jwt_auth;

pub use jwt_auth::{authenticated_user, JwtAuth, UserId};
