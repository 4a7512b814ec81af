pub mod authenticated_user;
pub mod authentication_request;

pub use authenticated_user::{AuthContext, Principal};
pub use authentication_request::{authorize, Role, RoleRequirement};
