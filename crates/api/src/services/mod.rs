//! Application services backing the route handlers.

pub mod remote_userinfo;
pub mod user_info;

pub use remote_userinfo::{RemoteUserInfoClient, RemoteUserInfoError};
pub use user_info::resolve_user_info;
