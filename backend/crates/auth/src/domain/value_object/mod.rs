//! Value Object Module

pub mod access_claims;
pub mod avatar_url;
pub mod display_name;
pub mod email;
pub mod refresh_token_id;
pub mod user_id;
pub mod user_password;
