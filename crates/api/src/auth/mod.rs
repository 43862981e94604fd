//! Credential handling: Argon2id password hashing ([`password`]) and
//! HS256 access tokens ([`jwt`]).

pub mod jwt;
pub mod password;
