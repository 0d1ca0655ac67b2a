//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id with configurable cost and optional pepper)
//! - Secure random tokens
//! - Client metadata extraction from request headers
//! - Human-readable duration parsing (`15m`, `7d`)

pub mod client;
pub mod crypto;
pub mod duration;
pub mod password;
