pub use kernel::id::RefreshTokenId;
