//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    avatar_url::AvatarUrl, display_name::DisplayName, email::Email,
    refresh_token_id::RefreshTokenId, user_id::UserId, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
///
/// Owns the connection pool. Construct once at startup, share by cloning,
/// and call [`PgAuthRepository::close`] on shutdown.
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> AuthResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "Connected to PostgreSQL");

        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> AuthResult<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| AuthError::Internal(format!("Migration failed: {}", e)))?;

        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Drain and close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                name,
                email,
                password_hash,
                avatar,
                last_logout_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.avatar.as_ref().map(AvatarUrl::as_str))
        .bind(user.last_logout_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AuthError::EmailTaken,
            other => AuthError::Database(other),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT} WHERE user_id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT} WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn set_last_logout(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<bool> {
        let updated = sqlx::query(
            "UPDATE users SET last_logout_at = $2, updated_at = $2 WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (
                token_id,
                token,
                user_id,
                client_ip,
                user_agent,
                expires_at,
                revoked_at,
                created_at
            ) VALUES ($1, $2, $3, $4::inet, $5, $6, $7, $8)
            "#,
        )
        .bind(token.token_id.as_uuid())
        .bind(&token.token)
        .bind(token.user_id.as_uuid())
        .bind(token.client_ip.as_deref())
        .bind(token.user_agent.as_deref())
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT
                token_id,
                token,
                user_id,
                host(client_ip) AS client_ip,
                user_agent,
                expires_at,
                revoked_at,
                created_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshTokenRow::into_refresh_token))
    }

    async fn revoke(&self, token_id: &RefreshTokenId, at: DateTime<Utc>) -> AuthResult<bool> {
        let updated = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2 WHERE token_id = $1 AND revoked_at IS NULL",
        )
        .bind(token_id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn revoke_all_for_user(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<u64> {
        let updated = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2 WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted > 0 {
            tracing::info!(deleted, "Cleaned up expired refresh tokens");
        }

        Ok(deleted)
    }
}

// ============================================================================
// Internal row types for sqlx mapping
// ============================================================================

const USER_SELECT: &str = r#"
    SELECT
        user_id,
        name,
        email,
        password_hash,
        avatar,
        last_logout_at,
        created_at,
        updated_at
    FROM users
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    avatar: Option<String>,
    last_logout_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            name: DisplayName::from_db(self.name),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            avatar: self.avatar.map(AvatarUrl::from_db),
            last_logout_at: self.last_logout_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token_id: Uuid,
    token: String,
    user_id: Uuid,
    client_ip: Option<String>,
    user_agent: Option<String>,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl RefreshTokenRow {
    fn into_refresh_token(self) -> RefreshToken {
        RefreshToken {
            token_id: RefreshTokenId::from_uuid(self.token_id),
            token: self.token,
            user_id: UserId::from_uuid(self.user_id),
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            expires_at: self.expires_at,
            revoked_at: self.revoked_at,
            created_at: self.created_at,
        }
    }
}
