//! Database migration support.
//!
//! Embeds and runs the SQL migrations in `quire_core/migrations/` that create
//! the `users` and `posts` tables.

use sqlx::PgPool;

/// Run all embedded database migrations against the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
