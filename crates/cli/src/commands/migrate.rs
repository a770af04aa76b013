//! Database migration command.
//!
//! ```bash
//! shelf-cli migrate
//! ```
//!
//! Migration files live in `crates/admin/migrations/` and are embedded at
//! compile time.

use recipe_shelf_admin::db;

/// Run the admin database migrations.
///
/// # Errors
///
/// Returns an error if `SHELF_DATABASE_URL` is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
