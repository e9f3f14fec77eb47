use std::path::PathBuf;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Settings the handlers need beyond the database handle.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Building name printed in the contract header.
    pub building_name: String,
    /// URL of the agency logo. Empty disables the logo slot.
    pub logo_url: String,
    /// Upper bound for one off-screen PDF render, in milliseconds.
    pub timeout_ms: u64,
}

/// Shared application state.
pub struct AppState {
    pub db: SqlitePool,
    pub config: ServerConfig,
}

impl AppState {
    /// Connects to the database and brings the schema up to date.
    ///
    /// The connection string comes from `DATABASE_URL`, falling back to a
    /// local `data/gestloc.db` file created on first start.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            let data_dir = PathBuf::from("data");
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/gestloc.db?mode=rwc", data_dir.display())
        });

        tracing::info!("Connecting to database: {}", database_url);

        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;

        run_migrations(&db).await?;

        Ok(Self { db, config })
    }
}

/// Creates the tables and indexes when they do not exist yet.
pub(crate) async fn run_migrations(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS landlord_profiles (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            nationality TEXT NOT NULL,
            passport_number TEXT,
            address TEXT NOT NULL,
            bank_name TEXT NOT NULL,
            bank_account TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tenants (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT,
            phone TEXT
        )
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leases (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL REFERENCES tenants(id),
            unit_number TEXT NOT NULL,
            bedrooms INTEGER NOT NULL DEFAULT 1,
            bathrooms INTEGER NOT NULL DEFAULT 1,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            rent_amount REAL NOT NULL,
            deposit_amount REAL
        )
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clauses (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            article_number INTEGER,
            is_annex INTEGER NOT NULL DEFAULT 0,
            order_index INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_leases_tenant ON leases(tenant_id)")
        .execute(db)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_clauses_order ON clauses(is_annex, order_index)")
        .execute(db)
        .await?;

    tracing::debug!("Database migrations complete");

    Ok(())
}
