use contracts::domain::a001_car::aggregate::Car;
use contracts::domain::common::AggregateRoot;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

/// Open (creating if needed) the SQLite database and bootstrap the schema
pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<DatabaseConnection> {
    let db_file = db_path.unwrap_or("target/db/vehicles.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database {}", db_url);
    let conn = Database::connect(&db_url).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

/// Private in-memory database with the schema applied
#[cfg(test)]
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_owned());
    // every pooled connection would otherwise see its own empty database
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let table = Car::full_name();

    let check_car_table = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        table
    );
    let car_table_exists = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            check_car_table,
        ))
        .await?;

    if car_table_exists.is_empty() {
        tracing::info!("Creating {} table", table);
        // AUTOINCREMENT: ids of deleted cars are never handed out again
        let create_car_table_sql = format!(
            r#"
            CREATE TABLE {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                "condition" TEXT NOT NULL,
                manufacturer_code INTEGER NOT NULL,
                manufacturer_name TEXT NOT NULL,
                model TEXT NOT NULL,
                mileage INTEGER NOT NULL,
                external_color TEXT,
                body TEXT,
                engine TEXT,
                fuel_type TEXT,
                model_year INTEGER,
                production_year INTEGER,
                number_of_doors INTEGER,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                created_at TEXT NOT NULL,
                modified_at TEXT NOT NULL
            );
        "#,
            table
        );
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_car_table_sql,
        ))
        .await?;
    }

    Ok(())
}
