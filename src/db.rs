use sqlx::SqlitePool;

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Pragmas for better durability/performance; failures are logged, not fatal
    for pragma in ["PRAGMA journal_mode=WAL;", "PRAGMA synchronous=NORMAL;", "PRAGMA busy_timeout=10000;"] {
        if let Err(e) = sqlx::query(pragma).execute(pool).await {
            tracing::warn!("Failed to apply {}: {}", pragma, e);
        }
    }

    // shifts: car and safety driver are plain ids, no foreign keys
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS shifts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            car_id INTEGER NULL,
            safety_driver_id INTEGER NULL,
            start_ts INTEGER NOT NULL,
            end_ts INTEGER NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS car_licences (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            licence TEXT NULL,
            car_id INTEGER NULL,
            safety_driver_id INTEGER NULL
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        ("idx_shifts_car_start", "CREATE INDEX IF NOT EXISTS idx_shifts_car_start ON shifts(car_id, start_ts)"),
        (
            "idx_shifts_driver_start",
            "CREATE INDEX IF NOT EXISTS idx_shifts_driver_start ON shifts(safety_driver_id, start_ts)",
        ),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}
