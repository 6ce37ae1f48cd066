use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS fields (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        area REAL NOT NULL CHECK (area >= 0),
        culture TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS resources (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        culture_type TEXT NOT NULL,
        seed_per_hectare REAL NOT NULL,
        fertilizer_per_hectare REAL NOT NULL,
        worker_per_hectare REAL NOT NULL,
        worker_work_durality_per_hectare REAL NOT NULL,
        yield_per_hectare REAL NOT NULL
    );

    CREATE TABLE IF NOT EXISTS machines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        machine_type TEXT NOT NULL,
        fuel_consumption REAL NOT NULL,
        is_available INTEGER NOT NULL DEFAULT 1,
        work_durality_per_hectare REAL NOT NULL,
        field_id INTEGER REFERENCES fields(id) ON DELETE SET NULL,
        resource_id INTEGER NOT NULL REFERENCES resources(id) ON DELETE RESTRICT
    );

    CREATE TABLE IF NOT EXISTS workers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        age INTEGER NOT NULL,
        hourly_rate REAL NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        hours_worked REAL NOT NULL DEFAULT 0,
        field_id INTEGER REFERENCES fields(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS worker_tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        worker_id INTEGER NOT NULL REFERENCES workers(id) ON DELETE RESTRICT,
        field_id INTEGER NOT NULL REFERENCES fields(id) ON DELETE RESTRICT,
        task_type TEXT NOT NULL,
        progress REAL NOT NULL DEFAULT 0,
        start_date TEXT NOT NULL,
        real_end_date TEXT,
        estimated_end_date TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS warehouses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT
    );

    CREATE TABLE IF NOT EXISTS inventory_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        warehouse_id INTEGER NOT NULL REFERENCES warehouses(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        unit TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS schema_migrations (
        version INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 2: Add indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_resources_culture_type
        ON resources(culture_type);
    CREATE INDEX IF NOT EXISTS idx_machines_field_id
        ON machines(field_id);
    CREATE INDEX IF NOT EXISTS idx_machines_resource_id
        ON machines(resource_id);
    CREATE INDEX IF NOT EXISTS idx_workers_field_id
        ON workers(field_id);
    CREATE INDEX IF NOT EXISTS idx_worker_tasks_field_id
        ON worker_tasks(field_id);
    CREATE INDEX IF NOT EXISTS idx_worker_tasks_worker_id
        ON worker_tasks(worker_id);
    CREATE INDEX IF NOT EXISTS idx_inventory_items_warehouse_id
        ON inventory_items(warehouse_id);
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        // Ensure schema_migrations table exists
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        let current_version: i32 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )?;

        // Apply pending migrations, each in its own transaction
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!(version, "Applying migration");
                let tx = conn.transaction()?;
                tx.execute_batch(migration)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    })
}

pub fn current_version(db: &Database) -> Result<i32> {
    db.with_conn(|conn| {
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(Into::into)
    })
}
