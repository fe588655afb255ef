use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

/// Drop every table and recreate the schema empty.
pub fn reset(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS users;")?;
    run(conn)
}
