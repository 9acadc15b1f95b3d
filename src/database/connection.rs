use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;

use super::setup;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

/// Opens the pool and makes sure the schema exists
pub fn open_pool(database_path: &str) -> Result<DbPool> {
    let pool = create_pool(database_path)?;
    let conn = get_connection(&pool)?;
    setup::ensure_schema(&conn)?;
    Ok(pool)
}

pub fn create_pool(database_path: &str) -> Result<DbPool> {
    let manager = build_manager(database_path);
    build_pool(manager)
}

// Cascading deletes of roster and round players rely on foreign keys.
fn build_manager(path: &str) -> SqliteConnectionManager {
    SqliteConnectionManager::file(path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"))
}

fn build_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    r2d2::Pool::builder()
        .build(manager)
        .context("Failed to create database connection pool")
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get database connection from pool")
}
