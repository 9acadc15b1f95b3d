pub mod connection;
pub mod models;
pub mod rankings;
pub mod rounds;
pub mod setup;
pub mod store;
pub mod teams;
pub mod tournaments;

pub use connection::{create_pool, get_connection, open_pool, DbConn, DbPool};
pub use models::*;
pub use store::{ImportCounts, SqliteStore};
