use anyhow::Result;
use sea_orm::sea_query::LockType;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbBackend, EntityTrait, Select};

/// Create a SeaORM connection pool.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.max_connections(10);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Create a single-connection pool. An in-memory SQLite database lives and
/// dies with its connection, so every session must share the one handle.
pub async fn connect_single(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.max_connections(1);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Add `FOR UPDATE` to a select where the backend supports it. SQLite has no
/// row locks; its single-writer lock serializes the transaction instead.
pub fn for_update<E: EntityTrait>(query: Select<E>, backend: DbBackend) -> Select<E> {
    use sea_orm::QuerySelect;

    match backend {
        DbBackend::Sqlite => query,
        _ => query.lock(LockType::Update),
    }
}
