use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, TransactionTrait,
};
use tracing::{debug, info};

use crate::{config::Config, error::CinemaResult};

// Cascade deletes depend on foreign_keys being enabled per connection.
const SQLITE_PRAGMAS: [&str; 3] =
    ["PRAGMA foreign_keys=ON", "PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

pub async fn connect(config: &Config) -> CinemaResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.max_connections(config.max_connections).sqlx_logging(config.sql_logging);

    let db = Database::connect(opts).await?;

    if db.get_database_backend() == DbBackend::Sqlite {
        for pragma in SQLITE_PRAGMAS {
            db.execute_unprepared(pragma).await?;
        }
    }

    debug!(backend = ?db.get_database_backend(), "connected");
    Ok(db)
}

/// Runs every pending migration in a single transaction and returns the versions applied.
///
/// A failure in any step rolls the whole batch back, so the store is never left half-migrated.
pub async fn apply(db: &DatabaseConnection) -> CinemaResult<Vec<String>> {
    let pending: Vec<String> = Migrator::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    if pending.is_empty() {
        info!("schema already up to date");
        return Ok(pending);
    }

    let txn = db.begin().await?;
    Migrator::up(&txn, None).await?;
    txn.commit().await?;

    for version in &pending {
        info!(version = %version, "applied migration");
    }
    Ok(pending)
}

/// Rolls back every applied migration, newest first, in a single transaction.
pub async fn revert(db: &DatabaseConnection) -> CinemaResult<Vec<String>> {
    let mut applied = applied_versions(db).await?;
    applied.reverse();

    if applied.is_empty() {
        info!("nothing to revert");
        return Ok(applied);
    }

    let txn = db.begin().await?;
    Migrator::down(&txn, None).await?;
    txn.commit().await?;

    for version in &applied {
        info!(version = %version, "reverted migration");
    }
    Ok(applied)
}

pub async fn applied_versions(db: &DatabaseConnection) -> CinemaResult<Vec<String>> {
    Ok(Migrator::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect())
}

#[cfg(test)]
pub(crate) async fn memory_db() -> DatabaseConnection {
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
        sql_logging: false,
    };
    connect(&config).await.unwrap()
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::SchemaManager;

    use super::*;
    use crate::error::CinemaError;

    #[tokio::test]
    async fn apply_creates_schema_once() {
        let db = memory_db().await;

        let first = apply(&db).await.unwrap();
        assert_eq!(first, vec!["m20220922_000001_create_cinema_tables".to_string()]);

        let second = apply(&db).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(applied_versions(&db).await.unwrap(), first);
    }

    #[tokio::test]
    async fn revert_drops_every_table() {
        let db = memory_db().await;
        apply(&db).await.unwrap();

        let reverted = revert(&db).await.unwrap();
        assert_eq!(reverted.len(), 1);

        let manager = SchemaManager::new(&db);
        for table in ["Booking", "Movie", "Theater", "User"] {
            assert!(!manager.has_table(table).await.unwrap(), "{table} still exists");
        }
        assert!(applied_versions(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn apply_after_revert_recreates_schema() {
        let db = memory_db().await;
        apply(&db).await.unwrap();
        revert(&db).await.unwrap();

        assert_eq!(apply(&db).await.unwrap().len(), 1);
        assert!(SchemaManager::new(&db).has_table("Booking").await.unwrap());
    }

    #[tokio::test]
    async fn revert_on_empty_store_is_noop() {
        let db = memory_db().await;
        assert!(revert(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_apply_leaves_no_partial_schema() {
        let db = memory_db().await;
        db.execute_unprepared(r#"CREATE TABLE "Booking" ("bookingId" integer PRIMARY KEY)"#)
            .await
            .unwrap();

        let err = apply(&db).await.unwrap_err();
        assert!(matches!(err, CinemaError::SchemaConflict(_)), "unexpected error: {err}");

        let manager = SchemaManager::new(&db);
        for table in ["User", "Theater", "Movie"] {
            assert!(!manager.has_table(table).await.unwrap(), "{table} left behind");
        }
        assert!(manager.has_table("Booking").await.unwrap());
        assert!(applied_versions(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn creating_an_existing_table_is_a_schema_conflict() {
        let db = memory_db().await;
        apply(&db).await.unwrap();

        let err = db.execute_unprepared(r#"CREATE TABLE "User" ("uId" integer)"#).await.unwrap_err();
        assert!(matches!(CinemaError::from(err), CinemaError::SchemaConflict(_)));
    }
}
