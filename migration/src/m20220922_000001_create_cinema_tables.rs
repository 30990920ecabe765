use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    // Tables are created without IF NOT EXISTS: applying over an existing schema is an error.
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .col(pk_auto(User::UId))
                    .col(string_null(User::UserName))
                    .col(string_null(User::MobNo))
                    .col(string_null(User::EmailId))
                    .col(enumeration_null(User::Sex, Sex::Enum, [Sex::Male, Sex::Female, Sex::Other]))
                    .col(timestamp_now(User::CreatedAt))
                    .col(timestamp_now(User::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Theater::Table)
                    .col(pk_auto(Theater::TheaterId))
                    .col(string_null(Theater::TheaterName))
                    .col(string_null(Theater::Address))
                    .col(float_null(Theater::Rating))
                    .col(timestamp_now(Theater::CreatedAt))
                    .col(timestamp_now(Theater::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Movie references Theater, so Theater has to exist first.
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .col(pk_auto(Movie::MovieId))
                    .col(integer_null(Movie::TheaterId))
                    .col(string_null(Movie::MovieName))
                    .col(string_null(Movie::MovieType))
                    .col(string_null(Movie::MovieStatus))
                    .col(timestamp_now(Movie::CreatedAt))
                    .col(timestamp_now(Movie::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_theater")
                            .from(Movie::Table, Movie::TheaterId)
                            .to(Theater::Table, Theater::TheaterId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .col(pk_auto(Booking::BookingId))
                    .col(integer_null(Booking::UserId))
                    .col(integer_null(Booking::MovieId))
                    .col(integer_null(Booking::Amount))
                    .col(enumeration_null(
                        Booking::StatusOfPayment,
                        PaymentStatus::Enum,
                        [
                            PaymentStatus::Pending,
                            PaymentStatus::Paid,
                            PaymentStatus::Failed,
                            PaymentStatus::Refunded,
                        ],
                    ))
                    .col(date_null(Booking::BookedDate))
                    .col(date_null(Booking::MovieTiming))
                    .col(timestamp_now(Booking::CreatedAt))
                    .col(timestamp_now(Booking::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::UId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_movie")
                            .from(Booking::Table, Booking::MovieId)
                            .to(Movie::Table, Movie::MovieId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Theater::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await?;
        Ok(())
    }
}

fn timestamp_now<T: IntoIden>(col: T) -> ColumnDef {
    timestamp(col).default(Expr::current_timestamp()).to_owned()
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "User")]
    Table,
    #[sea_orm(iden = "uId")]
    UId,
    #[sea_orm(iden = "userName")]
    UserName,
    #[sea_orm(iden = "mobNo")]
    MobNo,
    #[sea_orm(iden = "emailId")]
    EmailId,
    Sex,
    #[sea_orm(iden = "createdAt")]
    CreatedAt,
    #[sea_orm(iden = "updatedAt")]
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Theater {
    #[sea_orm(iden = "Theater")]
    Table,
    #[sea_orm(iden = "theaterId")]
    TheaterId,
    #[sea_orm(iden = "theaterName")]
    TheaterName,
    Address,
    Rating,
    #[sea_orm(iden = "createdAt")]
    CreatedAt,
    #[sea_orm(iden = "updatedAt")]
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Movie {
    #[sea_orm(iden = "Movie")]
    Table,
    #[sea_orm(iden = "movieId")]
    MovieId,
    #[sea_orm(iden = "theaterId")]
    TheaterId,
    #[sea_orm(iden = "movieName")]
    MovieName,
    #[sea_orm(iden = "movieType")]
    MovieType,
    #[sea_orm(iden = "movieStatus")]
    MovieStatus,
    #[sea_orm(iden = "createdAt")]
    CreatedAt,
    #[sea_orm(iden = "updatedAt")]
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Booking {
    #[sea_orm(iden = "Booking")]
    Table,
    #[sea_orm(iden = "bookingId")]
    BookingId,
    #[sea_orm(iden = "userId")]
    UserId,
    #[sea_orm(iden = "movieId")]
    MovieId,
    Amount,
    StatusOfPayment,
    BookedDate,
    MovieTiming,
    #[sea_orm(iden = "createdAt")]
    CreatedAt,
    #[sea_orm(iden = "updatedAt")]
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sex {
    #[sea_orm(iden = "sex")]
    Enum,
    Male,
    Female,
    Other,
}

#[derive(DeriveIden)]
enum PaymentStatus {
    #[sea_orm(iden = "payment_status")]
    Enum,
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

    use super::*;

    const TABLES: [&str; 4] = ["User", "Theater", "Movie", "Booking"];

    async fn memory_db() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::connect(opts).await.unwrap()
    }

    #[async_std::test]
    async fn up_creates_all_tables() {
        let db = memory_db().await;
        let manager = SchemaManager::new(&db);

        Migration.up(&manager).await.unwrap();

        for table in TABLES {
            assert!(manager.has_table(table).await.unwrap(), "missing table {table}");
        }
        assert!(manager.has_column("User", "uId").await.unwrap());
        assert!(manager.has_column("Booking", "status_of_payment").await.unwrap());
        assert!(manager.has_column("Movie", "theaterId").await.unwrap());
    }

    #[async_std::test]
    async fn up_twice_is_a_schema_conflict() {
        let db = memory_db().await;
        let manager = SchemaManager::new(&db);

        Migration.up(&manager).await.unwrap();
        let err = Migration.up(&manager).await.unwrap_err();

        assert!(err.to_string().contains("already exists"), "unexpected error: {err}");
    }

    #[async_std::test]
    async fn down_drops_tables_in_reverse_order() {
        let db = memory_db().await;
        let manager = SchemaManager::new(&db);

        Migration.up(&manager).await.unwrap();
        db.execute_unprepared(r#"INSERT INTO "Theater" ("theaterName") VALUES ('Odeon')"#)
            .await
            .unwrap();
        db.execute_unprepared(r#"INSERT INTO "Movie" ("theaterId", "movieName") VALUES (1, 'Heat')"#)
            .await
            .unwrap();

        Migration.down(&manager).await.unwrap();

        for table in TABLES {
            assert!(!manager.has_table(table).await.unwrap(), "table {table} survived down");
        }
    }

    #[async_std::test]
    async fn migrator_tracks_the_applied_version() {
        let db = memory_db().await;

        crate::Migrator::up(&db, None).await.unwrap();
        crate::Migrator::up(&db, None).await.unwrap();

        let applied = crate::Migrator::get_applied_migrations(&db).await.unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].name(), "m20220922_000001_create_cinema_tables");

        crate::Migrator::down(&db, None).await.unwrap();
        assert!(crate::Migrator::get_applied_migrations(&db).await.unwrap().is_empty());
    }
}
