use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use sea_orm_migration::SchemaManager;
use serde::Serialize;

use crate::{
    db,
    entities::{booking, movie, theater, user},
    error::CinemaResult,
};

#[derive(Clone, Copy, Debug)]
pub struct TableLayout {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Expected layout of the booking schema, in creation order.
pub const TABLES: [TableLayout; 4] = [
    TableLayout {
        name: "User",
        columns: &["uId", "userName", "mobNo", "emailId", "sex", "createdAt", "updatedAt"],
    },
    TableLayout {
        name: "Theater",
        columns: &["theaterId", "theaterName", "address", "rating", "createdAt", "updatedAt"],
    },
    TableLayout {
        name: "Movie",
        columns: &[
            "movieId",
            "theaterId",
            "movieName",
            "movieType",
            "movieStatus",
            "createdAt",
            "updatedAt",
        ],
    },
    TableLayout {
        name: "Booking",
        columns: &[
            "bookingId",
            "userId",
            "movieId",
            "amount",
            "status_of_payment",
            "booked_date",
            "movie_timing",
            "createdAt",
            "updatedAt",
        ],
    },
];

#[derive(Clone, Debug, Serialize)]
pub struct TableStatus {
    pub table: &'static str,
    pub present: bool,
    pub missing_columns: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
}

impl TableStatus {
    pub fn is_complete(&self) -> bool {
        self.present && self.missing_columns.is_empty()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SchemaReport {
    pub applied: Vec<String>,
    pub tables: Vec<TableStatus>,
}

impl SchemaReport {
    pub fn is_complete(&self) -> bool {
        self.tables.iter().all(TableStatus::is_complete)
    }

    pub fn is_absent(&self) -> bool {
        self.tables.iter().all(|t| !t.present)
    }
}

pub async fn inspect(db: &DatabaseConnection) -> CinemaResult<SchemaReport> {
    let manager = SchemaManager::new(db);
    let mut tables = Vec::with_capacity(TABLES.len());

    for layout in TABLES {
        let present = manager.has_table(layout.name).await?;
        let mut missing_columns = Vec::new();
        if present {
            for column in layout.columns {
                if !manager.has_column(layout.name, *column).await? {
                    missing_columns.push(*column);
                }
            }
        }

        let rows = if present && missing_columns.is_empty() {
            Some(row_count(db, layout.name).await?)
        } else {
            None
        };

        if !missing_columns.is_empty() {
            tracing::warn!(table = layout.name, missing = ?missing_columns, "table is incomplete");
        }

        tables.push(TableStatus { table: layout.name, present, missing_columns, rows });
    }

    Ok(SchemaReport { applied: db::applied_versions(db).await?, tables })
}

async fn row_count(db: &DatabaseConnection, table: &str) -> CinemaResult<u64> {
    let count = match table {
        "User" => user::Entity::find().count(db).await?,
        "Theater" => theater::Entity::find().count(db).await?,
        "Movie" => movie::Entity::find().count(db).await?,
        "Booking" => booking::Entity::find().count(db).await?,
        _ => 0,
    };
    Ok(count)
}
