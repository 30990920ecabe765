use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "Movie")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "movieId")]
    pub id: i32,
    #[sea_orm(column_name = "theaterId")]
    pub theater_id: Option<i32>,
    #[sea_orm(column_name = "movieName")]
    pub movie_name: Option<String>,
    #[sea_orm(column_name = "movieType")]
    pub movie_type: Option<String>,
    #[sea_orm(column_name = "movieStatus")]
    pub movie_status: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::theater::Entity",
        from = "Column::TheaterId",
        to = "super::theater::Column::Id",
        on_delete = "Cascade"
    )]
    Theater,
    #[sea_orm(has_many = "super::booking::Entity")]
    Booking,
}

impl Related<super::theater::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Theater.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(super::now()?);
        }
        Ok(self)
    }
}
