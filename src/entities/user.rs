use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};

use super::sea_orm_active_enums::Sex;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "User")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "uId")]
    pub id: i32,
    #[sea_orm(column_name = "userName")]
    pub user_name: Option<String>,
    #[sea_orm(column_name = "mobNo")]
    pub mob_no: Option<String>,
    #[sea_orm(column_name = "emailId")]
    pub email_id: Option<String>,
    pub sex: Option<Sex>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking::Entity")]
    Booking,
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
