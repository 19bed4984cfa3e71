use sea_orm::entity::prelude::*;
use time::{Date, OffsetDateTime};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "consent_usage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub consent_id: i32,
    pub usage_date: Date,
    #[sea_orm(column_type = "Text")]
    pub resource_uri: String,
    pub created_date: OffsetDateTime,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::consent::Entity",
        from = "Column::ConsentId",
        to = "super::consent::Column::Id",
        on_update = "Restrict",
        on_delete = "Cascade"
    )]
    Consent,
}

impl Related<super::consent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consent.def()
    }
}
