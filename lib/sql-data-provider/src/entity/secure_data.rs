use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

/// Encrypted adapter blob, at most one row per owner
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "secure_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_type: OwnerType,
    pub owner_id: i32,
    #[sea_orm(column_type = "Blob")]
    pub value: Vec<u8>,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum OwnerType {
    #[sea_orm(string_value = "CONSENT")]
    Consent,
    #[sea_orm(string_value = "PAYMENT")]
    Payment,
}
