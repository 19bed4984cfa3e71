use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "consent_psu")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub consent_id: i32,
    pub psu_id: String,
    pub psu_id_type: Option<String>,
    pub psu_corporate_id: Option<String>,
    pub psu_corporate_id_type: Option<String>,
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
