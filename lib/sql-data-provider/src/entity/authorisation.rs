use one_dto_mapper::{From, Into};
use sea_orm::entity::prelude::*;
use shared_types::AuthorisationId;
use time::OffsetDateTime;

/// Owner is referenced through exactly one of `consent_id`/`payment_id`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authorisation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub external_id: AuthorisationId,
    pub kind: AuthorisationKind,
    pub consent_id: Option<i32>,
    pub payment_id: Option<i32>,
    pub instance_id: String,
    pub sca_status: ScaStatus,
    pub sca_approach: ScaApproach,
    pub psu_id: Option<String>,
    pub psu_id_type: Option<String>,
    pub psu_corporate_id: Option<String>,
    pub psu_corporate_id_type: Option<String>,
    pub chosen_sca_method: Option<String>,
    pub redirect_url_expiration_timestamp: OffsetDateTime,
    pub authorisation_expiration_timestamp: OffsetDateTime,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
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
    #[sea_orm(
        belongs_to = "super::payment::Entity",
        from = "Column::PaymentId",
        to = "super::payment::Column::Id",
        on_update = "Restrict",
        on_delete = "Cascade"
    )]
    Payment,
}

impl Related<super::consent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consent.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, From, Into)]
#[from(xs2a_core::model::authorisation::AuthorisationKind)]
#[into(xs2a_core::model::authorisation::AuthorisationKind)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AuthorisationKind {
    #[sea_orm(string_value = "CREATE")]
    Create,
    #[sea_orm(string_value = "CANCEL")]
    Cancel,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, From, Into)]
#[from(xs2a_core::model::authorisation::ScaStatus)]
#[into(xs2a_core::model::authorisation::ScaStatus)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ScaStatus {
    #[sea_orm(string_value = "RECEIVED")]
    Received,
    #[sea_orm(string_value = "PSU_IDENTIFIED")]
    PsuIdentified,
    #[sea_orm(string_value = "PSU_AUTHENTICATED")]
    PsuAuthenticated,
    #[sea_orm(string_value = "SCA_METHOD_SELECTED")]
    ScaMethodSelected,
    #[sea_orm(string_value = "STARTED")]
    Started,
    #[sea_orm(string_value = "FINALISED")]
    Finalised,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "EXEMPTED")]
    Exempted,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, From, Into)]
#[from(xs2a_core::model::authorisation::ScaApproach)]
#[into(xs2a_core::model::authorisation::ScaApproach)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ScaApproach {
    #[sea_orm(string_value = "EMBEDDED")]
    Embedded,
    #[sea_orm(string_value = "DECOUPLED")]
    Decoupled,
    #[sea_orm(string_value = "REDIRECT")]
    Redirect,
}
