use one_dto_mapper::{From, Into};
use sea_orm::entity::prelude::*;
use shared_types::ConsentId;
use time::{Date, OffsetDateTime};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "consent")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub external_id: ConsentId,
    pub instance_id: String,
    pub status: ConsentStatus,
    pub valid_until: Date,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
    pub frequency_per_day: u32,
    pub recurring: bool,
    pub one_access_type: bool,
    pub multilevel_sca_required: bool,
    pub tpp_authorisation_number: String,
    pub tpp_authority_id: String,
    pub tpp_redirect_uri: Option<String>,
    pub tpp_nok_redirect_uri: Option<String>,
    pub tpp_cancel_redirect_uri: Option<String>,
    pub tpp_cancel_nok_redirect_uri: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::consent_psu::Entity")]
    ConsentPsu,
    #[sea_orm(has_many = "super::consent_usage::Entity")]
    ConsentUsage,
    #[sea_orm(has_many = "super::authorisation::Entity")]
    Authorisation,
}

impl Related<super::consent_psu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConsentPsu.def()
    }
}

impl Related<super::consent_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConsentUsage.def()
    }
}

impl Related<super::authorisation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authorisation.def()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, From, Into)]
#[from(xs2a_core::model::consent::ConsentStatus)]
#[into(xs2a_core::model::consent::ConsentStatus)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ConsentStatus {
    #[sea_orm(string_value = "RECEIVED")]
    Received,
    #[sea_orm(string_value = "PARTIALLY_AUTHORISED")]
    PartiallyAuthorised,
    #[sea_orm(string_value = "VALID")]
    Valid,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "REVOKED_BY_PSU")]
    RevokedByPsu,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
    #[sea_orm(string_value = "TERMINATED_BY_TPP")]
    TerminatedByTpp,
}
