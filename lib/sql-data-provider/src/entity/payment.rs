use one_dto_mapper::{From, Into};
use sea_orm::entity::prelude::*;
use shared_types::PaymentId;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub external_id: PaymentId,
    pub instance_id: String,
    pub transaction_status: TransactionStatus,
    pub payment_type: PaymentType,
    pub payment_product: String,
    pub multilevel_sca_required: bool,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
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
    #[sea_orm(has_many = "super::payment_psu::Entity")]
    PaymentPsu,
    #[sea_orm(has_many = "super::authorisation::Entity")]
    Authorisation,
}

impl Related<super::payment_psu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentPsu.def()
    }
}

impl Related<super::authorisation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authorisation.def()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, From, Into)]
#[from(xs2a_core::model::payment::TransactionStatus)]
#[into(xs2a_core::model::payment::TransactionStatus)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "RCVD")]
    Received,
    #[sea_orm(string_value = "PATC")]
    PartiallyAcceptedTechnical,
    #[sea_orm(string_value = "ACTC")]
    AcceptedTechnicalValidation,
    #[sea_orm(string_value = "ACCP")]
    AcceptedCustomerProfile,
    #[sea_orm(string_value = "ACSP")]
    AcceptedSettlementInProcess,
    #[sea_orm(string_value = "ACSC")]
    AcceptedSettlementCompleted,
    #[sea_orm(string_value = "PDNG")]
    Pending,
    #[sea_orm(string_value = "RJCT")]
    Rejected,
    #[sea_orm(string_value = "CANC")]
    Canceled,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, DeriveActiveEnum, From, Into)]
#[from(xs2a_core::model::payment::PaymentType)]
#[into(xs2a_core::model::payment::PaymentType)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentType {
    #[sea_orm(string_value = "SINGLE")]
    Single,
    #[sea_orm(string_value = "PERIODIC")]
    Periodic,
    #[sea_orm(string_value = "BULK")]
    Bulk,
}
