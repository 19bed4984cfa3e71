use shared_types::PaymentId;
use strum::Display;
use time::OffsetDateTime;

use super::psu::PsuIdentity;
use super::tpp::TppIdentity;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub instance_id: String,
    pub transaction_status: TransactionStatus,
    pub payment_type: PaymentType,
    pub payment_product: String,
    pub multilevel_sca_required: bool,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
    pub tpp: TppIdentity,
    pub psu_identities: Vec<PsuIdentity>,
}

/// ISO 20022 transaction status codes
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
pub enum TransactionStatus {
    #[strum(serialize = "RCVD")]
    Received,
    #[strum(serialize = "PATC")]
    PartiallyAcceptedTechnical,
    #[strum(serialize = "ACTC")]
    AcceptedTechnicalValidation,
    #[strum(serialize = "ACCP")]
    AcceptedCustomerProfile,
    #[strum(serialize = "ACSP")]
    AcceptedSettlementInProcess,
    #[strum(serialize = "ACSC")]
    AcceptedSettlementCompleted,
    #[strum(serialize = "PDNG")]
    Pending,
    #[strum(serialize = "RJCT")]
    Rejected,
    #[strum(serialize = "CANC")]
    Canceled,
}

impl TransactionStatus {
    pub fn is_finalised(&self) -> bool {
        matches!(
            self,
            Self::AcceptedSettlementCompleted | Self::Rejected | Self::Canceled
        )
    }

    /// Status in which the payment still waits for PSU confirmation
    pub fn is_not_confirmed(&self) -> bool {
        matches!(self, Self::Received | Self::PartiallyAcceptedTechnical)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Single,
    Periodic,
    Bulk,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdatePaymentRequest {
    pub transaction_status: Option<TransactionStatus>,
    pub multilevel_sca_required: Option<bool>,
    /// Only update while the stored status is still this one
    pub expected_transaction_status: Option<TransactionStatus>,
}
