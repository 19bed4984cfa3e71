use crate::model::payment::{PaymentType, TransactionStatus};
use crate::model::psu::PsuIdentity;
use crate::model::tpp::TppIdentity;

#[derive(Clone, Debug)]
pub struct CreatePaymentRequestDTO {
    pub instance_id: String,
    pub payment_type: PaymentType,
    pub payment_product: String,
    pub tpp: TppIdentity,
    pub psu_identity: Option<PsuIdentity>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CancelPaymentResponseDTO {
    pub transaction_status: TransactionStatus,
    /// The bank wants the cancellation confirmed by a separate authorisation
    pub authorisation_required: bool,
}
