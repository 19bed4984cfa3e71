use shared_types::PaymentId;
use time::OffsetDateTime;

use super::PaymentService;
use super::dto::{CancelPaymentResponseDTO, CreatePaymentRequestDTO};
use super::validator::{throw_if_payment_finalised, validate_create_request};
use crate::model::authorisation::{AuthorisationKind, AuthorisationParent};
use crate::model::payment::{Payment, TransactionStatus, UpdatePaymentRequest};
use crate::model::psu::PsuIdentity;
use crate::repository::error::DataLayerError;
use crate::service::common_validator::{
    OUTCOME_UPDATE_ATTEMPTS, all_required_psus_authorised, multilevel_sca_needed,
};
use crate::service::error::{BusinessLogicError, EntityNotFoundError, ServiceError};

impl PaymentService {
    /// Stores a new payment initiation in status RCVD
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequestDTO,
    ) -> Result<PaymentId, ServiceError> {
        validate_create_request(&request)?;

        let now = OffsetDateTime::now_utc();
        let payment = Payment {
            id: PaymentId::new_v4(),
            instance_id: request.instance_id,
            transaction_status: TransactionStatus::Received,
            payment_type: request.payment_type,
            payment_product: request.payment_product,
            multilevel_sca_required: false,
            created_date: now,
            last_modified: now,
            tpp: request.tpp,
            psu_identities: request.psu_identity.into_iter().collect(),
        };

        let id = self.payment_repository.create_payment(payment).await?;
        tracing::info!(payment_id = %id, "Payment created");

        Ok(id)
    }

    /// Returns the payment, rejecting it first if the PSU did not confirm it in time
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_payment(
        &self,
        id: &PaymentId,
        instance_id: &str,
    ) -> Result<Payment, ServiceError> {
        let payment = self.load_payment(id, Some(instance_id)).await?;
        self.reject_if_not_confirmed(payment).await
    }

    pub async fn get_payment_status(
        &self,
        id: &PaymentId,
        instance_id: &str,
    ) -> Result<TransactionStatus, ServiceError> {
        Ok(self.get_payment(id, instance_id).await?.transaction_status)
    }

    pub async fn get_with_expiry_check(&self, id: &PaymentId) -> Result<Payment, ServiceError> {
        let payment = self.load_payment(id, None).await?;
        self.reject_if_not_confirmed(payment).await
    }

    /// Status reported by the bank outside of the SCA flow
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn update_payment_status(
        &self,
        id: &PaymentId,
        instance_id: &str,
        status: TransactionStatus,
    ) -> Result<(), ServiceError> {
        let payment = self.get_payment(id, instance_id).await?;
        throw_if_payment_finalised(&payment)?;

        self.set_status(&payment, status).await
    }

    /// Cancels the payment directly, unless the bank requires a cancellation authorisation
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn cancel_payment(
        &self,
        id: &PaymentId,
        instance_id: &str,
    ) -> Result<CancelPaymentResponseDTO, ServiceError> {
        let payment = self.get_payment(id, instance_id).await?;
        throw_if_payment_finalised(&payment)?;

        if self.config.payment.cancellation_authorisation_mandated {
            return Ok(CancelPaymentResponseDTO {
                transaction_status: payment.transaction_status,
                authorisation_required: true,
            });
        }

        self.set_status(&payment, TransactionStatus::Canceled)
            .await?;

        Ok(CancelPaymentResponseDTO {
            transaction_status: TransactionStatus::Canceled,
            authorisation_required: false,
        })
    }

    /// Updates the payment after one of its initiation authorisations succeeded.
    ///
    /// A rejection reported by the bank is taken over as is, otherwise the payment stays PATC
    /// until every required PSU signed. The new status is written only if the payment still
    /// has the status it was computed from, otherwise it is recomputed from a fresh read.
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub(crate) async fn apply_authorisation_outcome(
        &self,
        id: &PaymentId,
        reported_status: TransactionStatus,
        multilevel_reported: bool,
    ) -> Result<TransactionStatus, ServiceError> {
        for _ in 0..OUTCOME_UPDATE_ATTEMPTS {
            let payment = self.load_payment(id, None).await?;

            if reported_status.is_finalised() {
                self.set_status(&payment, reported_status).await?;
                return Ok(reported_status);
            }

            match self
                .try_apply_outcome(&payment, reported_status, multilevel_reported)
                .await?
            {
                Some(new_status) => return Ok(new_status),
                None => {
                    tracing::debug!(payment_id = %id, "Payment changed concurrently, recomputing outcome");
                }
            }
        }

        Err(BusinessLogicError::ConcurrentPaymentModification(*id).into())
    }

    /// `None` if the stored status moved on since `payment` was read
    async fn try_apply_outcome(
        &self,
        payment: &Payment,
        reported_status: TransactionStatus,
        multilevel_reported: bool,
    ) -> Result<Option<TransactionStatus>, ServiceError> {
        let multilevel = multilevel_sca_needed(
            self.config.sca.multilevel_sca_enabled,
            &payment.psu_identities,
            multilevel_reported,
        );

        // a payment that already reached the reported status is never downgraded to PATC
        let new_status = if multilevel && payment.transaction_status != reported_status {
            let authorisations = self
                .authorisation_repository
                .get_authorisations_by_parent(
                    &AuthorisationParent::Payment(payment.id),
                    AuthorisationKind::Create,
                )
                .await?;

            if all_required_psus_authorised(
                &payment.psu_identities,
                &authorisations,
                multilevel_reported,
            ) {
                reported_status
            } else {
                TransactionStatus::PartiallyAcceptedTechnical
            }
        } else {
            reported_status
        };

        let multilevel_flag_changed = multilevel && !payment.multilevel_sca_required;
        if !multilevel_flag_changed && new_status == payment.transaction_status {
            return Ok(Some(new_status));
        }

        let result = self
            .payment_repository
            .update_payment(
                &payment.id,
                UpdatePaymentRequest {
                    transaction_status: Some(new_status),
                    multilevel_sca_required: multilevel_flag_changed.then_some(true),
                    expected_transaction_status: Some(payment.transaction_status),
                },
            )
            .await;

        match result {
            Ok(()) => {}
            Err(DataLayerError::RecordNotUpdated) => return Ok(None),
            Err(error) => return Err(error.into()),
        }

        tracing::info!(payment_id = %payment.id, from = %payment.transaction_status, to = %new_status, multilevel, "Payment authorisation applied");
        Ok(Some(new_status))
    }

    /// A finished cancellation authorisation cancels the payment
    pub(crate) async fn apply_cancellation_outcome(
        &self,
        id: &PaymentId,
    ) -> Result<TransactionStatus, ServiceError> {
        let payment = self.load_payment(id, None).await?;
        throw_if_payment_finalised(&payment)?;

        self.set_status(&payment, TransactionStatus::Canceled)
            .await?;
        Ok(TransactionStatus::Canceled)
    }

    /// Adding a PSU that is already part of the payment is a no-op
    pub(crate) async fn add_psu_identity(
        &self,
        id: &PaymentId,
        psu_identity: PsuIdentity,
    ) -> Result<(), ServiceError> {
        match self
            .payment_repository
            .add_psu_identity(id, psu_identity)
            .await
        {
            Ok(()) => tracing::info!(payment_id = %id, "PSU added to payment"),
            Err(DataLayerError::AlreadyExists) => {
                tracing::debug!(payment_id = %id, "PSU already part of payment");
            }
            Err(error) => return Err(error.into()),
        }

        Ok(())
    }

    async fn load_payment(
        &self,
        id: &PaymentId,
        instance_id: Option<&str>,
    ) -> Result<Payment, ServiceError> {
        let payment = self
            .payment_repository
            .get_payment(id)
            .await?
            .ok_or(EntityNotFoundError::Payment(*id))?;

        if instance_id.is_some_and(|instance_id| instance_id != payment.instance_id) {
            return Err(EntityNotFoundError::Payment(*id).into());
        }

        Ok(payment)
    }

    async fn reject_if_not_confirmed(&self, mut payment: Payment) -> Result<Payment, ServiceError> {
        let now = OffsetDateTime::now_utc();
        let window = self.config.payment.not_confirmed_expiration_time;

        let expired = payment.transaction_status.is_not_confirmed()
            && window.is_positive()
            && payment.created_date + window <= now;
        if !expired {
            return Ok(payment);
        }

        self.set_status(&payment, TransactionStatus::Rejected)
            .await?;
        payment.transaction_status = TransactionStatus::Rejected;
        payment.last_modified = now;

        Ok(payment)
    }

    async fn set_status(
        &self,
        payment: &Payment,
        status: TransactionStatus,
    ) -> Result<(), ServiceError> {
        self.payment_repository
            .update_payment(
                &payment.id,
                UpdatePaymentRequest {
                    transaction_status: Some(status),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(payment_id = %payment.id, from = %payment.transaction_status, to = %status, "Payment status changed");
        Ok(())
    }
}
