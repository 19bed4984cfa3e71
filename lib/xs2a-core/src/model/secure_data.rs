use shared_types::{ConsentId, PaymentId};

/// External id of the consent or payment an encrypted adapter blob belongs to
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SecureDataOwner {
    Consent(ConsentId),
    Payment(PaymentId),
}

impl std::fmt::Display for SecureDataOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consent(id) => write!(f, "CONSENT:{id}"),
            Self::Payment(id) => write!(f, "PAYMENT:{id}"),
        }
    }
}

impl From<super::authorisation::AuthorisationParent> for SecureDataOwner {
    fn from(value: super::authorisation::AuthorisationParent) -> Self {
        use super::authorisation::AuthorisationParent;

        match value {
            AuthorisationParent::Consent(id) => Self::Consent(id),
            AuthorisationParent::Payment(id) => Self::Payment(id),
        }
    }
}
