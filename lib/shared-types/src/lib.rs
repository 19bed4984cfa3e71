mod macros;

use macros::uuid_id;
#[cfg(feature = "sea-orm")]
use macros::impls_for_seaorm_newtype;

uuid_id!(
    /// External id of an AIS consent
    ConsentId
);

uuid_id!(
    /// External id of a PIS payment
    PaymentId
);

uuid_id!(
    /// External id of a single SCA attempt, also used as the redirect correlation id
    AuthorisationId
);

#[cfg(feature = "sea-orm")]
impls_for_seaorm_newtype!(ConsentId);
#[cfg(feature = "sea-orm")]
impls_for_seaorm_newtype!(PaymentId);
#[cfg(feature = "sea-orm")]
impls_for_seaorm_newtype!(AuthorisationId);

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_parse_and_display_roundtrip() {
        let uuid = Uuid::new_v4();
        let id: ConsentId = uuid.to_string().parse().unwrap();

        assert_eq!(id, uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_parse_invalid() {
        assert!("not-a-uuid".parse::<PaymentId>().is_err());
    }
}
