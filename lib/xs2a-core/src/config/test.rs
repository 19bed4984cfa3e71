use indoc::indoc;
use time::Duration;

use super::ConfigValidationError;
use super::core_config::CoreConfig;
use crate::model::authorisation::ScaApproach;

const BASE: &str = indoc! {"
    consent:
        lifetimeDays: 90
        notConfirmedExpirationTime: 86400000
    payment:
        notConfirmedExpirationTime: 3600000
    sca:
        approaches: [REDIRECT, EMBEDDED]
        redirectUrlExpirationTime: 600000
        authorisationExpirationTime: 1800000
    vault:
        encryption: 'passphrase'
"};

#[test]
fn test_parse_yaml() {
    let config = CoreConfig::from_yaml([BASE]).unwrap();

    assert_eq!(config.consent.lifetime_days, 90);
    assert_eq!(
        config.consent.not_confirmed_expiration_time,
        Duration::days(1)
    );
    assert_eq!(config.consent.max_frequency_per_day, 0);
    assert!(!config.payment.cancellation_authorisation_mandated);
    assert_eq!(
        config.sca.approaches,
        vec![ScaApproach::Redirect, ScaApproach::Embedded]
    );
    assert_eq!(config.sca.default_approach(), Some(ScaApproach::Redirect));
    assert_eq!(config.sca.redirect_url_expiration_time, Duration::minutes(10));
    assert_eq!(config.sca.adapter_timeout, None);
    assert!(!config.sca.multilevel_sca_enabled);
    config.validate().unwrap();
}

#[test]
fn test_later_input_overrides_earlier() {
    let overlay = indoc! {"
        sca:
            approaches: [DECOUPLED]
            multilevelScaEnabled: true
            adapterTimeout: 5000
    "};

    let config = CoreConfig::from_yaml([BASE, overlay]).unwrap();

    assert_eq!(config.sca.approaches, vec![ScaApproach::Decoupled]);
    assert!(config.sca.multilevel_sca_enabled);
    assert_eq!(
        config.sca.adapter_timeout,
        Some(std::time::Duration::from_secs(5))
    );
    // untouched keys of the overridden section are kept
    assert_eq!(config.sca.redirect_url_expiration_time, Duration::minutes(10));
}

#[test]
fn test_missing_section_fails() {
    let config = indoc! {"
        consent:
            notConfirmedExpirationTime: 1000
    "};

    assert!(CoreConfig::from_yaml([config]).is_err());
}

#[test]
fn test_validate_empty_approaches() {
    let overlay = indoc! {"
        sca:
            approaches: []
    "};
    let config = CoreConfig::from_yaml([BASE, overlay]).unwrap();

    assert!(matches!(
        config.validate(),
        Err(ConfigValidationError::MissingScaApproach)
    ));
}

#[test]
fn test_validate_duplicate_approach() {
    let overlay = indoc! {"
        sca:
            approaches: [EMBEDDED, EMBEDDED]
    "};
    let config = CoreConfig::from_yaml([BASE, overlay]).unwrap();

    assert!(matches!(
        config.validate(),
        Err(ConfigValidationError::DuplicateScaApproach(_))
    ));
}

#[test]
fn test_validate_zero_redirect_window() {
    let overlay = indoc! {"
        sca:
            redirectUrlExpirationTime: 0
    "};
    let config = CoreConfig::from_yaml([BASE, overlay]).unwrap();

    assert!(matches!(
        config.validate(),
        Err(ConfigValidationError::InvalidValue { .. })
    ));
}
