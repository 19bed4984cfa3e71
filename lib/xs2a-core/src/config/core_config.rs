use std::collections::HashSet;
use std::path::Path;

use figment::Figment;
#[cfg(feature = "config_env")]
use figment::providers::Env;
#[cfg(feature = "config_json")]
use figment::providers::Json;
#[cfg(feature = "config_yaml")]
use figment::providers::Yaml;
use figment::providers::{Data, Format};
use secrecy::SecretString;
use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use time::Duration;

use super::{ConfigParsingError, ConfigValidationError};
use crate::model::authorisation::ScaApproach;

/// Per-bank (ASPSP) policy
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    pub consent: ConsentConfig,
    pub payment: PaymentConfig,
    pub sca: ScaConfig,
    pub vault: VaultConfig,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentConfig {
    /// 0 = unlimited
    #[serde(default)]
    pub lifetime_days: u32,
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    pub not_confirmed_expiration_time: Duration,
    /// 0 = no upper bound on the requested frequency per day
    #[serde(default)]
    pub max_frequency_per_day: u32,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    pub not_confirmed_expiration_time: Duration,
    #[serde(default)]
    pub cancellation_authorisation_mandated: bool,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaConfig {
    /// Ordered by preference, the first one is used when the TPP does not ask for one
    pub approaches: Vec<ScaApproach>,
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    pub redirect_url_expiration_time: Duration,
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    pub authorisation_expiration_time: Duration,
    #[serde(default)]
    pub multilevel_sca_enabled: bool,
    #[serde(default)]
    pub signing_basket_supported: bool,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default)]
    pub adapter_timeout: Option<std::time::Duration>,
}

impl ScaConfig {
    pub fn default_approach(&self) -> Option<ScaApproach> {
        self.approaches.first().copied()
    }

    pub fn supports(&self, approach: ScaApproach) -> bool {
        self.approaches.contains(&approach)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    pub encryption: SecretString,
}

pub enum InputFormat {
    #[cfg(feature = "config_yaml")]
    Yaml(Data<Yaml>),
    #[cfg(feature = "config_json")]
    Json(Data<Json>),
}

impl CoreConfig {
    pub fn from_files(files: &[impl AsRef<Path>]) -> Result<Self, ConfigParsingError> {
        let mut inputs: Vec<InputFormat> = Vec::with_capacity(files.len());

        for path in files {
            #[cfg(feature = "config_yaml")]
            if path
                .as_ref()
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml")
            {
                inputs.push(InputFormat::Yaml(Yaml::file(path)));
                continue;
            }

            #[cfg(feature = "config_json")]
            if path.as_ref().extension() == Some("json".as_ref()) {
                inputs.push(InputFormat::Json(Json::file(path)));
                continue;
            }

            return Err(ConfigParsingError::GeneralParsingError(format!(
                "Unsupported file or missing file extension: {:?}",
                path.as_ref().to_str()
            )));
        }

        Self::parse(inputs)
    }

    #[cfg(feature = "config_yaml")]
    pub fn from_yaml(
        configs: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, ConfigParsingError> {
        let inputs = configs
            .into_iter()
            .map(|s| Yaml::string(s.as_ref()))
            .map(InputFormat::Yaml);

        Self::parse(inputs)
    }

    /// Later inputs override earlier ones
    pub fn parse(inputs: impl IntoIterator<Item = InputFormat>) -> Result<Self, ConfigParsingError> {
        let mut figment = Figment::new();

        for data in inputs {
            figment = match data {
                #[cfg(feature = "config_yaml")]
                InputFormat::Yaml(content) => figment.merge(content),
                #[cfg(feature = "config_json")]
                InputFormat::Json(content) => figment.merge(content),
            };
        }

        #[cfg(feature = "config_env")]
        {
            figment = figment.merge(Env::prefixed("XS2A_").split("__").lowercase(false));
        }

        figment
            .extract::<CoreConfig>()
            .map_err(|e| ConfigParsingError::GeneralParsingError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.sca.approaches.is_empty() {
            return Err(ConfigValidationError::MissingScaApproach);
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self
            .sca
            .approaches
            .iter()
            .find(|approach| !seen.insert(**approach))
        {
            return Err(ConfigValidationError::DuplicateScaApproach(
                duplicate.to_string(),
            ));
        }

        if !self.sca.redirect_url_expiration_time.is_positive() {
            return Err(ConfigValidationError::InvalidValue {
                field: "sca.redirectUrlExpirationTime",
                reason: "must be positive".to_owned(),
            });
        }

        if !self.sca.authorisation_expiration_time.is_positive() {
            return Err(ConfigValidationError::InvalidValue {
                field: "sca.authorisationExpirationTime",
                reason: "must be positive".to_owned(),
            });
        }

        if self.consent.not_confirmed_expiration_time.is_negative() {
            return Err(ConfigValidationError::InvalidValue {
                field: "consent.notConfirmedExpirationTime",
                reason: "must not be negative".to_owned(),
            });
        }

        if self.payment.not_confirmed_expiration_time.is_negative() {
            return Err(ConfigValidationError::InvalidValue {
                field: "payment.notConfirmedExpirationTime",
                reason: "must not be negative".to_owned(),
            });
        }

        Ok(())
    }
}
