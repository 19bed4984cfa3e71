#![cfg_attr(feature = "strict", deny(warnings))]

use std::sync::Arc;

use authorisation::AuthorisationProvider;
use consent::ConsentProvider;
use migration::{Migrator, MigratorTrait};
use payment::PaymentProvider;
use sea_orm::{ConnectOptions, DatabaseConnection};
use secure_data::SecureDataProvider;
use xs2a_core::repository::DataRepository;
use xs2a_core::repository::authorisation_repository::AuthorisationRepository;
use xs2a_core::repository::consent_repository::ConsentRepository;
use xs2a_core::repository::error::DataLayerError;
use xs2a_core::repository::payment_repository::PaymentRepository;
use xs2a_core::repository::secure_data_repository::SecureDataRepository;

mod common_queries;
mod entity;
mod mapper;

pub mod authorisation;
pub mod consent;
pub mod payment;
pub mod secure_data;

#[cfg(test)]
mod test_utilities;

#[derive(Clone)]
pub struct DataLayer {
    // Used for tests for now
    #[allow(unused)]
    db: DatabaseConnection,
    consent_repository: Arc<dyn ConsentRepository>,
    payment_repository: Arc<dyn PaymentRepository>,
    authorisation_repository: Arc<dyn AuthorisationRepository>,
    secure_data_repository: Arc<dyn SecureDataRepository>,
}

impl DataLayer {
    pub fn build(db: DatabaseConnection) -> Self {
        Self {
            consent_repository: Arc::new(ConsentProvider { db: db.clone() }),
            payment_repository: Arc::new(PaymentProvider { db: db.clone() }),
            authorisation_repository: Arc::new(AuthorisationProvider { db: db.clone() }),
            secure_data_repository: Arc::new(SecureDataProvider { db: db.clone() }),
            db,
        }
    }
}

/// Connects to the database and applies pending migrations
pub async fn db_conn(database_url: impl Into<String>) -> Result<DatabaseConnection, DataLayerError> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);

    let db = sea_orm::Database::connect(options)
        .await
        .map_err(|e| DataLayerError::Db(e.into()))?;

    Migrator::up(&db, None)
        .await
        .map_err(|e| DataLayerError::Db(e.into()))?;

    tracing::info!("Database migrated");
    Ok(db)
}

impl DataRepository for DataLayer {
    fn get_consent_repository(&self) -> Arc<dyn ConsentRepository> {
        self.consent_repository.clone()
    }

    fn get_payment_repository(&self) -> Arc<dyn PaymentRepository> {
        self.payment_repository.clone()
    }

    fn get_authorisation_repository(&self) -> Arc<dyn AuthorisationRepository> {
        self.authorisation_repository.clone()
    }

    fn get_secure_data_repository(&self) -> Arc<dyn SecureDataRepository> {
        self.secure_data_repository.clone()
    }
}
