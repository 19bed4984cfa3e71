use sea_orm::DatabaseConnection;

pub mod repository;


pub(crate) struct SecureDataProvider {
    pub db: DatabaseConnection,
}
