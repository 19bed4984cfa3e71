use sea_orm_migration::prelude::*;

pub trait ColumnDefExt {
    fn large_blob(&mut self, manager: &SchemaManager) -> &mut ColumnDef;
    fn datetime_millisecond_precision(&mut self, manager: &SchemaManager) -> &mut ColumnDef;
}

impl ColumnDefExt for ColumnDef {
    fn large_blob(&mut self, _manager: &SchemaManager) -> &mut ColumnDef {
        self.blob();

        #[cfg(feature = "mysql")]
        if matches!(
            _manager.get_database_backend(),
            sea_orm::DatabaseBackend::MySql
        ) {
            self.custom(extension::mysql::MySqlType::LongBlob);
        }

        self
    }

    fn datetime_millisecond_precision(&mut self, manager: &SchemaManager) -> &mut ColumnDef {
        let column_type = match manager.get_database_backend() {
            sea_orm::DatabaseBackend::MySql => "datetime(3)",
            sea_orm::DatabaseBackend::Postgres => "timestamp(3)",
            sea_orm::DatabaseBackend::Sqlite => "datetime",
        };

        self.custom(Alias::new(column_type));

        self
    }
}

/// Internal auto-increment key, never leaves the data layer
pub(crate) fn internal_id<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .take()
}

pub(crate) fn internal_id_ref<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).integer().not_null().take()
}

pub(crate) fn internal_id_ref_null<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).integer().null().take()
}

pub(crate) fn uuid_char<T: IntoIden>(ident: T) -> ColumnDef {
    ColumnDef::new(ident).char_len(36).not_null().take()
}

pub(crate) fn timestamp<T: IntoIden>(ident: T, manager: &SchemaManager) -> ColumnDef {
    ColumnDef::new(ident)
        .datetime_millisecond_precision(manager)
        .not_null()
        .take()
}
