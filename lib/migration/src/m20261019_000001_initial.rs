use sea_orm_migration::prelude::*;

use crate::datatype::{
    ColumnDefExt, internal_id, internal_id_ref, internal_id_ref_null, timestamp, uuid_char,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Consent::Table)
                    .if_not_exists()
                    .col(internal_id(Consent::Id))
                    .col(uuid_char(Consent::ExternalId))
                    .col(ColumnDef::new(Consent::InstanceId).string().not_null())
                    .col(ColumnDef::new(Consent::Status).string().not_null())
                    .col(ColumnDef::new(Consent::ValidUntil).date().not_null())
                    .col(timestamp(Consent::CreatedDate, manager))
                    .col(timestamp(Consent::LastModified, manager))
                    .col(
                        ColumnDef::new(Consent::FrequencyPerDay)
                            .unsigned()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Consent::Recurring).boolean().not_null())
                    .col(ColumnDef::new(Consent::OneAccessType).boolean().not_null())
                    .col(
                        ColumnDef::new(Consent::MultilevelScaRequired)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Consent::TppAuthorisationNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Consent::TppAuthorityId).string().not_null())
                    .col(ColumnDef::new(Consent::TppRedirectUri).text().null())
                    .col(ColumnDef::new(Consent::TppNokRedirectUri).text().null())
                    .col(ColumnDef::new(Consent::TppCancelRedirectUri).text().null())
                    .col(ColumnDef::new(Consent::TppCancelNokRedirectUri).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("index-Consent-ExternalId-Unique")
                    .table(Consent::Table)
                    .col(Consent::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("index-Consent-Tpp-Instance-Status")
                    .table(Consent::Table)
                    .col(Consent::TppAuthorisationNumber)
                    .col(Consent::TppAuthorityId)
                    .col(Consent::InstanceId)
                    .col(Consent::Status)
                    .to_owned(),
            )
            .await?;

        create_psu_table(
            manager,
            "index-ConsentPsu-ConsentId-PsuId-Unique",
            ConsentPsu::Table,
            ConsentPsu::ConsentId,
            Consent::Table,
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConsentUsage::Table)
                    .if_not_exists()
                    .col(internal_id(ConsentUsage::Id))
                    .col(internal_id_ref(ConsentUsage::ConsentId))
                    .col(ColumnDef::new(ConsentUsage::UsageDate).date().not_null())
                    .col(ColumnDef::new(ConsentUsage::ResourceUri).text().not_null())
                    .col(timestamp(ConsentUsage::CreatedDate, manager))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ConsentUsage-ConsentId")
                            .from_tbl(ConsentUsage::Table)
                            .from_col(ConsentUsage::ConsentId)
                            .to_tbl(Consent::Table)
                            .to_col(Consent::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(internal_id(Payment::Id))
                    .col(uuid_char(Payment::ExternalId))
                    .col(ColumnDef::new(Payment::InstanceId).string().not_null())
                    .col(
                        ColumnDef::new(Payment::TransactionStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payment::PaymentType).string().not_null())
                    .col(ColumnDef::new(Payment::PaymentProduct).string().not_null())
                    .col(
                        ColumnDef::new(Payment::MultilevelScaRequired)
                            .boolean()
                            .not_null(),
                    )
                    .col(timestamp(Payment::CreatedDate, manager))
                    .col(timestamp(Payment::LastModified, manager))
                    .col(
                        ColumnDef::new(Payment::TppAuthorisationNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payment::TppAuthorityId).string().not_null())
                    .col(ColumnDef::new(Payment::TppRedirectUri).text().null())
                    .col(ColumnDef::new(Payment::TppNokRedirectUri).text().null())
                    .col(ColumnDef::new(Payment::TppCancelRedirectUri).text().null())
                    .col(ColumnDef::new(Payment::TppCancelNokRedirectUri).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("index-Payment-ExternalId-Unique")
                    .table(Payment::Table)
                    .col(Payment::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        create_psu_table(
            manager,
            "index-PaymentPsu-PaymentId-PsuId-Unique",
            PaymentPsu::Table,
            PaymentPsu::PaymentId,
            Payment::Table,
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(Authorisation::Table)
                    .if_not_exists()
                    .col(internal_id(Authorisation::Id))
                    .col(uuid_char(Authorisation::ExternalId))
                    .col(ColumnDef::new(Authorisation::Kind).string().not_null())
                    .col(internal_id_ref_null(Authorisation::ConsentId))
                    .col(internal_id_ref_null(Authorisation::PaymentId))
                    .col(ColumnDef::new(Authorisation::InstanceId).string().not_null())
                    .col(ColumnDef::new(Authorisation::ScaStatus).string().not_null())
                    .col(ColumnDef::new(Authorisation::ScaApproach).string().not_null())
                    .col(ColumnDef::new(Psu::PsuId).string().null())
                    .col(ColumnDef::new(Psu::PsuIdType).string().null())
                    .col(ColumnDef::new(Psu::PsuCorporateId).string().null())
                    .col(ColumnDef::new(Psu::PsuCorporateIdType).string().null())
                    .col(
                        ColumnDef::new(Authorisation::ChosenScaMethod)
                            .string()
                            .null(),
                    )
                    .col(timestamp(
                        Authorisation::RedirectUrlExpirationTimestamp,
                        manager,
                    ))
                    .col(timestamp(
                        Authorisation::AuthorisationExpirationTimestamp,
                        manager,
                    ))
                    .col(timestamp(Authorisation::CreatedDate, manager))
                    .col(timestamp(Authorisation::LastModified, manager))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-Authorisation-ConsentId")
                            .from_tbl(Authorisation::Table)
                            .from_col(Authorisation::ConsentId)
                            .to_tbl(Consent::Table)
                            .to_col(Consent::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-Authorisation-PaymentId")
                            .from_tbl(Authorisation::Table)
                            .from_col(Authorisation::PaymentId)
                            .to_tbl(Payment::Table)
                            .to_col(Payment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("index-Authorisation-ExternalId-Unique")
                    .table(Authorisation::Table)
                    .col(Authorisation::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SecureData::Table)
                    .if_not_exists()
                    .col(internal_id(SecureData::Id))
                    .col(ColumnDef::new(SecureData::OwnerType).string().not_null())
                    .col(internal_id_ref(SecureData::OwnerId))
                    .col(
                        ColumnDef::new(SecureData::Value)
                            .large_blob(manager)
                            .not_null(),
                    )
                    .col(timestamp(SecureData::CreatedDate, manager))
                    .col(timestamp(SecureData::LastModified, manager))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("index-SecureData-Owner-Unique")
                    .table(SecureData::Table)
                    .col(SecureData::OwnerType)
                    .col(SecureData::OwnerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table(manager, SecureData::Table).await?;
        drop_table(manager, Authorisation::Table).await?;
        drop_table(manager, PaymentPsu::Table).await?;
        drop_table(manager, Payment::Table).await?;
        drop_table(manager, ConsentUsage::Table).await?;
        drop_table(manager, ConsentPsu::Table).await?;
        drop_table(manager, Consent::Table).await
    }
}

async fn drop_table(
    manager: &SchemaManager<'_>,
    table: impl IntoIden + 'static,
) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(table).to_owned())
        .await
}

/// PSU set of a consent or payment, one row per PSU id
async fn create_psu_table(
    manager: &SchemaManager<'_>,
    unique_index_name: &str,
    table: impl IntoIden + Clone + 'static,
    owner_column: impl IntoIden + Clone + 'static,
    owner_table: impl IntoIden + 'static,
) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(table.clone())
                .if_not_exists()
                .col(internal_id(Psu::Id))
                .col(internal_id_ref(owner_column.clone()))
                .col(ColumnDef::new(Psu::PsuId).string().not_null())
                .col(ColumnDef::new(Psu::PsuIdType).string().null())
                .col(ColumnDef::new(Psu::PsuCorporateId).string().null())
                .col(ColumnDef::new(Psu::PsuCorporateIdType).string().null())
                .foreign_key(
                    ForeignKey::create()
                        .from_tbl(table.clone())
                        .from_col(owner_column.clone())
                        .to_tbl(owner_table)
                        .to_col(Psu::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name(unique_index_name)
                .table(table)
                .col(owner_column)
                .col(Psu::PsuId)
                .unique()
                .to_owned(),
        )
        .await
}

#[derive(Iden)]
enum Consent {
    Table,
    Id,
    ExternalId,
    InstanceId,
    Status,
    ValidUntil,
    CreatedDate,
    LastModified,
    FrequencyPerDay,
    Recurring,
    OneAccessType,
    MultilevelScaRequired,
    TppAuthorisationNumber,
    TppAuthorityId,
    TppRedirectUri,
    TppNokRedirectUri,
    TppCancelRedirectUri,
    TppCancelNokRedirectUri,
}

#[derive(Clone, Iden)]
enum ConsentPsu {
    Table,
    ConsentId,
}

#[derive(Iden)]
enum ConsentUsage {
    Table,
    Id,
    ConsentId,
    UsageDate,
    ResourceUri,
    CreatedDate,
}

#[derive(Iden)]
enum Payment {
    Table,
    Id,
    ExternalId,
    InstanceId,
    TransactionStatus,
    PaymentType,
    PaymentProduct,
    MultilevelScaRequired,
    CreatedDate,
    LastModified,
    TppAuthorisationNumber,
    TppAuthorityId,
    TppRedirectUri,
    TppNokRedirectUri,
    TppCancelRedirectUri,
    TppCancelNokRedirectUri,
}

#[derive(Clone, Iden)]
enum PaymentPsu {
    Table,
    PaymentId,
}

/// Columns shared by the PSU tables and the assigned PSU of an authorisation
#[derive(Iden)]
enum Psu {
    Id,
    PsuId,
    PsuIdType,
    PsuCorporateId,
    PsuCorporateIdType,
}

#[derive(Iden)]
enum Authorisation {
    Table,
    Id,
    ExternalId,
    Kind,
    ConsentId,
    PaymentId,
    InstanceId,
    ScaStatus,
    ScaApproach,
    ChosenScaMethod,
    RedirectUrlExpirationTimestamp,
    AuthorisationExpirationTimestamp,
    CreatedDate,
    LastModified,
}

#[derive(Iden)]
enum SecureData {
    Table,
    Id,
    OwnerType,
    OwnerId,
    Value,
    CreatedDate,
    LastModified,
}
