use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PersonalInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonalInfo::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PersonalInfo::Amka)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PersonalInfo::IdentityNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PersonalInfo::PlaceOfBirth).string().not_null())
                    .col(
                        ColumnDef::new(PersonalInfo::MunicipalityOfRegistration)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PersonalInfo::AmkaFileId).integer().null())
                    .col(
                        ColumnDef::new(PersonalInfo::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PersonalInfo::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personal_info_amka_file")
                            .from(PersonalInfo::Table, PersonalInfo::AmkaFileId)
                            .to(Attachments::Table, Attachments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonalInfo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PersonalInfo {
    Table,
    Id,
    Amka,
    IdentityNumber,
    PlaceOfBirth,
    MunicipalityOfRegistration,
    AmkaFileId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Attachments {
    Table,
    Id,
}
