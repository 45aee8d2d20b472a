use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Words {
    Table,
    Id,
    OwnerId,
    EntryIndex,
    Word,
    Meaning,
    Examples,
    Category,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Words::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Words::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Words::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Words::EntryIndex).big_integer().not_null())
                    .col(ColumnDef::new(Words::Word).string().not_null())
                    .col(ColumnDef::new(Words::Meaning).string().not_null())
                    .col(
                        ColumnDef::new(Words::Examples)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Words::Category).string())
                    .col(
                        ColumnDef::new(Words::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-words-owner_id-entry_index")
                    .table(Words::Table)
                    .col(Words::OwnerId)
                    .col(Words::EntryIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uidx-words-owner_id-entry_index")
                    .table(Words::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Words::Table).to_owned())
            .await?;

        Ok(())
    }
}
