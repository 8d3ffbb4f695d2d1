use sea_orm_migration::prelude::*;

use crate::m20260801_000001_create_todo_list_table::TodoList;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoItem::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TodoItem::ListId).integer().not_null())
                    .col(ColumnDef::new(TodoItem::Title).string().not_null())
                    .col(
                        ColumnDef::new(TodoItem::Done)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TodoItem::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(TodoItem::Note).text())
                    .col(ColumnDef::new(TodoItem::Colour).string())
                    .col(ColumnDef::new(TodoItem::Tags).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_item_list_id")
                            .from(TodoItem::Table, TodoItem::ListId)
                            .to(TodoList::Table, TodoList::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todo_item_list_id")
                    .table(TodoItem::Table)
                    .col(TodoItem::ListId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TodoItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TodoItem {
    Table,
    Id,
    ListId,
    Title,
    Done,
    Priority,
    Note,
    Colour,
    Tags,
}
