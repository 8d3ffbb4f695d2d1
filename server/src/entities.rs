//! Database entities for the to-do domain.

pub mod todo_list {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "todo_list")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        /// Soft-delete flag; deleted lists are kept in the table but hidden from reads.
        pub deleted: bool,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::todo_item::Entity")]
        TodoItem,
    }

    impl Related<super::todo_item::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::TodoItem.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod todo_item {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "todo_item")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub list_id: i32,
        pub title: String,
        pub done: bool,
        pub priority: i32,
        #[sea_orm(column_type = "Text", nullable)]
        pub note: Option<String>,
        pub colour: Option<String>,
        /// Comma-separated tag string, e.g. "home,errands".
        pub tags: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::todo_list::Entity",
            from = "Column::ListId",
            to = "super::todo_list::Column::Id",
            on_update = "NoAction",
            on_delete = "Cascade"
        )]
        TodoList,
    }

    impl Related<super::todo_list::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::TodoList.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
