use crate::entities::*;
use crate::item::TodoItem;
use sea_orm::sea_query::Expr;
use sea_orm::*;

pub mod api;
pub mod web;

#[derive(Debug, PartialEq, Clone)]
pub struct TodoList {
    id: i32,
    title: String,
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new(id: i32, title: String, items: Vec<TodoItem>) -> Self {
        Self { id, title, items }
    }

    /// Returns the ID of the list.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the title of the list.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the items of the list, in insertion order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Returns the number of items not yet completed.
    pub fn remaining_items(&self) -> usize {
        self.items.iter().filter(|item| !item.done()).count()
    }
}

impl From<todo_list::Model> for TodoList {
    fn from(model: todo_list::Model) -> Self {
        TodoList::new(model.id, model.title, Vec::new())
    }
}

impl TodoList {
    fn from_models(list: todo_list::Model, items: Vec<todo_item::Model>) -> Self {
        TodoList::new(
            list.id,
            list.title,
            items.into_iter().map(TodoItem::from).collect(),
        )
    }
}

/// Error type for ListService operations.
#[derive(Debug, thiserror::Error)]
pub enum ListServiceError {
    /// Represents a duplicate title among non-deleted lists.
    #[error("A list titled \"{0}\" already exists")]
    TitleTaken(String),
    /// Represents an empty list title.
    #[error("List title must not be empty")]
    TitleEmpty,
    /// Represents a list title over the length limit.
    #[error("List title must be at most {MAX_TITLE_LEN} characters")]
    TitleTooLong,
    /// Represents a list not found (or soft-deleted) error.
    #[error("Todo list with ID {0} not found")]
    ListNotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Maximum length of a list title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

fn validate_title(title: &str) -> Result<String, ListServiceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ListServiceError::TitleEmpty);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ListServiceError::TitleTooLong);
    }
    Ok(title.to_string())
}

pub struct ListService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl ListService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> ListService {
        ListService { db }
    }

    /// Retrieves all non-deleted lists with their items.
    ///
    /// Lists and items are both ordered by ID, so items keep their insertion
    /// order.
    ///
    /// # Returns
    ///
    /// A `Result` containing a vector of `TodoList` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_lists(&self) -> Result<Vec<TodoList>, ListServiceError> {
        let lists = todo_list::Entity::find()
            .filter(todo_list::Column::Deleted.eq(false))
            .order_by_asc(todo_list::Column::Id)
            .find_with_related(todo_item::Entity)
            .order_by_asc(todo_item::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(|(list, items)| TodoList::from_models(list, items))
            .collect();
        Ok(lists)
    }

    /// Retrieves a single non-deleted list with its items.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the list to retrieve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `TodoList` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_list(&self, id: i32) -> Result<TodoList, ListServiceError> {
        let list_model = self.find_active_list(id).await?;
        let items = list_model
            .find_related(todo_item::Entity)
            .order_by_asc(todo_item::Column::Id)
            .all(self.db)
            .await?;
        Ok(TodoList::from_models(list_model, items))
    }

    /// Creates a new list.
    ///
    /// # Arguments
    ///
    /// * `title` - The title of the list; must be non-empty, at most 200
    ///   characters, and unique among non-deleted lists.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `TodoList` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_list(&self, title: String) -> Result<TodoList, ListServiceError> {
        let title = validate_title(&title)?;
        if self.title_taken(&title, None).await? {
            return Err(ListServiceError::TitleTaken(title));
        }

        let now = chrono::Utc::now();
        let active_model = todo_list::ActiveModel {
            title: ActiveValue::Set(title),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(TodoList::from(created_model))
    }

    /// Renames a list.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the list to rename.
    /// * `new_title` - The new title; validated like on creation.
    ///
    /// # Returns
    ///
    /// A `Result` containing the renamed `TodoList` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn rename_list(&self, id: i32, new_title: String) -> Result<TodoList, ListServiceError> {
        let new_title = validate_title(&new_title)?;
        let list_to_update = self.find_active_list(id).await?;
        if self.title_taken(&new_title, Some(id)).await? {
            return Err(ListServiceError::TitleTaken(new_title));
        }

        let mut active_model: todo_list::ActiveModel = list_to_update.into();
        active_model.title = ActiveValue::Set(new_title);
        active_model.updated_at = ActiveValue::Set(chrono::Utc::now());
        let updated_model = active_model.update(self.db).await?;

        Ok(TodoList::from(updated_model))
    }

    /// Soft-deletes a list. The row and its items stay in the database but the
    /// list disappears from reads.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the list to delete.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `TodoList` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_list(&self, id: i32) -> Result<TodoList, ListServiceError> {
        let list_to_delete = self.find_active_list(id).await?;

        let mut active_model: todo_list::ActiveModel = list_to_delete.into();
        active_model.deleted = ActiveValue::Set(true);
        active_model.updated_at = ActiveValue::Set(chrono::Utc::now());
        let deleted_model = active_model.update(self.db).await?;

        Ok(TodoList::from(deleted_model))
    }

    /// Administrative purge: marks every remaining list deleted in a single
    /// atomic statement.
    ///
    /// # Returns
    ///
    /// A `Result` containing the number of lists purged if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn purge_lists(&self) -> Result<u64, ListServiceError> {
        let result = todo_list::Entity::update_many()
            .col_expr(todo_list::Column::Deleted, Expr::value(true))
            .col_expr(todo_list::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(todo_list::Column::Deleted.eq(false))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Checks whether a title is already used by another non-deleted list.
    ///
    /// # Arguments
    ///
    /// * `title` - The title to check for.
    /// * `exclude_id` - A list ID to ignore, for rename checks.
    ///
    /// # Returns
    ///
    /// A `Result` containing `true` if the title is taken, `false` otherwise, or an error.
    #[tracing::instrument(skip(self))]
    async fn title_taken(
        &self,
        title: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, ListServiceError> {
        let mut query = todo_list::Entity::find()
            .filter(todo_list::Column::Deleted.eq(false))
            .filter(todo_list::Column::Title.eq(title));
        if let Some(id) = exclude_id {
            query = query.filter(todo_list::Column::Id.ne(id));
        }
        let existing_list = query.one(self.db).await?;
        Ok(existing_list.is_some())
    }

    /// Fetches a list by ID, treating soft-deleted lists as not found.
    #[tracing::instrument(skip(self))]
    async fn find_active_list(&self, id: i32) -> Result<todo_list::Model, ListServiceError> {
        todo_list::Entity::find_by_id(id)
            .filter(todo_list::Column::Deleted.eq(false))
            .one(self.db)
            .await?
            .ok_or(ListServiceError::ListNotFound(id))
    }
}
