use crate::colour::Colour;
use crate::entities::*;
use crate::tags;
use sea_orm::*;

pub mod api;
pub mod web;

/// Priority of a to-do item, lowest to highest.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum PriorityLevel {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl PriorityLevel {
    /// Every priority level, in ascending order.
    pub const ALL: [PriorityLevel; 4] = [
        PriorityLevel::None,
        PriorityLevel::Low,
        PriorityLevel::Medium,
        PriorityLevel::High,
    ];

    /// Returns the display label of the priority level.
    pub fn label(&self) -> &'static str {
        match self {
            PriorityLevel::None => "None",
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
        }
    }

    /// Returns the stored integer value of the priority level.
    pub fn value(&self) -> i32 {
        *self as i32
    }

    /// Maps a stored integer back to a priority level.
    /// Values outside the known range fall back to `None`.
    pub fn from_value(value: i32) -> PriorityLevel {
        match value {
            1 => PriorityLevel::Low,
            2 => PriorityLevel::Medium,
            3 => PriorityLevel::High,
            _ => PriorityLevel::None,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct TodoItem {
    id: i32,
    list_id: i32,
    title: String,
    done: bool,
    priority: PriorityLevel,
    note: Option<String>,
    colour: Option<String>,
    tags: Option<String>,
}

impl TodoItem {
    /// Returns the ID of the item.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the ID of the owning list.
    pub fn list_id(&self) -> i32 {
        self.list_id
    }

    /// Returns the title of the item.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns whether the item is completed.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Returns the priority of the item.
    pub fn priority(&self) -> PriorityLevel {
        self.priority
    }

    /// Returns the free-text note of the item, if any.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the colour code of the item, if any.
    pub fn colour(&self) -> Option<&str> {
        self.colour.as_deref()
    }

    /// Returns the comma-separated tag string of the item, if any.
    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }
}

impl From<todo_item::Model> for TodoItem {
    fn from(model: todo_item::Model) -> Self {
        Self {
            id: model.id,
            list_id: model.list_id,
            title: model.title,
            done: model.done,
            priority: PriorityLevel::from_value(model.priority),
            note: model.note,
            colour: model.colour,
            tags: model.tags,
        }
    }
}

/// The fields edited through the item details dialog.
#[derive(Debug, Clone)]
pub struct ItemDetails {
    pub list_id: i32,
    pub priority: PriorityLevel,
    pub note: Option<String>,
    pub colour: Option<String>,
    pub tags: Option<String>,
}

/// One page of a list's items.
#[derive(Debug, PartialEq, Clone)]
pub struct ItemsPage {
    pub items: Vec<TodoItem>,
    pub page_number: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

/// Error type for ItemService operations.
#[derive(Debug, thiserror::Error)]
pub enum ItemServiceError {
    /// Represents an item not found error.
    #[error("Todo item with ID {0} not found")]
    ItemNotFound(i32),
    /// Represents a missing or soft-deleted owning list.
    #[error("Todo list with ID {0} not found")]
    ListNotFound(i32),
    /// Represents an empty item title.
    #[error("Item title must not be empty")]
    TitleEmpty,
    /// Represents an item title over the length limit.
    #[error("Item title must be at most {MAX_TITLE_LEN} characters")]
    TitleTooLong,
    /// Represents a colour code outside the supported palette.
    #[error(transparent)]
    UnsupportedColour(#[from] crate::colour::UnsupportedColour),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Maximum length of an item title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

fn validate_title(title: &str) -> Result<String, ItemServiceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ItemServiceError::TitleEmpty);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ItemServiceError::TitleTooLong);
    }
    Ok(title.to_string())
}

pub struct ItemService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl ItemService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> ItemService {
        ItemService { db }
    }

    /// Creates a new item at the end of a list.
    ///
    /// # Arguments
    ///
    /// * `list_id` - The ID of the owning list, which must not be soft-deleted.
    /// * `title` - The title of the item.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `TodoItem` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_item(
        &self,
        list_id: i32,
        title: String,
    ) -> Result<TodoItem, ItemServiceError> {
        self.ensure_list_exists(list_id).await?;
        let title = validate_title(&title)?;

        let active_model = todo_item::ActiveModel {
            list_id: ActiveValue::Set(list_id),
            title: ActiveValue::Set(title),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(TodoItem::from(created_model))
    }

    /// Updates the title and completion flag of an item (the inline quick-edit).
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the item to update.
    /// * `title` - The new title.
    /// * `done` - The new completion flag.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `TodoItem` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_item(
        &self,
        id: i32,
        title: String,
        done: bool,
    ) -> Result<TodoItem, ItemServiceError> {
        let title = validate_title(&title)?;
        let item_to_update = todo_item::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(ItemServiceError::ItemNotFound(id))?;

        let mut active_model: todo_item::ActiveModel = item_to_update.into();
        active_model.title = ActiveValue::Set(title);
        active_model.done = ActiveValue::Set(done);
        let updated_model = active_model.update(self.db).await?;

        Ok(TodoItem::from(updated_model))
    }

    /// Updates the detail fields of an item (the modal edit), possibly moving
    /// it to another list.
    ///
    /// The colour is validated against the supported palette, and the tag
    /// string is normalised (segments trimmed, empties dropped) before being
    /// persisted.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the item to update.
    /// * `details` - The new detail fields.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `TodoItem` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_item_details(
        &self,
        id: i32,
        details: ItemDetails,
    ) -> Result<TodoItem, ItemServiceError> {
        let item_to_update = todo_item::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(ItemServiceError::ItemNotFound(id))?;

        if details.list_id != item_to_update.list_id {
            self.ensure_list_exists(details.list_id).await?;
        }

        let colour = match details.colour.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Some(Colour::from_code(code)?.code().to_string()),
            _ => None,
        };
        let normalised_tags = details
            .tags
            .as_deref()
            .map(tags::parse)
            .as_deref()
            .and_then(tags::join);

        let mut active_model: todo_item::ActiveModel = item_to_update.into();
        active_model.list_id = ActiveValue::Set(details.list_id);
        active_model.priority = ActiveValue::Set(details.priority.value());
        active_model.note = ActiveValue::Set(details.note.filter(|note| !note.trim().is_empty()));
        active_model.colour = ActiveValue::Set(colour);
        active_model.tags = ActiveValue::Set(normalised_tags);
        let updated_model = active_model.update(self.db).await?;

        Ok(TodoItem::from(updated_model))
    }

    /// Deletes an item by its ID. Item deletion is a hard delete; only lists
    /// carry the soft-delete flag.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the item to delete.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `TodoItem` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_item(&self, id: i32) -> Result<TodoItem, ItemServiceError> {
        let item_to_delete = todo_item::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(ItemServiceError::ItemNotFound(id))?;

        let item_copy = TodoItem::from(item_to_delete.clone());
        todo_item::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(item_copy)
    }

    /// Retrieves an item by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the item to retrieve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `TodoItem` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, id: i32) -> Result<TodoItem, ItemServiceError> {
        let item_model = todo_item::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(ItemServiceError::ItemNotFound(id))?;
        Ok(TodoItem::from(item_model))
    }

    /// Retrieves one page of a list's items, ordered by title.
    ///
    /// # Arguments
    ///
    /// * `list_id` - The ID of the list whose items are paged.
    /// * `page_number` - The 1-based page number.
    /// * `page_size` - The number of items per page.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ItemsPage` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn items_page(
        &self,
        list_id: i32,
        page_number: u64,
        page_size: u64,
    ) -> Result<ItemsPage, ItemServiceError> {
        self.ensure_list_exists(list_id).await?;

        let paginator = todo_item::Entity::find()
            .filter(todo_item::Column::ListId.eq(list_id))
            .order_by_asc(todo_item::Column::Title)
            .paginate(self.db, page_size.max(1));

        let total_count = paginator.num_items().await?;
        let total_pages = paginator.num_pages().await?;
        let items = paginator
            .fetch_page(page_number.max(1) - 1)
            .await?
            .into_iter()
            .map(TodoItem::from)
            .collect();

        Ok(ItemsPage {
            items,
            page_number: page_number.max(1),
            total_pages,
            total_count,
        })
    }

    /// Checks that a list exists and has not been soft-deleted.
    #[tracing::instrument(skip(self))]
    async fn ensure_list_exists(&self, list_id: i32) -> Result<(), ItemServiceError> {
        let list = todo_list::Entity::find_by_id(list_id)
            .filter(todo_list::Column::Deleted.eq(false))
            .one(self.db)
            .await?;
        if list.is_none() {
            return Err(ItemServiceError::ListNotFound(list_id));
        }
        Ok(())
    }
}
