use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a catalog category belonging to a hub.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the category, unique within the hub.
    pub name: String,
    /// Optional description that expands upon the category name.
    pub description: Option<String>,
    /// Flag indicating whether the category has been unlisted.
    pub is_deleted: bool,
    /// Timestamp for when the category record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the category record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new category for a hub.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the category.
    pub name: String,
    /// Optional description that expands upon the category name.
    pub description: Option<String>,
    /// Whether the category starts out unlisted.
    pub is_deleted: bool,
    /// Timestamp captured when the category payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewCategory {
    /// Build a new category payload with the supplied details and current timestamp.
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into(),
            description: None,
            is_deleted: false,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the category payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Create the category in the unlisted state.
    pub fn unlisted(mut self) -> Self {
        self.is_deleted = true;
        self
    }
}

/// Patch data applied when updating an existing category.
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    /// Updated name for the category.
    pub name: String,
    /// New description value; `None` clears the description.
    pub description: Option<String>,
    /// Optional listing flag update.
    pub is_deleted: Option<bool>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateCategory {
    /// Build a category update payload with the supplied values.
    pub fn new(name: String, description: Option<String>, is_deleted: Option<bool>) -> Self {
        Self {
            name,
            description,
            is_deleted,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list categories for a hub.
#[derive(Debug, Clone)]
pub struct CategoryListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Whether unlisted categories should be included in the results.
    pub include_deleted: bool,
    /// Optional case-insensitive substring search applied to name and description.
    pub search: Option<String>,
    /// Optional pagination options.
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    /// Construct a query that targets the listed categories of `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            include_deleted: false,
            search: None,
            pagination: None,
        }
    }

    /// Include unlisted categories in the results.
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    /// Filter results by a search term applied to the name and description.
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = Some(value.into());
        self
    }
}
