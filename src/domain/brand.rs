use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a product brand.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Brand {
    pub id: i32,
    pub hub_id: i32,
    /// Brand name, unique within the hub.
    pub name: String,
    pub description: Option<String>,
    /// Unlisted brands are hidden from the product forms.
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new brand.
#[derive(Debug, Clone)]
pub struct NewBrand {
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
}

impl NewBrand {
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into(),
            description: None,
            is_deleted: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn unlisted(mut self, is_deleted: bool) -> Self {
        self.is_deleted = is_deleted;
        self
    }
}

/// Patch data applied when updating a brand.
#[derive(Debug, Clone)]
pub struct UpdateBrand {
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl UpdateBrand {
    pub fn new(name: String, description: Option<String>, is_deleted: Option<bool>) -> Self {
        Self {
            name,
            description,
            is_deleted,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list brands for a hub.
#[derive(Debug, Clone)]
pub struct BrandListQuery {
    pub hub_id: i32,
    pub include_deleted: bool,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl BrandListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            include_deleted: false,
            search: None,
            pagination: None,
        }
    }

    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = Some(value.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
