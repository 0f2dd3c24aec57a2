use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Maximum number of image slots a product can hold.
pub const MAX_PRODUCT_IMAGES: usize = 3;

/// Optional watch attributes shown on the product page.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProductAttributes {
    /// Case thickness in millimetres.
    pub thickness: Option<f64>,
    /// Case shape, e.g. `round`.
    pub shape: Option<String>,
    /// Water resistance rating, e.g. `50m`.
    pub water_resistance: Option<String>,
    /// Warranty period as entered by the operator.
    pub warranty_period: Option<String>,
    /// Strap width in millimetres.
    pub strap_width: Option<f64>,
}

/// Domain representation of a catalog product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to users.
    pub description: Option<String>,
    /// Category the product belongs to.
    pub category_id: i32,
    /// Optional brand of the product.
    pub brand_id: Option<i32>,
    /// Base price in whole currency units.
    pub price: i64,
    /// Units available in stock.
    pub stock_quantity: i32,
    /// Watch attributes.
    pub attributes: ProductAttributes,
    /// Stored image paths, at most [`MAX_PRODUCT_IMAGES`].
    pub images: Vec<String>,
    /// Whether the product is visible in the storefront.
    pub is_listed: bool,
    /// Soft-delete flag toggled from the product list.
    pub is_deleted: bool,
    /// Offer currently applied to the product.
    pub offer_id: Option<i32>,
    /// Price after the applied offer; present iff `offer_id` is set.
    pub discounted_price: Option<i64>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Primary image used in listings.
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub brand_id: Option<i32>,
    pub price: i64,
    pub stock_quantity: i32,
    pub attributes: ProductAttributes,
    pub images: Vec<String>,
    pub is_listed: bool,
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(hub_id: i32, name: impl Into<String>, category_id: i32, price: i64) -> Self {
        Self {
            hub_id,
            name: name.into(),
            description: None,
            category_id,
            brand_id: None,
            price,
            stock_quantity: 0,
            attributes: ProductAttributes::default(),
            images: Vec::new(),
            is_listed: true,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_brand_id(mut self, brand_id: i32) -> Self {
        self.brand_id = Some(brand_id);
        self
    }

    pub fn with_stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    pub fn with_attributes(mut self, attributes: ProductAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attach image paths, keeping at most [`MAX_PRODUCT_IMAGES`].
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images.into_iter().take(MAX_PRODUCT_IMAGES).collect();
        self
    }
}

/// Replacement of the editable product fields. Offer fields are owned by the
/// pricing engine and are not part of this patch.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub brand_id: Option<i32>,
    pub price: i64,
    pub stock_quantity: i32,
    pub attributes: ProductAttributes,
    pub images: Vec<String>,
    pub is_listed: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list products for a hub.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Whether soft-deleted products should be included in the results.
    pub include_deleted: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets all products belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            include_deleted: false,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Include soft-deleted products in the results.
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Fill the image slots of an edited product.
///
/// Slot `i` takes the `i`-th uploaded path, falling back to the `i`-th
/// existing path; slots with neither are dropped.
pub fn merge_image_slots(uploaded: &[String], existing: &[String]) -> Vec<String> {
    (0..MAX_PRODUCT_IMAGES)
        .filter_map(|slot| {
            uploaded
                .get(slot)
                .or_else(|| existing.get(slot))
                .filter(|path| !path.trim().is_empty())
                .cloned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn merge_image_slots_prefers_uploads() {
        let merged = merge_image_slots(&paths(&["/new/a.png"]), &paths(&["/old/a.png", "/old/b.png"]));

        assert_eq!(merged, paths(&["/new/a.png", "/old/b.png"]));
    }

    #[test]
    fn merge_image_slots_drops_empty_slots() {
        let merged = merge_image_slots(&[], &paths(&["/old/a.png", "", "/old/c.png"]));

        assert_eq!(merged, paths(&["/old/a.png", "/old/c.png"]));
    }

    #[test]
    fn merge_image_slots_caps_at_three() {
        let merged = merge_image_slots(&paths(&["1", "2", "3", "4"]), &[]);

        assert_eq!(merged.len(), MAX_PRODUCT_IMAGES);
    }

    #[test]
    fn new_product_truncates_images() {
        let product = NewProduct::new(1, "Diver", 2, 1000).with_images(paths(&["a", "b", "c", "d"]));

        assert_eq!(product.images, paths(&["a", "b", "c"]));
    }
}
