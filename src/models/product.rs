use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductAttributes,
    UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub brand_id: Option<i32>,
    pub price: i64,
    pub stock_quantity: i32,
    pub thickness: Option<f64>,
    pub shape: Option<String>,
    pub water_resistance: Option<String>,
    pub warranty_period: Option<String>,
    pub strap_width: Option<f64>,
    /// JSON array of stored image paths.
    pub images: String,
    pub is_listed: bool,
    pub is_deleted: bool,
    pub offer_id: Option<i32>,
    pub discounted_price: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category_id: i32,
    pub brand_id: Option<i32>,
    pub price: i64,
    pub stock_quantity: i32,
    pub thickness: Option<f64>,
    pub shape: Option<&'a str>,
    pub water_resistance: Option<&'a str>,
    pub warranty_period: Option<&'a str>,
    pub strap_width: Option<f64>,
    pub images: String,
    pub is_listed: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category_id: i32,
    pub brand_id: Option<i32>,
    pub price: i64,
    pub stock_quantity: i32,
    pub thickness: Option<f64>,
    pub shape: Option<&'a str>,
    pub water_resistance: Option<&'a str>,
    pub warranty_period: Option<&'a str>,
    pub strap_width: Option<f64>,
    pub images: String,
    pub is_listed: bool,
    pub updated_at: NaiveDateTime,
}

/// Offer columns written by the pricing engine.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductPricing {
    pub offer_id: Option<i32>,
    pub discounted_price: Option<i64>,
    pub updated_at: NaiveDateTime,
}

fn encode_images(images: &[String]) -> String {
    serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string())
}

fn decode_images(images: &str) -> Vec<String> {
    serde_json::from_str(images).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed product images `{images}`: {err}");
        Vec::new()
    })
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            description: value.description,
            category_id: value.category_id,
            brand_id: value.brand_id,
            price: value.price,
            stock_quantity: value.stock_quantity,
            attributes: ProductAttributes {
                thickness: value.thickness,
                shape: value.shape,
                water_resistance: value.water_resistance,
                warranty_period: value.warranty_period,
                strap_width: value.strap_width,
            },
            images: decode_images(&value.images),
            is_listed: value.is_listed,
            is_deleted: value.is_deleted,
            offer_id: value.offer_id,
            discounted_price: value.discounted_price,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            category_id: value.category_id,
            brand_id: value.brand_id,
            price: value.price,
            stock_quantity: value.stock_quantity,
            thickness: value.attributes.thickness,
            shape: value.attributes.shape.as_deref(),
            water_resistance: value.attributes.water_resistance.as_deref(),
            warranty_period: value.attributes.warranty_period.as_deref(),
            strap_width: value.attributes.strap_width,
            images: encode_images(&value.images),
            is_listed: value.is_listed,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            category_id: value.category_id,
            brand_id: value.brand_id,
            price: value.price,
            stock_quantity: value.stock_quantity,
            thickness: value.attributes.thickness,
            shape: value.attributes.shape.as_deref(),
            water_resistance: value.attributes.water_resistance.as_deref(),
            warranty_period: value.attributes.warranty_period.as_deref(),
            strap_width: value.attributes.strap_width,
            images: encode_images(&value.images),
            is_listed: value.is_listed,
            updated_at: value.updated_at,
        }
    }
}
