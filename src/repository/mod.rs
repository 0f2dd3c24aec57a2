use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::{
    brand::{Brand, BrandListQuery, NewBrand, UpdateBrand},
    category::{Category, CategoryListQuery, NewCategory, UpdateCategory},
    coupon::{Coupon, CouponListQuery, NewCoupon, UpdateCoupon},
    customer::{Customer, CustomerListQuery, NewCustomer},
    offer::{ActivityStatus, NewOffer, Offer, OfferListQuery, OfferScope, UpdateOffer},
    order::{ItemStatus, NewOrder, Order, OrderListQuery},
    pricing::PriceChange,
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    report::SalesSummary,
};

pub mod brand;
pub mod category;
pub mod coupon;
pub mod customer;
pub mod offer;
pub mod order;
pub mod product;

#[cfg(test)]
pub mod mock;

diesel::define_sql_function! {
    /// SQLite `lower()`, used for case-insensitive name lookups.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over category records.
pub trait CategoryReader {
    fn get_category_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Category>>;
    /// Case-insensitive lookup used for duplicate detection.
    fn get_category_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Category>>;
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)>;
}

/// Write operations over category records.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(
        &self,
        category_id: i32,
        hub_id: i32,
        updates: &UpdateCategory,
    ) -> RepositoryResult<Category>;
    fn set_category_deleted(
        &self,
        category_id: i32,
        hub_id: i32,
        is_deleted: bool,
    ) -> RepositoryResult<Category>;
}

/// Read-only operations over brand records.
pub trait BrandReader {
    fn get_brand_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Brand>>;
    /// Case-insensitive lookup used for duplicate detection.
    fn get_brand_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Brand>>;
    fn list_brands(&self, query: BrandListQuery) -> RepositoryResult<(usize, Vec<Brand>)>;
}

/// Write operations over brand records.
pub trait BrandWriter {
    fn create_brand(&self, new_brand: &NewBrand) -> RepositoryResult<Brand>;
    fn update_brand(
        &self,
        brand_id: i32,
        hub_id: i32,
        updates: &UpdateBrand,
    ) -> RepositoryResult<Brand>;
    fn set_brand_deleted(
        &self,
        brand_id: i32,
        hub_id: i32,
        is_deleted: bool,
    ) -> RepositoryResult<Brand>;
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Products matched by an offer scope: listed ids or members of listed categories.
    fn list_products_in_scope(
        &self,
        hub_id: i32,
        scope: &OfferScope,
    ) -> RepositoryResult<Vec<Product>>;
    /// Products that currently carry `offer_id`.
    fn list_products_by_offer(&self, hub_id: i32, offer_id: i32)
    -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        hub_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn set_product_deleted(
        &self,
        product_id: i32,
        hub_id: i32,
        is_deleted: bool,
    ) -> RepositoryResult<Product>;
    /// Persist a pricing plan atomically. Returns the number of products written.
    fn apply_price_changes(&self, hub_id: i32, changes: &[PriceChange])
    -> RepositoryResult<usize>;
}

/// Read-only operations over offers.
pub trait OfferReader {
    fn get_offer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Offer>>;
    fn get_offers_by_ids(&self, hub_id: i32, ids: &[i32]) -> RepositoryResult<Vec<Offer>>;
    /// Active category offers whose scope includes `category_id`.
    fn list_active_category_offers(
        &self,
        hub_id: i32,
        category_id: i32,
    ) -> RepositoryResult<Vec<Offer>>;
    fn list_offers(&self, query: OfferListQuery) -> RepositoryResult<(usize, Vec<Offer>)>;
}

/// Write operations over offers. Price propagation is handled separately.
pub trait OfferWriter {
    fn create_offer(&self, new_offer: &NewOffer) -> RepositoryResult<Offer>;
    fn update_offer(
        &self,
        offer_id: i32,
        hub_id: i32,
        updates: &UpdateOffer,
    ) -> RepositoryResult<Offer>;
    fn set_offer_status(
        &self,
        offer_id: i32,
        hub_id: i32,
        status: ActivityStatus,
    ) -> RepositoryResult<Offer>;
}

/// Read-only operations over orders.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    /// Totals over every order matched by `query`, ignoring its pagination.
    fn summarize_orders(&self, query: &OrderListQuery) -> RepositoryResult<SalesSummary>;
}

/// Write operations over orders.
pub trait OrderWriter {
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    fn update_item_status(
        &self,
        order_id: i32,
        item_id: i32,
        hub_id: i32,
        status: ItemStatus,
    ) -> RepositoryResult<Order>;
}

/// Read-only operations over coupons.
pub trait CouponReader {
    fn get_coupon_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Coupon>>;
    /// Case-insensitive lookup used for duplicate detection.
    fn get_coupon_by_code(&self, code: &str, hub_id: i32) -> RepositoryResult<Option<Coupon>>;
    fn list_coupons(&self, query: CouponListQuery) -> RepositoryResult<(usize, Vec<Coupon>)>;
}

/// Write operations over coupons.
pub trait CouponWriter {
    fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<Coupon>;
    fn update_coupon(
        &self,
        coupon_id: i32,
        hub_id: i32,
        updates: &UpdateCoupon,
    ) -> RepositoryResult<Coupon>;
    fn set_coupon_status(
        &self,
        coupon_id: i32,
        hub_id: i32,
        status: ActivityStatus,
    ) -> RepositoryResult<Coupon>;
}

/// Read-only operations over customers.
pub trait CustomerReader {
    fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Customer>>;
    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<Customer>)>;
}

/// Write operations over customers.
pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn set_customer_blocked(
        &self,
        customer_id: i32,
        hub_id: i32,
        is_blocked: bool,
    ) -> RepositoryResult<Customer>;
}
