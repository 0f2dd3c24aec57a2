use mockall::mock;

use super::{
    BrandReader, BrandWriter, CategoryReader, CategoryWriter, CouponReader, CouponWriter,
    CustomerReader, CustomerWriter, OfferReader, OfferWriter, OrderReader, OrderWriter,
    ProductReader, ProductWriter,
};
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
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub CatalogRepo {}

    impl CategoryReader for CatalogRepo {
        fn get_category_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Category>>;
        fn get_category_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<(usize, Vec<Category>)>;
    }

    impl CategoryWriter for CatalogRepo {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn update_category(&self, category_id: i32, hub_id: i32, updates: &UpdateCategory) -> RepositoryResult<Category>;
        fn set_category_deleted(&self, category_id: i32, hub_id: i32, is_deleted: bool) -> RepositoryResult<Category>;
    }

    impl BrandReader for CatalogRepo {
        fn get_brand_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Brand>>;
        fn get_brand_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Brand>>;
        fn list_brands(&self, query: BrandListQuery) -> RepositoryResult<(usize, Vec<Brand>)>;
    }

    impl BrandWriter for CatalogRepo {
        fn create_brand(&self, new_brand: &NewBrand) -> RepositoryResult<Brand>;
        fn update_brand(&self, brand_id: i32, hub_id: i32, updates: &UpdateBrand) -> RepositoryResult<Brand>;
        fn set_brand_deleted(&self, brand_id: i32, hub_id: i32, is_deleted: bool) -> RepositoryResult<Brand>;
    }

    impl ProductReader for CatalogRepo {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn list_products_in_scope(&self, hub_id: i32, scope: &OfferScope) -> RepositoryResult<Vec<Product>>;
        fn list_products_by_offer(&self, hub_id: i32, offer_id: i32) -> RepositoryResult<Vec<Product>>;
    }

    impl ProductWriter for CatalogRepo {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, hub_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn set_product_deleted(&self, product_id: i32, hub_id: i32, is_deleted: bool) -> RepositoryResult<Product>;
        fn apply_price_changes(&self, hub_id: i32, changes: &[PriceChange]) -> RepositoryResult<usize>;
    }

    impl OfferReader for CatalogRepo {
        fn get_offer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Offer>>;
        fn get_offers_by_ids(&self, hub_id: i32, ids: &[i32]) -> RepositoryResult<Vec<Offer>>;
        fn list_active_category_offers(&self, hub_id: i32, category_id: i32) -> RepositoryResult<Vec<Offer>>;
        fn list_offers(&self, query: OfferListQuery) -> RepositoryResult<(usize, Vec<Offer>)>;
    }

    impl OfferWriter for CatalogRepo {
        fn create_offer(&self, new_offer: &NewOffer) -> RepositoryResult<Offer>;
        fn update_offer(&self, offer_id: i32, hub_id: i32, updates: &UpdateOffer) -> RepositoryResult<Offer>;
        fn set_offer_status(&self, offer_id: i32, hub_id: i32, status: ActivityStatus) -> RepositoryResult<Offer>;
    }
}

mock! {
    pub OrderRepo {}

    impl OrderReader for OrderRepo {
        fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
        fn summarize_orders(&self, query: &OrderListQuery) -> RepositoryResult<SalesSummary>;
    }

    impl OrderWriter for OrderRepo {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn update_item_status(&self, order_id: i32, item_id: i32, hub_id: i32, status: ItemStatus) -> RepositoryResult<Order>;
    }
}

mock! {
    pub CouponRepo {}

    impl CouponReader for CouponRepo {
        fn get_coupon_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Coupon>>;
        fn get_coupon_by_code(&self, code: &str, hub_id: i32) -> RepositoryResult<Option<Coupon>>;
        fn list_coupons(&self, query: CouponListQuery) -> RepositoryResult<(usize, Vec<Coupon>)>;
    }

    impl CouponWriter for CouponRepo {
        fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<Coupon>;
        fn update_coupon(&self, coupon_id: i32, hub_id: i32, updates: &UpdateCoupon) -> RepositoryResult<Coupon>;
        fn set_coupon_status(&self, coupon_id: i32, hub_id: i32, status: ActivityStatus) -> RepositoryResult<Coupon>;
    }
}

mock! {
    pub CustomerRepo {}

    impl CustomerReader for CustomerRepo {
        fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
    }

    impl CustomerWriter for CustomerRepo {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn set_customer_blocked(&self, customer_id: i32, hub_id: i32, is_blocked: bool) -> RepositoryResult<Customer>;
    }
}
