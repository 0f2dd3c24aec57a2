pub mod brand;
pub mod category;
pub mod coupon;
pub mod customer;
pub mod offer;
pub mod order;
pub mod product;
