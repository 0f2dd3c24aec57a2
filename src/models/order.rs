use chrono::NaiveDateTime;
use diesel::prelude::*;
use thiserror::Error;

use crate::domain::order::{
    ItemStatus, NewOrder as DomainNewOrder, NewOrderItem as DomainNewOrderItem,
    Order as DomainOrder, OrderItem as DomainOrderItem,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    pub reference: String,
    pub customer_id: i32,
    pub payment_type: String,
    pub payment_status: String,
    pub coupon_code: Option<String>,
    pub coupon_discount: i64,
    pub total_amount: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Stored item status that matches no `ItemStatus` label.
#[derive(Debug, Error)]
#[error("order item {item_id} has unknown status `{status}`")]
pub struct UnknownItemStatus {
    pub item_id: i32,
    pub status: String,
}

impl From<UnknownItemStatus> for diesel::result::Error {
    fn from(value: UnknownItemStatus) -> Self {
        diesel::result::Error::DeserializationError(Box::new(value))
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub hub_id: i32,
    pub reference: &'a str,
    pub customer_id: i32,
    pub payment_type: &'a str,
    pub payment_status: &'a str,
    pub coupon_code: Option<&'a str>,
    pub coupon_discount: i64,
    pub total_amount: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: &'a str,
    pub price: i64,
    pub quantity: i32,
    pub status: &'a str,
}

impl Order {
    pub fn into_domain(
        self,
        items: Vec<OrderItem>,
        customer_name: Option<String>,
    ) -> Result<DomainOrder, UnknownItemStatus> {
        let items = items
            .into_iter()
            .map(OrderItem::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DomainOrder {
            id: self.id,
            hub_id: self.hub_id,
            order_id: self.reference,
            customer_id: self.customer_id,
            customer_name,
            payment_type: self.payment_type,
            payment_status: self.payment_status,
            coupon_code: self.coupon_code,
            coupon_discount: self.coupon_discount,
            total_amount: self.total_amount,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl OrderItem {
    pub fn into_domain(self) -> Result<DomainOrderItem, UnknownItemStatus> {
        let Some(status) = ItemStatus::parse(&self.status) else {
            return Err(UnknownItemStatus {
                item_id: self.id,
                status: self.status,
            });
        };

        Ok(DomainOrderItem {
            id: self.id,
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            status,
        })
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        Self {
            hub_id: value.hub_id,
            reference: value.order_id.as_str(),
            customer_id: value.customer_id,
            payment_type: value.payment_type.as_str(),
            payment_status: value.payment_status.as_str(),
            coupon_code: value.coupon_code.as_deref(),
            coupon_discount: value.coupon_discount,
            total_amount: value.total_amount,
            created_at: value.created_at,
            updated_at: value.created_at,
        }
    }
}

impl<'a> NewOrderItem<'a> {
    pub fn from_domain(order_id: i32, value: &'a DomainNewOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            name: value.name.as_str(),
            price: value.price,
            quantity: value.quantity,
            status: value.status.as_str(),
        }
    }
}
