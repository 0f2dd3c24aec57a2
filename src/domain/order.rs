use std::fmt;

use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::report::DateRange;

/// Fulfillment status of a single order line item.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(rename = "Return Requested")]
    ReturnRequested,
    Returned,
    Rejected,
}

/// Rejected attempt to move a line item between two statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid status change from {from} to {to}")]
pub struct InvalidTransition {
    pub from: ItemStatus,
    pub to: ItemStatus,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 8] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::ReturnRequested,
        Self::Returned,
        Self::Rejected,
    ];

    /// Statuses reachable in one step from `self`.
    ///
    /// Nothing leads into `ReturnRequested`; it is only ever a source state.
    pub fn allowed_next(self) -> &'static [ItemStatus] {
        match self {
            Self::Pending => &[Self::Processing],
            Self::Processing => &[Self::Shipped],
            Self::Shipped => &[Self::Delivered],
            Self::Delivered => &[Self::Cancelled, Self::Returned],
            Self::ReturnRequested => &[Self::Returned, Self::Rejected],
            Self::Cancelled | Self::Returned | Self::Rejected => &[],
        }
    }

    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Validate the move to `next`, returning the new status.
    pub fn transition(self, next: ItemStatus) -> Result<ItemStatus, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::ReturnRequested => "Return Requested",
            Self::Returned => "Returned",
            Self::Rejected => "Rejected",
        }
    }

    /// Parse the label used in storage and forms.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ItemStatus> for &'static str {
    fn from(value: ItemStatus) -> Self {
        value.as_str()
    }
}

/// One product entry within an order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    /// Unit price in whole currency units at the time of purchase.
    pub price: i64,
    pub quantity: i32,
    pub status: ItemStatus,
}

/// Domain representation of a storefront order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    /// Human-facing order reference.
    pub order_id: String,
    pub customer_id: i32,
    /// Customer name resolved for listings and reports.
    pub customer_name: Option<String>,
    pub payment_type: String,
    pub payment_status: String,
    pub coupon_code: Option<String>,
    pub coupon_discount: i64,
    pub total_amount: i64,
    pub items: Vec<OrderItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Order {
    pub fn item(&self, item_id: i32) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Total number of units across all line items.
    pub fn item_quantity(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}

/// Line item payload used when recording a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<i32>,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub status: ItemStatus,
}

impl NewOrderItem {
    pub fn new(name: impl Into<String>, price: i64, quantity: i32) -> Self {
        Self {
            product_id: None,
            name: name.into(),
            price,
            quantity,
            status: ItemStatus::Pending,
        }
    }

    pub fn with_product_id(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }
}

/// Payload required to record an order placed in the storefront.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub hub_id: i32,
    pub order_id: String,
    pub customer_id: i32,
    pub payment_type: String,
    pub payment_status: String,
    pub coupon_code: Option<String>,
    pub coupon_discount: i64,
    pub total_amount: i64,
    pub items: Vec<NewOrderItem>,
    pub created_at: NaiveDateTime,
}

impl NewOrder {
    pub fn new(
        hub_id: i32,
        order_id: impl Into<String>,
        customer_id: i32,
        total_amount: i64,
    ) -> Self {
        Self {
            hub_id,
            order_id: order_id.into(),
            customer_id,
            payment_type: "COD".to_string(),
            payment_status: "Pending".to_string(),
            coupon_code: None,
            coupon_discount: 0,
            total_amount,
            items: Vec::new(),
            created_at: Local::now().naive_utc(),
        }
    }

    pub fn with_payment(mut self, payment_type: impl Into<String>, status: impl Into<String>) -> Self {
        self.payment_type = payment_type.into();
        self.payment_status = status.into();
        self
    }

    pub fn with_coupon(mut self, code: impl Into<String>, discount: i64) -> Self {
        self.coupon_code = Some(code.into());
        self.coupon_discount = discount;
        self
    }

    pub fn with_item(mut self, item: NewOrderItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Query definition used to list orders for a hub.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Search term matched against the reference, customer name and payment status.
    pub search: Option<String>,
    /// Inclusive creation time window.
    pub created: Option<DateRange>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    /// Construct a query that targets all orders belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            created: None,
            pagination: None,
        }
    }

    /// Filter the results by a search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Restrict results to orders created within `range`.
    pub fn created_within(mut self, range: DateRange) -> Self {
        self.created = Some(range);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_path_is_linear() {
        assert_eq!(
            ItemStatus::Pending.transition(ItemStatus::Processing),
            Ok(ItemStatus::Processing)
        );
        assert_eq!(
            ItemStatus::Processing.transition(ItemStatus::Shipped),
            Ok(ItemStatus::Shipped)
        );
        assert_eq!(
            ItemStatus::Shipped.transition(ItemStatus::Delivered),
            Ok(ItemStatus::Delivered)
        );
    }

    #[test]
    fn pending_cannot_skip_to_shipped() {
        assert_eq!(
            ItemStatus::Pending.transition(ItemStatus::Shipped),
            Err(InvalidTransition {
                from: ItemStatus::Pending,
                to: ItemStatus::Shipped,
            })
        );
    }

    #[test]
    fn delivered_can_be_returned_or_cancelled() {
        assert!(ItemStatus::Delivered.can_transition_to(ItemStatus::Returned));
        assert!(ItemStatus::Delivered.can_transition_to(ItemStatus::Cancelled));
        assert!(!ItemStatus::Delivered.can_transition_to(ItemStatus::Pending));
    }

    #[test]
    fn terminal_states_reject_everything() {
        for terminal in [ItemStatus::Cancelled, ItemStatus::Returned, ItemStatus::Rejected] {
            assert!(terminal.is_terminal());
            for next in ItemStatus::ALL {
                assert!(terminal.transition(next).is_err());
            }
        }
    }

    #[test]
    fn return_requested_is_never_a_target() {
        for status in ItemStatus::ALL {
            assert!(!status.can_transition_to(ItemStatus::ReturnRequested));
        }
        assert!(ItemStatus::ReturnRequested.can_transition_to(ItemStatus::Returned));
        assert!(ItemStatus::ReturnRequested.can_transition_to(ItemStatus::Rejected));
    }

    #[test]
    fn status_labels_round_trip() {
        assert_eq!(
            ItemStatus::parse("return requested"),
            Some(ItemStatus::ReturnRequested)
        );
        assert_eq!(ItemStatus::parse("Shipped"), Some(ItemStatus::Shipped));
        assert_eq!(ItemStatus::parse("Lost"), None);
        assert_eq!(ItemStatus::ReturnRequested.to_string(), "Return Requested");
    }

    #[test]
    fn item_quantity_sums_line_items() {
        let item = |id, quantity| OrderItem {
            id,
            product_id: None,
            name: "Watch".to_string(),
            price: 100,
            quantity,
            status: ItemStatus::Pending,
        };
        let order = Order {
            id: 1,
            hub_id: 1,
            order_id: "ORD-1".to_string(),
            customer_id: 1,
            customer_name: None,
            payment_type: "COD".to_string(),
            payment_status: "Pending".to_string(),
            coupon_code: None,
            coupon_discount: 0,
            total_amount: 300,
            items: vec![item(1, 2), item(2, 1)],
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };

        assert_eq!(order.item_quantity(), 3);
        assert!(order.item(2).is_some());
        assert!(order.item(9).is_none());
    }
}
