use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::ItemStatus;

pub type OrderFormResult<T> = Result<T, OrderFormError>;

#[derive(Debug, Error)]
pub enum OrderFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("unknown order status `{0}`")]
    UnknownStatus(String),
}

/// Normalized status change for a single order line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStatusChange {
    pub order_id: i32,
    pub item_id: i32,
    pub status: ItemStatus,
}

/// JSON payload posted by the order list when an item status is changed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemStatusForm {
    #[validate(range(min = 1))]
    #[serde(alias = "orderId")]
    pub order_id: i32,
    #[validate(range(min = 1))]
    #[serde(alias = "itemId")]
    pub item_id: i32,
    #[validate(length(min = 1))]
    pub status: String,
}

impl UpdateItemStatusForm {
    pub fn into_change(self) -> OrderFormResult<ItemStatusChange> {
        self.validate()?;

        let status = ItemStatus::parse(&self.status)
            .ok_or_else(|| OrderFormError::UnknownStatus(self.status.clone()))?;

        Ok(ItemStatusChange {
            order_id: self.order_id,
            item_id: self.item_id,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_payload_is_accepted() {
        let form: UpdateItemStatusForm =
            serde_json::from_str(r#"{"orderId": 3, "itemId": 8, "status": "Return Requested"}"#)
                .expect("decoded payload");

        let change = form.into_change().expect("valid change");

        assert_eq!(change.order_id, 3);
        assert_eq!(change.item_id, 8);
        assert_eq!(change.status, ItemStatus::ReturnRequested);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let form = UpdateItemStatusForm {
            order_id: 1,
            item_id: 1,
            status: "Lost".to_string(),
        };

        assert!(matches!(
            form.into_change(),
            Err(OrderFormError::UnknownStatus(value)) if value == "Lost"
        ));
    }
}
