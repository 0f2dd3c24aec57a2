use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::order::{ItemStatus, Order, OrderListQuery};
use crate::forms::orders::UpdateItemStatusForm;
use crate::repository::{OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the orders index page.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Matched against the order reference, customer name and payment status.
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the orders index template.
pub struct OrdersPageData {
    pub orders: Paginated<Order>,
    pub search: Option<String>,
    /// Every status label, used by the status selector.
    pub statuses: Vec<&'static str>,
}

pub fn load_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let mut list_query = OrderListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, orders) = repo.list_orders(list_query)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(OrdersPageData {
        orders: Paginated::new(orders, page, total_pages),
        search,
        statuses: ItemStatus::ALL.iter().map(|status| status.as_str()).collect(),
    })
}

/// Moves a single order line item to a new status.
///
/// The move must be allowed from the item's current status.
pub fn update_item_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UpdateItemStatusForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let change = form
        .into_change()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo
        .get_order_by_id(change.order_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let item = order.item(change.item_id).ok_or(ServiceError::NotFound)?;

    let next = item.status.transition(change.status)?;

    let updated = repo.update_item_status(order.id, item.id, user.hub_id, next)?;
    log::info!(
        "order {} item {} moved from {} to {}",
        order.order_id,
        item.id,
        item.status,
        next
    );
    Ok(updated)
}
