use std::collections::HashMap;

use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::{
        order::{ItemStatus, NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery},
        report::SalesSummary,
    },
    models::order::{
        NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
        OrderItem as DbOrderItem,
    },
    repository::{DieselRepository, OrderReader, OrderWriter},
};

/// Attach line items and customer names to loaded order rows.
fn hydrate_orders(
    conn: &mut SqliteConnection,
    db_orders: Vec<DbOrder>,
) -> RepositoryResult<Vec<DomainOrder>> {
    use crate::schema::{customers, order_items};

    if db_orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();
    let customer_ids: Vec<i32> = db_orders.iter().map(|order| order.customer_id).collect();

    let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
    let rows = order_items::table
        .filter(order_items::order_id.eq_any(&order_ids))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)?;

    for item in rows {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    let customer_names: HashMap<i32, String> = customers::table
        .filter(customers::id.eq_any(&customer_ids))
        .select((customers::id, customers::name))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .collect();

    let orders = db_orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            let customer_name = customer_names.get(&order.customer_id).cloned();
            order.into_domain(items, customer_name)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| {
            log::error!("Failed to load orders: {err}");
            diesel::result::Error::from(err)
        })?;

    Ok(orders)
}

fn load_order(
    conn: &mut SqliteConnection,
    order_id: i32,
    hub_id: i32,
) -> RepositoryResult<Option<DomainOrder>> {
    use crate::schema::orders;

    let order = orders::table
        .filter(orders::id.eq(order_id))
        .filter(orders::hub_id.eq(hub_id))
        .first::<DbOrder>(conn)
        .optional()?;

    let Some(order) = order else {
        return Ok(None);
    };

    Ok(hydrate_orders(conn, vec![order])?.pop())
}

type BoxedOrders<'a> = crate::schema::orders::BoxedQuery<'a, diesel::sqlite::Sqlite>;

/// Orders of the hub matching the search term and creation window.
fn filtered_orders(query: &OrderListQuery) -> BoxedOrders<'_> {
    use crate::schema::{customers, orders};

    let mut filtered = orders::table
        .filter(orders::hub_id.eq(query.hub_id))
        .into_boxed::<diesel::sqlite::Sqlite>();

    if let Some(range) = query.created {
        filtered = filtered.filter(orders::created_at.between(range.start, range.end));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        let matching_customers = customers::table
            .filter(customers::hub_id.eq(query.hub_id))
            .filter(customers::name.like(pattern.clone()))
            .select(customers::id);

        filtered = filtered.filter(
            orders::reference
                .like(pattern.clone())
                .or(orders::payment_status.like(pattern))
                .or(orders::customer_id.eq_any(matching_customers)),
        );
    }

    filtered
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;
        load_order(&mut conn, id, hub_id)
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let total = filtered_orders(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_orders(&query).order((orders::created_at.desc(), orders::id.desc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;

        Ok((total, hydrate_orders(&mut conn, db_orders)?))
    }

    fn summarize_orders(&self, query: &OrderListQuery) -> RepositoryResult<SalesSummary> {
        use diesel::dsl::{count_star, sql};
        use diesel::sql_types::BigInt;

        let mut conn = self.conn()?;

        let (count, order_amount, discount) = filtered_orders(query)
            .select((
                count_star(),
                sql::<BigInt>("COALESCE(SUM(orders.total_amount), 0)"),
                sql::<BigInt>("COALESCE(SUM(orders.coupon_discount), 0)"),
            ))
            .get_result::<(i64, i64, i64)>(&mut conn)?;

        Ok(SalesSummary {
            overall_sales_count: count as usize,
            overall_order_amount: order_amount,
            overall_discount: discount,
        })
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let db_new = DbNewOrder::from(new_order);

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            if !new_order.items.is_empty() {
                let payload: Vec<DbNewOrderItem> = new_order
                    .items
                    .iter()
                    .map(|item| DbNewOrderItem::from_domain(created.id, item))
                    .collect();

                diesel::insert_into(order_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            load_order(conn, created.id, created.hub_id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn update_item_status(
        &self,
        order_id: i32,
        item_id: i32,
        hub_id: i32,
        status: ItemStatus,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let owned = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::hub_id.eq(hub_id))
                .select(orders::id)
                .first::<i32>(conn)
                .optional()?;

            if owned.is_none() {
                return Err(RepositoryError::NotFound);
            }

            let now = Local::now().naive_utc();

            let updated = diesel::update(
                order_items::table
                    .filter(order_items::id.eq(item_id))
                    .filter(order_items::order_id.eq(order_id)),
            )
            .set((
                order_items::status.eq(status.as_str()),
                order_items::updated_at.eq(now),
            ))
            .execute(conn)?;

            if updated == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::update(orders::table.filter(orders::id.eq(order_id)))
                .set(orders::updated_at.eq(now))
                .execute(conn)?;

            load_order(conn, order_id, hub_id)?.ok_or(RepositoryError::NotFound)
        })
    }
}
