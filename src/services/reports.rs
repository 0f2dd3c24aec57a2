//! Dashboard, sales report and report downloads.
//!
//! The dashboard resolves weekly filters on calendar weeks starting Sunday,
//! the report and its downloads on ISO weeks starting Monday.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use pushkind_common::routes::check_role;
use serde::Serialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::order::OrderListQuery;
use crate::domain::report::{
    DateFilter, DateRange, SalesReport, SalesReportRow, SalesSummary, WeekStart,
};
use crate::export::{ExportFormat, ExportedReport, export_report};
use crate::forms::reports::ReportQuery;
use crate::repository::OrderReader;
use crate::services::{ServiceError, ServiceResult};

/// Upper bound for the dashboard page size requested by the client.
const MAX_PER_PAGE: usize = 100;

/// Pagination block returned with the dashboard rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub total_orders: usize,
}

impl PageInfo {
    fn new(current_page: usize, per_page: usize, total_orders: usize) -> Self {
        let total_pages = total_orders.div_ceil(per_page);
        Self {
            current_page,
            total_pages,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
            total_orders,
        }
    }
}

/// Dashboard summary over the selected period plus one page of orders.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub summary: SalesSummary,
    pub orders: Vec<SalesReportRow>,
    pub pagination: PageInfo,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn resolve_range(
    filter: Option<DateFilter>,
    today: NaiveDate,
    week_start: WeekStart,
) -> Option<DateRange> {
    filter.map(|filter| filter.resolve(today, week_start))
}

fn parse_filter(query: &ReportQuery) -> ServiceResult<Option<DateFilter>> {
    query
        .date_filter()
        .map_err(|err| ServiceError::InvalidFilter(err.to_string()))
}

fn orders_query(hub_id: i32, range: Option<DateRange>) -> OrderListQuery {
    let list_query = OrderListQuery::new(hub_id);
    match range {
        Some(range) => list_query.created_within(range),
        None => list_query,
    }
}

/// Loads the dashboard for the period selected in `query`.
pub fn load_dashboard<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &ReportQuery,
) -> ServiceResult<Dashboard>
where
    R: OrderReader + ?Sized,
{
    dashboard_on(repo, user, query, today())
}

fn dashboard_on<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &ReportQuery,
    today: NaiveDate,
) -> ServiceResult<Dashboard>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let range = resolve_range(parse_filter(query)?, today, WeekStart::Sunday);
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let list_query = orders_query(user.hub_id, range).paginate(page, per_page);
    let summary = repo.summarize_orders(&list_query)?;
    let (total, orders) = repo.list_orders(list_query)?;

    Ok(Dashboard {
        summary,
        orders: orders.iter().map(SalesReportRow::from).collect(),
        pagination: PageInfo::new(page, per_page, total),
    })
}

/// Builds the sales report. Without a filter every order is reported.
pub fn sales_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &ReportQuery,
) -> ServiceResult<SalesReport>
where
    R: OrderReader + ?Sized,
{
    sales_report_on(repo, user, query, today())
}

fn sales_report_on<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &ReportQuery,
    today: NaiveDate,
) -> ServiceResult<SalesReport>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let range = resolve_range(parse_filter(query)?, today, WeekStart::Monday);
    let (_, orders) = repo.list_orders(orders_query(user.hub_id, range))?;

    Ok(SalesReport::from_orders(&orders))
}

/// Renders the sales report for download.
///
/// A date filter is mandatory here and an empty period is reported as not found.
pub fn export_sales_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &ReportQuery,
    fonts_dir: &Path,
) -> ServiceResult<ExportedReport>
where
    R: OrderReader + ?Sized,
{
    export_on(repo, user, query, fonts_dir, today())
}

fn export_on<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &ReportQuery,
    fonts_dir: &Path,
    today: NaiveDate,
) -> ServiceResult<ExportedReport>
where
    R: OrderReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let filter = parse_filter(query)?
        .ok_or_else(|| ServiceError::InvalidFilter("a date filter is required".to_string()))?;

    let raw_format = query.format.as_deref().unwrap_or_default();
    let format = ExportFormat::parse(raw_format)
        .ok_or_else(|| ServiceError::InvalidFormat(raw_format.to_string()))?;

    let range = filter.resolve(today, WeekStart::Monday);
    let (_, orders) = repo.list_orders(orders_query(user.hub_id, Some(range)))?;
    if orders.is_empty() {
        return Err(ServiceError::NotFound);
    }

    let report = SalesReport::from_orders(&orders);
    let exported = export_report(format, &report, &range, fonts_dir)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;

    log::info!(
        "exported {} orders as {} for hub {}",
        report.orders.len(),
        format.extension(),
        user.hub_id
    );
    Ok(exported)
}
