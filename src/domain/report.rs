//! Date filters and row shapes shared by the dashboard and the sales report.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::domain::order::Order;

/// Format accepted for custom date bounds (HTML date inputs).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while interpreting a date filter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateFilterError {
    #[error("unsupported date filter `{0}`")]
    Unknown(String),
    #[error("filter `{0}` requires both a start and an end date")]
    MissingBounds(&'static str),
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("start date is after end date")]
    ReversedBounds,
}

/// Inclusive window of creation timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Window covering whole days from `first` through `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: end_of_day(last),
        }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

/// First day of the week used when resolving [`DateFilter::Weekly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStart {
    /// Calendar week, used by the dashboard.
    Sunday,
    /// ISO week, used by the sales report and its exports.
    Monday,
}

/// Period selected in the dashboard or sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom { start: NaiveDate, end: NaiveDate },
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl DateFilter {
    /// Interpret the raw query parameters.
    ///
    /// A missing or blank filter yields `Ok(None)`, meaning "no date restriction".
    pub fn parse(
        filter: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Option<Self>, DateFilterError> {
        let Some(filter) = filter.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(None);
        };

        let filter = match filter {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            "custom" => {
                let (start, end) = parse_bounds("custom", start, end)?;
                Self::Custom { start, end }
            }
            "date-range" => {
                let (start, end) = parse_bounds("date-range", start, end)?;
                Self::DateRange { start, end }
            }
            other => return Err(DateFilterError::Unknown(other.to_string())),
        };

        Ok(Some(filter))
    }

    /// Resolve the filter into a concrete window around `today`.
    pub fn resolve(&self, today: NaiveDate, week_start: WeekStart) -> DateRange {
        match *self {
            Self::Daily => DateRange::days(today, today),
            Self::Weekly => {
                let offset = match week_start {
                    WeekStart::Sunday => today.weekday().num_days_from_sunday(),
                    WeekStart::Monday => today.weekday().num_days_from_monday(),
                };
                let first = today - Days::new(u64::from(offset));
                DateRange::days(first, first + Days::new(6))
            }
            Self::Monthly => {
                let first = today.with_day(1).unwrap_or(today);
                let last = first
                    .checked_add_months(chrono::Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(today);
                DateRange::days(first, last)
            }
            Self::Yearly => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
                DateRange::days(first, last)
            }
            Self::Custom { start, end } | Self::DateRange { start, end } => {
                DateRange::days(start, end)
            }
        }
    }
}

fn parse_bounds(
    filter: &'static str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), DateFilterError> {
    let non_blank = |value: Option<&str>| value.map(str::trim).filter(|value| !value.is_empty());

    let (Some(start), Some(end)) = (non_blank(start), non_blank(end)) else {
        return Err(DateFilterError::MissingBounds(filter));
    };

    let parse = |value: &str| {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map_err(|_| DateFilterError::InvalidDate(value.to_string()))
    };

    let (start, end) = (parse(start)?, parse(end)?);
    if start > end {
        return Err(DateFilterError::ReversedBounds);
    }

    Ok((start, end))
}

/// Aggregates shown above the report table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub overall_sales_count: usize,
    pub overall_order_amount: i64,
    pub overall_discount: i64,
}

impl SalesSummary {
    /// Add one order's totals.
    pub fn record(&mut self, total_amount: i64, coupon_discount: i64) {
        self.overall_sales_count += 1;
        self.overall_order_amount += total_amount;
        self.overall_discount += coupon_discount;
    }

    pub fn from_orders(orders: &[Order]) -> Self {
        let mut summary = Self::default();
        for order in orders {
            summary.record(order.total_amount, order.coupon_discount);
        }
        summary
    }
}

/// One order as exported by the sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportRow {
    pub date: String,
    pub order_id: String,
    pub customer_name: String,
    pub payment_method: String,
    pub coupon_code: String,
    pub status: String,
    pub discount: i64,
    pub item_quantity: i64,
    pub total_amount: i64,
}

impl From<&Order> for SalesReportRow {
    fn from(order: &Order) -> Self {
        Self {
            date: order.created_at.format(DATE_FORMAT).to_string(),
            order_id: order.order_id.clone(),
            customer_name: order
                .customer_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            payment_method: order.payment_type.clone(),
            coupon_code: order
                .coupon_code
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            status: order.payment_status.clone(),
            discount: order.coupon_discount,
            item_quantity: order.item_quantity(),
            total_amount: order.total_amount,
        }
    }
}

/// Full sales report for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    #[serde(flatten)]
    pub summary: SalesSummary,
    pub orders: Vec<SalesReportRow>,
}

impl SalesReport {
    pub fn from_orders(orders: &[Order]) -> Self {
        Self {
            summary: SalesSummary::from_orders(orders),
            orders: orders.iter().map(SalesReportRow::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn blank_filter_means_no_restriction() {
        assert_eq!(DateFilter::parse(None, None, None), Ok(None));
        assert_eq!(DateFilter::parse(Some("  "), None, None), Ok(None));
    }

    #[test]
    fn unknown_filter_is_rejected() {
        assert_eq!(
            DateFilter::parse(Some("hourly"), None, None),
            Err(DateFilterError::Unknown("hourly".to_string()))
        );
    }

    #[test]
    fn custom_requires_both_bounds() {
        assert_eq!(
            DateFilter::parse(Some("custom"), Some("2024-01-01"), None),
            Err(DateFilterError::MissingBounds("custom"))
        );
        assert_eq!(
            DateFilter::parse(Some("custom"), Some("2024-02-01"), Some("2024-01-01")),
            Err(DateFilterError::ReversedBounds)
        );
    }

    #[test]
    fn custom_covers_whole_days() {
        let filter = DateFilter::parse(Some("custom"), Some("2024-03-01"), Some("2024-03-02"))
            .expect("valid filter")
            .expect("filter present");

        let range = filter.resolve(date(2030, 1, 1), WeekStart::Monday);

        assert!(range.contains(date(2024, 3, 1).and_hms_opt(0, 0, 0).expect("time")));
        assert!(range.contains(date(2024, 3, 2).and_hms_opt(23, 59, 59).expect("time")));
        assert!(!range.contains(date(2024, 3, 3).and_hms_opt(0, 0, 0).expect("time")));
    }

    #[test]
    fn weekly_depends_on_week_start() {
        // 2024-05-15 is a Wednesday.
        let today = date(2024, 5, 15);

        let iso = DateFilter::Weekly.resolve(today, WeekStart::Monday);
        let calendar = DateFilter::Weekly.resolve(today, WeekStart::Sunday);

        assert_eq!(iso, DateRange::days(date(2024, 5, 13), date(2024, 5, 19)));
        assert_eq!(calendar, DateRange::days(date(2024, 5, 12), date(2024, 5, 18)));
    }

    #[test]
    fn weekly_on_sunday_differs_between_conventions() {
        let sunday = date(2024, 5, 19);

        let iso = DateFilter::Weekly.resolve(sunday, WeekStart::Monday);
        let calendar = DateFilter::Weekly.resolve(sunday, WeekStart::Sunday);

        assert_eq!(iso.start.date(), date(2024, 5, 13));
        assert_eq!(calendar.start.date(), sunday);
    }

    #[test]
    fn monthly_and_yearly_cover_full_periods() {
        let today = date(2024, 2, 10);

        assert_eq!(
            DateFilter::Monthly.resolve(today, WeekStart::Monday),
            DateRange::days(date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            DateFilter::Monthly.resolve(date(2024, 12, 5), WeekStart::Monday),
            DateRange::days(date(2024, 12, 1), date(2024, 12, 31))
        );
        assert_eq!(
            DateFilter::Yearly.resolve(today, WeekStart::Sunday),
            DateRange::days(date(2024, 1, 1), date(2024, 12, 31))
        );
        assert_eq!(
            DateFilter::Daily.resolve(today, WeekStart::Sunday),
            DateRange::days(today, today)
        );
    }
}
