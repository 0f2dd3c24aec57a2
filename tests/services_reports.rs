use chrono::NaiveDate;
use pushkind_common::domain::auth::AuthenticatedUser;
use storefront_admin::domain::customer::NewCustomer;
use storefront_admin::domain::order::{NewOrder, NewOrderItem};
use storefront_admin::forms::reports::ReportQuery;
use storefront_admin::repository::{CustomerWriter, DieselRepository, OrderWriter};
use storefront_admin::services::reports;
use storefront_admin::{SERVICE_ACCESS_ROLE, services::ServiceError};

mod common;

fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "admin".into(),
        email: "admin@example.com".into(),
        hub_id: 1,
        name: "Admin".into(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        exp: 0,
    }
}

fn seed_orders(repo: &DieselRepository) {
    let dana = repo
        .create_customer(&NewCustomer::new(1, "Dana", "dana@example.com"))
        .unwrap();

    let at = |y, m, d| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    };

    repo.create_order(
        &NewOrder::new(1, "ORD-100", dana.id, 1200)
            .with_coupon("MARCH", 200)
            .with_item(NewOrderItem::new("Diver", 700, 2))
            .created_at(at(2025, 3, 5)),
    )
    .unwrap();
    repo.create_order(
        &NewOrder::new(1, "ORD-101", dana.id, 800)
            .with_item(NewOrderItem::new("Pilot", 800, 1))
            .created_at(at(2025, 3, 20)),
    )
    .unwrap();
    repo.create_order(
        &NewOrder::new(1, "ORD-102", dana.id, 500)
            .with_item(NewOrderItem::new("Strap", 250, 2))
            .created_at(at(2025, 5, 1)),
    )
    .unwrap();
}

fn march(format: Option<&str>) -> ReportQuery {
    ReportQuery {
        filter: Some("custom".to_string()),
        start_date: Some("2025-03-01".to_string()),
        end_date: Some("2025-03-31".to_string()),
        format: format.map(str::to_string),
        ..ReportQuery::default()
    }
}

#[test]
fn sales_report_totals_the_selected_period() {
    let test_db = common::TestDb::new("service_reports_selected_period.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_orders(&repo);

    let report = reports::sales_report(&repo, &admin(), &march(None)).unwrap();
    assert_eq!(report.summary.overall_sales_count, 2);
    assert_eq!(report.summary.overall_order_amount, 2000);
    assert_eq!(report.summary.overall_discount, 200);

    let first = report
        .orders
        .iter()
        .find(|row| row.order_id == "ORD-100")
        .expect("march order present");
    assert_eq!(first.customer_name, "Dana");
    assert_eq!(first.coupon_code, "MARCH");
    assert_eq!(first.item_quantity, 2);

    let everything = reports::sales_report(&repo, &admin(), &ReportQuery::default()).unwrap();
    assert_eq!(everything.summary.overall_sales_count, 3);
}

#[test]
fn dashboard_paginates_orders_but_not_the_summary() {
    let test_db = common::TestDb::new("service_reports_dashboard_pagination.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_orders(&repo);

    let query = ReportQuery {
        page: Some(2),
        per_page: Some(2),
        ..ReportQuery::default()
    };

    let dashboard = reports::load_dashboard(&repo, &admin(), &query).unwrap();
    assert_eq!(dashboard.summary.overall_sales_count, 3);
    assert_eq!(dashboard.summary.overall_order_amount, 2500);
    assert_eq!(dashboard.orders.len(), 1);
    assert_eq!(dashboard.orders[0].order_id, "ORD-100");
    assert_eq!(dashboard.pagination.total_pages, 2);
    assert!(dashboard.pagination.has_prev_page);
    assert!(!dashboard.pagination.has_next_page);
}

#[test]
fn export_renders_csv_for_excel_downloads() {
    let test_db = common::TestDb::new("service_reports_export_csv.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_orders(&repo);
    let fonts = tempfile::tempdir().unwrap();

    let exported =
        reports::export_sales_report(&repo, &admin(), &march(Some("excel")), fonts.path())
            .unwrap();
    assert_eq!(exported.file_name, "sales-report-2025-03-01-2025-03-31.csv");
    assert_eq!(exported.content_type, "text/csv; charset=utf-8");

    let body = String::from_utf8(exported.bytes).unwrap();
    assert!(body.starts_with("Date,Order ID,Customer,Total Amount\n"));
    assert!(body.contains("2025-03-05,ORD-100,Dana,1200"));
    assert!(!body.contains("ORD-102"));
}

#[test]
fn export_rejects_missing_filter_format_and_empty_period() {
    let test_db = common::TestDb::new("service_reports_export_rejects.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_orders(&repo);
    let fonts = tempfile::tempdir().unwrap();

    let unfiltered = ReportQuery {
        format: Some("excel".to_string()),
        ..ReportQuery::default()
    };
    assert!(matches!(
        reports::export_sales_report(&repo, &admin(), &unfiltered, fonts.path()),
        Err(ServiceError::InvalidFilter(_))
    ));

    assert!(matches!(
        reports::export_sales_report(&repo, &admin(), &march(Some("docx")), fonts.path()),
        Err(ServiceError::InvalidFormat(format)) if format == "docx"
    ));

    let empty = ReportQuery {
        filter: Some("custom".to_string()),
        start_date: Some("2024-01-01".to_string()),
        end_date: Some("2024-01-31".to_string()),
        format: Some("excel".to_string()),
        ..ReportQuery::default()
    };
    assert!(matches!(
        reports::export_sales_report(&repo, &admin(), &empty, fonts.path()),
        Err(ServiceError::NotFound)
    ));

    // No font files in the directory.
    assert!(matches!(
        reports::export_sales_report(&repo, &admin(), &march(Some("pdf")), fonts.path()),
        Err(ServiceError::Internal(_))
    ));
}
