use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::config::AppConfig;
use crate::forms::reports::ReportQuery;
use crate::repository::DieselRepository;
use crate::routes::json_error;
use crate::services::reports::{export_sales_report, sales_report};

#[get("/sales-report")]
pub async fn show_sales_report(
    params: web::Query<ReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match sales_report(repo.get_ref(), &user, &params) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(err) => json_error(err, "build sales report"),
    }
}

/// Streams the sales report as `pdf` or `excel` (CSV) for the selected period.
#[get("/sales-report/download")]
pub async fn download_sales_report(
    params: web::Query<ReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    match export_sales_report(repo.get_ref(), &user, &params, &config.fonts_dir) {
        Ok(exported) => HttpResponse::Ok()
            .content_type(exported.content_type)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(exported.file_name)],
            })
            .body(exported.bytes),
        Err(err) => json_error(err, "export sales report"),
    }
}
