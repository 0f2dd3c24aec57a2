use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::reports::ReportQuery;
use crate::repository::DieselRepository;
use crate::routes::{json_error, wants_json};
use crate::services::ServiceError;
use crate::services::reports::load_dashboard;

/// Dashboard page; answers with JSON when the client accepts it.
#[get("/")]
pub async fn show_index(
    req: HttpRequest,
    params: web::Query<ReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result = load_dashboard(repo.get_ref(), &user, &params);

    if wants_json(&req) {
        return match result {
            Ok(dashboard) => HttpResponse::Ok().json(dashboard),
            Err(err) => json_error(err, "load dashboard"),
        };
    }

    match result {
        Ok(dashboard) => {
            let mut context =
                base_context(&flash_messages, &user, "index", &server_config.auth_service_url);
            context.insert("summary", &dashboard.summary);
            context.insert("orders", &dashboard.orders);
            context.insert("pagination", &dashboard.pagination);
            context.insert("filter", &params.filter);
            context.insert("start_date", &params.start_date);
            context.insert("end_date", &params.end_date);
            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::InvalidFilter(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
