use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::orders::UpdateItemStatusForm;
use crate::repository::DieselRepository;
use crate::routes::json_error;
use crate::services::orders::{OrdersQuery, load_orders, update_item_status};
use crate::services::ServiceError;

#[get("/orders")]
pub async fn show_orders(
    params: web::Query<OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "orders", &server_config.auth_service_url);
            context.insert("orders", &data.orders);
            context.insert("search", &data.search);
            context.insert("statuses", &data.statuses);
            render_template(&tera, "orders/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Moves one order item to a new status and returns the updated order.
#[post("/orders/update-status")]
pub async fn update_order_status(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<UpdateItemStatusForm>,
) -> impl Responder {
    match update_item_status(repo.get_ref(), &user, payload.into_inner()) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => json_error(err, "update order item status"),
    }
}
