use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::customers::{
    CustomersQuery, block_customer, load_customers, unblock_customer,
};

#[get("/customers")]
pub async fn show_customers(
    params: web::Query<CustomersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_customers(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "customers",
                &server_config.auth_service_url,
            );
            context.insert("customers", &data.customers);
            context.insert("search", &data.search);
            render_template(&tera, "customers/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list customers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/customers/{customer_id}/block")]
pub async fn block(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let customer_id = path.into_inner();

    match block_customer(repo.get_ref(), &user, customer_id) {
        Ok(customer) => {
            FlashMessage::success(format!("{} is blocked.", customer.name)).send();
            redirect("/customers")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Customer not found.").send();
            redirect("/customers")
        }
        Err(err) => {
            log::error!("Failed to block customer {customer_id}: {err}");
            FlashMessage::error("Failed to block the customer.").send();
            redirect("/customers")
        }
    }
}

#[post("/customers/{customer_id}/unblock")]
pub async fn unblock(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let customer_id = path.into_inner();

    match unblock_customer(repo.get_ref(), &user, customer_id) {
        Ok(customer) => {
            FlashMessage::success(format!("{} is unblocked.", customer.name)).send();
            redirect("/customers")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Customer not found.").send();
            redirect("/customers")
        }
        Err(err) => {
            log::error!("Failed to unblock customer {customer_id}: {err}");
            FlashMessage::error("Failed to unblock the customer.").send();
            redirect("/customers")
        }
    }
}
