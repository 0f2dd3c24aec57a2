use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde_json::json;
use tera::Tera;

use crate::forms::coupons::{AddCouponForm, EditCouponForm};
use crate::repository::DieselRepository;
use crate::routes::json_error;
use crate::services::ServiceError;
use crate::services::coupons::{
    CouponsQuery, create_coupon, get_coupon, load_coupons, modify_coupon, toggle_coupon,
};

#[get("/coupons")]
pub async fn show_coupons(
    params: web::Query<CouponsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_coupons(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "coupons", &server_config.auth_service_url);
            context.insert("coupons", &data.coupons);
            context.insert("search", &data.search);
            render_template(&tera, "coupons/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list coupons: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/coupons/add")]
pub async fn add_coupon(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCouponForm>,
) -> impl Responder {
    match create_coupon(repo.get_ref(), &user, form) {
        Ok(coupon) => {
            FlashMessage::success(format!("Coupon {} created.", coupon.code)).send();
            redirect("/coupons")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/coupons")
        }
        Err(ServiceError::Duplicate) => {
            FlashMessage::error("A coupon with this code already exists.").send();
            redirect("/coupons")
        }
        Err(err) => {
            log::error!("Failed to create coupon: {err}");
            FlashMessage::error("Failed to create the coupon.").send();
            redirect("/coupons")
        }
    }
}

#[get("/coupons/{coupon_id}")]
pub async fn show_coupon(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let coupon_id = path.into_inner();

    match get_coupon(repo.get_ref(), &user, coupon_id) {
        Ok(coupon) => HttpResponse::Ok().json(coupon),
        Err(err) => json_error(err, &format!("load coupon {coupon_id}")),
    }
}

#[post("/coupons/edit")]
pub async fn edit_coupon(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditCouponForm>,
) -> impl Responder {
    match modify_coupon(repo.get_ref(), &user, form) {
        Ok(coupon) => {
            FlashMessage::success(format!("Coupon {} updated.", coupon.code)).send();
            redirect("/coupons")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/coupons")
        }
        Err(ServiceError::Duplicate) => {
            FlashMessage::error("A coupon with this code already exists.").send();
            redirect("/coupons")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Coupon not found.").send();
            redirect("/coupons")
        }
        Err(err) => {
            log::error!("Failed to update coupon: {err}");
            FlashMessage::error("Failed to update the coupon.").send();
            redirect("/coupons")
        }
    }
}

#[post("/coupons/{coupon_id}/toggle")]
pub async fn toggle_coupon_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let coupon_id = path.into_inner();

    match toggle_coupon(repo.get_ref(), &user, coupon_id) {
        Ok(coupon) => HttpResponse::Ok().json(json!({
            "id": coupon.id,
            "status": coupon.status,
        })),
        Err(err) => json_error(err, &format!("toggle coupon {coupon_id}")),
    }
}
