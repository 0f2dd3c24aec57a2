use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde_json::json;
use tera::Tera;

use crate::forms::brands::{AddBrandForm, EditBrandForm};
use crate::repository::DieselRepository;
use crate::routes::json_error;
use crate::services::ServiceError;
use crate::services::brands::{
    BrandsQuery, create_brand, load_brands, modify_brand, toggle_brand,
};

#[get("/brands")]
pub async fn show_brands(
    params: web::Query<BrandsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_brands(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "brands",
                &server_config.auth_service_url,
            );
            context.insert("brands", &data.brands);
            context.insert("search", &data.search);
            render_template(&tera, "brands/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list brands: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/brands/add")]
pub async fn add_brand(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddBrandForm>,
) -> impl Responder {
    match create_brand(repo.get_ref(), &user, form.into_inner()) {
        Ok(brand) => {
            FlashMessage::success(format!("Brand \"{}\" added.", brand.name)).send();
            redirect("/brands")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/brands")
        }
        Err(ServiceError::Duplicate) => {
            FlashMessage::error("A brand with this name already exists.").send();
            redirect("/brands")
        }
        Err(err) => {
            log::error!("Failed to create brand: {err}");
            FlashMessage::error("Failed to create the brand.").send();
            redirect("/brands")
        }
    }
}

#[post("/brands/edit")]
pub async fn edit_brand(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EditBrandForm>,
) -> impl Responder {
    match modify_brand(repo.get_ref(), &user, form.into_inner()) {
        Ok(brand) => {
            FlashMessage::success(format!("Brand \"{}\" updated.", brand.name)).send();
            redirect("/brands")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/brands")
        }
        Err(ServiceError::Duplicate) => {
            FlashMessage::error("A brand with this name already exists.").send();
            redirect("/brands")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Brand not found.").send();
            redirect("/brands")
        }
        Err(err) => {
            log::error!("Failed to change brand: {err}");
            FlashMessage::error("Failed to update the brand.").send();
            redirect("/brands")
        }
    }
}

#[post("/brands/{brand_id}/toggle")]
pub async fn toggle_brand_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let brand_id = path.into_inner();

    match toggle_brand(repo.get_ref(), &user, brand_id) {
        Ok(brand) => HttpResponse::Ok().json(json!({
            "id": brand.id,
            "is_deleted": brand.is_deleted,
        })),
        Err(err) => json_error(err, &format!("toggle brand {brand_id}")),
    }
}
