use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde_json::json;
use tera::Tera;

use crate::config::AppConfig;
use crate::forms::products::{ProductForm, ProductUploadForm, store_images};
use crate::repository::DieselRepository;
use crate::routes::json_error;
use crate::services::{ServiceError, products};

#[get("/products")]
pub async fn show_products(
    params: web::Query<products::ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products::load_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            context.insert("products", &data.products);
            context.insert("categories", &data.categories);
            context.insert("brands", &data.brands);
            context.insert("search", &data.search);
            context.insert("show_deleted", &data.show_deleted);
            render_template(&tera, "products/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Split the multipart payload and copy the uploaded images into the upload directory.
fn receive_upload(
    upload: ProductUploadForm,
    config: &AppConfig,
) -> Result<(ProductForm, Vec<String>), String> {
    let (form, files) = upload.into_parts().map_err(|err| err.to_string())?;
    let images = store_images(files, &config.upload_dir).map_err(|err| {
        log::error!("Failed to store product images: {err}");
        "Failed to store the uploaded images.".to_string()
    })?;
    Ok((form, images))
}

#[post("/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<AppConfig>,
    MultipartForm(upload): MultipartForm<ProductUploadForm>,
) -> impl Responder {
    let (form, images) = match receive_upload(upload, &config) {
        Ok(parts) => parts,
        Err(message) => {
            FlashMessage::error(message).send();
            return redirect("/products");
        }
    };

    match products::create_product(repo.get_ref(), &user, form, images) {
        Ok(product) => {
            FlashMessage::success(format!("Product \"{}\" added.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            FlashMessage::error("Failed to create the product.").send();
            redirect("/products")
        }
    }
}

#[post("/products/{product_id}/edit")]
pub async fn edit_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<AppConfig>,
    MultipartForm(upload): MultipartForm<ProductUploadForm>,
) -> impl Responder {
    let product_id = path.into_inner();

    let (form, images) = match receive_upload(upload, &config) {
        Ok(parts) => parts,
        Err(message) => {
            FlashMessage::error(message).send();
            return redirect("/products");
        }
    };

    match products::update_product(repo.get_ref(), &user, product_id, form, images) {
        Ok(product) => {
            FlashMessage::success(format!("Product \"{}\" updated.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            FlashMessage::error("Failed to update the product.").send();
            redirect("/products")
        }
    }
}

#[post("/products/{product_id}/toggle")]
pub async fn toggle_product_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match products::toggle_product(repo.get_ref(), &user, product_id) {
        Ok(product) => HttpResponse::Ok().json(json!({
            "id": product.id,
            "is_deleted": product.is_deleted,
        })),
        Err(err) => json_error(err, &format!("toggle product {product_id}")),
    }
}
