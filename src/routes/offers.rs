use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde_json::json;
use tera::Tera;

use crate::forms::offers::OfferForm;
use crate::repository::DieselRepository;
use crate::routes::json_error;
use crate::services::ServiceError;
use crate::services::offers::{
    OffersQuery, create_offer, edit_offer, get_offer, load_offers, toggle_offer,
};

#[get("/offers")]
pub async fn show_offers(
    params: web::Query<OffersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_offers(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "offers", &server_config.auth_service_url);
            context.insert("offers", &data.offers);
            context.insert("products", &data.products);
            context.insert("categories", &data.categories);
            context.insert("search", &data.search);
            render_template(&tera, "offers/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list offers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Creates an offer from the urlencoded form; `references` may repeat.
#[post("/offers/add")]
pub async fn add_offer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form = match OfferForm::from_body(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/offers");
        }
    };

    match create_offer(repo.get_ref(), &user, form) {
        Ok(outcome) => {
            FlashMessage::success(format!(
                "Offer \"{}\" created, {} products repriced.",
                outcome.offer.name, outcome.repriced
            ))
            .send();
            redirect("/offers")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/offers")
        }
        Err(err) => {
            log::error!("Failed to create offer: {err}");
            FlashMessage::error("Failed to create the offer.").send();
            redirect("/offers")
        }
    }
}

#[get("/offers/{offer_id}")]
pub async fn show_offer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let offer_id = path.into_inner();

    match get_offer(repo.get_ref(), &user, offer_id) {
        Ok(details) => HttpResponse::Ok().json(details),
        Err(err) => json_error(err, &format!("load offer {offer_id}")),
    }
}

#[post("/offers/{offer_id}/edit")]
pub async fn update_offer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let offer_id = path.into_inner();

    let form = match OfferForm::from_body(&body) {
        Ok(form) => form,
        Err(err) => return json_error(ServiceError::Form(err.to_string()), "decode offer form"),
    };

    match edit_offer(repo.get_ref(), &user, offer_id, form) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(err) => json_error(err, &format!("edit offer {offer_id}")),
    }
}

#[post("/offers/{offer_id}/toggle")]
pub async fn toggle_offer_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let offer_id = path.into_inner();

    match toggle_offer(repo.get_ref(), &user, offer_id) {
        Ok(outcome) => HttpResponse::Ok().json(json!({
            "id": outcome.offer.id,
            "status": outcome.offer.status,
            "repriced": outcome.repriced,
        })),
        Err(err) => json_error(err, &format!("toggle offer {offer_id}")),
    }
}
