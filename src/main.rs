use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{logout, not_assigned};
use tera::Tera;

use storefront_admin::config::AppConfig;
use storefront_admin::repository::DieselRepository;
use storefront_admin::routes::brands::{add_brand, edit_brand, show_brands, toggle_brand_status};
use storefront_admin::routes::categories::{
    add_category, edit_category, show_categories, toggle_category_status,
};
use storefront_admin::routes::coupons::{
    add_coupon, edit_coupon, show_coupon, show_coupons, toggle_coupon_status,
};
use storefront_admin::routes::customers::{block, show_customers, unblock};
use storefront_admin::routes::main::show_index;
use storefront_admin::routes::offers::{
    add_offer, show_offer, show_offers, toggle_offer_status, update_offer,
};
use storefront_admin::routes::orders::{show_orders, update_order_status};
use storefront_admin::routes::products::{
    add_product, edit_product, show_products, toggle_product_status,
};
use storefront_admin::routes::reports::{download_sales_report, show_sales_report};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &config.secret {
        Some(key) => Key::from(key.as_bytes()),
        None => Key::generate(),
    };

    let common_config = CommonServerConfig {
        secret: config.secret.clone().unwrap_or_default(),
        auth_service_url: config.auth_service_url.clone(),
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    if let Err(e) = std::fs::create_dir_all(&config.upload_dir) {
        log::error!(
            "Failed to create upload directory {}: {e}",
            config.upload_dir.display()
        );
        std::process::exit(1);
    }

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let address = config.address.clone();
    let port = config.port;
    let domain = config.domain.clone();
    let upload_dir = config.upload_dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new("/uploads", upload_dir.clone()))
            .service(not_assigned)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(show_categories)
                    .service(add_category)
                    .service(edit_category)
                    .service(toggle_category_status)
                    .service(show_brands)
                    .service(add_brand)
                    .service(edit_brand)
                    .service(toggle_brand_status)
                    .service(show_products)
                    .service(add_product)
                    .service(edit_product)
                    .service(toggle_product_status)
                    .service(show_orders)
                    .service(update_order_status)
                    .service(show_offers)
                    .service(add_offer)
                    .service(show_offer)
                    .service(update_offer)
                    .service(toggle_offer_status)
                    .service(show_coupons)
                    .service(add_coupon)
                    .service(show_coupon)
                    .service(edit_coupon)
                    .service(toggle_coupon_status)
                    .service(show_customers)
                    .service(block)
                    .service(unblock)
                    .service(show_sales_report)
                    .service(download_sales_report)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
