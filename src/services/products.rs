use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::{
    brand::{Brand, BrandListQuery},
    category::{Category, CategoryListQuery},
    pricing::plan_product_repriced,
    product::{Product, ProductListQuery},
};
use crate::forms::products::ProductForm;
use crate::repository::{
    BrandReader, CategoryReader, OfferReader, ProductReader, ProductWriter,
};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the products index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
    /// Whether deleted items should be included in the response.
    #[serde(default)]
    pub show_deleted: bool,
}

/// Data required to render the products index template.
pub struct ProductsPageData {
    /// Paginated list of products displayed in the table.
    pub products: Paginated<Product>,
    /// Listed categories offered by the product form.
    pub categories: Vec<Category>,
    /// Listed brands offered by the product form.
    pub brands: Vec<Brand>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
    pub show_deleted: bool,
}

/// Loads the products overview page.
pub fn load_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + CategoryReader + BrandReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ProductsQuery {
        search,
        page,
        show_deleted,
    } = query;

    let page = page.unwrap_or(1);
    let search = search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let mut list_query = ProductListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(search_term) = search.as_ref() {
        list_query = list_query.search(search_term);
    }
    if show_deleted {
        list_query = list_query.include_deleted();
    }

    let (total, items) = repo.list_products(list_query)?;
    let (_, categories) = repo.list_categories(CategoryListQuery::new(user.hub_id))?;
    let (_, brands) = repo.list_brands(BrandListQuery::new(user.hub_id))?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(ProductsPageData {
        products: Paginated::new(items, page, total_pages),
        categories,
        brands,
        search,
        show_deleted,
    })
}

/// Ensure the category and brand chosen on the form belong to the hub.
fn check_references<R>(repo: &R, hub_id: i32, form: &ProductForm) -> ServiceResult<()>
where
    R: CategoryReader + BrandReader + ?Sized,
{
    if repo.get_category_by_id(form.category_id, hub_id)?.is_none() {
        return Err(ServiceError::Form(format!(
            "unknown category {}",
            form.category_id
        )));
    }

    if let Some(brand_id) = form.brand_id
        && repo.get_brand_by_id(brand_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form(format!("unknown brand {brand_id}")));
    }

    Ok(())
}

/// Creates a new product with the already stored image paths.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProductForm,
    images: Vec<String>,
) -> ServiceResult<Product>
where
    R: ProductWriter + CategoryReader + BrandReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    check_references(repo, user.hub_id, &form)?;

    let new_product = form
        .into_new_product(user.hub_id, images)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&new_product).map_err(ServiceError::from)
}

/// Updates a product and keeps its applied offer and discounted price in line
/// with the new base price and category.
pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: ProductForm,
    uploaded: Vec<String>,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + CategoryReader + BrandReader + OfferReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let existing = repo
        .get_product_by_id(product_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    check_references(repo, user.hub_id, &form)?;

    let updates = form
        .into_update_product(&existing, &uploaded)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product = repo.update_product(product_id, user.hub_id, &updates)?;

    let applied = match product.offer_id {
        Some(offer_id) => repo.get_offer_by_id(offer_id, user.hub_id)?,
        None => None,
    };
    let newcomers = if product.category_id != existing.category_id {
        repo.list_active_category_offers(user.hub_id, product.category_id)?
    } else {
        Vec::new()
    };

    match plan_product_repriced(&product, applied.as_ref(), &newcomers) {
        Some(change) => {
            repo.apply_price_changes(user.hub_id, std::slice::from_ref(&change))?;
            log::info!("product {} repriced after edit", product.id);
            repo.get_product_by_id(product_id, user.hub_id)?
                .ok_or(ServiceError::NotFound)
        }
        None => Ok(product),
    }
}

/// Flips the deleted flag of a product and returns the updated record.
pub fn toggle_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let product = repo
        .get_product_by_id(product_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    repo.set_product_deleted(product_id, user.hub_id, !product.is_deleted)
        .map_err(ServiceError::from)
}
