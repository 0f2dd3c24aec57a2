use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::category::{Category, CategoryListQuery};
use crate::forms::categories::{AddCategoryForm, EditCategoryForm};
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the categories index page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the categories index template.
pub struct CategoriesPageData {
    pub categories: Paginated<Category>,
    pub search: Option<String>,
}

/// Loads the categories overview page, unlisted categories included.
pub fn load_categories<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CategoriesQuery,
) -> ServiceResult<CategoriesPageData>
where
    R: CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let mut list_query = CategoryListQuery::new(user.hub_id)
        .include_deleted()
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, items) = repo.list_categories(list_query)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(CategoriesPageData {
        categories: Paginated::new(items, page, total_pages),
        search,
    })
}

/// Creates a new category, rejecting names already used in the hub.
pub fn create_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_category = form
        .into_new_category(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_category_by_name(&new_category.name, user.hub_id)?
        .is_some()
    {
        return Err(ServiceError::Duplicate);
    }

    repo.create_category(&new_category)
        .map_err(ServiceError::from)
}

/// Updates an existing category.
pub fn modify_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditCategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_update_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.get_category_by_id(payload.category_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    if let Some(existing) = repo.get_category_by_name(&payload.update.name, user.hub_id)?
        && existing.id != payload.category_id
    {
        return Err(ServiceError::Duplicate);
    }

    repo.update_category(payload.category_id, user.hub_id, &payload.update)
        .map_err(ServiceError::from)
}

/// Flips the listing status of a category and returns the updated record.
pub fn toggle_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let category = repo
        .get_category_by_id(category_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    repo.set_category_deleted(category_id, user.hub_id, !category.is_deleted)
        .map_err(ServiceError::from)
}
