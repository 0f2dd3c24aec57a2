use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::brand::{Brand, BrandListQuery};
use crate::forms::brands::{AddBrandForm, EditBrandForm};
use crate::repository::{BrandReader, BrandWriter};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Default, Deserialize)]
pub struct BrandsQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the brands index template.
pub struct BrandsPageData {
    pub brands: Paginated<Brand>,
    pub search: Option<String>,
}

pub fn load_brands<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: BrandsQuery,
) -> ServiceResult<BrandsPageData>
where
    R: BrandReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let mut list_query = BrandListQuery::new(user.hub_id)
        .include_deleted()
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, brands) = repo.list_brands(list_query)?;

    Ok(BrandsPageData {
        brands: Paginated::new(brands, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search,
    })
}

/// Creates a brand. Names are unique per hub regardless of case.
pub fn create_brand<R>(repo: &R, user: &AuthenticatedUser, form: AddBrandForm) -> ServiceResult<Brand>
where
    R: BrandReader + BrandWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_brand = form
        .into_new_brand(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo.get_brand_by_name(&new_brand.name, user.hub_id)?.is_some() {
        return Err(ServiceError::Duplicate);
    }

    let brand = repo.create_brand(&new_brand)?;
    log::info!("brand {} created in hub {}", brand.id, brand.hub_id);
    Ok(brand)
}

pub fn modify_brand<R>(repo: &R, user: &AuthenticatedUser, form: EditBrandForm) -> ServiceResult<Brand>
where
    R: BrandReader + BrandWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_update_brand()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo.get_brand_by_id(payload.brand_id, user.hub_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    match repo.get_brand_by_name(&payload.update.name, user.hub_id)? {
        Some(other) if other.id != payload.brand_id => Err(ServiceError::Duplicate),
        _ => repo
            .update_brand(payload.brand_id, user.hub_id, &payload.update)
            .map_err(ServiceError::from),
    }
}

/// Lists or unlists a brand.
pub fn toggle_brand<R>(repo: &R, user: &AuthenticatedUser, brand_id: i32) -> ServiceResult<Brand>
where
    R: BrandReader + BrandWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let brand = repo
        .get_brand_by_id(brand_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    repo.set_brand_deleted(brand.id, user.hub_id, !brand.is_deleted)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockCatalogRepo;
    use crate::services::test_support::{admin, fixed_datetime};

    fn brand(id: i32, name: &str, is_deleted: bool) -> Brand {
        Brand {
            id,
            hub_id: 1,
            name: name.to_string(),
            description: None,
            is_deleted,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn load_brands_trims_search_and_starts_on_first_page() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_list_brands()
            .withf(|query| {
                query.include_deleted
                    && query.search.as_deref() == Some("sei")
                    && query.pagination.as_ref().is_some_and(|p| p.page == 1)
            })
            .returning(|_| Ok((1, vec![brand(1, "Seiko", false)])));

        let data = load_brands(
            &repo,
            &admin(),
            BrandsQuery {
                search: Some(" sei ".to_string()),
                page: None,
            },
        )
        .expect("page data");

        assert_eq!(data.search.as_deref(), Some("sei"));
    }

    #[test]
    fn create_brand_persists_unique_name() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_brand_by_name().returning(|_, _| Ok(None));
        repo.expect_create_brand()
            .times(1)
            .returning(|new_brand| Ok(brand(4, &new_brand.name, new_brand.is_deleted)));

        let form = AddBrandForm {
            name: "Casio".to_string(),
            description: None,
            is_deleted: false,
        };

        let created = create_brand(&repo, &admin(), form).expect("brand created");

        assert_eq!(created.name, "Casio");
    }

    #[test]
    fn create_brand_rejects_duplicate() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_brand_by_name()
            .returning(|_, _| Ok(Some(brand(1, "CASIO", false))));
        repo.expect_create_brand().never();

        let form = AddBrandForm {
            name: "casio".to_string(),
            description: None,
            is_deleted: false,
        };

        assert!(matches!(
            create_brand(&repo, &admin(), form),
            Err(ServiceError::Duplicate)
        ));
    }

    #[test]
    fn toggle_brand_relists_unlisted_brand() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_brand_by_id()
            .returning(|id, _| Ok(Some(brand(id, "Orient", true))));
        repo.expect_set_brand_deleted()
            .withf(|_, _, is_deleted| !*is_deleted)
            .returning(|id, _, is_deleted| Ok(brand(id, "Orient", is_deleted)));

        let toggled = toggle_brand(&repo, &admin(), 7).expect("toggled");

        assert!(!toggled.is_deleted);
    }

    #[test]
    fn toggle_missing_brand_is_not_found() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_brand_by_id().returning(|_, _| Ok(None));

        assert!(matches!(
            toggle_brand(&repo, &admin(), 7),
            Err(ServiceError::NotFound)
        ));
    }
}
