use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::coupon::{Coupon, CouponListQuery};
use crate::forms::coupons::{AddCouponForm, EditCouponForm};
use crate::repository::{CouponReader, CouponWriter};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Default, Deserialize)]
pub struct CouponsQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub struct CouponsPageData {
    pub coupons: Paginated<Coupon>,
    pub search: Option<String>,
}

pub fn load_coupons<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CouponsQuery,
) -> ServiceResult<CouponsPageData>
where
    R: CouponReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let mut list_query = CouponListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, coupons) = repo.list_coupons(list_query)?;

    Ok(CouponsPageData {
        coupons: Paginated::new(coupons, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search,
    })
}

pub fn get_coupon<R>(repo: &R, user: &AuthenticatedUser, coupon_id: i32) -> ServiceResult<Coupon>
where
    R: CouponReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_coupon_by_id(coupon_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)
}

/// Creates an active coupon. Codes are unique per hub regardless of case.
pub fn create_coupon<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCouponForm,
) -> ServiceResult<Coupon>
where
    R: CouponReader + CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_coupon = form
        .into_new_coupon(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_coupon_by_code(&new_coupon.code, user.hub_id)?
        .is_some()
    {
        return Err(ServiceError::Duplicate);
    }

    repo.create_coupon(&new_coupon).map_err(ServiceError::from)
}

pub fn modify_coupon<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditCouponForm,
) -> ServiceResult<Coupon>
where
    R: CouponReader + CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_update_coupon(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.get_coupon_by_id(payload.coupon_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    if let Some(existing) = repo.get_coupon_by_code(&payload.update.code, user.hub_id)?
        && existing.id != payload.coupon_id
    {
        return Err(ServiceError::Duplicate);
    }

    repo.update_coupon(payload.coupon_id, user.hub_id, &payload.update)
        .map_err(ServiceError::from)
}

/// Switches a coupon between active and inactive.
pub fn toggle_coupon<R>(
    repo: &R,
    user: &AuthenticatedUser,
    coupon_id: i32,
) -> ServiceResult<Coupon>
where
    R: CouponReader + CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let coupon = repo
        .get_coupon_by_id(coupon_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    repo.set_coupon_status(coupon_id, user.hub_id, coupon.status.toggled())
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::offer::ActivityStatus;
    use crate::repository::mock::MockCouponRepo;
    use crate::services::test_support::{admin, fixed_datetime};

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 12, 31).unwrap_or_default()
    }

    fn coupon(id: i32, code: &str) -> Coupon {
        Coupon {
            id,
            hub_id: 1,
            code: code.to_string(),
            description: None,
            discount: 15.0,
            min_amount: 0,
            max_discount: 500,
            expiry_date: expiry(),
            status: ActivityStatus::Active,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn add_form(code: &str) -> AddCouponForm {
        AddCouponForm {
            code: code.to_string(),
            description: None,
            discount: 15.0,
            min_amount: 0,
            max_discount: 500,
            expiry_date: expiry(),
        }
    }

    #[test]
    fn create_coupon_looks_up_normalised_code() {
        let mut repo = MockCouponRepo::new();
        repo.expect_get_coupon_by_code()
            .withf(|code, _| code == "WELCOME10")
            .returning(|_, _| Ok(None));
        repo.expect_create_coupon()
            .returning(|new_coupon| Ok(coupon(1, &new_coupon.code)));

        let created = create_coupon(&repo, &admin(), add_form("welcome 10")).expect("created");

        assert_eq!(created.code, "WELCOME10");
    }

    #[test]
    fn create_coupon_rejects_existing_code() {
        let mut repo = MockCouponRepo::new();
        repo.expect_get_coupon_by_code()
            .returning(|_, _| Ok(Some(coupon(3, "WELCOME10"))));
        repo.expect_create_coupon().never();

        assert!(matches!(
            create_coupon(&repo, &admin(), add_form("Welcome10")),
            Err(ServiceError::Duplicate)
        ));
    }

    #[test]
    fn modify_coupon_rejects_code_of_other_coupon() {
        let mut repo = MockCouponRepo::new();
        repo.expect_get_coupon_by_id()
            .returning(|id, _| Ok(Some(coupon(id, "SPRING"))));
        repo.expect_get_coupon_by_code()
            .returning(|_, _| Ok(Some(coupon(8, "SUMMER"))));
        repo.expect_update_coupon().never();

        let form = EditCouponForm {
            coupon_id: 2,
            code: "summer".to_string(),
            description: None,
            discount: 5.0,
            min_amount: 0,
            max_discount: 0,
            expiry_date: expiry(),
        };

        assert!(matches!(
            modify_coupon(&repo, &admin(), form),
            Err(ServiceError::Duplicate)
        ));
    }

    #[test]
    fn toggle_coupon_deactivates_active_coupon() {
        let mut repo = MockCouponRepo::new();
        repo.expect_get_coupon_by_id()
            .returning(|id, _| Ok(Some(coupon(id, "SPRING"))));
        repo.expect_set_coupon_status()
            .withf(|_, _, status| *status == ActivityStatus::Inactive)
            .returning(|id, _, status| {
                let mut toggled = coupon(id, "SPRING");
                toggled.status = status;
                Ok(toggled)
            });

        let toggled = toggle_coupon(&repo, &admin(), 2).expect("toggled");

        assert_eq!(toggled.status, ActivityStatus::Inactive);
    }

    #[test]
    fn get_missing_coupon_is_not_found() {
        let mut repo = MockCouponRepo::new();
        repo.expect_get_coupon_by_id().returning(|_, _| Ok(None));

        assert!(matches!(
            get_coupon(&repo, &admin(), 1),
            Err(ServiceError::NotFound)
        ));
    }
}
