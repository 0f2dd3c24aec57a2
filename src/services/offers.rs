//! Offer management and propagation of offer discounts onto product prices.
//!
//! Every mutation writes the offer row first and then hands the products it
//! touches to the pure planners in [`crate::domain::pricing`]; the resulting
//! plan is persisted as one batch.

use std::collections::{BTreeSet, HashMap};

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::{
    category::CategoryListQuery,
    offer::{NamedRef, Offer, OfferDetails, OfferListQuery},
    pricing::{PriceChange, plan_offer_applied, plan_offer_deactivated, plan_offer_edited},
    product::{Product, ProductListQuery},
};
use crate::forms::offers::OfferForm;
use crate::repository::{
    CategoryReader, OfferReader, OfferWriter, ProductReader, ProductWriter,
};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Default, Deserialize)]
pub struct OffersQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the offers index template.
pub struct OffersPageData {
    pub offers: Paginated<OfferDetails>,
    /// Listed products selectable as offer references.
    pub products: Vec<NamedRef>,
    /// Listed categories selectable as offer references.
    pub categories: Vec<NamedRef>,
    pub search: Option<String>,
}

/// Offer after a mutation together with the number of repriced products.
#[derive(Debug, Serialize)]
pub struct OfferOutcome {
    pub offer: Offer,
    pub repriced: usize,
}

struct ReferenceNames {
    products: HashMap<i32, String>,
    categories: HashMap<i32, String>,
}

impl ReferenceNames {
    fn load<R>(repo: &R, hub_id: i32) -> ServiceResult<Self>
    where
        R: ProductReader + CategoryReader + ?Sized,
    {
        let (_, products) = repo.list_products(ProductListQuery::new(hub_id))?;
        let (_, categories) = repo.list_categories(CategoryListQuery::new(hub_id))?;

        Ok(Self {
            products: products
                .into_iter()
                .filter(|product| product.is_listed)
                .map(|product| (product.id, product.name))
                .collect(),
            categories: categories
                .into_iter()
                .map(|category| (category.id, category.name))
                .collect(),
        })
    }

    fn describe(&self, offer: Offer) -> OfferDetails {
        OfferDetails::resolve(offer, &self.products, &self.categories)
    }

    fn selectable(names: &HashMap<i32, String>) -> Vec<NamedRef> {
        let mut refs: Vec<NamedRef> = names
            .iter()
            .map(|(id, name)| NamedRef {
                id: *id,
                name: name.clone(),
            })
            .collect();
        refs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        refs
    }
}

/// Loads the offers overview with the references available to the offer form.
pub fn load_offers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OffersQuery,
) -> ServiceResult<OffersPageData>
where
    R: OfferReader + ProductReader + CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let mut list_query = OfferListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, offers) = repo.list_offers(list_query)?;
    let names = ReferenceNames::load(repo, user.hub_id)?;

    let offers = offers
        .into_iter()
        .map(|offer| names.describe(offer))
        .collect();

    Ok(OffersPageData {
        offers: Paginated::new(offers, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        products: ReferenceNames::selectable(&names.products),
        categories: ReferenceNames::selectable(&names.categories),
        search,
    })
}

/// Returns a single offer with its references resolved to names.
pub fn get_offer<R>(repo: &R, user: &AuthenticatedUser, offer_id: i32) -> ServiceResult<OfferDetails>
where
    R: OfferReader + ProductReader + CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let offer = repo
        .get_offer_by_id(offer_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(ReferenceNames::load(repo, user.hub_id)?.describe(offer))
}

/// Offers currently applied to `products`, other than `candidate`, keyed by id.
fn current_offers<R>(
    repo: &R,
    hub_id: i32,
    candidate: &Offer,
    products: &[Product],
) -> ServiceResult<HashMap<i32, Offer>>
where
    R: OfferReader + ?Sized,
{
    let ids: Vec<i32> = products
        .iter()
        .filter_map(|product| product.offer_id)
        .filter(|offer_id| *offer_id != candidate.id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(repo
        .get_offers_by_ids(hub_id, &ids)?
        .into_iter()
        .map(|offer| (offer.id, offer))
        .collect())
}

fn propagate<R>(repo: &R, offer: &Offer, changes: &[PriceChange]) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    if changes.is_empty() {
        return Ok(0);
    }

    let written = repo.apply_price_changes(offer.hub_id, changes)?;
    log::info!("offer {} repriced {} products", offer.id, written);
    Ok(written)
}

/// Plan for `offer` becoming applicable to every product in its scope.
fn plan_scope<R>(repo: &R, offer: &Offer) -> ServiceResult<Vec<PriceChange>>
where
    R: ProductReader + OfferReader + ?Sized,
{
    let in_scope = repo.list_products_in_scope(offer.hub_id, &offer.scope)?;
    let current = current_offers(repo, offer.hub_id, offer, &in_scope)?;
    Ok(plan_offer_applied(offer, &in_scope, &current))
}

/// Creates an active offer and assigns it to every product where it is the best deal.
pub fn create_offer<R>(repo: &R, user: &AuthenticatedUser, form: OfferForm) -> ServiceResult<OfferOutcome>
where
    R: OfferReader + OfferWriter + ProductReader + ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_offer = form
        .into_new_offer(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let offer = repo.create_offer(&new_offer)?;
    let changes = plan_scope(repo, &offer)?;
    let repriced = propagate(repo, &offer, &changes)?;

    Ok(OfferOutcome { offer, repriced })
}

/// Updates an offer, clearing products that left its scope and repricing the rest.
pub fn edit_offer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    offer_id: i32,
    form: OfferForm,
) -> ServiceResult<OfferOutcome>
where
    R: OfferReader + OfferWriter + ProductReader + ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = form
        .into_update_offer()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.get_offer_by_id(offer_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let carrying = repo.list_products_by_offer(user.hub_id, offer_id)?;
    let offer = repo.update_offer(offer_id, user.hub_id, &updates)?;

    let in_scope = repo.list_products_in_scope(user.hub_id, &offer.scope)?;
    let current = current_offers(repo, user.hub_id, &offer, &in_scope)?;
    let changes = plan_offer_edited(&offer, &carrying, &in_scope, &current);
    let repriced = propagate(repo, &offer, &changes)?;

    Ok(OfferOutcome { offer, repriced })
}

/// Switches an offer between active and inactive.
///
/// Deactivation reverts every carrying product to its base price; activation
/// applies the offer wherever it beats the current one.
pub fn toggle_offer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    offer_id: i32,
) -> ServiceResult<OfferOutcome>
where
    R: OfferReader + OfferWriter + ProductReader + ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let existing = repo
        .get_offer_by_id(offer_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let offer = repo.set_offer_status(offer_id, user.hub_id, existing.status.toggled())?;

    let changes = if offer.is_active() {
        plan_scope(repo, &offer)?
    } else {
        let carrying = repo.list_products_by_offer(user.hub_id, offer_id)?;
        plan_offer_deactivated(&offer, &carrying)
    };
    let repriced = propagate(repo, &offer, &changes)?;

    Ok(OfferOutcome { offer, repriced })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::offer::{ActivityStatus, OfferScope};
    use crate::domain::product::ProductAttributes;
    use crate::repository::mock::MockCatalogRepo;
    use crate::services::test_support::{admin, fixed_datetime, user_with_roles};

    fn offer(id: i32, discount: f64, scope: OfferScope) -> Offer {
        Offer {
            id,
            hub_id: 1,
            name: format!("Offer {id}"),
            discount,
            expire_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap_or_default(),
            status: ActivityStatus::Active,
            scope,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn product(id: i32, category_id: i32, price: i64, carried: Option<(i32, i64)>) -> Product {
        Product {
            id,
            hub_id: 1,
            name: format!("Watch {id}"),
            description: None,
            category_id,
            brand_id: None,
            price,
            stock_quantity: 1,
            attributes: ProductAttributes::default(),
            images: Vec::new(),
            is_listed: true,
            is_deleted: false,
            offer_id: carried.map(|(offer_id, _)| offer_id),
            discounted_price: carried.map(|(_, price)| price),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn form(discount: f64, offer_type: &str, references: Vec<i32>) -> OfferForm {
        OfferForm {
            name: "Spring".to_string(),
            discount,
            expire_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap_or_default(),
            offer_type: offer_type.to_string(),
            references,
        }
    }

    #[test]
    fn create_offer_requires_role() {
        let repo = MockCatalogRepo::new();

        let result = create_offer(&repo, &user_with_roles(&["crm"]), form(10.0, "product", vec![1]));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn create_offer_keeps_better_existing_offer() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_create_offer()
            .returning(|new_offer| Ok(offer(10, new_offer.discount, new_offer.scope.clone())));
        repo.expect_list_products_in_scope()
            .withf(|_, scope| *scope == OfferScope::Categories(vec![3]))
            .returning(|_, _| {
                Ok(vec![
                    product(1, 3, 1000, Some((7, 700))),
                    product(2, 3, 1000, Some((8, 900))),
                    product(3, 3, 1000, None),
                ])
            });
        repo.expect_get_offers_by_ids()
            .withf(|_, ids| ids == [7, 8])
            .returning(|_, _| {
                Ok(vec![
                    offer(7, 30.0, OfferScope::Products(vec![1])),
                    offer(8, 10.0, OfferScope::Products(vec![2])),
                ])
            });
        repo.expect_apply_price_changes()
            .withf(|_, changes| {
                changes
                    == [
                        PriceChange::Apply {
                            product_id: 2,
                            offer_id: 10,
                            discounted_price: 800,
                        },
                        PriceChange::Apply {
                            product_id: 3,
                            offer_id: 10,
                            discounted_price: 800,
                        },
                    ]
            })
            .times(1)
            .returning(|_, changes| Ok(changes.len()));

        let outcome =
            create_offer(&repo, &admin(), form(20.0, "category", vec![3])).expect("offer created");

        assert_eq!(outcome.offer.id, 10);
        assert_eq!(outcome.repriced, 2);
    }

    #[test]
    fn create_offer_with_equal_discount_changes_nothing() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_create_offer()
            .returning(|new_offer| Ok(offer(11, new_offer.discount, new_offer.scope.clone())));
        repo.expect_list_products_in_scope()
            .returning(|_, _| Ok(vec![product(1, 3, 1000, Some((7, 800)))]));
        repo.expect_get_offers_by_ids()
            .returning(|_, _| Ok(vec![offer(7, 20.0, OfferScope::Products(vec![1]))]));
        repo.expect_apply_price_changes().never();

        let outcome =
            create_offer(&repo, &admin(), form(20.0, "product", vec![1])).expect("offer created");

        assert_eq!(outcome.repriced, 0);
    }

    #[test]
    fn create_offer_rejects_invalid_form() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_create_offer().never();

        let result = create_offer(&repo, &admin(), form(120.0, "product", vec![1]));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn edit_offer_clears_products_leaving_scope() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_offer_by_id()
            .returning(|id, _| Ok(Some(offer(id, 10.0, OfferScope::Products(vec![1, 2])))));
        repo.expect_list_products_by_offer().returning(|_, _| {
            Ok(vec![
                product(1, 3, 1000, Some((5, 900))),
                product(2, 3, 1000, Some((5, 900))),
            ])
        });
        repo.expect_update_offer()
            .returning(|id, _, updates| Ok(offer(id, updates.discount, updates.scope.clone())));
        repo.expect_list_products_in_scope()
            .withf(|_, scope| *scope == OfferScope::Products(vec![2]))
            .returning(|_, _| Ok(vec![product(2, 3, 1000, Some((5, 900)))]));
        repo.expect_get_offers_by_ids().never();
        repo.expect_apply_price_changes()
            .withf(|_, changes| {
                changes
                    == [
                        PriceChange::Clear { product_id: 1 },
                        PriceChange::Apply {
                            product_id: 2,
                            offer_id: 5,
                            discounted_price: 750,
                        },
                    ]
            })
            .returning(|_, changes| Ok(changes.len()));

        let outcome =
            edit_offer(&repo, &admin(), 5, form(25.0, "product", vec![2])).expect("offer edited");

        assert_eq!(outcome.repriced, 2);
    }

    #[test]
    fn edit_missing_offer_is_not_found() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_offer_by_id().returning(|_, _| Ok(None));
        repo.expect_update_offer().never();

        let result = edit_offer(&repo, &admin(), 5, form(25.0, "product", vec![2]));

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn toggle_offer_off_reverts_to_base_price() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_offer_by_id()
            .returning(|id, _| Ok(Some(offer(id, 10.0, OfferScope::Categories(vec![3])))));
        repo.expect_set_offer_status()
            .withf(|_, _, status| *status == ActivityStatus::Inactive)
            .returning(|id, _, status| {
                let mut toggled = offer(id, 10.0, OfferScope::Categories(vec![3]));
                toggled.status = status;
                Ok(toggled)
            });
        repo.expect_list_products_by_offer()
            .returning(|_, _| Ok(vec![product(4, 3, 500, Some((6, 450)))]));
        repo.expect_list_products_in_scope().never();
        repo.expect_apply_price_changes()
            .withf(|_, changes| changes == [PriceChange::Clear { product_id: 4 }])
            .returning(|_, changes| Ok(changes.len()));

        let outcome = toggle_offer(&repo, &admin(), 6).expect("offer toggled");

        assert!(!outcome.offer.is_active());
        assert_eq!(outcome.repriced, 1);
    }

    #[test]
    fn toggle_offer_on_reapplies_scope() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_offer_by_id().returning(|id, _| {
            let mut inactive = offer(id, 10.0, OfferScope::Products(vec![4]));
            inactive.status = ActivityStatus::Inactive;
            Ok(Some(inactive))
        });
        repo.expect_set_offer_status()
            .returning(|id, _, status| {
                let mut toggled = offer(id, 10.0, OfferScope::Products(vec![4]));
                toggled.status = status;
                Ok(toggled)
            });
        repo.expect_list_products_in_scope()
            .returning(|_, _| Ok(vec![product(4, 3, 500, None)]));
        repo.expect_apply_price_changes()
            .withf(|_, changes| {
                changes
                    == [PriceChange::Apply {
                        product_id: 4,
                        offer_id: 6,
                        discounted_price: 450,
                    }]
            })
            .returning(|_, changes| Ok(changes.len()));

        let outcome = toggle_offer(&repo, &admin(), 6).expect("offer toggled");

        assert!(outcome.offer.is_active());
    }

    #[test]
    fn get_offer_resolves_reference_names() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_get_offer_by_id()
            .returning(|id, _| Ok(Some(offer(id, 10.0, OfferScope::Products(vec![1, 9])))));
        repo.expect_list_products()
            .returning(|_| Ok((1, vec![product(1, 3, 500, None)])));
        repo.expect_list_categories().returning(|_| Ok((0, vec![])));

        let details = get_offer(&repo, &admin(), 2).expect("offer details");

        assert_eq!(details.products.len(), 1);
        assert_eq!(details.products[0].name, "Watch 1");
    }
}
