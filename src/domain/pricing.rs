//! Best-offer selection and discounted price propagation.
//!
//! The planners here are pure: they look at the products touched by an offer
//! mutation together with the offers currently applied to them and return the
//! [`PriceChange`]s that restore the invariant that every product carries the
//! best active offer applicable to it. Persisting the plan is the
//! repository's job (see `ProductWriter::apply_price_changes`).

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::offer::Offer;
use crate::domain::product::Product;

/// Price after applying `discount` percent to `price`, rounded to the nearest
/// whole currency unit.
pub fn discounted_price(price: i64, discount: f64) -> i64 {
    (price as f64 * (1.0 - discount / 100.0)).round() as i64
}

/// Single write produced by the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PriceChange {
    /// Attach `offer_id` and store the resulting discounted price.
    Apply {
        product_id: i32,
        offer_id: i32,
        discounted_price: i64,
    },
    /// Remove the applied offer, reverting to the base price.
    Clear { product_id: i32 },
}

impl PriceChange {
    pub fn product_id(&self) -> i32 {
        match self {
            Self::Apply { product_id, .. } | Self::Clear { product_id } => *product_id,
        }
    }

    /// Whether applying the change would leave `product` untouched.
    fn is_noop_for(&self, product: &Product) -> bool {
        match self {
            Self::Apply {
                offer_id,
                discounted_price,
                ..
            } => {
                product.offer_id == Some(*offer_id)
                    && product.discounted_price == Some(*discounted_price)
            }
            Self::Clear { .. } => product.offer_id.is_none() && product.discounted_price.is_none(),
        }
    }
}

/// Offer that `candidate` has to beat on `product`.
///
/// The candidate itself never competes with its own earlier state, and stale
/// references to missing or inactive offers are ignored.
fn incumbent<'a>(
    product: &Product,
    candidate: &Offer,
    current_offers: &'a HashMap<i32, Offer>,
) -> Option<&'a Offer> {
    product
        .offer_id
        .filter(|offer_id| *offer_id != candidate.id)
        .and_then(|offer_id| current_offers.get(&offer_id))
        .filter(|offer| offer.is_active())
}

/// Choose between the product's current offer and `candidate`.
///
/// The candidate only replaces an existing offer with a strictly greater
/// discount; equal discounts keep the incumbent.
pub fn best_offer<'a>(
    product: &Product,
    candidate: &'a Offer,
    current_offers: &'a HashMap<i32, Offer>,
) -> &'a Offer {
    match incumbent(product, candidate, current_offers) {
        Some(existing) if candidate.discount <= existing.discount => existing,
        _ => candidate,
    }
}

/// Plan the effect of `offer` becoming applicable to `products`.
///
/// Used when an offer is created, when it is switched back on and for the
/// products in scope after an edit.
pub fn plan_offer_applied(
    offer: &Offer,
    products: &[Product],
    current_offers: &HashMap<i32, Offer>,
) -> Vec<PriceChange> {
    products
        .iter()
        .filter_map(|product| {
            let best = best_offer(product, offer, current_offers);
            let change = PriceChange::Apply {
                product_id: product.id,
                offer_id: best.id,
                discounted_price: discounted_price(product.price, best.discount),
            };
            (!change.is_noop_for(product)).then_some(change)
        })
        .collect()
}

/// Plan the effect of switching `offer` off.
///
/// Every product carrying the offer reverts to its base price; there is no
/// search for a second-best offer.
pub fn plan_offer_deactivated(offer: &Offer, carrying: &[Product]) -> Vec<PriceChange> {
    carrying
        .iter()
        .filter(|product| product.offer_id == Some(offer.id))
        .map(|product| PriceChange::Clear {
            product_id: product.id,
        })
        .collect()
}

/// Plan the effect of editing `offer`.
///
/// `carrying` are the products that had the offer applied before the edit,
/// `in_scope` the products matched by the updated scope.
pub fn plan_offer_edited(
    offer: &Offer,
    carrying: &[Product],
    in_scope: &[Product],
    current_offers: &HashMap<i32, Offer>,
) -> Vec<PriceChange> {
    if !offer.is_active() {
        return plan_offer_deactivated(offer, carrying);
    }

    let mut changes: Vec<PriceChange> = carrying
        .iter()
        .filter(|product| product.offer_id == Some(offer.id))
        .filter(|product| !offer.scope.covers(product.id, product.category_id))
        .map(|product| PriceChange::Clear {
            product_id: product.id,
        })
        .collect();

    changes.extend(plan_offer_applied(offer, in_scope, current_offers));
    changes
}

/// Recompute the offer and discounted price of a product after an edit.
///
/// `applied` is the offer the product carried before the edit. It is kept only
/// while it is active and still covers the product. `newcomers` are offers that
/// became applicable through the edit (category offers after a category move);
/// one of them replaces the kept offer only with a strictly greater discount.
///
/// Returns `None` when nothing changes.
pub fn plan_product_repriced(
    product: &Product,
    applied: Option<&Offer>,
    newcomers: &[Offer],
) -> Option<PriceChange> {
    let applies =
        |offer: &Offer| offer.is_active() && offer.scope.covers(product.id, product.category_id);

    let kept = applied.filter(|offer| product.offer_id == Some(offer.id) && applies(*offer));
    let best = newcomers
        .iter()
        .filter(|offer| applies(*offer))
        .fold(kept, |best, candidate| match best {
            Some(existing) if candidate.discount <= existing.discount => Some(existing),
            _ => Some(candidate),
        });

    let change = match best {
        Some(offer) => PriceChange::Apply {
            product_id: product.id,
            offer_id: offer.id,
            discounted_price: discounted_price(product.price, offer.discount),
        },
        None if product.offer_id.is_some() || product.discounted_price.is_some() => {
            PriceChange::Clear {
                product_id: product.id,
            }
        }
        None => return None,
    };

    (!change.is_noop_for(product)).then_some(change)
}
