//! Ordering keys derived from a listing's numeric fields.

use crate::types::{Listing, ListingError, Result};

/// Price per unit of surface; the default ordering key.
pub fn primary_metric(record: &Listing) -> Result<f64> {
    checked_ratio(record.price, record.surface_total, "surface_total")
}

/// Price over surface plus bedroom and bathroom counts.
///
/// Used to separate listings whose primary metric collides exactly.
pub fn secondary_metric(record: &Listing) -> Result<f64> {
    let denominator =
        record.surface_total + f64::from(record.bedrooms) + f64::from(record.bathrooms);
    checked_ratio(
        record.price,
        denominator,
        "surface_total + bedrooms + bathrooms",
    )
}

fn checked_ratio(price: f64, denominator: f64, field: &'static str) -> Result<f64> {
    if !price.is_finite() {
        return Err(ListingError::InvalidMetricInput {
            field: "price",
            value: price,
        });
    }
    if denominator.is_nan() || denominator <= 0.0 || denominator.is_infinite() {
        return Err(ListingError::InvalidMetricInput {
            field,
            value: denominator,
        });
    }
    let ratio = price / denominator;
    if !ratio.is_finite() {
        return Err(ListingError::InvalidMetricInput {
            field: "metric",
            value: ratio,
        });
    }
    Ok(ratio)
}
