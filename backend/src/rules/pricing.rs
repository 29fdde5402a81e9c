use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::availability::StayRequest;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPricing {
    pub base_price_per_night: Decimal,
    /// Charged once per stay.
    pub cleaning_fee: Decimal,
    /// Charged for every night of the stay.
    pub service_fee_per_night: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub nights: i32,
    pub subtotal: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
}

/// Nights between two instants, rounding any partial day up. Never below 1.
pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i32 {
    let millis = (check_out - check_in).num_milliseconds();
    let nights = (millis + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY);
    nights.clamp(1, i32::MAX as i64) as i32
}

pub fn compute_breakdown(pricing: &ListingPricing, stay: &StayRequest) -> PriceBreakdown {
    let nights = nights_between(stay.check_in(), stay.check_out());
    let night_count = Decimal::from(nights);

    let subtotal = pricing.base_price_per_night * night_count;
    let cleaning_fee = pricing.cleaning_fee;
    let service_fee = pricing.service_fee_per_night * night_count;

    PriceBreakdown {
        nights,
        subtotal,
        cleaning_fee,
        service_fee,
        total: subtotal + cleaning_fee + service_fee,
    }
}
