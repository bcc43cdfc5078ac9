//! Quote pricing calculator.
//!
//! # Responsibility
//! - Compute tax, transport, total cost, net and margin from `PricingInputs`.
//! - Classify margin percentages into `MarginBand`s.
//!
//! # Invariants
//! - `total_cost = wood + tax + services + transport + purchase + sale`.
//! - `net = gross_price - total_cost`, never clamped.
//! - `margin_fraction == 0` whenever `gross_price <= 0`.
//! - A positive fixed freight replaces distance-based transport entirely.

use crate::model::quote::{PriceBreakdown, PricingInputs, ProductType, Unit};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Distance-based freight is divided by this for tonne sales.
pub const TON_TRANSPORT_DIVISOR: f64 = 30.0;
/// Distance-based freight is divided by this for cubic metre sales.
pub const M3_TRANSPORT_DIVISOR: f64 = 105.0;

/// Margin percent strictly below this is `Low`.
pub const MEDIUM_BAND_FLOOR_PERCENT: f64 = 20.0;
/// Margin percent strictly above this is `High`.
pub const MEDIUM_BAND_CEILING_PERCENT: f64 = 30.0;

/// Pricing constants: tax-rate table and transport divisors.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    /// Tax rate per product kind, as a fraction of the gross price.
    pub tax_rates: Vec<(ProductType, f64)>,
    pub ton_divisor: f64,
    pub m3_divisor: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rates: vec![
                (ProductType::Cavaco, 0.03),
                (ProductType::Tora, 0.06),
                (ProductType::Lenha, 0.03),
            ],
            ton_divisor: TON_TRANSPORT_DIVISOR,
            m3_divisor: M3_TRANSPORT_DIVISOR,
        }
    }
}

impl PricingConfig {
    /// Tax rate for `product_type`; `0` for kinds missing from the table.
    pub fn tax_rate(&self, product_type: &ProductType) -> f64 {
        self.tax_rates
            .iter()
            .find(|(kind, _)| kind == product_type)
            .map_or(0.0, |(_, rate)| *rate)
    }

    /// Transport divisor for `unit`.
    pub fn divisor(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Ton => self.ton_divisor,
            Unit::M3 => self.m3_divisor,
        }
    }

    /// Transport cost per unit sold.
    ///
    /// A positive `fixed_freight_per_unit` is returned as-is and the distance
    /// inputs are ignored. A non-positive divisor yields `0`.
    pub fn transport(
        &self,
        distance_km: f64,
        price_per_km: f64,
        unit: Unit,
        fixed_freight_per_unit: f64,
    ) -> f64 {
        if fixed_freight_per_unit > 0.0 {
            return fixed_freight_per_unit;
        }
        let divisor = self.divisor(unit);
        if divisor > 0.0 {
            (distance_km * price_per_km) / divisor
        } else {
            0.0
        }
    }

    /// Computes every derived figure for `inputs`.
    pub fn compute(&self, inputs: &PricingInputs) -> PriceBreakdown {
        let tax = self.tax_rate(&inputs.product_type) * inputs.gross_price;
        let transport = self.transport(
            inputs.distance_km,
            inputs.price_per_km,
            inputs.unit,
            inputs.fixed_freight_per_unit,
        );
        let total_cost = inputs.wood_cost
            + tax
            + inputs.services_cost
            + transport
            + inputs.purchase_commission
            + inputs.sale_commission;
        let net = inputs.gross_price - total_cost;
        let margin_fraction = if inputs.gross_price > 0.0 {
            net / inputs.gross_price
        } else {
            0.0
        };

        PriceBreakdown {
            tax,
            transport,
            total_cost,
            net,
            margin_fraction,
        }
    }
}

/// Computes derived figures with the default pricing constants.
pub fn compute(inputs: &PricingInputs) -> PriceBreakdown {
    PricingConfig::default().compute(inputs)
}

/// Qualitative margin classification used for visual flagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginBand {
    /// Below 20%.
    Low,
    /// 20% to 30%, both inclusive.
    Medium,
    /// Above 30%.
    High,
}

impl MarginBand {
    pub fn as_str(self) -> &'static str {
        match self {
            MarginBand::Low => "low",
            MarginBand::Medium => "medium",
            MarginBand::High => "high",
        }
    }

    /// CSS color name the band is rendered with.
    pub fn color(self) -> &'static str {
        match self {
            MarginBand::Low => "red",
            MarginBand::Medium => "orange",
            MarginBand::High => "green",
        }
    }
}

impl Display for MarginBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a margin percentage (0-100 scale). NaN is `Low`.
pub fn margin_band(percent: f64) -> MarginBand {
    if percent.is_nan() || percent < MEDIUM_BAND_FLOOR_PERCENT {
        MarginBand::Low
    } else if percent <= MEDIUM_BAND_CEILING_PERCENT {
        MarginBand::Medium
    } else {
        MarginBand::High
    }
}
