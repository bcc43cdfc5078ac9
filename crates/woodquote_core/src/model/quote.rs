//! Quote domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted for every priced sale scenario.
//! - Own the closed vocabularies (region, unit, product) and their text forms.
//!
//! # Invariants
//! - `id` is stable and never reused for another quote.
//! - `timestamp` is fixed at creation and never rewritten by edits.
//! - `breakdown` is always derived from `inputs`; it is never edited directly.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a persisted quote.
pub type QuoteId = Uuid;

/// `strftime` layout used for `QuoteRecord::timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current local time in [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Brazilian federative unit where the sale happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    AC,
    AL,
    AP,
    AM,
    BA,
    CE,
    DF,
    ES,
    GO,
    MA,
    MT,
    MS,
    #[default]
    MG,
    PA,
    PB,
    PR,
    PE,
    PI,
    RJ,
    RN,
    RS,
    RO,
    RR,
    SC,
    SP,
    SE,
    TO,
}

impl Region {
    /// Every region in display order.
    pub const ALL: [Region; 27] = [
        Region::AC,
        Region::AL,
        Region::AP,
        Region::AM,
        Region::BA,
        Region::CE,
        Region::DF,
        Region::ES,
        Region::GO,
        Region::MA,
        Region::MT,
        Region::MS,
        Region::MG,
        Region::PA,
        Region::PB,
        Region::PR,
        Region::PE,
        Region::PI,
        Region::RJ,
        Region::RN,
        Region::RS,
        Region::RO,
        Region::RR,
        Region::SC,
        Region::SP,
        Region::SE,
        Region::TO,
    ];

    /// Two-letter uppercase code.
    pub fn code(self) -> &'static str {
        match self {
            Region::AC => "AC",
            Region::AL => "AL",
            Region::AP => "AP",
            Region::AM => "AM",
            Region::BA => "BA",
            Region::CE => "CE",
            Region::DF => "DF",
            Region::ES => "ES",
            Region::GO => "GO",
            Region::MA => "MA",
            Region::MT => "MT",
            Region::MS => "MS",
            Region::MG => "MG",
            Region::PA => "PA",
            Region::PB => "PB",
            Region::PR => "PR",
            Region::PE => "PE",
            Region::PI => "PI",
            Region::RJ => "RJ",
            Region::RN => "RN",
            Region::RS => "RS",
            Region::RO => "RO",
            Region::RR => "RR",
            Region::SC => "SC",
            Region::SP => "SP",
            Region::SE => "SE",
            Region::TO => "TO",
        }
    }

    /// Parses a region code, case-insensitively. Returns `None` outside the closed set.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|region| region.code().eq_ignore_ascii_case(trimmed))
    }

    /// Lenient read used for persisted rows: unknown or blank text maps to the default region.
    pub fn from_persisted(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Unit in which the product is sold. Selects the transport divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Metric tonne.
    #[default]
    Ton,
    /// Cubic metre.
    #[serde(rename = "m3")]
    M3,
}

impl Unit {
    /// Persisted text form.
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Ton => "Ton",
            Unit::M3 => "m3",
        }
    }

    /// Strict parse. Accepts the long Portuguese spelling used by older tables.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ton" | "tonelada" | "t" => Some(Unit::Ton),
            "m3" | "m³" => Some(Unit::M3),
            _ => None,
        }
    }

    /// Lenient read used for persisted rows.
    ///
    /// Anything that is not a tonne spelling is treated as cubic metres, which
    /// keeps the divisor choice identical to how such rows were priced.
    pub fn from_persisted(value: &str) -> Self {
        Self::parse(value).unwrap_or(Unit::M3)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of wood product. Known kinds carry a tax rate; `Other` is taxed at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductType {
    /// Wood chips.
    #[default]
    Cavaco,
    /// Logs.
    Tora,
    /// Firewood.
    Lenha,
    /// Unrecognized product text, kept verbatim.
    Other(String),
}

impl ProductType {
    /// Product kinds with a configured tax rate.
    pub const KNOWN: [ProductType; 3] = [ProductType::Cavaco, ProductType::Tora, ProductType::Lenha];

    /// Persisted text form.
    pub fn as_str(&self) -> &str {
        match self {
            ProductType::Cavaco => "Cavaco",
            ProductType::Tora => "Tora",
            ProductType::Lenha => "Lenha",
            ProductType::Other(value) => value.as_str(),
        }
    }

    /// Maps text to a known kind (case-insensitive) or keeps it as `Other`.
    pub fn from_persisted(value: &str) -> Self {
        let trimmed = value.trim();
        Self::KNOWN
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| ProductType::Other(trimmed.to_string()))
    }
}

impl Display for ProductType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ProductType {
    fn from(value: String) -> Self {
        Self::from_persisted(&value)
    }
}

impl From<ProductType> for String {
    fn from(value: ProductType) -> Self {
        value.as_str().to_string()
    }
}

/// Commercial inputs consumed by the pricing calculator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingInputs {
    /// Sale price; basis for tax and margin.
    pub gross_price: f64,
    pub wood_cost: f64,
    pub product_type: ProductType,
    pub services_cost: f64,
    /// Only used when no fixed freight is set.
    pub distance_km: f64,
    pub price_per_km: f64,
    pub unit: Unit,
    /// Overrides distance-based transport when `> 0`.
    pub fixed_freight_per_unit: f64,
    pub purchase_commission: f64,
    pub sale_commission: f64,
}

impl PricingInputs {
    /// Numeric inputs paired with their persisted column names.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 8] {
        [
            ("gross_price", self.gross_price),
            ("wood_cost", self.wood_cost),
            ("services_cost", self.services_cost),
            ("distance_km", self.distance_km),
            ("price_per_km", self.price_per_km),
            ("fixed_freight_per_unit", self.fixed_freight_per_unit),
            ("purchase_commission", self.purchase_commission),
            ("sale_commission", self.sale_commission),
        ]
    }

    /// Checks that every numeric input is finite and non-negative.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        for (field, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(QuoteValidationError::NonFiniteValue { field });
            }
            if value < 0.0 {
                return Err(QuoteValidationError::NegativeValue { field, value });
            }
        }
        Ok(())
    }
}

/// Derived financial figures for one set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub tax: f64,
    pub transport: f64,
    pub total_cost: f64,
    /// `gross_price - total_cost`; may be negative.
    pub net: f64,
    /// `net / gross_price`, or `0` when the gross price is not positive.
    pub margin_fraction: f64,
}

impl PriceBreakdown {
    /// Margin as a percentage (0-100 scale).
    pub fn margin_percent(&self) -> f64 {
        self.margin_fraction * 100.0
    }
}

/// Caller-supplied content for creating or replacing a quote.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteDraft {
    /// User label for the quote.
    pub name: String,
    pub region: Region,
    pub inputs: PricingInputs,
}

impl QuoteDraft {
    pub fn new(name: impl Into<String>, region: Region, inputs: PricingInputs) -> Self {
        Self {
            name: name.into(),
            region,
            inputs,
        }
    }

    /// Validates the draft for creation.
    ///
    /// # Errors
    /// - `EmptyName` when the trimmed name is empty.
    /// - `NegativeValue` / `NonFiniteValue` for numeric inputs.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.name.trim().is_empty() {
            return Err(QuoteValidationError::EmptyName);
        }
        self.inputs.validate()
    }
}

/// Canonical persisted quote row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Stable identity; independent from the row position.
    pub id: QuoteId,
    /// Creation time in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    pub name: String,
    pub region: Region,
    pub inputs: PricingInputs,
    /// Derived from `inputs` at write time.
    pub breakdown: PriceBreakdown,
}

impl QuoteRecord {
    /// Returns the editable part of this record.
    pub fn to_draft(&self) -> QuoteDraft {
        QuoteDraft {
            name: self.name.clone(),
            region: self.region,
            inputs: self.inputs.clone(),
        }
    }

    pub fn margin_percent(&self) -> f64 {
        self.breakdown.margin_percent()
    }
}

/// Validation errors for quote drafts.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteValidationError {
    /// Quote name is blank.
    EmptyName,
    /// A numeric input is below zero.
    NegativeValue { field: &'static str, value: f64 },
    /// A numeric input is NaN or infinite.
    NonFiniteValue { field: &'static str },
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "quote name must not be empty"),
            Self::NegativeValue { field, value } => {
                write!(f, "`{field}` must not be negative, got {value}")
            }
            Self::NonFiniteValue { field } => write!(f, "`{field}` must be a finite number"),
        }
    }
}

impl Error for QuoteValidationError {}

#[cfg(test)]
mod tests {
    use super::{PricingInputs, ProductType, QuoteDraft, QuoteValidationError, Region, Unit};

    #[test]
    fn region_parse_is_case_insensitive_and_closed() {
        assert_eq!(Region::parse(" sp "), Some(Region::SP));
        assert_eq!(Region::parse("XX"), None);
        assert_eq!(Region::from_persisted(""), Region::MG);
        assert_eq!(Region::ALL.len(), 27);
    }

    #[test]
    fn unit_accepts_legacy_spelling() {
        assert_eq!(Unit::parse("Tonelada"), Some(Unit::Ton));
        assert_eq!(Unit::parse("M3"), Some(Unit::M3));
        assert_eq!(Unit::from_persisted("bag"), Unit::M3);
    }

    #[test]
    fn unknown_product_is_kept_verbatim() {
        let kind = ProductType::from_persisted("Carvao");
        assert_eq!(kind, ProductType::Other("Carvao".to_string()));
        assert_eq!(ProductType::from_persisted("tora"), ProductType::Tora);
    }

    #[test]
    fn draft_validation_rejects_blank_name_and_negative_numbers() {
        let blank = QuoteDraft::new("   ", Region::MG, PricingInputs::default());
        assert_eq!(blank.validate(), Err(QuoteValidationError::EmptyName));

        let negative = QuoteDraft::new(
            "lote 1",
            Region::MG,
            PricingInputs {
                wood_cost: -1.0,
                ..PricingInputs::default()
            },
        );
        assert!(matches!(
            negative.validate(),
            Err(QuoteValidationError::NegativeValue { field: "wood_cost", .. })
        ));

        let nan = QuoteDraft::new(
            "lote 2",
            Region::MG,
            PricingInputs {
                price_per_km: f64::NAN,
                ..PricingInputs::default()
            },
        );
        assert_eq!(
            nan.validate(),
            Err(QuoteValidationError::NonFiniteValue {
                field: "price_per_km"
            })
        );
    }
}
