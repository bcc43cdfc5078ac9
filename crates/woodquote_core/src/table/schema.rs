//! Canonical quote table schema and read-side normalization.
//!
//! # Responsibility
//! - Declare the canonical column set and its order.
//! - Resolve current and legacy header names to canonical columns.
//! - Convert between CSV rows and `QuoteRecord`s.
//!
//! # Invariants
//! - `Column::ALL` order is the on-disk column order.
//! - Missing columns backfill to `0.0` (numbers) or empty text (strings).
//! - Unparseable numeric cells coerce to `0.0`.
//! - Rows without an `id` get a deterministic id derived from their position,
//!   timestamp and name, so re-reading an unchanged file is stable.

use crate::model::quote::{
    PriceBreakdown, PricingInputs, ProductType, QuoteId, QuoteRecord, Region, Unit,
};
use csv::StringRecord;
use uuid::Uuid;

/// Namespace for ids assigned to rows written before ids were persisted.
const LEGACY_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93d7_4b0a_8e25_d3a1_7c40_5b19);

/// Number of canonical columns.
pub const COLUMN_COUNT: usize = 19;

/// One canonical table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Timestamp,
    Name,
    Region,
    Unit,
    ProductType,
    GrossPrice,
    WoodCost,
    ServicesCost,
    DistanceKm,
    PricePerKm,
    FixedFreightPerUnit,
    PurchaseCommission,
    SaleCommission,
    Tax,
    Transport,
    TotalCost,
    Net,
    MarginFraction,
    Id,
}

impl Column {
    /// Canonical on-disk order.
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Timestamp,
        Column::Name,
        Column::Region,
        Column::Unit,
        Column::ProductType,
        Column::GrossPrice,
        Column::WoodCost,
        Column::ServicesCost,
        Column::DistanceKm,
        Column::PricePerKm,
        Column::FixedFreightPerUnit,
        Column::PurchaseCommission,
        Column::SaleCommission,
        Column::Tax,
        Column::Transport,
        Column::TotalCost,
        Column::Net,
        Column::MarginFraction,
        Column::Id,
    ];

    /// Canonical header name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::Name => "name",
            Column::Region => "region",
            Column::Unit => "unit",
            Column::ProductType => "product_type",
            Column::GrossPrice => "gross_price",
            Column::WoodCost => "wood_cost",
            Column::ServicesCost => "services_cost",
            Column::DistanceKm => "distance_km",
            Column::PricePerKm => "price_per_km",
            Column::FixedFreightPerUnit => "fixed_freight_per_unit",
            Column::PurchaseCommission => "purchase_commission",
            Column::SaleCommission => "sale_commission",
            Column::Tax => "tax",
            Column::Transport => "transport",
            Column::TotalCost => "total_cost",
            Column::Net => "net",
            Column::MarginFraction => "margin_fraction",
            Column::Id => "id",
        }
    }

    /// Header name used by the original Portuguese spreadsheet, if any.
    fn legacy_name(self) -> Option<&'static str> {
        let name = match self {
            Column::Timestamp => "data_hora",
            Column::Name => "nome_orcamento",
            Column::Region => "estado",
            Column::Unit => "unidade",
            Column::ProductType => "tipo_produto",
            Column::GrossPrice => "preco_bruto",
            Column::WoodCost => "custo_madeira",
            Column::ServicesCost => "custo_servicos",
            Column::DistanceKm => "km_total",
            Column::PricePerKm => "preco_km",
            Column::FixedFreightPerUnit => "frete_fixo_unidade",
            Column::PurchaseCommission => "comissao_compra",
            Column::SaleCommission => "comissao_venda",
            Column::Tax => "imposto",
            Column::Transport => "transporte",
            Column::TotalCost => "custo_total",
            Column::Net => "liquido",
            Column::MarginFraction => "%_lucro",
            Column::Id => return None,
        };
        Some(name)
    }

    /// Resolves a header cell (canonical or legacy name) to a column.
    pub fn from_header(header: &str) -> Option<Self> {
        let normalized = header.trim_start_matches('\u{feff}').trim();
        Self::ALL.iter().copied().find(|column| {
            column.name().eq_ignore_ascii_case(normalized)
                || column
                    .legacy_name()
                    .is_some_and(|legacy| legacy.eq_ignore_ascii_case(normalized))
        })
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Canonical header row.
pub fn canonical_header() -> StringRecord {
    Column::ALL.iter().map(|column| column.name()).collect()
}

/// Maps canonical columns to positions in one concrete file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [Option<usize>; COLUMN_COUNT],
}

impl ColumnMap {
    /// Builds the map from a header row. The first occurrence of a column wins.
    pub fn resolve(header: &StringRecord) -> Self {
        let mut positions = [None; COLUMN_COUNT];
        for (position, cell) in header.iter().enumerate() {
            if let Some(column) = Column::from_header(cell) {
                positions[column.index()].get_or_insert(position);
            }
        }
        Self { positions }
    }

    /// Columns absent from the file header, in canonical order.
    pub fn missing(&self) -> Vec<Column> {
        Column::ALL
            .iter()
            .copied()
            .filter(|column| self.positions[column.index()].is_none())
            .collect()
    }

    fn text<'r>(&self, row: &'r StringRecord, column: Column) -> &'r str {
        self.positions[column.index()]
            .and_then(|position| row.get(position))
            .unwrap_or("")
    }

    fn number(&self, row: &StringRecord, column: Column) -> f64 {
        coerce_number(self.text(row, column))
    }

    /// Decodes one data row. `position` is the 0-based row index in the file.
    pub fn decode(&self, row: &StringRecord, position: usize) -> QuoteRecord {
        let timestamp = self.text(row, Column::Timestamp).to_string();
        let name = self.text(row, Column::Name).to_string();
        let id = Uuid::parse_str(self.text(row, Column::Id).trim())
            .unwrap_or_else(|_| legacy_id(position, &timestamp, &name));

        let inputs = PricingInputs {
            gross_price: self.number(row, Column::GrossPrice),
            wood_cost: self.number(row, Column::WoodCost),
            product_type: ProductType::from_persisted(self.text(row, Column::ProductType)),
            services_cost: self.number(row, Column::ServicesCost),
            distance_km: self.number(row, Column::DistanceKm),
            price_per_km: self.number(row, Column::PricePerKm),
            unit: Unit::from_persisted(self.text(row, Column::Unit)),
            fixed_freight_per_unit: self.number(row, Column::FixedFreightPerUnit),
            purchase_commission: self.number(row, Column::PurchaseCommission),
            sale_commission: self.number(row, Column::SaleCommission),
        };
        let breakdown = PriceBreakdown {
            tax: self.number(row, Column::Tax),
            transport: self.number(row, Column::Transport),
            total_cost: self.number(row, Column::TotalCost),
            net: self.number(row, Column::Net),
            margin_fraction: self.number(row, Column::MarginFraction),
        };

        QuoteRecord {
            id,
            timestamp,
            name,
            region: Region::from_persisted(self.text(row, Column::Region)),
            inputs,
            breakdown,
        }
    }
}

/// Encodes a record as a row in canonical column order.
pub fn encode(record: &QuoteRecord) -> StringRecord {
    let inputs = &record.inputs;
    let breakdown = &record.breakdown;
    Column::ALL
        .iter()
        .map(|column| match column {
            Column::Timestamp => record.timestamp.clone(),
            Column::Name => record.name.clone(),
            Column::Region => record.region.code().to_string(),
            Column::Unit => inputs.unit.as_str().to_string(),
            Column::ProductType => inputs.product_type.as_str().to_string(),
            Column::GrossPrice => format_decimal(inputs.gross_price),
            Column::WoodCost => format_decimal(inputs.wood_cost),
            Column::ServicesCost => format_decimal(inputs.services_cost),
            Column::DistanceKm => format_decimal(inputs.distance_km),
            Column::PricePerKm => format_decimal(inputs.price_per_km),
            Column::FixedFreightPerUnit => format_decimal(inputs.fixed_freight_per_unit),
            Column::PurchaseCommission => format_decimal(inputs.purchase_commission),
            Column::SaleCommission => format_decimal(inputs.sale_commission),
            Column::Tax => format_decimal(breakdown.tax),
            Column::Transport => format_decimal(breakdown.transport),
            Column::TotalCost => format_decimal(breakdown.total_cost),
            Column::Net => format_decimal(breakdown.net),
            Column::MarginFraction => format_decimal(breakdown.margin_fraction),
            Column::Id => record.id.to_string(),
        })
        .collect()
}

/// Parses a numeric cell; blank, garbage, NaN and infinities all become `0.0`.
pub fn coerce_number(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Formats a number in plain decimal notation that parses back to the same value.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Deterministic id for a row persisted without one.
pub fn legacy_id(position: usize, timestamp: &str, name: &str) -> QuoteId {
    let seed = format!("{position}\u{1f}{timestamp}\u{1f}{name}");
    Uuid::new_v5(&LEGACY_ID_NAMESPACE, seed.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::{coerce_number, format_decimal, legacy_id, Column, ColumnMap, COLUMN_COUNT};
    use csv::StringRecord;

    #[test]
    fn header_resolution_accepts_legacy_names() {
        assert_eq!(Column::from_header("preco_bruto"), Some(Column::GrossPrice));
        assert_eq!(Column::from_header("%_lucro"), Some(Column::MarginFraction));
        assert_eq!(Column::from_header("\u{feff}timestamp"), Some(Column::Timestamp));
        assert_eq!(Column::from_header("unrelated"), None);
    }

    #[test]
    fn missing_columns_are_reported_in_canonical_order() {
        let header = StringRecord::from(vec!["name", "gross_price", "id"]);
        let missing = ColumnMap::resolve(&header).missing();
        assert_eq!(missing.first(), Some(&Column::Timestamp));
        assert!(!missing.contains(&Column::Name));
        assert!(!missing.contains(&Column::Id));
        assert_eq!(missing.len(), COLUMN_COUNT - 3);
    }

    #[test]
    fn coerce_number_degrades_to_zero() {
        assert_eq!(coerce_number(" 12.5 "), 12.5);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
        assert_eq!(coerce_number("-infinity"), 0.0);
    }

    #[test]
    fn format_decimal_keeps_a_fraction_digit() {
        assert_eq!(format_decimal(1500.0), "1500.0");
        assert_eq!(format_decimal(0.15), "0.15");
        let awkward = 0.1 + 0.2;
        assert_eq!(format_decimal(awkward).parse::<f64>().unwrap(), awkward);
    }

    #[test]
    fn legacy_id_is_deterministic_per_position() {
        let first = legacy_id(0, "2024-01-01 10:00:00", "a");
        assert_eq!(first, legacy_id(0, "2024-01-01 10:00:00", "a"));
        assert_ne!(first, legacy_id(1, "2024-01-01 10:00:00", "a"));
    }
}
