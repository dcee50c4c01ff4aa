//! FILENAME: core/report-engine/src/land_comp.rs
//! Land comp report rows and their field registry.
//!
//! A land comp is a comparable land sale, optionally linked to the pursuit
//! it was pulled for.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use engine::SF_PER_ACRE;

use crate::definition::{AggregationMode, FieldType};
use crate::error::ReportError;
use crate::pursuit::Pursuit;
use crate::registry::{FieldDefinition, FieldRegistry};
use crate::value::FieldValue;

/// A comparable land sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandComp {
    pub id: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zoning: Option<String>,
    /// ISO-8601 date.
    pub sale_date: Option<String>,
    pub sale_price: Option<f64>,
    pub site_area_sf: Option<f64>,
    pub buyer: Option<String>,
    pub seller: Option<String>,
}

impl LandComp {
    pub fn site_area_acres(&self) -> Option<f64> {
        self.site_area_sf.map(|sf| sf / SF_PER_ACRE)
    }

    /// Sale price per site SF; `None` when either side is missing or zero.
    pub fn price_per_sf(&self) -> Option<f64> {
        ratio(self.sale_price, self.site_area_sf)
    }

    pub fn price_per_acre(&self) -> Option<f64> {
        ratio(self.sale_price, self.site_area_acres())
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 && (n / d).is_finite() => Some(n / d),
        _ => None,
    }
}

/// One row of the land comp report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandCompReportRow {
    pub comp: LandComp,
    pub pursuit: Option<Pursuit>,
}

/// Every reportable land comp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandCompField {
    Address,
    City,
    State,
    Zoning,
    SaleDate,
    SalePrice,
    SiteAreaAcres,
    PricePerSf,
    PricePerAcre,
    Buyer,
    Seller,
    PursuitName,
    PursuitRegion,
}

impl LandCompField {
    pub const ALL: [LandCompField; 13] = [
        LandCompField::Address,
        LandCompField::City,
        LandCompField::State,
        LandCompField::Zoning,
        LandCompField::SaleDate,
        LandCompField::SalePrice,
        LandCompField::SiteAreaAcres,
        LandCompField::PricePerSf,
        LandCompField::PricePerAcre,
        LandCompField::Buyer,
        LandCompField::Seller,
        LandCompField::PursuitName,
        LandCompField::PursuitRegion,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LandCompField::Address => "address",
            LandCompField::City => "city",
            LandCompField::State => "state",
            LandCompField::Zoning => "zoning",
            LandCompField::SaleDate => "sale_date",
            LandCompField::SalePrice => "sale_price",
            LandCompField::SiteAreaAcres => "site_area_acres",
            LandCompField::PricePerSf => "price_per_sf",
            LandCompField::PricePerAcre => "price_per_acre",
            LandCompField::Buyer => "buyer",
            LandCompField::Seller => "seller",
            LandCompField::PursuitName => "pursuit_name",
            LandCompField::PursuitRegion => "pursuit_region",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LandCompField::Address => "Address",
            LandCompField::City => "City",
            LandCompField::State => "State",
            LandCompField::Zoning => "Zoning",
            LandCompField::SaleDate => "Sale Date",
            LandCompField::SalePrice => "Sale Price",
            LandCompField::SiteAreaAcres => "Acres",
            LandCompField::PricePerSf => "Price / SF",
            LandCompField::PricePerAcre => "Price / Acre",
            LandCompField::Buyer => "Buyer",
            LandCompField::Seller => "Seller",
            LandCompField::PursuitName => "Pursuit",
            LandCompField::PursuitRegion => "Pursuit Region",
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            LandCompField::SaleDate => FieldType::Date,
            LandCompField::SalePrice | LandCompField::PricePerSf | LandCompField::PricePerAcre => {
                FieldType::Currency
            }
            LandCompField::SiteAreaAcres => FieldType::Number,
            _ => FieldType::Text,
        }
    }

    /// Unit prices average; totals sum.
    pub fn aggregation(self) -> Option<AggregationMode> {
        match self {
            LandCompField::PricePerSf | LandCompField::PricePerAcre => Some(AggregationMode::Avg),
            _ => None,
        }
    }

    pub fn value(self, row: &LandCompReportRow) -> FieldValue {
        let comp = &row.comp;
        match self {
            LandCompField::Address => comp.address.as_deref().into(),
            LandCompField::City => comp.city.as_deref().into(),
            LandCompField::State => comp.state.as_deref().into(),
            LandCompField::Zoning => comp.zoning.as_deref().into(),
            LandCompField::SaleDate => comp.sale_date.as_deref().into(),
            LandCompField::SalePrice => comp.sale_price.into(),
            LandCompField::SiteAreaAcres => comp.site_area_acres().into(),
            LandCompField::PricePerSf => comp.price_per_sf().into(),
            LandCompField::PricePerAcre => comp.price_per_acre().into(),
            LandCompField::Buyer => comp.buyer.as_deref().into(),
            LandCompField::Seller => comp.seller.as_deref().into(),
            LandCompField::PursuitName => row.pursuit.as_ref().map(|p| p.name.as_str()).into(),
            LandCompField::PursuitRegion => row
                .pursuit
                .as_ref()
                .and_then(|p| p.region.as_deref())
                .into(),
        }
    }

    pub fn definition(self) -> FieldDefinition<LandCompReportRow> {
        let definition = FieldDefinition::new(
            self.label(),
            self.field_type(),
            move |row: &LandCompReportRow| self.value(row),
        );
        match self.aggregation() {
            Some(mode) => definition.with_aggregation(mode),
            None => definition,
        }
    }
}

impl FromStr for LandCompField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LandCompField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == s)
            .ok_or_else(|| ReportError::UnknownField(s.to_string()))
    }
}

/// Registry of every land comp field, in `LandCompField::ALL` order.
pub fn land_comp_registry() -> FieldRegistry<LandCompReportRow> {
    let mut registry = FieldRegistry::new();
    for field in LandCompField::ALL {
        registry.register(field.key(), field.definition());
    }
    registry
}
