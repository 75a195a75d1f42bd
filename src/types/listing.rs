use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value stored in a listing column that the index does not interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean column.
    Bool(bool),
    /// Integer column.
    Int(i64),
    /// Floating-point column.
    Float(f64),
    /// Anything else, kept verbatim.
    String(String),
}

impl FieldValue {
    /// Infers the narrowest value type for a raw CSV cell.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return FieldValue::Int(value);
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            return FieldValue::Float(value);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => FieldValue::Bool(true),
            "false" => FieldValue::Bool(false),
            _ => FieldValue::String(raw.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::String(value) => f.write_str(value),
        }
    }
}

/// A real-estate listing.
///
/// The index never mutates a listing once it is attached to a node; the five
/// named fields feed metric derivation and criteria filtering, and every other
/// source column rides along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// City the property is located in.
    pub city: String,
    /// Asking price.
    pub price: f64,
    /// Total surface.
    pub surface_total: f64,
    /// Number of bedrooms.
    pub bedrooms: u32,
    /// Number of bathrooms.
    pub bathrooms: u32,
    /// Remaining source columns.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, FieldValue>,
}

impl Listing {
    /// Creates a listing without extra columns.
    pub fn new(
        city: impl Into<String>,
        price: f64,
        surface_total: f64,
        bedrooms: u32,
        bathrooms: u32,
    ) -> Self {
        Self {
            city: city.into(),
            price,
            surface_total,
            bedrooms,
            bathrooms,
            extra: BTreeMap::new(),
        }
    }

    /// Attaches an extra column value, replacing any previous value.
    pub fn with_extra(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "city={} price={} surface_total={} bedrooms={} bathrooms={}",
            self.city, self.price, self.surface_total, self.bedrooms, self.bathrooms
        )?;
        for (name, value) in &self.extra {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}
