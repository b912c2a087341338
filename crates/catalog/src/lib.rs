//! Product catalog definitions and lookup for the ZPL labeler.
//!
//! The catalog is a YAML document loaded once at startup and treated as
//! read-only for the life of the process:
//!
//! ```yaml
//! products:
//!   AB-HONEY-250:
//!     name_sv: Akaciahonung
//!     weight: 250 g
//!     ...
//! common:
//!   company: Cuppino AB
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default shelf life used to suggest a best-before date, in months.
pub const DEFAULT_SHELF_LIFE_MONTHS: u32 = 24;

/// Errors that can occur when loading a product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        /// Path of the catalog file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// YAML deserialization failed.
    #[error("invalid catalog YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// A product entry failed validation.
    #[error("invalid product {sku}: {reason}")]
    InvalidProduct {
        /// The SKU of the offending product.
        sku: String,
        /// A human-readable explanation of why the entry is invalid.
        reason: String,
    },
}

/// A single sellable product and the attributes printed on its label.
///
/// Field names on the wire match the catalog file (`name_sv`, `disposal_sv`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Display name printed on the label.
    #[serde(rename = "name_sv")]
    pub name: String,
    /// Net weight, as printed (e.g. `"250 g"`).
    pub weight: String,
    /// Packaging disposal instructions.
    #[serde(rename = "disposal_sv")]
    pub disposal: String,
    /// URL encoded into the label's QR code.
    pub qr_url: String,
    /// Producer name and address.
    pub producer: String,
    /// Importer name and address.
    pub importer: String,
    /// Country of origin.
    pub origin: String,
    /// Label layout identifier.
    pub label_type: String,
    /// Default batch code, if the product has a fixed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}

/// Display grouping derived from a SKU prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductGroup {
    /// `AB-` SKUs.
    Honey,
    /// `NAT-` SKUs.
    OliveOil,
    /// Anything else.
    Other,
}

impl ProductGroup {
    /// Classify a SKU by its prefix.
    pub fn of(sku: &str) -> Self {
        if sku.starts_with("AB-") {
            ProductGroup::Honey
        } else if sku.starts_with("NAT-") {
            ProductGroup::OliveOil
        } else {
            ProductGroup::Other
        }
    }

    /// Heading shown for the group on the selection page.
    pub fn title(self) -> &'static str {
        match self {
            ProductGroup::Honey => "Honey",
            ProductGroup::OliveOil => "Olive oil",
            ProductGroup::Other => "Other",
        }
    }
}

/// The full product catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    /// Products keyed by SKU.
    pub products: BTreeMap<String, Product>,
    /// Shared values (company details, notes) shown alongside the products.
    #[serde(default)]
    pub common: BTreeMap<String, serde_yaml::Value>,
}

impl Catalog {
    /// Look up a product by SKU.
    pub fn get(&self, sku: &str) -> Option<&Product> {
        self.products.get(sku)
    }

    /// Products bucketed by [`ProductGroup`], each bucket ordered by SKU.
    pub fn grouped(&self) -> BTreeMap<ProductGroup, Vec<(&str, &Product)>> {
        let mut groups: BTreeMap<ProductGroup, Vec<(&str, &Product)>> = BTreeMap::new();
        for (sku, product) in &self.products {
            groups
                .entry(ProductGroup::of(sku))
                .or_default()
                .push((sku.as_str(), product));
        }
        groups
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Resolve the batch code printed on a label.
///
/// Precedence: a non-blank `requested` value, then the product's own batch,
/// then the SKU itself.
pub fn resolve_batch(sku: &str, product: &Product, requested: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .or(product.batch.as_deref())
        .unwrap_or(sku)
        .to_string()
}

/// Suggest a best-before date `months` (30-day) months after `today`.
pub fn suggest_best_before(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(months) * 30))
        .unwrap_or(NaiveDate::MAX)
}

/// Load and validate a catalog from a YAML file.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_catalog_from_str(&text)
}

/// Parse and validate a catalog from a YAML string.
pub fn load_catalog_from_str(s: &str) -> Result<Catalog, CatalogError> {
    let catalog: Catalog = serde_yaml::from_str(s)?;

    for (sku, product) in &catalog.products {
        if sku.trim().is_empty() {
            return Err(CatalogError::InvalidProduct {
                sku: sku.clone(),
                reason: "SKU must not be empty".into(),
            });
        }
        if product.name.trim().is_empty() {
            return Err(CatalogError::InvalidProduct {
                sku: sku.clone(),
                reason: "name_sv must not be empty".into(),
            });
        }
    }

    Ok(catalog)
}
