use ahash::AHashMap;
use clap::ValueEnum;
use serde::Deserialize;
use tracing::warn;

use crate::value::{NestedValue, Scalar};

pub const DEFAULT_SEPARATOR: &str = "_";

const PRODUCTS_KEY: &str = "products";
const ITEMS_KEY: &str = "items";

// (output column, source field)
const PRODUCT_FIELDS: [(&str, &str); 3] = [
    ("product_name", "name"),
    ("product_price", "price"),
    ("product_quantity", "quantity"),
];
const ITEM_FIELDS: [(&str, &str); 4] = [
    ("item_code", "code"),
    ("item_name", "name"),
    ("item_price", "price"),
    ("item_quantity", "quantity"),
];

/// How a document turns into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlattenMode {
    /// One row per `products[].items[]` pair, arrays dropped from the generic columns.
    #[default]
    ExpandItems,
    /// One row per document, arrays written as JSON text.
    SingleRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayPolicy {
    Skip,
    Serialize,
}

/// Insertion-ordered `compound key -> cell` map.
///
/// Inserting a key that is already present replaces the value and keeps the
/// original position.
#[derive(Debug, Clone, Default)]
pub struct FlatRecord {
    fields: Vec<(String, Scalar)>,
    index: AHashMap<String, usize>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value that was overwritten, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Scalar) -> Option<Scalar> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.fields[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.fields.len());
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.index.get(key).map(|&pos| &self.fields[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for FlatRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, Scalar)>>(iter: I) -> Self {
        let mut record = FlatRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[derive(Debug, Clone)]
pub struct Flattener {
    mode: FlattenMode,
    separator: String,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(FlattenMode::default(), DEFAULT_SEPARATOR)
    }
}

impl Flattener {
    pub fn new(mode: FlattenMode, separator: impl Into<String>) -> Self {
        Self {
            mode,
            separator: separator.into(),
        }
    }

    pub fn mode(&self) -> FlattenMode {
        self.mode
    }

    /// Flatten one document. Zero records is a normal outcome, not an error.
    pub fn flatten(&self, doc: &NestedValue) -> Vec<FlatRecord> {
        let Some(fields) = doc.as_object() else {
            warn!("document root is not an object; no rows produced");
            return Vec::new();
        };

        match self.mode {
            FlattenMode::ExpandItems => self.expand_items(fields),
            FlattenMode::SingleRow => {
                let mut record = FlatRecord::new();
                self.flatten_into(fields.iter(), "", ArrayPolicy::Serialize, &mut record);
                vec![record]
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  EXPAND: one row per (product, item) pair
    // ─────────────────────────────────────────────────────────────
    fn expand_items(&self, fields: &[(String, NestedValue)]) -> Vec<FlatRecord> {
        let products = match fields.iter().find(|(k, _)| k == PRODUCTS_KEY) {
            Some((_, NestedValue::Array(products))) => products,
            _ => return Vec::new(),
        };

        // Same for every row of this document; computed once and cloned.
        let mut base = FlatRecord::new();
        self.flatten_into(
            fields.iter().filter(|(k, _)| k != PRODUCTS_KEY),
            "",
            ArrayPolicy::Skip,
            &mut base,
        );

        let mut out = Vec::new();
        for product in products {
            let items = match product.get(ITEMS_KEY) {
                Some(NestedValue::Array(items)) => items.as_slice(),
                _ => &[],
            };

            for item in items {
                let mut row = base.clone();
                // Fixed columns win over generic ones of the same name.
                for (column, field) in PRODUCT_FIELDS {
                    row.insert(column, Scalar::from_field(product.get(field)));
                }
                for (column, field) in ITEM_FIELDS {
                    row.insert(column, Scalar::from_field(item.get(field)));
                }
                out.push(row);
            }
        }
        out
    }

    // ─────────────────────────────────────────────────────────────
    //  GENERIC PASS: nested objects → compound keys
    // ─────────────────────────────────────────────────────────────

    /// Walk an object, writing leaves under `prefix + key`.
    ///
    /// Later keys overwrite earlier identical compound keys, in document order.
    fn flatten_into<'a>(
        &self,
        fields: impl Iterator<Item = &'a (String, NestedValue)>,
        prefix: &str,
        arrays: ArrayPolicy,
        out: &mut FlatRecord,
    ) {
        for (key, value) in fields {
            let compound = format!("{prefix}{key}");
            let cell = match value {
                NestedValue::Object(children) => {
                    let nested_prefix = format!("{compound}{}", self.separator);
                    self.flatten_into(children.iter(), &nested_prefix, arrays, out);
                    continue;
                }
                NestedValue::Array(_) => match arrays {
                    ArrayPolicy::Skip => continue,
                    ArrayPolicy::Serialize => Scalar::Text(value.to_json_text()),
                },
                scalar => Scalar::from_field(Some(scalar)),
            };

            if out.insert(compound.as_str(), cell).is_some() {
                warn!(key = %compound, "compound key collision; keeping the later value");
            }
        }
    }
}
