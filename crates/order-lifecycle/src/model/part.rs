use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Catalog identifier of a part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(pub String);

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartCategory {
    Unknown,
    Engine,
    Fuel,
    Porthole,
    Wing,
}

/// A part in the catalog, with its current unit price and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub category: PartCategory,
    pub price: f64,
    pub stock_quantity: u32,
}

#[derive(Debug, Clone)]
pub struct PartCreate {
    pub name: String,
    pub category: PartCategory,
    pub price: f64,
    pub stock_quantity: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PartUpdate {
    pub price: Option<f64>,
    pub stock_quantity: Option<u32>,
}

/// Selects parts from the catalog.
///
/// Each non-empty field narrows the result; a part must match every non-empty field. An empty
/// filter selects the whole catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartsFilter {
    pub ids: Vec<PartId>,
    pub names: Vec<String>,
    pub categories: Vec<PartCategory>,
}

impl PartsFilter {
    pub fn by_ids(ids: impl IntoIterator<Item = PartId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn matches(&self, part: &Part) -> bool {
        (self.ids.is_empty() || self.ids.contains(&part.id))
            && (self.names.is_empty() || self.names.contains(&part.name))
            && (self.categories.is_empty() || self.categories.contains(&part.category))
    }
}
