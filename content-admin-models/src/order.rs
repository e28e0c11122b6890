use serde::{Deserialize, Serialize};

/// One sort key of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderKey {
    pub column: String,
    pub ascending: bool,
    /// Place nulls before every non-null value.
    pub nulls_first: bool,
}

impl OrderKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
            nulls_first: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
            nulls_first: true,
        }
    }

    pub fn nulls_first(mut self, nulls_first: bool) -> Self {
        self.nulls_first = nulls_first;
        self
    }

    /// Render as a PostgREST order term, e.g. `order_index.asc.nullslast`.
    pub fn to_query(&self) -> String {
        format!(
            "{}.{}.{}",
            self.column,
            if self.ascending { "asc" } else { "desc" },
            if self.nulls_first {
                "nullsfirst"
            } else {
                "nullslast"
            }
        )
    }
}

/// Ordered list of sort keys; the first key is the primary one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub keys: Vec<OrderKey>,
}

impl OrderSpec {
    pub fn by(key: OrderKey) -> Self {
        Self { keys: vec![key] }
    }

    pub fn then(mut self, key: OrderKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The `order` query value, or `None` when the backend's natural order applies.
    pub fn to_query(&self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        Some(
            self.keys
                .iter()
                .map(OrderKey::to_query)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}
