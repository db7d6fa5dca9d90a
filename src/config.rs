//! Configuration for products and subalgebra queries

use serde::{Serialize, Deserialize};

use crate::AlgebraError;

/// How direct products are assembled
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Joins factor labels into product labels, e.g. `"a:b"`
    pub delimiter: String,
    /// Re-run the classifier on group products and compare with the
    /// directly assembled properties
    pub verify: bool,
}

impl ProductConfig {
    /// Config using a custom label delimiter
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        ProductConfig {
            delimiter: delimiter.into(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.delimiter.is_empty() {
            return Err(AlgebraError::InvalidConfig(
                "Product delimiter must not be empty".to_string()
            ));
        }
        Ok(())
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        ProductConfig {
            delimiter: ":".to_string(),
            verify: true,
        }
    }
}

/// Constraints on which subalgebras an enumeration yields
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubalgebraQuery {
    /// Only subalgebras of exactly this order
    pub order: Option<usize>,
    /// Include single-element subalgebras
    pub include_trivial: bool,
    /// Include the algebra itself
    pub include_whole: bool,
}

impl SubalgebraQuery {
    /// Non-trivial proper subalgebras
    pub fn proper() -> Self {
        SubalgebraQuery {
            order: None,
            include_trivial: false,
            include_whole: false,
        }
    }

    /// Every subalgebra, the trivial ones and the whole algebra included
    pub fn all() -> Self {
        SubalgebraQuery {
            order: None,
            include_trivial: true,
            include_whole: true,
        }
    }

    /// Subalgebras of exactly `order` elements
    pub fn of_order(order: usize) -> Self {
        SubalgebraQuery {
            order: Some(order),
            ..Self::all()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.order == Some(0) {
            return Err(AlgebraError::InvalidConfig(
                "Subalgebras have at least one element".to_string()
            ));
        }
        Ok(())
    }

    /// Whether a closed subset of `size` elements in an algebra of `parent`
    /// elements passes this query
    pub fn accepts(&self, size: usize, parent: usize) -> bool {
        if let Some(order) = self.order {
            return size == order;
        }
        (self.include_trivial || size > 1) && (self.include_whole || size < parent)
    }
}

impl Default for SubalgebraQuery {
    fn default() -> Self {
        Self::proper()
    }
}
