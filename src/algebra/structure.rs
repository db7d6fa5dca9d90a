//! Classification tags and the derived properties cached with each algebra

use std::fmt;
use serde::{Serialize, Deserialize};

use super::Table;

/// The algebraic class of a finite algebra, from weakest to strongest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    /// Closed binary operation, nothing more
    Magma,
    /// Associative magma
    Semigroup,
    /// Semigroup with identity
    Monoid,
    /// Monoid where every element has an inverse
    Group,
    /// Commutative additive group with a distributive associative multiplication
    Ring,
    /// Ring whose non-zero elements form a multiplicative group
    Field,
}

impl Kind {
    /// Whether the class needs a second (multiplicative) table
    pub fn has_two_operations(self) -> bool {
        matches!(self, Kind::Ring | Kind::Field)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Magma => "Magma",
            Kind::Semigroup => "Semigroup",
            Kind::Monoid => "Monoid",
            Kind::Group => "Group",
            Kind::Ring => "Ring",
            Kind::Field => "Field",
        };
        f.write_str(name)
    }
}

/// Properties derived once from a single table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    /// `(a * b) * c == a * (b * c)` everywhere
    pub is_associative: bool,
    /// `a * b == b * a` everywhere
    pub is_commutative: bool,
    /// Two-sided identity, if one exists
    pub identity: Option<usize>,
    /// `inverses[x]` is the inverse of `x`; only present when every element has one
    pub inverses: Option<Vec<usize>>,
    /// Smallest `k > 0` with `x^k == identity`; `None` when undefined
    pub element_orders: Vec<Option<usize>>,
}

impl Properties {
    /// Compute every property of `table`
    pub fn derive(table: &Table) -> Self {
        let identity = table.find_identity();
        let inverses = identity.and_then(|e| table.find_inverses(e));
        let element_orders = (0..table.order())
            .map(|x| identity.and_then(|e| element_order(table, x, e)))
            .collect();

        Properties {
            is_associative: table.is_associative(),
            is_commutative: table.is_commutative(),
            identity,
            inverses,
            element_orders,
        }
    }

    /// Narrowest single-table class these properties satisfy
    pub fn kind(&self) -> Kind {
        match (self.is_associative, self.identity, &self.inverses) {
            (false, _, _) => Kind::Magma,
            (true, None, _) => Kind::Semigroup,
            (true, Some(_), None) => Kind::Monoid,
            (true, Some(_), Some(_)) => Kind::Group,
        }
    }
}

/// Order of `x` by left-folded powers `((x * x) * x) ...`
///
/// Returns `None` if the powers cycle without reaching `identity`.
fn element_order(table: &Table, x: usize, identity: usize) -> Option<usize> {
    let mut power = x;
    for k in 1..=table.order() {
        if power == identity {
            return Some(k);
        }
        power = table.apply(power, x);
    }
    None
}

/// The multiplicative half of a ring or field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplication {
    /// Multiplication table
    pub table: Table,
    /// Properties of the multiplication on its own
    pub properties: Properties,
    /// Multiplicative inverse of each element, where one exists
    pub reciprocals: Vec<Option<usize>>,
}

impl Multiplication {
    /// Derive the multiplicative side from its table
    pub fn derive(table: Table) -> Self {
        let properties = Properties::derive(&table);
        let n = table.order();
        let reciprocals = (0..n)
            .map(|x| {
                properties.identity.and_then(|one| {
                    (0..n).find(|&y| table.apply(x, y) == one && table.apply(y, x) == one)
                })
            })
            .collect();

        Multiplication { table, properties, reciprocals }
    }

    /// Multiplicative identity
    pub fn one(&self) -> Option<usize> {
        self.properties.identity
    }

    /// Whether the non-zero elements form a group under this multiplication
    pub fn nonzero_form_group(&self, zero: usize) -> bool {
        let n = self.table.order();
        if self.one().map_or(true, |one| one == zero) {
            return false;
        }

        let closed = (0..n)
            .filter(|&a| a != zero)
            .all(|a| (0..n).filter(|&b| b != zero).all(|b| self.table.apply(a, b) != zero));

        closed
            && self.properties.is_associative
            && self
                .reciprocals
                .iter()
                .enumerate()
                .all(|(x, r)| x == zero || matches!(r, Some(y) if *y != zero))
    }
}

/// Classification tag together with the properties it makes meaningful
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Structure {
    /// See [`Kind::Magma`]
    Magma(Properties),
    /// See [`Kind::Semigroup`]
    Semigroup(Properties),
    /// See [`Kind::Monoid`]
    Monoid(Properties),
    /// See [`Kind::Group`]
    Group(Properties),
    /// See [`Kind::Ring`]
    Ring {
        /// Properties of addition (the primary table)
        addition: Properties,
        /// Multiplicative table and its properties
        multiplication: Box<Multiplication>,
    },
    /// See [`Kind::Field`]
    Field {
        /// Properties of addition (the primary table)
        addition: Properties,
        /// Multiplicative table and its properties
        multiplication: Box<Multiplication>,
    },
}

impl Structure {
    /// Wrap single-table properties in the narrowest matching variant
    pub fn from_properties(properties: Properties) -> Self {
        match properties.kind() {
            Kind::Magma => Structure::Magma(properties),
            Kind::Semigroup => Structure::Semigroup(properties),
            Kind::Monoid => Structure::Monoid(properties),
            _ => Structure::Group(properties),
        }
    }

    /// Classification tag
    pub fn kind(&self) -> Kind {
        match self {
            Structure::Magma(_) => Kind::Magma,
            Structure::Semigroup(_) => Kind::Semigroup,
            Structure::Monoid(_) => Kind::Monoid,
            Structure::Group(_) => Kind::Group,
            Structure::Ring { .. } => Kind::Ring,
            Structure::Field { .. } => Kind::Field,
        }
    }

    /// Properties of the primary (additive, for rings) operation
    pub fn properties(&self) -> &Properties {
        match self {
            Structure::Magma(p)
            | Structure::Semigroup(p)
            | Structure::Monoid(p)
            | Structure::Group(p) => p,
            Structure::Ring { addition, .. } | Structure::Field { addition, .. } => addition,
        }
    }

    /// Multiplicative side, for rings and fields
    pub fn multiplication(&self) -> Option<&Multiplication> {
        match self {
            Structure::Ring { multiplication, .. } | Structure::Field { multiplication, .. } => {
                Some(&**multiplication)
            }
            _ => None,
        }
    }
}
