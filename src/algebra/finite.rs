//! The classified finite algebra and its read accessors

use std::fmt;
use serde::Serialize;

use super::classify::{classify, Definition};
use super::{Kind, Properties, Structure, Table};
use crate::AlgebraError;

/// A finite algebra: labelled elements, one or two tables and cached properties
///
/// - Element `i` is identified by its index; labels are for display only
/// - Derived properties are computed once, when the algebra is classified
/// - Immutable: products, reorderings and subalgebras return new algebras
#[derive(Clone, Debug, Serialize)]
pub struct Algebra {
    name: String,
    description: String,
    elements: Vec<String>,
    table: Table,
    structure: Structure,
    #[serde(skip)]
    warnings: Vec<AlgebraError>,
}

impl Algebra {
    pub(crate) fn from_parts(
        name: String,
        description: String,
        elements: Vec<String>,
        table: Table,
        structure: Structure,
        warnings: Vec<AlgebraError>,
    ) -> Self {
        Algebra { name, description, elements, table, structure, warnings }
    }

    /// Name of the algebra
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Element labels, indexed by element
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Label of element `i`
    ///
    /// # Panics
    ///
    /// If `i >= self.order()`.
    pub fn element(&self, i: usize) -> &str {
        &self.elements[i]
    }

    /// Index of the element with the given label
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.elements.iter().position(|e| e == label)
    }

    /// Whether an element with this label exists
    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    /// Number of elements
    pub fn order(&self) -> usize {
        self.elements.len()
    }

    /// Classification tag
    pub fn kind(&self) -> Kind {
        self.structure.kind()
    }

    /// Classification tag with its derived properties
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Derived properties of the primary operation
    pub fn properties(&self) -> &Properties {
        self.structure.properties()
    }

    /// Primary (for rings, additive) table
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Multiplicative table, for rings and fields
    pub fn mult_table(&self) -> Option<&Table> {
        self.structure.multiplication().map(|m| &m.table)
    }

    /// Anomalies noticed during classification that did not abort it
    pub fn warnings(&self) -> &[AlgebraError] {
        &self.warnings
    }

    /// Combine `i` and `j` with the primary operation
    ///
    /// # Panics
    ///
    /// If either index is `>= self.order()`.
    #[inline]
    pub fn apply(&self, i: usize, j: usize) -> usize {
        self.table.apply(i, j)
    }

    /// Combine two elements by label
    pub fn apply_named(&self, a: &str, b: &str) -> crate::Result<&str> {
        let i = self.require_index(a)?;
        let j = self.require_index(b)?;
        Ok(self.element(self.apply(i, j)))
    }

    /// Combine any number of elements left to right
    ///
    /// The empty product is the identity, if there is one.
    pub fn fold(&self, items: &[usize]) -> Option<usize> {
        match items.split_first() {
            None => self.identity(),
            Some((&first, rest)) => Some(rest.iter().fold(first, |acc, &x| self.apply(acc, x))),
        }
    }

    /// Identity of the primary operation
    pub fn identity(&self) -> Option<usize> {
        self.properties().identity
    }

    /// Whether the primary operation has an identity
    pub fn has_identity(&self) -> bool {
        self.identity().is_some()
    }

    /// Inverse of `x`, when every element has one and `x` is in range
    pub fn inverse(&self, x: usize) -> Option<usize> {
        self.properties().inverses.as_ref().and_then(|inv| inv.get(x).copied())
    }

    /// Whether every element has an inverse
    pub fn has_inverses(&self) -> bool {
        self.properties().inverses.is_some()
    }

    /// Order of `x`: smallest `k > 0` with `x^k` equal to the identity
    pub fn order_of(&self, x: usize) -> Option<usize> {
        self.properties().element_orders.get(x).copied().flatten()
    }

    /// Orders of all elements
    pub fn element_orders(&self) -> &[Option<usize>] {
        &self.properties().element_orders
    }

    /// Whether the primary operation is associative
    pub fn is_associative(&self) -> bool {
        self.properties().is_associative
    }

    /// Whether the primary operation is commutative
    pub fn is_commutative(&self) -> bool {
        self.properties().is_commutative
    }

    /// Same as [`Algebra::is_commutative`]
    pub fn is_abelian(&self) -> bool {
        self.is_commutative()
    }

    /// `g * a * g⁻¹`, when inverses exist and both indices are in range
    pub fn conjugate(&self, a: usize, g: usize) -> Option<usize> {
        if a >= self.order() {
            return None;
        }
        let g_inv = self.inverse(g)?;
        Some(self.apply(g, self.apply(a, g_inv)))
    }

    /// New algebra whose element `i` is this algebra's element `permutation[i]`
    pub fn reorder(&self, permutation: &[usize]) -> crate::Result<Algebra> {
        let n = self.order();
        if permutation.len() != n {
            return Err(AlgebraError::OrderMismatch { expected: n, found: permutation.len() });
        }
        let mut seen = vec![false; n];
        for &p in permutation {
            if p >= n || std::mem::replace(&mut seen[p], true) {
                return Err(AlgebraError::MalformedTable(
                    format!("{:?} is not a permutation of 0..{}", permutation, n)
                ));
            }
        }

        let elements = permutation.iter().map(|&p| self.elements[p].clone()).collect();
        classify(
            format!("{}_REORDERED", self.name),
            format!("{} (elements reordered)", self.description),
            elements,
            self.table.permuted(permutation),
            self.mult_table().map(|t| t.permuted(permutation)),
            None,
        )
    }

    /// Serde-ready record of the algebra's defining data
    pub fn to_definition(&self) -> Definition {
        Definition {
            name: self.name.clone(),
            description: self.description.clone(),
            elements: self.elements.clone(),
            table: self.table.clone(),
            table2: self.mult_table().cloned(),
        }
    }

    pub(crate) fn require_index(&self, label: &str) -> crate::Result<usize> {
        self.index_of(label)
            .ok_or_else(|| AlgebraError::UnknownElement(label.to_string()))
    }
}

/// Algebras are equal when their labels and tables are equal
impl PartialEq for Algebra {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
            && self.table == other.table
            && self.mult_table() == other.mult_table()
    }
}

impl Eq for Algebra {}

impl fmt::Display for Algebra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.kind(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use crate::algebra::AlgebraBuilder;
    use crate::{AlgebraError, Kind};

    fn z3() -> crate::Algebra {
        AlgebraBuilder::new(vec![vec![0, 1, 2], vec![1, 2, 0], vec![2, 0, 1]])
            .elements(["e", "a", "a^2"])
            .name("Z3")
            .build()
            .unwrap()
    }

    #[test]
    fn test_accessors() {
        let g = z3();
        assert_eq!(g.kind(), Kind::Group);
        assert_eq!(g.order(), 3);
        assert_eq!(g.identity(), Some(0));
        assert_eq!(g.inverse(1), Some(2));
        assert_eq!(g.order_of(1), Some(3));
        assert_eq!(g.apply_named("a", "a").unwrap(), "a^2");
        assert!(g.apply_named("a", "b").is_err());
        assert_eq!(g.to_string(), "<Group:Z3>");
    }

    #[test]
    fn test_out_of_range_queries() {
        let g = z3();
        assert_eq!(g.inverse(3), None);
        assert_eq!(g.order_of(3), None);
        assert_eq!(g.conjugate(3, 1), None);
        assert_eq!(g.conjugate(1, 3), None);
    }

    #[test]
    fn test_fold() {
        let g = z3();
        assert_eq!(g.fold(&[]), Some(0));
        assert_eq!(g.fold(&[1]), Some(1));
        assert_eq!(g.fold(&[1, 1, 1, 2]), Some(2));
    }

    #[test]
    fn test_conjugate_in_abelian_group() {
        let g = z3();
        for a in 0..3 {
            for x in 0..3 {
                assert_eq!(g.conjugate(a, x), Some(a));
            }
        }
    }

    #[test]
    fn test_reorder() {
        let g = z3();
        let r = g.reorder(&[2, 0, 1]).unwrap();
        assert_eq!(r.elements(), &["a^2", "e", "a"]);
        assert_eq!(r.identity(), Some(1));
        assert_eq!(r.apply_named("a", "a").unwrap(), "a^2");
        assert_eq!(r.name(), "Z3_REORDERED");

        assert_eq!(
            g.reorder(&[0, 1]).unwrap_err(),
            AlgebraError::OrderMismatch { expected: 3, found: 2 }
        );
        assert!(matches!(g.reorder(&[0, 0, 1]), Err(AlgebraError::MalformedTable(_))));
    }

    #[test]
    fn test_equality_ignores_name() {
        let a = z3();
        let b = AlgebraBuilder::new(a.table().to_vec())
            .elements(["e", "a", "a^2"])
            .name("Other")
            .build()
            .unwrap();
        assert_eq!(a, b);
    }
}
