//! Ring and field queries on two-table algebras

use super::classify::classify;
use super::Algebra;

impl Algebra {
    /// Ring addition (the primary operation)
    pub fn add(&self, a: usize, b: usize) -> usize {
        self.apply(a, b)
    }

    /// Ring multiplication, for rings and fields
    pub fn mult(&self, a: usize, b: usize) -> Option<usize> {
        self.mult_table().map(|t| t.apply(a, b))
    }

    /// Additive identity
    pub fn zero(&self) -> Option<usize> {
        self.identity()
    }

    /// Multiplicative identity, if the ring has one
    pub fn one(&self) -> Option<usize> {
        self.structure().multiplication().and_then(|m| m.one())
    }

    /// Multiplicative inverse of `x`, where one exists
    pub fn reciprocal(&self, x: usize) -> Option<usize> {
        self.structure()
            .multiplication()
            .and_then(|m| m.reciprocals.get(x).copied().flatten())
    }

    /// Non-zero `a` for which some non-zero `b` gives `a * b == 0` or `b * a == 0`
    pub fn zero_divisors(&self) -> Vec<usize> {
        let (Some(mult), Some(zero)) = (self.mult_table(), self.zero()) else {
            return Vec::new();
        };
        let n = self.order();
        (0..n)
            .filter(|&a| a != zero)
            .filter(|&a| {
                (0..n)
                    .filter(|&b| b != zero)
                    .any(|b| mult.apply(a, b) == zero || mult.apply(b, a) == zero)
            })
            .collect()
    }

    /// The addition on its own, classified as a single-table algebra
    pub fn additive_algebra(&self) -> crate::Result<Algebra> {
        classify(
            format!("{}.Add", self.name()),
            format!("Additive-only portion of {}", self.name()),
            self.elements().to_vec(),
            self.table().clone(),
            None,
            None,
        )
    }

    /// The multiplication on its own, for rings and fields
    pub fn multiplicative_algebra(&self) -> Option<crate::Result<Algebra>> {
        let mult = self.mult_table()?;
        Some(classify(
            format!("{}.Mult", self.name()),
            format!("Multiplicative-only portion of {}", self.name()),
            self.elements().to_vec(),
            mult.clone(),
            None,
            None,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::algebra::AlgebraBuilder;
    use crate::{Algebra, Kind};

    fn zn_ring(n: usize) -> Algebra {
        AlgebraBuilder::new((0..n).map(|a| (0..n).map(|b| (a + b) % n).collect()).collect())
            .multiplication((0..n).map(|a| (0..n).map(|b| (a * b) % n).collect()).collect())
            .name(format!("R{}", n))
            .build()
            .unwrap()
    }

    #[test]
    fn test_ring_identities() {
        let r = zn_ring(6);
        assert_eq!(r.kind(), Kind::Ring);
        assert_eq!(r.zero(), Some(0));
        assert_eq!(r.one(), Some(1));
        assert_eq!(r.mult(2, 3), Some(0));
        assert_eq!(r.add(4, 5), 3);
        assert_eq!(r.reciprocal(5), Some(5));
        assert_eq!(r.reciprocal(2), None);
        assert_eq!(r.reciprocal(6), None);
    }

    #[test]
    fn test_zero_divisors() {
        assert_eq!(zn_ring(6).zero_divisors(), vec![2, 3, 4]);
        assert!(zn_ring(5).zero_divisors().is_empty());
    }

    #[test]
    fn test_extract_parts() {
        let r = zn_ring(4);
        let add = r.additive_algebra().unwrap();
        assert_eq!(add.kind(), Kind::Group);
        assert_eq!(add.name(), "R4.Add");

        let mult = r.multiplicative_algebra().unwrap().unwrap();
        assert_eq!(mult.kind(), Kind::Monoid);
        assert!(add.multiplicative_algebra().is_none());
    }
}
