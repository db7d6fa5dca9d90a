//! Named families of finite algebras
//!
//! Each generator writes out a table and hands it to the classifier, so the
//! returned algebra carries the same derived properties as any hand-built
//! one.

use itertools::Itertools;
use rand::Rng;

use crate::algebra::{Algebra, AlgebraBuilder, Kind};
use crate::utils::{mask_members, powerset_masks};
use crate::AlgebraError;

/// Cyclic group `Z{order}` with elements `e, a, a^2, ...`
pub fn cyclic_group(order: usize) -> crate::Result<Algebra> {
    let elements = (0..order).map(|i| match i {
        0 => "e".to_string(),
        1 => "a".to_string(),
        _ => format!("a^{}", i),
    });
    AlgebraBuilder::new(modular_table(order, |a, b| a + b))
        .elements(elements)
        .name(format!("Z{}", order))
        .description(format!("Autogenerated cyclic Group of order {}", order))
        .require(Kind::Group)
        .build()
}

/// Symmetric group `S{n}` of permutations of `1..=n`
///
/// Elements are labelled by their image tuples in lexicographic order, so
/// element 0 is the identity. The product `p * q` applies `q` first.
pub fn symmetric_group(n: usize) -> crate::Result<Algebra> {
    if n == 0 {
        return Err(AlgebraError::MalformedTable(
            "Symmetric group needs at least one point".to_string()
        ));
    }
    let perms: Vec<Vec<usize>> = (0..n).permutations(n).collect();
    let table = perms
        .iter()
        .map(|p| {
            perms
                .iter()
                .map(|q| {
                    let composed: Vec<usize> = q.iter().map(|&i| p[i]).collect();
                    perms.iter().position(|r| *r == composed).unwrap_or(0)
                })
                .collect()
        })
        .collect();
    let elements = perms
        .iter()
        .map(|p| format!("({})", p.iter().map(|i| i + 1).join(", ")));

    AlgebraBuilder::new(table)
        .elements(elements)
        .name(format!("S{}", n))
        .description(format!("Autogenerated symmetric Group on {} elements", n))
        .require(Kind::Group)
        .build()
}

/// Group on the subsets of `0..n` under symmetric difference
pub fn powerset_group(n: usize) -> crate::Result<Algebra> {
    let (elements, add, _) = powerset_tables(n);
    AlgebraBuilder::new(add)
        .elements(elements)
        .name(format!("PS{}", n))
        .description(format!(
            "Autogenerated Group on the powerset of {} elements, with symmetric difference operator",
            n
        ))
        .require(Kind::Group)
        .build()
}

/// Ring on the subsets of `0..n`: symmetric difference and intersection
pub fn powerset_ring(n: usize) -> crate::Result<Algebra> {
    let (elements, add, mult) = powerset_tables(n);
    AlgebraBuilder::new(add)
        .multiplication(mult)
        .elements(elements)
        .name(format!("PSRing{}", n))
        .description(format!(
            "Autogenerated Ring on powerset of {} elements w/ symm. diff. (add) & intersection (mult)",
            n
        ))
        .require(Kind::Ring)
        .build()
}

/// Integers modulo `order` under multiplication
pub fn commutative_monoid(order: usize) -> crate::Result<Algebra> {
    AlgebraBuilder::new(modular_table(order, |a, b| a * b))
        .elements((0..order).map(|i| format!("a{}", i)))
        .name(format!("M{}", order))
        .description(format!("Autogenerated commutative Monoid of order {}", order))
        .require(Kind::Monoid)
        .build()
}

/// Integers modulo `order` under addition and multiplication
pub fn commutative_ring(order: usize) -> crate::Result<Algebra> {
    AlgebraBuilder::new(modular_table(order, |a, b| a + b))
        .multiplication(modular_table(order, |a, b| a * b))
        .elements((0..order).map(|i| format!("a{}", i)))
        .name(format!("R{}", order))
        .description(format!("Autogenerated commutative Ring of order {}", order))
        .require(Kind::Ring)
        .build()
}

/// Field of integers modulo a prime
///
/// Any other order yields a ring that is not a field, reported as
/// `StructureMismatch`.
pub fn prime_field(order: usize) -> crate::Result<Algebra> {
    AlgebraBuilder::new(modular_table(order, |a, b| a + b))
        .multiplication(modular_table(order, |a, b| a * b))
        .name(format!("F{}", order))
        .description(format!("Autogenerated Field of order {}", order))
        .require(Kind::Field)
        .build()
}

/// Magma with a uniformly random table
pub fn random_magma<R: Rng>(order: usize, rng: &mut R) -> crate::Result<Algebra> {
    let table = (0..order)
        .map(|_| (0..order).map(|_| rng.gen_range(0..order)).collect())
        .collect();
    AlgebraBuilder::new(table)
        .name(format!("Random{}", order))
        .description(format!("Random Magma of order {}", order))
        .build()
}

fn modular_table(order: usize, op: impl Fn(usize, usize) -> usize) -> Vec<Vec<usize>> {
    (0..order)
        .map(|a| (0..order).map(|b| op(a, b) % order).collect())
        .collect()
}

/// Labels plus symmetric-difference and intersection tables over subsets
fn powerset_tables(n: usize) -> (Vec<String>, Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let masks = powerset_masks(n);
    let mut position = vec![0; masks.len()];
    for (i, &m) in masks.iter().enumerate() {
        position[m] = i;
    }

    let table = |op: fn(usize, usize) -> usize| -> Vec<Vec<usize>> {
        masks
            .iter()
            .map(|&a| masks.iter().map(|&b| position[op(a, b)]).collect())
            .collect()
    };
    let labels = masks
        .iter()
        .map(|&m| format!("{{{}}}", mask_members(m, n).iter().join(", ")))
        .collect();

    (labels, table(|a, b| a ^ b), table(|a, b| a & b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cyclic_group() {
        let z3 = cyclic_group(3).unwrap();
        assert_eq!(z3.elements(), &["e", "a", "a^2"]);
        assert_eq!(z3.kind(), Kind::Group);
        assert_eq!(z3.inverse(1), Some(2));
        assert_eq!(z3.order_of(1), Some(3));
        assert!(z3.is_cyclic());
        assert!(cyclic_group(0).is_err());
    }

    #[test]
    fn test_symmetric_group() {
        let s3 = symmetric_group(3).unwrap();
        assert_eq!(s3.order(), 6);
        assert_eq!(s3.kind(), Kind::Group);
        assert_eq!(s3.element(0), "(1, 2, 3)");
        assert_eq!(s3.identity(), Some(0));
        assert!(!s3.is_commutative());
        assert!(!s3.is_cyclic());

        assert_eq!(symmetric_group(1).unwrap().order(), 1);
        assert!(symmetric_group(0).is_err());
    }

    #[test]
    fn test_powerset_algebras() {
        let ps2 = powerset_group(2).unwrap();
        assert_eq!(ps2.elements(), &["{}", "{0}", "{1}", "{0, 1}"]);
        assert!((0..4).all(|x| ps2.order_of(x).map_or(false, |o| o <= 2)));

        let ring = powerset_ring(2).unwrap();
        assert_eq!(ring.kind(), Kind::Ring);
        assert_eq!(ring.one(), Some(3));
        assert_eq!(ring.zero_divisors(), vec![1, 2]);
    }

    #[test]
    fn test_modular_families() {
        assert_eq!(commutative_monoid(4).unwrap().kind(), Kind::Monoid);
        assert_eq!(commutative_ring(6).unwrap().kind(), Kind::Ring);
        assert_eq!(prime_field(7).unwrap().kind(), Kind::Field);
        for n in 1..12 {
            assert_eq!(prime_field(n).is_ok(), crate::utils::is_prime(n), "order {}", n);
        }

        let err = prime_field(4).unwrap_err();
        assert_eq!(
            err,
            AlgebraError::StructureMismatch { requested: Kind::Field, found: Kind::Ring }
        );
    }

    #[test]
    fn test_random_magma() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = random_magma(5, &mut rng).unwrap();
        assert_eq!(m.order(), 5);
        assert!(m.table().as_array().iter().all(|&x| x < 5));
        assert!(random_magma(0, &mut rng).is_err());
    }
}
