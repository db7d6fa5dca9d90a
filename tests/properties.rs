//! Property-based checks of table laws, products and isomorphisms

use finite_algebras::generators::{cyclic_group, random_magma};
use finite_algebras::prelude::*;
use finite_algebras::algebra::is_isomorphism;
use itertools::Itertools;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Whether any permutation of the elements is an isomorphism
fn exhaustively_isomorphic(a: &Algebra, b: &Algebra) -> bool {
    let n = a.order();
    n == b.order()
        && (0..n)
            .permutations(n)
            .any(|p| is_isomorphism(a, b, &p).unwrap_or(false))
}

/// Search result must agree with exhaustive search, and any mapping must hold
fn check_against_exhaustive(a: &Algebra, b: &Algebra) {
    let found = isomorphic(a, b);
    assert_eq!(
        found.is_some(),
        exhaustively_isomorphic(a, b),
        "a = {:?}, b = {:?}",
        a.table().to_vec(),
        b.table().to_vec()
    );
    if let Some(iso) = found {
        assert!(is_isomorphism(a, b, iso.mapping()).unwrap());
    }
}

/// Square tables of order 1..=5 with in-range entries
fn table_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..=5).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0..n, n), n)
    })
}

/// Two tables of the same order 2..=4
fn table_pair() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<Vec<usize>>)> {
    (2usize..=4).prop_flat_map(|n| {
        let table = prop::collection::vec(prop::collection::vec(0..n, n), n);
        (table.clone(), table)
    })
}

/// A table together with a permutation of its elements
fn table_and_permutation() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<usize>)> {
    table_strategy().prop_flat_map(|table| {
        let n = table.len();
        (Just(table), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn test_apply_is_total_and_closed(rows in table_strategy()) {
        let n = rows.len();
        let algebra = build(rows).unwrap();
        for i in 0..n {
            for j in 0..n {
                prop_assert!(algebra.apply(i, j) < n);
            }
        }
    }

    #[test]
    fn test_product_order_law(m in 1usize..6, n in 1usize..6) {
        let a = cyclic_group(m).unwrap();
        let b = cyclic_group(n).unwrap();
        let product = direct_product(&a, &b).unwrap();
        prop_assert_eq!(product.order(), m * n);
        prop_assert_eq!(product.kind(), Kind::Group);
        prop_assert_eq!(product.is_cyclic(), finite_algebras::utils::gcd(m, n) == 1);
    }

    #[test]
    fn test_reorder_is_isomorphic((rows, permutation) in table_and_permutation()) {
        let algebra = build(rows).unwrap();
        let reordered = algebra.reorder(&permutation).unwrap();
        prop_assert_eq!(reordered.kind(), algebra.kind());

        let iso = isomorphic(&algebra, &reordered);
        prop_assert!(iso.is_some());
        let iso = iso.unwrap();
        prop_assert!(is_isomorphism(&algebra, &reordered, iso.mapping()).unwrap());
    }

    #[test]
    fn test_classification_round_trip(rows in table_strategy()) {
        let algebra = build(rows).unwrap();
        let rebuilt = build(algebra.table().to_vec()).unwrap();
        prop_assert_eq!(rebuilt.properties(), algebra.properties());

        let restored = build_from_definition(algebra.to_definition()).unwrap();
        prop_assert_eq!(&restored, &algebra);
    }

    #[test]
    fn test_closure_is_closed(rows in table_strategy(), seed in 0usize..5) {
        let algebra = build(rows).unwrap();
        let x = seed % algebra.order();
        let closed = algebra.closure(&[x]).unwrap();
        prop_assert!(closed.contains(&x));
        prop_assert!(algebra.is_closed(&closed));
    }

    #[test]
    fn test_element_orders_divide_group_order(n in 1usize..13) {
        let group = cyclic_group(n).unwrap();
        for x in 0..n {
            let order = group.order_of(x).unwrap();
            prop_assert_eq!(n % order, 0);
        }
    }

    #[test]
    fn test_search_matches_exhaustive_on_pairs((left, right) in table_pair()) {
        let a = build(left).unwrap();
        let b = build(right).unwrap();
        check_against_exhaustive(&a, &b);
    }
}

#[test]
fn test_search_matches_exhaustive_across_seeds() {
    for seed in 0..600u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let order = 2 + (seed as usize) % 4;
        let a = random_magma(order, &mut rng).unwrap();

        let mut permutation: Vec<usize> = (0..order).collect();
        permutation.shuffle(&mut rng);
        let shuffled = a.reorder(&permutation).unwrap();
        check_against_exhaustive(&a, &shuffled);

        let reversed: Vec<usize> = (0..order).rev().collect();
        check_against_exhaustive(&a, &a.reorder(&reversed).unwrap());

        let other = random_magma(order, &mut rng).unwrap();
        check_against_exhaustive(&a, &other);
    }
}
