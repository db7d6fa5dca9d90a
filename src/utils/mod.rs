//! Utility functions for finite algebras

use std::collections::HashMap;
use std::hash::Hash;

use crate::AlgebraError;

/// Convert a table of element labels into a table of indices
pub fn index_table_from_names<S: AsRef<str>>(
    elements: &[S],
    rows: &[Vec<S>],
) -> crate::Result<Vec<Vec<usize>>> {
    let lookup: HashMap<&str, usize> = elements
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_ref(), i))
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .map(|name| {
                    lookup
                        .get(name.as_ref())
                        .copied()
                        .ok_or_else(|| AlgebraError::UnknownElement(name.as_ref().to_string()))
                })
                .collect()
        })
        .collect()
}

/// Items that appear more than once, in order of first repetition
pub fn duplicates<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    let mut counts: HashMap<&T, usize> = HashMap::new();
    let mut result = Vec::new();
    for item in items {
        let count = counts.entry(item).or_insert(0);
        *count += 1;
        if *count == 2 {
            result.push(item.clone());
        }
    }
    result
}

/// Whether `n` is a prime number
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Greatest common divisor
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple
pub fn lcm(a: usize, b: usize) -> usize {
    if a == 0 || b == 0 {
        0
    } else {
        a / gcd(a, b) * b
    }
}

/// All subsets of `0..n` as bit masks, ordered by size then value
pub fn powerset_masks(n: usize) -> Vec<usize> {
    let mut masks: Vec<usize> = (0..(1usize << n)).collect();
    masks.sort_by_key(|m| (m.count_ones(), *m));
    masks
}

/// Members of `0..n` present in `mask`
pub fn mask_members(mask: usize, n: usize) -> Vec<usize> {
    (0..n).filter(|&i| (mask >> i) & 1 == 1).collect()
}
