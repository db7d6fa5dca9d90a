//! Isomorphism search between finite algebras
//!
//! Candidate bijections are pruned in two stages before any backtracking:
//!
//! - every element gets a fingerprint of isomorphism-invariant counts,
//!   and may only map to elements of the other algebra with the same one
//! - cyclic groups of equal order are matched directly through generators
//!
//! The remaining search assigns images one element at a time and rejects a
//! partial assignment as soon as an already-determined product disagrees.

use std::collections::HashMap;

use super::{Algebra, Kind, Table};
use crate::AlgebraError;

/// A structure-preserving bijection from one algebra onto another
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Isomorphism {
    mapping: Vec<usize>,
    labels: Vec<(String, String)>,
}

impl Isomorphism {
    fn new(source: &Algebra, target: &Algebra, mapping: Vec<usize>) -> Self {
        let labels = mapping
            .iter()
            .enumerate()
            .map(|(x, &y)| (source.element(x).to_string(), target.element(y).to_string()))
            .collect();
        Isomorphism { mapping, labels }
    }

    /// Image of source element `x`
    pub fn apply(&self, x: usize) -> usize {
        self.mapping[x]
    }

    /// `mapping()[x]` is the image of source element `x`
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// The bijection as source label → target label
    pub fn label_map(&self) -> HashMap<String, String> {
        self.labels.iter().cloned().collect()
    }

    /// The inverse bijection, as target index → source index
    pub fn inverse_mapping(&self) -> Vec<usize> {
        let mut inverse = vec![0; self.mapping.len()];
        for (x, &y) in self.mapping.iter().enumerate() {
            inverse[y] = x;
        }
        inverse
    }
}

/// Isomorphism-invariant summary of one element
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Fingerprint {
    order: Option<usize>,
    is_identity: bool,
    idempotent: bool,
    row_fixed: usize,
    column_fixed: usize,
    commuting: usize,
    row_distinct: usize,
    mult: Option<Box<Fingerprint>>,
}

impl Fingerprint {
    fn of(table: &Table, orders: &[Option<usize>], identity: Option<usize>, x: usize) -> Self {
        let n = table.order();
        let row = table.row(x);
        let mut distinct = vec![false; n];
        for &k in row.iter() {
            distinct[k] = true;
        }

        Fingerprint {
            order: orders[x],
            is_identity: identity == Some(x),
            idempotent: table.apply(x, x) == x,
            row_fixed: row.iter().filter(|&&k| k == x).count(),
            column_fixed: table.column(x).iter().filter(|&&k| k == x).count(),
            commuting: (0..n).filter(|&y| table.apply(x, y) == table.apply(y, x)).count(),
            row_distinct: distinct.iter().filter(|&&d| d).count(),
            mult: None,
        }
    }

    fn all(algebra: &Algebra) -> Vec<Fingerprint> {
        let props = algebra.properties();
        let mult = algebra.structure().multiplication();
        (0..algebra.order())
            .map(|x| {
                let mut fp = Fingerprint::of(algebra.table(), &props.element_orders, props.identity, x);
                if let Some(m) = mult {
                    let inner = Fingerprint::of(&m.table, &m.properties.element_orders, m.one(), x);
                    fp.mult = Some(Box::new(inner));
                }
                fp
            })
            .collect()
    }
}

/// Search for an isomorphism from `a` onto `b`
///
/// Returns the first structure-preserving bijection found, or `None` when the
/// orders differ, the signatures differ (one has a multiplication table and
/// the other does not), or no bijection survives the search.
pub fn isomorphic(a: &Algebra, b: &Algebra) -> Option<Isomorphism> {
    if a.order() != b.order()
        || a.kind() != b.kind()
        || a.mult_table().is_some() != b.mult_table().is_some()
        || a.is_commutative() != b.is_commutative()
    {
        return None;
    }

    if a.kind() == Kind::Group {
        if let (Some(ga), Some(gb)) = (a.find_generator(), b.find_generator()) {
            return Some(Isomorphism::new(a, b, match_generators(a, ga, b, gb)));
        }
    }

    let fa = Fingerprint::all(a);
    let fb = Fingerprint::all(b);
    let mut sorted_a = fa.clone();
    let mut sorted_b = fb.clone();
    sorted_a.sort();
    sorted_b.sort();
    if sorted_a != sorted_b {
        return None;
    }

    let mut by_fingerprint: HashMap<&Fingerprint, Vec<usize>> = HashMap::new();
    for (y, fp) in fb.iter().enumerate() {
        by_fingerprint.entry(fp).or_default().push(y);
    }
    let candidates: Vec<Vec<usize>> = fa
        .iter()
        .map(|fp| by_fingerprint.get(fp).cloned().unwrap_or_default())
        .collect();

    let mut search = Search::new(a, b, candidates);
    let found = search.run();
    tracing::debug!(
        source = %a.name(),
        target = %b.name(),
        order = a.order(),
        visited = search.visited,
        found = found.is_some(),
        "isomorphism search finished"
    );
    found.map(|mapping| Isomorphism::new(a, b, mapping))
}

/// Map `ga^k` to `gb^k` for cyclic algebras with generators `ga`, `gb`
fn match_generators(a: &Algebra, ga: usize, b: &Algebra, gb: usize) -> Vec<usize> {
    let mut mapping = vec![0; a.order()];
    let (mut pa, mut pb) = (ga, gb);
    for _ in 0..a.order() {
        mapping[pa] = pb;
        pa = a.apply(pa, ga);
        pb = b.apply(pb, gb);
    }
    mapping
}

/// Backtracking state for one search; dropped when the search returns
struct Search<'a> {
    tables: Vec<(&'a Table, &'a Table)>,
    candidates: Vec<Vec<usize>>,
    sequence: Vec<usize>,
    forward: Vec<Option<usize>>,
    used: Vec<bool>,
    assigned: Vec<usize>,
    visited: usize,
}

impl<'a> Search<'a> {
    fn new(a: &'a Algebra, b: &'a Algebra, candidates: Vec<Vec<usize>>) -> Self {
        let n = a.order();
        let mut tables = vec![(a.table(), b.table())];
        if let (Some(ma), Some(mb)) = (a.mult_table(), b.mult_table()) {
            tables.push((ma, mb));
        }

        // Most constrained elements first
        let mut sequence: Vec<usize> = (0..n).collect();
        sequence.sort_by_key(|&x| (candidates[x].len(), x));

        Search {
            tables,
            candidates,
            sequence,
            forward: vec![None; n],
            used: vec![false; n],
            assigned: Vec::with_capacity(n),
            visited: 0,
        }
    }

    fn run(&mut self) -> Option<Vec<usize>> {
        if self.extend(0) {
            self.forward.iter().copied().collect()
        } else {
            None
        }
    }

    fn extend(&mut self, depth: usize) -> bool {
        let Some(&x) = self.sequence.get(depth) else {
            return true;
        };

        for i in 0..self.candidates[x].len() {
            let y = self.candidates[x][i];
            if self.used[y] {
                continue;
            }
            self.visited += 1;
            self.forward[x] = Some(y);
            self.used[y] = true;
            self.assigned.push(x);

            if self.consistent(x) && self.extend(depth + 1) {
                return true;
            }

            self.assigned.pop();
            self.used[y] = false;
            self.forward[x] = None;
        }
        false
    }

    /// Check every product involving `x` and an assigned element, and every
    /// assigned pair whose product is `x`
    fn consistent(&self, x: usize) -> bool {
        let operands = self.assigned.iter().all(|&u| {
            self.tables.iter().all(|&(ta, tb)| {
                self.respects(ta, tb, x, u) && self.respects(ta, tb, u, x)
            })
        });
        operands && self.tables.iter().all(|&(ta, tb)| self.lands_on(ta, tb, x))
    }

    /// Products of assigned pairs that equal `x` must map onto the image of `x`
    fn lands_on(&self, ta: &Table, tb: &Table, x: usize) -> bool {
        let Some(fx) = self.forward[x] else {
            return true;
        };
        self.assigned.iter().all(|&u| {
            self.assigned.iter().all(|&v| match (self.forward[u], self.forward[v]) {
                (Some(fu), Some(fv)) if ta.apply(u, v) == x => tb.apply(fu, fv) == fx,
                _ => true,
            })
        })
    }

    fn respects(&self, ta: &Table, tb: &Table, x: usize, y: usize) -> bool {
        let (Some(fx), Some(fy)) = (self.forward[x], self.forward[y]) else {
            return true;
        };
        let product = ta.apply(x, y);
        let image = tb.apply(fx, fy);
        match self.forward[product] {
            Some(mapped) => mapped == image,
            // The product's image is forced; it must still be free and compatible
            None => !self.used[image] && self.candidates[product].contains(&image),
        }
    }
}

/// Whether `mapping` (source index → target index) is an isomorphism
pub fn is_isomorphism(a: &Algebra, b: &Algebra, mapping: &[usize]) -> crate::Result<bool> {
    let n = a.order();
    if b.order() != n {
        return Err(AlgebraError::OrderMismatch { expected: n, found: b.order() });
    }
    if mapping.len() != n {
        return Err(AlgebraError::OrderMismatch { expected: n, found: mapping.len() });
    }
    if a.mult_table().is_some() != b.mult_table().is_some() {
        return Ok(false);
    }

    let mut seen = vec![false; n];
    for &y in mapping {
        if y >= n || std::mem::replace(&mut seen[y], true) {
            return Ok(false);
        }
    }

    let mut pairs = vec![(a.table(), b.table())];
    if let (Some(ma), Some(mb)) = (a.mult_table(), b.mult_table()) {
        pairs.push((ma, mb));
    }
    Ok(pairs.iter().all(|(ta, tb)| {
        (0..n).all(|x| {
            (0..n).all(|y| mapping[ta.apply(x, y)] == tb.apply(mapping[x], mapping[y]))
        })
    }))
}

/// Group algebras into classes of mutually isomorphic ones, in input order
pub fn partition_isomorphic(algebras: &[Algebra]) -> Vec<Vec<&Algebra>> {
    let mut classes: Vec<Vec<&Algebra>> = Vec::new();
    for algebra in algebras {
        match classes
            .iter_mut()
            .find(|class| isomorphic(class[0], algebra).is_some())
        {
            Some(class) => class.push(algebra),
            None => classes.push(vec![algebra]),
        }
    }
    classes
}

impl Algebra {
    /// An element whose left-folded powers enumerate every element
    pub fn find_generator(&self) -> Option<usize> {
        let n = self.order();
        (0..n).find(|&x| {
            let mut seen = vec![false; n];
            let mut power = x;
            for _ in 0..n {
                seen[power] = true;
                power = self.apply(power, x);
            }
            seen.iter().all(|&s| s)
        })
    }

    /// Whether a single element generates the whole algebra
    pub fn is_cyclic(&self) -> bool {
        self.find_generator().is_some()
    }

    /// Whether some isomorphism onto `other` exists
    pub fn is_isomorphic_to(&self, other: &Algebra) -> bool {
        isomorphic(self, other).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{direct_product, AlgebraBuilder};

    fn cyclic(n: usize) -> Algebra {
        let labels: Vec<String> = (0..n)
            .map(|i| match i {
                0 => "e".to_string(),
                1 => "a".to_string(),
                _ => format!("a^{}", i),
            })
            .collect();
        AlgebraBuilder::new((0..n).map(|a| (0..n).map(|b| (a + b) % n).collect()).collect())
            .elements(labels)
            .name(format!("Z{}", n))
            .build()
            .unwrap()
    }

    fn klein() -> Algebra {
        AlgebraBuilder::new(vec![
            vec![0, 1, 2, 3],
            vec![1, 0, 3, 2],
            vec![2, 3, 0, 1],
            vec![3, 2, 1, 0],
        ])
        .elements(["e", "h", "v", "r"])
        .name("V4")
        .build()
        .unwrap()
    }

    #[test]
    fn test_klein_is_product_of_z2() {
        let z2 = cyclic(2);
        let p = direct_product(&z2, &z2).unwrap();
        let iso = isomorphic(&p, &klein()).expect("Z2 x Z2 should be isomorphic to V4");
        assert_eq!(iso.label_map()["e:e"], "e");
        assert!(is_isomorphism(&p, &klein(), iso.mapping()).unwrap());
    }

    #[test]
    fn test_z4_is_not_klein() {
        assert!(isomorphic(&cyclic(4), &klein()).is_none());
        assert!(cyclic(4).is_cyclic());
        assert!(!klein().is_cyclic());
    }

    #[test]
    fn test_cyclic_fast_path() {
        let z6 = cyclic(6);
        let z2_z3 = direct_product(&cyclic(2), &cyclic(3)).unwrap();
        let iso = isomorphic(&z6, &z2_z3).unwrap();
        assert_eq!(iso.apply(0), 0);
        assert!(is_isomorphism(&z6, &z2_z3, iso.mapping()).unwrap());
    }

    #[test]
    fn test_reordered_is_isomorphic() {
        let g = klein();
        let r = g.reorder(&[2, 3, 0, 1]).unwrap();
        let iso = isomorphic(&g, &r).unwrap();
        assert!(is_isomorphism(&g, &r, iso.mapping()).unwrap());
        let inverse = iso.inverse_mapping();
        assert!(is_isomorphism(&r, &g, &inverse).unwrap());
    }

    #[test]
    fn test_order_mismatch() {
        assert!(isomorphic(&cyclic(3), &cyclic(4)).is_none());
        assert_eq!(
            is_isomorphism(&cyclic(3), &cyclic(4), &[0, 1, 2]).unwrap_err(),
            AlgebraError::OrderMismatch { expected: 3, found: 4 }
        );
        assert_eq!(
            is_isomorphism(&cyclic(3), &cyclic(3), &[0, 1]).unwrap_err(),
            AlgebraError::OrderMismatch { expected: 3, found: 2 }
        );
        assert!(!is_isomorphism(&cyclic(3), &cyclic(3), &[0, 1, 1]).unwrap());
    }

    #[test]
    fn test_magma_search() {
        let rps = AlgebraBuilder::new(vec![vec![0, 1, 0], vec![1, 1, 2], vec![0, 2, 2]])
            .build()
            .unwrap();
        let shuffled = rps.reorder(&[1, 2, 0]).unwrap();
        let iso = isomorphic(&rps, &shuffled).unwrap();
        assert!(is_isomorphism(&rps, &shuffled, iso.mapping()).unwrap());
    }

    #[test]
    fn test_deferred_product_constraint() {
        // 0 * 1 == 0 is only decided once 0 itself is mapped
        let magma = AlgebraBuilder::new(vec![vec![2, 0, 0], vec![1, 0, 1], vec![2, 2, 0]])
            .build()
            .unwrap();
        let reversed = magma.reorder(&[2, 1, 0]).unwrap();
        let iso = isomorphic(&magma, &reversed).unwrap();
        assert!(is_isomorphism(&magma, &reversed, iso.mapping()).unwrap());
        assert_eq!(iso.mapping().to_vec(), vec![2, 1, 0]);
    }

    #[test]
    fn test_partition() {
        let z2 = cyclic(2);
        let list = vec![
            cyclic(4),
            klein(),
            direct_product(&z2, &z2).unwrap(),
            cyclic(4).reorder(&[0, 3, 2, 1]).unwrap(),
        ];
        let classes = partition_isomorphic(&list);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].len(), 2);
        assert_eq!(classes[1].len(), 2);
    }
}
