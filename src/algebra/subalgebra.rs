//! Subalgebras: closures, enumeration, lattices and normal subgroups

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::classify::classify;
use super::{isomorphism::partition_isomorphic, Algebra, Kind};
use crate::config::SubalgebraQuery;
use crate::AlgebraError;

impl Algebra {
    /// Smallest closed set of elements containing `subset`
    ///
    /// Closure is taken under every operation, and under inverses whenever
    /// the primary operation has them. The result is sorted. Fails with
    /// `UnknownElement` on an out-of-range index.
    pub fn closure(&self, subset: &[usize]) -> crate::Result<Vec<usize>> {
        if let Some(&bad) = subset.iter().find(|&&x| x >= self.order()) {
            return Err(AlgebraError::UnknownElement(bad.to_string()));
        }
        Ok(self.closed_over(subset))
    }

    /// Closure of a subset already known to be in range
    fn closed_over(&self, subset: &[usize]) -> Vec<usize> {
        let n = self.order();
        let mut member = vec![false; n];
        let mut list = Vec::new();

        let insert = |x: usize, member: &mut Vec<bool>, list: &mut Vec<usize>| {
            if !member[x] {
                member[x] = true;
                list.push(x);
            }
            if let Some(inv) = self.inverse(x) {
                if !member[inv] {
                    member[inv] = true;
                    list.push(inv);
                }
            }
        };

        for &x in subset {
            insert(x, &mut member, &mut list);
        }

        let tables: Vec<_> = std::iter::once(self.table()).chain(self.mult_table()).collect();
        let mut i = 0;
        while i < list.len() {
            let x = list[i];
            for j in 0..=i {
                let y = list[j];
                for table in &tables {
                    insert(table.apply(x, y), &mut member, &mut list);
                    insert(table.apply(y, x), &mut member, &mut list);
                }
            }
            i += 1;
        }

        list.sort_unstable();
        list
    }

    /// Whether `subset` is closed under every operation
    pub fn is_closed(&self, subset: &[usize]) -> bool {
        self.table().is_closed(subset) && self.mult_table().map_or(true, |t| t.is_closed(subset))
    }

    /// Build the subalgebra on a closed set of elements
    ///
    /// Elements keep their parent order and labels. Fails with
    /// `NoSubalgebra` if the set is empty or not closed.
    pub fn subalgebra_from_elements(
        &self,
        subset: &[usize],
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> crate::Result<Algebra> {
        let n = self.order();
        if let Some(&bad) = subset.iter().find(|&&x| x >= n) {
            return Err(AlgebraError::UnknownElement(bad.to_string()));
        }
        let mut sorted = subset.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        if sorted.is_empty() || !self.is_closed(&sorted) {
            return Err(AlgebraError::NoSubalgebra(
                format!("{:?} is not a closed subset of {}", sorted, self.name())
            ));
        }
        self.restrict_to(&sorted, name.into(), description.into())
    }

    /// Build the subalgebra on the elements with the given labels
    pub fn subalgebra_from_labels(
        &self,
        labels: &[&str],
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> crate::Result<Algebra> {
        let subset = labels
            .iter()
            .map(|label| self.require_index(label))
            .collect::<crate::Result<Vec<_>>>()?;
        self.subalgebra_from_elements(&subset, name, description)
    }

    fn restrict_to(&self, closed: &[usize], name: String, description: String) -> crate::Result<Algebra> {
        let not_closed = || {
            AlgebraError::NoSubalgebra(format!("{:?} is not closed in {}", closed, self.name()))
        };
        let table = self.table().restrict(closed).ok_or_else(not_closed)?;
        let mult = match self.mult_table() {
            Some(t) => Some(t.restrict(closed).ok_or_else(not_closed)?),
            None => None,
        };
        let elements = closed.iter().map(|&x| self.element(x).to_string()).collect();
        classify(name, description, elements, table, mult, None)
    }

    /// Lazily enumerate the subalgebras matching `query`, smallest first
    ///
    /// Each call starts a fresh enumeration.
    pub fn subalgebras(&self, query: &SubalgebraQuery) -> crate::Result<Subalgebras<'_>> {
        query.validate()?;
        Ok(Subalgebras {
            sets: ClosedSets::new(self, query.clone()),
            count: 0,
        })
    }

    /// All non-trivial proper subalgebras
    pub fn proper_subalgebras(&self) -> Vec<Algebra> {
        Subalgebras {
            sets: ClosedSets::new(self, SubalgebraQuery::proper()),
            count: 0,
        }
        .collect()
    }

    /// Some subalgebra with exactly `order` elements
    pub fn subalgebra_of_order(&self, order: usize) -> crate::Result<Algebra> {
        self.subalgebras(&SubalgebraQuery::of_order(order))?
            .next()
            .ok_or_else(|| {
                AlgebraError::NoSubalgebra(
                    format!("{} has no subalgebra of order {}", self.name(), order)
                )
            })
    }

    /// Inclusion lattice of every subalgebra
    pub fn subalgebra_lattice(&self) -> SubalgebraLattice {
        SubalgebraLattice::new(ClosedSets::new(self, SubalgebraQuery::all()).collect())
    }

    /// Subalgebras that are maximal among the proper ones
    pub fn maximal_subalgebras(&self) -> Vec<Algebra> {
        let lattice = self.subalgebra_lattice();
        lattice
            .maximal()
            .into_iter()
            .enumerate()
            .filter_map(|(i, set)| {
                self.restrict_to(
                    set,
                    format!("{}_maximal_{}", self.name(), i),
                    format!("Maximal subalgebra of: {}", self.description()),
                )
                .ok()
            })
            .collect()
    }

    /// Whether the subgroup on `elements` is closed under conjugation
    pub fn is_normal_subset(&self, elements: &[usize]) -> crate::Result<bool> {
        self.require_group()?;
        let mut member = vec![false; self.order()];
        for &h in elements {
            if h >= self.order() {
                return Err(AlgebraError::UnknownElement(h.to_string()));
            }
            member[h] = true;
        }
        if elements.is_empty() || !self.is_closed(elements) {
            return Err(AlgebraError::NoSubalgebra(
                format!("{:?} is not a subgroup of {}", elements, self.name())
            ));
        }

        Ok((0..self.order()).all(|g| {
            elements
                .iter()
                .all(|&h| self.conjugate(h, g).map_or(false, |c| member[c]))
        }))
    }

    /// Whether `subgroup`, matched to this group by element label, is normal
    pub fn is_normal(&self, subgroup: &Algebra) -> crate::Result<bool> {
        let elements = subgroup
            .elements()
            .iter()
            .map(|label| self.require_index(label))
            .collect::<crate::Result<Vec<_>>>()?;
        self.is_normal_subset(&elements)
    }

    /// The identity subgroup and the whole group
    pub fn trivial_subgroups(&self) -> crate::Result<Vec<Algebra>> {
        let identity = self.require_group()?;
        let trivial = self.restrict_to(
            &[identity],
            format!("Subgroup of {}", self.name()),
            format!("Trivial subgroup: {}", self.description()),
        )?;
        Ok(vec![trivial, self.clone()])
    }

    /// Every subgroup, trivial ones included, smallest first
    pub fn subgroups(&self) -> crate::Result<Vec<Algebra>> {
        self.require_group()?;
        Ok(self.subalgebras(&SubalgebraQuery::all())?.collect())
    }

    /// One proper subgroup from each isomorphism class
    pub fn unique_proper_subgroups(&self) -> crate::Result<Vec<Algebra>> {
        self.require_group()?;
        let proper = self.proper_subalgebras();
        Ok(partition_isomorphic(&proper)
            .into_iter()
            .map(|class| class[0].clone())
            .collect())
    }

    fn require_group(&self) -> crate::Result<usize> {
        match (self.is_associative(), self.identity(), self.has_inverses()) {
            (true, Some(identity), true) => Ok(identity),
            _ => Err(AlgebraError::StructureMismatch {
                requested: Kind::Group,
                found: self.kind(),
            }),
        }
    }
}

/// Closed element sets in increasing size
///
/// Every subalgebra is reachable from the closure of one of its elements by
/// repeatedly adding an element and closing again, so expanding each set
/// by every outside element visits them all.
struct ClosedSets<'a> {
    parent: &'a Algebra,
    query: SubalgebraQuery,
    heap: BinaryHeap<Reverse<(usize, Vec<usize>)>>,
    seen: HashSet<Vec<usize>>,
}

impl<'a> ClosedSets<'a> {
    fn new(parent: &'a Algebra, query: SubalgebraQuery) -> Self {
        let mut sets = ClosedSets {
            parent,
            query,
            heap: BinaryHeap::new(),
            seen: HashSet::new(),
        };
        for x in 0..parent.order() {
            let closed = parent.closed_over(&[x]);
            sets.offer(closed);
        }
        sets
    }

    fn offer(&mut self, set: Vec<usize>) {
        if self.seen.insert(set.clone()) {
            self.heap.push(Reverse((set.len(), set)));
        }
    }
}

impl Iterator for ClosedSets<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let n = self.parent.order();
        while let Some(Reverse((size, set))) = self.heap.pop() {
            let can_grow = self.query.order.map_or(true, |order| size < order);
            if can_grow {
                let mut member = vec![false; n];
                for &x in &set {
                    member[x] = true;
                }
                for x in (0..n).filter(|&x| !member[x]) {
                    let mut seed = set.clone();
                    seed.push(x);
                    let closed = self.parent.closed_over(&seed);
                    self.offer(closed);
                }
            }

            if self.query.accepts(size, n) {
                return Some(set);
            }
        }
        None
    }
}

/// Lazy, restartable enumeration of subalgebras
pub struct Subalgebras<'a> {
    sets: ClosedSets<'a>,
    count: usize,
}

impl Iterator for Subalgebras<'_> {
    type Item = Algebra;

    fn next(&mut self) -> Option<Algebra> {
        let parent = self.sets.parent;
        for set in self.sets.by_ref() {
            let name = format!("{}_subalgebra_{}", parent.name(), self.count);
            let description = format!("Subalgebra of: {}", parent.description());
            match parent.restrict_to(&set, name, description) {
                Ok(algebra) => {
                    self.count += 1;
                    tracing::debug!(
                        parent = %parent.name(),
                        order = algebra.order(),
                        kind = %algebra.kind(),
                        "found subalgebra"
                    );
                    return Some(algebra);
                }
                Err(e) => {
                    tracing::warn!(parent = %parent.name(), error = %e, "closed subset failed to rebuild");
                }
            }
        }
        None
    }
}

/// Hasse diagram of subalgebras ordered by inclusion
///
/// Nodes are sorted element sets; an edge `S -> T` means `T` covers `S`.
#[derive(Clone, Debug)]
pub struct SubalgebraLattice {
    graph: DiGraph<Vec<usize>, ()>,
}

impl SubalgebraLattice {
    fn new(sets: Vec<Vec<usize>>) -> Self {
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = sets.into_iter().map(|s| graph.add_node(s)).collect();

        let subset = |a: &[usize], b: &[usize]| a.len() < b.len() && a.iter().all(|x| b.binary_search(x).is_ok());
        for &lower in &nodes {
            for &upper in &nodes {
                if !subset(graph[lower].as_slice(), graph[upper].as_slice()) {
                    continue;
                }
                let covered = nodes.iter().any(|&mid| {
                    subset(graph[lower].as_slice(), graph[mid].as_slice())
                        && subset(graph[mid].as_slice(), graph[upper].as_slice())
                });
                if !covered {
                    graph.add_edge(lower, upper, ());
                }
            }
        }
        SubalgebraLattice { graph }
    }

    /// Underlying graph
    pub fn graph(&self) -> &DiGraph<Vec<usize>, ()> {
        &self.graph
    }

    /// Number of subalgebras
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the lattice has no nodes
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Every subalgebra's element set, smallest first
    pub fn members(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.graph.node_indices().map(move |node| self.graph[node].as_slice())
    }

    /// Maximal proper subalgebras: those covered by the whole algebra
    pub fn maximal(&self) -> Vec<&[usize]> {
        let Some(top) = self
            .graph
            .externals(Direction::Outgoing)
            .max_by_key(|&node| self.graph[node].len())
        else {
            return Vec::new();
        };
        let mut result: Vec<&[usize]> = self
            .graph
            .neighbors_directed(top, Direction::Incoming)
            .map(|node| self.graph[node].as_slice())
            .collect();
        result.sort();
        result
    }

    /// Minimal subalgebras: those covering nothing
    pub fn minimal(&self) -> Vec<&[usize]> {
        let mut result: Vec<&[usize]> = self
            .graph
            .externals(Direction::Incoming)
            .map(|node| self.graph[node].as_slice())
            .collect();
        result.sort();
        result
    }

    /// Subalgebras covering `set` directly
    pub fn covers(&self, set: &[usize]) -> Vec<&[usize]> {
        let Some(node) = self.graph.node_indices().find(|&n| self.graph[n] == set) else {
            return Vec::new();
        };
        let mut result: Vec<&[usize]> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|n| self.graph[n].as_slice())
            .collect();
        result.sort();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::AlgebraBuilder;

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

    fn cyclic(n: usize) -> Algebra {
        AlgebraBuilder::new((0..n).map(|a| (0..n).map(|b| (a + b) % n).collect()).collect())
            .name(format!("Z{}", n))
            .build()
            .unwrap()
    }

    /// S3 as permutations of {0, 1, 2}, composed right to left
    fn s3() -> Algebra {
        let perms: [[usize; 3]; 6] = [
            [0, 1, 2], [1, 2, 0], [2, 0, 1], [0, 2, 1], [2, 1, 0], [1, 0, 2],
        ];
        let table = perms
            .iter()
            .map(|p| {
                perms
                    .iter()
                    .map(|q| {
                        let composed = [p[q[0]], p[q[1]], p[q[2]]];
                        perms.iter().position(|r| *r == composed).unwrap()
                    })
                    .collect()
            })
            .collect();
        AlgebraBuilder::new(table).name("S3").build().unwrap()
    }

    #[test]
    fn test_closure() {
        let g = klein();
        assert_eq!(g.closure(&[1]).unwrap(), vec![0, 1]);
        assert_eq!(g.closure(&[1, 2]).unwrap(), vec![0, 1, 2, 3]);
        assert!(g.closure(&[]).unwrap().is_empty());
        assert_eq!(cyclic(6).closure(&[2]).unwrap(), vec![0, 2, 4]);
        assert_eq!(g.closure(&[4]), Err(AlgebraError::UnknownElement("4".to_string())));
        assert!(!g.is_closed(&[0, 4]));
    }

    #[test]
    fn test_klein_subgroups_all_normal() {
        let g = klein();
        let proper = g.proper_subalgebras();
        assert_eq!(proper.len(), 3);
        for h in &proper {
            assert_eq!(h.order(), 2);
            assert_eq!(h.kind(), Kind::Group);
            assert!(g.is_normal(h).unwrap());
        }
        assert_eq!(g.subgroups().unwrap().len(), 5);
    }

    #[test]
    fn test_s3_has_non_normal_subgroup() {
        let g = s3();
        assert!(!g.is_commutative());
        let subgroups = g.subgroups().unwrap();
        assert_eq!(subgroups.len(), 6);
        let normal: Vec<bool> = subgroups.iter().map(|h| g.is_normal(h).unwrap()).collect();
        assert!(normal.iter().any(|&n| !n));
        // The rotation subgroup {id, r, r^2} is normal
        assert!(g.is_normal_subset(&[0, 1, 2]).unwrap());
        assert!(!g.is_normal_subset(&[0, 3]).unwrap());
    }

    #[test]
    fn test_unique_proper_subgroups() {
        let unique = s3().unique_proper_subgroups().unwrap();
        let mut orders: Vec<usize> = unique.iter().map(Algebra::order).collect();
        orders.sort();
        assert_eq!(orders, vec![2, 3]);
    }

    #[test]
    fn test_subalgebra_from_elements() {
        let g = klein();
        let h = g.subalgebra_from_elements(&[3, 0], "R", "rotations").unwrap();
        assert_eq!(h.elements(), &["e", "r"]);
        assert_eq!(h.kind(), Kind::Group);

        let err = g.subalgebra_from_elements(&[1, 2], "x", "y").unwrap_err();
        assert!(matches!(err, AlgebraError::NoSubalgebra(_)));

        let by_label = g.subalgebra_from_labels(&["e", "v"], "V", "").unwrap();
        assert_eq!(by_label.order(), 2);
        assert!(g.subalgebra_from_labels(&["e", "q"], "Q", "").is_err());
    }

    #[test]
    fn test_subalgebra_of_order() {
        let g = cyclic(6);
        assert_eq!(g.subalgebra_of_order(3).unwrap().order(), 3);
        let err = g.subalgebra_of_order(4).unwrap_err();
        assert!(matches!(err, AlgebraError::NoSubalgebra(_)));
        assert!(g.subalgebra_of_order(0).is_err());
    }

    #[test]
    fn test_enumeration_is_restartable_and_sorted() {
        let g = cyclic(12);
        let first: Vec<usize> = g.subalgebras(&SubalgebraQuery::all()).unwrap().map(|h| h.order()).collect();
        let second: Vec<usize> = g.subalgebras(&SubalgebraQuery::all()).unwrap().map(|h| h.order()).collect();
        assert_eq!(first, vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_lattice() {
        let lattice = cyclic(12).subalgebra_lattice();
        assert_eq!(lattice.len(), 6);
        let maximal: Vec<&[usize]> = vec![&[0, 2, 4, 6, 8, 10], &[0, 3, 6, 9]];
        assert_eq!(lattice.maximal(), maximal);
        let minimal: Vec<&[usize]> = vec![&[0]];
        assert_eq!(lattice.minimal(), minimal);
        let above_zero: Vec<&[usize]> = vec![&[0, 4, 8], &[0, 6]];
        assert_eq!(lattice.covers(&[0]), above_zero);

        let maximal = klein().maximal_subalgebras();
        assert_eq!(maximal.len(), 3);
    }

    #[test]
    fn test_magma_subalgebras() {
        // Rock-paper-scissors: every single element is idempotent
        let rps = AlgebraBuilder::new(vec![vec![0, 1, 0], vec![1, 1, 2], vec![0, 2, 2]])
            .build()
            .unwrap();
        let proper = rps.proper_subalgebras();
        assert_eq!(proper.len(), 3);
        assert!(rps.is_normal_subset(&[0]).is_err());
        assert!(rps.trivial_subgroups().is_err());
    }
}
