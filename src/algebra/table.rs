//! Cayley tables: one finite binary operation stored by element index

use std::fmt;
use ndarray::{Array2, ArrayView1};
use serde::{Serialize, Deserialize};

use crate::AlgebraError;

/// Orders at or above this size split the associativity check across threads
#[cfg(feature = "parallel")]
const PARALLEL_ORDER: usize = 64;

/// Which side of a product distributivity failed on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// a * (b + c) != a * b + a * c
    Left,
    /// (b + c) * a != b * a + c * a
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// A square table of element indices encoding a binary operation
///
/// - `table[i][j]` is the result of `i * j` (row = left operand)
/// - Every entry is a valid index, so closure holds by construction
/// - Immutable once built
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")]
pub struct Table {
    data: Array2<usize>,
}

impl Table {
    /// Create a table from rows of element indices
    pub fn new(rows: Vec<Vec<usize>>) -> crate::Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(AlgebraError::MalformedTable(
                "Table must have at least one row".to_string()
            ));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AlgebraError::MalformedTable(
                    format!("Row {} has length {}, expected {}", i, row.len(), n)
                ));
            }
        }

        let flat: Vec<usize> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((n, n), flat)
            .map_err(|e| AlgebraError::MalformedTable(e.to_string()))?;

        Self::from_array(data)
    }

    /// Create a table from an existing 2-D array
    pub fn from_array(data: Array2<usize>) -> crate::Result<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 || rows != cols {
            return Err(AlgebraError::MalformedTable(
                format!("Table must be square and non-empty, got {}x{}", rows, cols)
            ));
        }

        if let Some(((i, j), &value)) = data.indexed_iter().find(|(_, v)| **v >= rows) {
            return Err(AlgebraError::MalformedTable(
                format!("Entry ({}, {}) = {} is out of range 0..{}", i, j, value, rows)
            ));
        }

        Ok(Table { data })
    }

    /// Create a table from rows of element labels
    pub fn from_names<S: AsRef<str>>(elements: &[S], rows: &[Vec<S>]) -> crate::Result<Self> {
        let index_rows = crate::utils::index_table_from_names(elements, rows)?;
        Self::new(index_rows)
    }

    /// Number of elements the table operates on
    pub fn order(&self) -> usize {
        self.data.nrows()
    }

    /// Result of combining `i` with `j`
    ///
    /// # Panics
    ///
    /// If either index is `>= self.order()`.
    #[inline]
    pub fn apply(&self, i: usize, j: usize) -> usize {
        self.data[[i, j]]
    }

    /// All products with `i` on the left
    pub fn row(&self, i: usize) -> ArrayView1<'_, usize> {
        self.data.row(i)
    }

    /// All products with `j` on the right
    pub fn column(&self, j: usize) -> ArrayView1<'_, usize> {
        self.data.column(j)
    }

    /// Underlying array
    pub fn as_array(&self) -> &Array2<usize> {
        &self.data
    }

    /// Copy the table out as nested rows
    pub fn to_vec(&self) -> Vec<Vec<usize>> {
        self.data.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Render the table with element labels instead of indices
    ///
    /// # Panics
    ///
    /// If `elements` has fewer than `self.order()` labels.
    pub fn to_names<S: AsRef<str>>(&self, elements: &[S]) -> Vec<Vec<String>> {
        self.data
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&k| elements[k].as_ref().to_string()).collect())
            .collect()
    }

    /// Check `(i * j) * k == i * (j * k)` for every triple
    pub fn is_associative(&self) -> bool {
        let n = self.order();

        #[cfg(feature = "parallel")]
        if n >= PARALLEL_ORDER {
            use rayon::prelude::*;
            return (0..n).into_par_iter().all(|i| self.associative_from(i));
        }

        (0..n).all(|i| self.associative_from(i))
    }

    fn associative_from(&self, i: usize) -> bool {
        let n = self.order();
        for j in 0..n {
            let ij = self.apply(i, j);
            for k in 0..n {
                if self.apply(ij, k) != self.apply(i, self.apply(j, k)) {
                    return false;
                }
            }
        }
        true
    }

    /// Check `i * j == j * i` for every pair
    pub fn is_commutative(&self) -> bool {
        let n = self.order();
        (0..n).all(|i| ((i + 1)..n).all(|j| self.apply(i, j) == self.apply(j, i)))
    }

    /// Every index that behaves as a two-sided identity
    pub fn identity_candidates(&self) -> Vec<usize> {
        let n = self.order();
        (0..n)
            .filter(|&e| (0..n).all(|x| self.apply(e, x) == x && self.apply(x, e) == x))
            .collect()
    }

    /// First two-sided identity, if any
    ///
    /// More than one candidate is a data-quality anomaly; it is logged and
    /// the first candidate is returned. Use [`Table::identity_candidates`]
    /// to see all of them.
    pub fn find_identity(&self) -> Option<usize> {
        let candidates = self.identity_candidates();
        if candidates.len() > 1 {
            tracing::warn!(
                candidates = ?candidates,
                "Table has more than one identity-like element"
            );
        }
        candidates.first().copied()
    }

    /// Inverse of every element with respect to `identity`
    ///
    /// Returns `None` unless every element has a two-sided inverse.
    pub fn find_inverses(&self, identity: usize) -> Option<Vec<usize>> {
        let n = self.order();
        (0..n)
            .map(|x| {
                (0..n).find(|&y| self.apply(x, y) == identity && self.apply(y, x) == identity)
            })
            .collect()
    }

    /// Whether each row and each column is a permutation of the elements
    pub fn is_latin_square(&self) -> bool {
        let n = self.order();
        let is_permutation = |line: ArrayView1<'_, usize>| {
            let mut seen = vec![false; n];
            line.iter().all(|&k| !std::mem::replace(&mut seen[k], true))
        };
        (0..n).all(|i| is_permutation(self.row(i)) && is_permutation(self.column(i)))
    }

    /// Check whether this table (as multiplication) distributes over `addition`
    ///
    /// Returns the first failing `(side, a, b, c)` on violation.
    pub fn distributes_over(&self, addition: &Table) -> Result<(), (Side, usize, usize, usize)> {
        let n = self.order();
        for a in 0..n {
            for b in 0..n {
                for c in 0..n {
                    let sum = addition.apply(b, c);
                    let left = addition.apply(self.apply(a, b), self.apply(a, c));
                    if self.apply(a, sum) != left {
                        return Err((Side::Left, a, b, c));
                    }
                    let right = addition.apply(self.apply(b, a), self.apply(c, a));
                    if self.apply(sum, a) != right {
                        return Err((Side::Right, a, b, c));
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether `subset` is closed under this operation
    ///
    /// Out-of-range indices make the subset not closed.
    pub fn is_closed(&self, subset: &[usize]) -> bool {
        let mut member = vec![false; self.order()];
        for &x in subset {
            match member.get_mut(x) {
                Some(m) => *m = true,
                None => return false,
            }
        }
        subset
            .iter()
            .all(|&a| subset.iter().all(|&b| member[self.apply(a, b)]))
    }

    /// Table of the operation restricted to a closed `subset`
    ///
    /// Entries are re-indexed by position in `subset`. Returns `None` if the
    /// subset is empty, not closed or holds an out-of-range index.
    pub fn restrict(&self, subset: &[usize]) -> Option<Table> {
        let mut position = vec![None; self.order()];
        for (new, &old) in subset.iter().enumerate() {
            *position.get_mut(old)? = Some(new);
        }

        let m = subset.len();
        if m == 0 {
            return None;
        }
        let mut data = Array2::zeros((m, m));
        for (r, &a) in subset.iter().enumerate() {
            for (c, &b) in subset.iter().enumerate() {
                data[[r, c]] = position[self.apply(a, b)]?;
            }
        }
        Some(Table { data })
    }

    /// Table with elements relabelled so new index `i` is old `permutation[i]`
    pub(crate) fn permuted(&self, permutation: &[usize]) -> Table {
        let n = self.order();
        let mut position = vec![0; n];
        for (new, &old) in permutation.iter().enumerate() {
            position[old] = new;
        }
        let data = Array2::from_shape_fn((n, n), |(r, c)| {
            position[self.apply(permutation[r], permutation[c])]
        });
        Table { data }
    }
}

impl TryFrom<Vec<Vec<usize>>> for Table {
    type Error = AlgebraError;

    fn try_from(rows: Vec<Vec<usize>>) -> crate::Result<Self> {
        Table::new(rows)
    }
}

impl From<Table> for Vec<Vec<usize>> {
    fn from(table: Table) -> Self {
        table.to_vec()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table(order={})", self.order())?;
        for row in self.data.rows() {
            let cells: Vec<String> = row.iter().map(|k| k.to_string()).collect();
            writeln!(f, "  [{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
