//! # Finite Algebras: Cayley tables from magmas to fields
//!
//! This library represents finite algebraic structures as explicit
//! binary-operation tables over a finite set of labelled elements. Hand it a
//! square table of element indices and it works out which laws hold and
//! names the structure accordingly.
//!
//! ## Features
//!
//! - **Tables**: validated Cayley tables with associativity, commutativity,
//!   identity and inverse checks
//! - **Classification**: Magma → Semigroup → Monoid → Group, and Ring/Field
//!   for two-table inputs
//! - **Direct products**: componentwise products over paired elements
//! - **Isomorphism**: pruned backtracking search for structure-preserving
//!   bijections, plus cyclic detection
//! - **Subalgebras**: closures, enumeration, lattices and normality checks

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core algebraic structures and operations
pub mod algebra;

/// Named families of algebras
pub mod generators;

/// Engine configuration
pub mod config;

/// Utility functions and helpers
pub mod utils;

// Re-export commonly used types
pub use algebra::{
    Algebra, AlgebraBuilder, Definition, Isomorphism, Kind, Properties, Structure,
    SubalgebraLattice, Table,
};
pub use algebra::{build, build_from_definition, direct_product, isomorphic};
pub use config::{ProductConfig, SubalgebraQuery};

use algebra::Side;

/// Error types for the library
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgebraError {
    /// Raw table has the wrong shape or out-of-range entries
    #[error("Malformed table: {0}")]
    MalformedTable(String),

    /// Element label used more than once
    #[error("Duplicate element name: {0}")]
    DuplicateElement(String),

    /// Element label not present in the algebra
    #[error("Unknown element: {0}")]
    UnknownElement(String),

    /// More than one element behaves as an identity
    #[error("Inconsistent identity: candidates {candidates:?}")]
    InconsistentIdentity {
        /// Every identity-like index found
        candidates: Vec<usize>,
    },

    /// Requested structure needs associativity
    #[error("The {operation} is not associative")]
    NotAssociative {
        /// Operation that failed the law
        operation: &'static str,
    },

    /// Requested structure needs commutativity
    #[error("The {operation} is not commutative")]
    NotCommutative {
        /// Operation that failed the law
        operation: &'static str,
    },

    /// Requested structure needs an identity element
    #[error("The {operation} has no identity element")]
    MissingIdentity {
        /// Operation that failed the law
        operation: &'static str,
    },

    /// Requested structure needs an inverse for every element
    #[error("The {operation} has insufficient inverses")]
    MissingInverses {
        /// Operation that failed the law
        operation: &'static str,
    },

    /// Multiplication does not distribute over addition
    #[error("Multiplication does not {side}-distribute over addition at ({a}, {b}, {c})")]
    NotDistributive {
        /// Side on which the law failed
        side: Side,
        /// Multiplier
        a: usize,
        /// First summand
        b: usize,
        /// Second summand
        c: usize,
    },

    /// Table satisfies a weaker class than the one requested
    #[error("Requested a {requested}, but the tables only form a {found}")]
    StructureMismatch {
        /// Class the caller asked for
        requested: Kind,
        /// Narrowest class actually satisfied
        found: Kind,
    },

    /// Orders are incompatible for the requested operation
    #[error("Order mismatch: expected {expected}, found {found}")]
    OrderMismatch {
        /// Order required
        expected: usize,
        /// Order supplied
        found: usize,
    },

    /// No subalgebra satisfies the request
    #[error("No subalgebra: {0}")]
    NoSubalgebra(String),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, AlgebraError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        algebra::{
            Algebra, AlgebraBuilder, Definition, Isomorphism, Kind, Properties, Structure,
            SubalgebraLattice, Table, build, build_from_definition, direct_product,
            direct_product_all, isomorphic, partition_isomorphic,
        },
        config::{ProductConfig, SubalgebraQuery},
        generators,
        Result, AlgebraError,
    };
}
