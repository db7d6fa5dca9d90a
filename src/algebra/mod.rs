//! Finite algebras given by Cayley tables and the operations on them

mod table;
mod structure;
mod finite;
mod classify;
mod ring;
mod product;
mod isomorphism;
mod subalgebra;

pub use table::{Table, Side};
pub use structure::{Kind, Properties, Multiplication, Structure};
pub use finite::Algebra;
pub use classify::{AlgebraBuilder, Definition, build, build_from_definition};
pub use product::{direct_product, direct_product_with, direct_product_all};
pub use isomorphism::{Isomorphism, isomorphic, is_isomorphism, partition_isomorphic};
pub use subalgebra::{Subalgebras, SubalgebraLattice};
