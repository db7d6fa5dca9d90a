//! Direct products of finite algebras

use ndarray::Array2;

use super::classify::classify;
use super::{Algebra, Kind, Properties, Structure, Table};
use crate::config::ProductConfig;
use crate::AlgebraError;

/// Direct product `a × b` with the default configuration
pub fn direct_product(a: &Algebra, b: &Algebra) -> crate::Result<Algebra> {
    direct_product_with(a, b, &ProductConfig::default())
}

/// Direct product `a × b`
///
/// The pair `(x, y)` becomes element `x * b.order() + y`, labelled
/// `"x{delimiter}y"`. Rings multiply both tables componentwise; any other
/// pairing uses the primary tables only.
pub fn direct_product_with(
    a: &Algebra,
    b: &Algebra,
    config: &ProductConfig,
) -> crate::Result<Algebra> {
    config.validate()?;

    let n = b.order();
    let name = format!("{}_x_{}", a.name(), b.name());
    let description = format!("Direct product of {} & {}", a.name(), b.name());
    let elements: Vec<String> = a
        .elements()
        .iter()
        .flat_map(|x| {
            b.elements()
                .iter()
                .map(move |y| format!("{}{}{}", x, config.delimiter, y))
        })
        .collect();

    let table = product_table(a.table(), b.table())?;
    let multiplication = match (a.mult_table(), b.mult_table()) {
        (Some(ta), Some(tb)) => Some(product_table(ta, tb)?),
        _ => None,
    };

    let both_groups = a.properties().kind() == Kind::Group && b.properties().kind() == Kind::Group;
    if multiplication.is_some() || !both_groups {
        return classify(name, description, elements, table, multiplication, None);
    }

    if let Some(dup) = crate::utils::duplicates(&elements).into_iter().next() {
        return Err(AlgebraError::DuplicateElement(dup));
    }

    let structure = Structure::Group(group_product_properties(a.properties(), b.properties(), n));
    if config.verify {
        let checked = classify(
            name.clone(),
            description.clone(),
            elements.clone(),
            table.clone(),
            None,
            None,
        )?;
        if checked.structure() != &structure {
            tracing::warn!(
                product = %name,
                "assembled group product disagrees with classification; using classification"
            );
            return Ok(checked);
        }
    }

    Ok(Algebra::from_parts(name, description, elements, table, structure, Vec::new()))
}

/// Left-folded product of several factors: `((a × b) × c) × ...`
pub fn direct_product_all(factors: &[&Algebra]) -> crate::Result<Algebra> {
    let (first, rest) = factors.split_first().ok_or_else(|| {
        AlgebraError::MalformedTable("Direct product needs at least one factor".to_string())
    })?;

    rest.iter()
        .try_fold((*first).clone(), |acc, factor| direct_product(&acc, factor))
}

/// Componentwise table over flattened pairs
fn product_table(ta: &Table, tb: &Table) -> crate::Result<Table> {
    let n = tb.order();
    let size = ta.order() * n;
    let data = Array2::from_shape_fn((size, size), |(r, c)| {
        ta.apply(r / n, c / n) * n + tb.apply(r % n, c % n)
    });
    Table::from_array(data)
}

/// Properties of a product of two groups, read off the factors
fn group_product_properties(pa: &Properties, pb: &Properties, n: usize) -> Properties {
    let pair = |x: usize, y: usize| x * n + y;
    let identity = match (pa.identity, pb.identity) {
        (Some(ea), Some(eb)) => Some(pair(ea, eb)),
        _ => None,
    };
    let inverses = match (&pa.inverses, &pb.inverses) {
        (Some(ia), Some(ib)) => Some(
            ia.iter()
                .flat_map(|&x| ib.iter().map(move |&y| pair(x, y)))
                .collect(),
        ),
        _ => None,
    };
    let element_orders = pa
        .element_orders
        .iter()
        .flat_map(|&oa| {
            pb.element_orders.iter().map(move |&ob| match (oa, ob) {
                (Some(x), Some(y)) => Some(crate::utils::lcm(x, y)),
                _ => None,
            })
        })
        .collect();

    Properties {
        is_associative: pa.is_associative && pb.is_associative,
        is_commutative: pa.is_commutative && pb.is_commutative,
        identity,
        inverses,
        element_orders,
    }
}
