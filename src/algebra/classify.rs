//! Structure classification: from raw tables to the narrowest matching algebra

use serde::{Serialize, Deserialize};

use super::{Algebra, Kind, Multiplication, Properties, Structure, Table};
use crate::AlgebraError;

const DEFAULT_NAME: &str = "No name";
const DEFAULT_DESCRIPTION: &str = "No description";

/// Serde-ready description of an algebra, as exchanged with outside formats
///
/// An empty `elements` list means "use the default labels".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Name of the algebra
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Element labels
    #[serde(default)]
    pub elements: Vec<String>,
    /// Primary (additive) table
    pub table: Table,
    /// Multiplicative table for ring and field candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table2: Option<Table>,
}

/// Builder for classifying tables into algebras
///
/// ```
/// use finite_algebras::{AlgebraBuilder, Kind};
///
/// let z2 = AlgebraBuilder::new(vec![vec![0, 1], vec![1, 0]])
///     .elements(["e", "a"])
///     .name("Z2")
///     .build()
///     .unwrap();
/// assert_eq!(z2.kind(), Kind::Group);
/// ```
#[derive(Clone, Debug)]
pub struct AlgebraBuilder {
    table: Vec<Vec<usize>>,
    multiplication: Option<Vec<Vec<usize>>>,
    elements: Option<Vec<String>>,
    name: Option<String>,
    description: Option<String>,
    required: Option<Kind>,
}

impl AlgebraBuilder {
    /// Start from the rows of the primary table
    pub fn new(table: Vec<Vec<usize>>) -> Self {
        AlgebraBuilder {
            table,
            multiplication: None,
            elements: None,
            name: None,
            description: None,
            required: None,
        }
    }

    /// Element labels (defaults to `"0".."n-1"`)
    pub fn elements<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Name of the algebra
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Description of the algebra
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Second table, making this a ring or field candidate
    pub fn multiplication(mut self, table: Vec<Vec<usize>>) -> Self {
        self.multiplication = Some(table);
        self
    }

    /// Fail unless the result is at least this kind
    pub fn require(mut self, kind: Kind) -> Self {
        self.required = Some(kind);
        self
    }

    /// Validate the tables and classify them
    pub fn build(self) -> crate::Result<Algebra> {
        let table = Table::new(self.table)?;
        let multiplication = self.multiplication.map(Table::new).transpose()?;
        let elements = self
            .elements
            .unwrap_or_else(|| default_labels(table.order()));

        classify(
            self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            self.description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            elements,
            table,
            multiplication,
            self.required,
        )
    }
}

/// Classify a single table with default labels and name
pub fn build(table: Vec<Vec<usize>>) -> crate::Result<Algebra> {
    AlgebraBuilder::new(table).build()
}

/// Classify a serde-ready [`Definition`]
pub fn build_from_definition(definition: Definition) -> crate::Result<Algebra> {
    let elements = if definition.elements.is_empty() {
        default_labels(definition.table.order())
    } else {
        definition.elements
    };
    classify(
        definition.name,
        definition.description,
        elements,
        definition.table,
        definition.table2,
        None,
    )
}

fn default_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

/// Determine the narrowest class the tables satisfy and assemble the algebra
pub(crate) fn classify(
    name: String,
    description: String,
    elements: Vec<String>,
    table: Table,
    multiplication: Option<Table>,
    required: Option<Kind>,
) -> crate::Result<Algebra> {
    let n = table.order();
    if elements.len() != n {
        return Err(AlgebraError::MalformedTable(
            format!("{} element names given for a table of order {}", elements.len(), n)
        ));
    }
    if let Some(dup) = crate::utils::duplicates(&elements).into_iter().next() {
        return Err(AlgebraError::DuplicateElement(dup));
    }
    if let Some(mult) = &multiplication {
        if mult.order() != n {
            return Err(AlgebraError::OrderMismatch { expected: n, found: mult.order() });
        }
    }

    let mut warnings = Vec::new();
    note_identity_candidates(&table, &mut warnings);

    let properties = Properties::derive(&table);
    let structure = match multiplication {
        None => Structure::from_properties(properties),
        Some(mult) => {
            note_identity_candidates(&mult, &mut warnings);
            ring_structure(&table, properties, mult)?
        }
    };

    if let Some(kind) = required {
        check_required(kind, &structure)?;
    }

    tracing::debug!(
        name = %name,
        kind = %structure.kind(),
        order = n,
        "classified algebra"
    );

    Ok(Algebra::from_parts(name, description, elements, table, structure, warnings))
}

fn note_identity_candidates(table: &Table, warnings: &mut Vec<AlgebraError>) {
    let candidates = table.identity_candidates();
    if candidates.len() > 1 {
        warnings.push(AlgebraError::InconsistentIdentity { candidates });
    }
}

/// Two tables are always a ring request: any failed law is an error
fn ring_structure(
    addition_table: &Table,
    addition: Properties,
    mult: Table,
) -> crate::Result<Structure> {
    const ADD: &str = "addition";
    const MUL: &str = "multiplication";

    if !addition.is_associative {
        return Err(AlgebraError::NotAssociative { operation: ADD });
    }
    let zero = addition
        .identity
        .ok_or(AlgebraError::MissingIdentity { operation: ADD })?;
    if addition.inverses.is_none() {
        return Err(AlgebraError::MissingInverses { operation: ADD });
    }
    if !addition.is_commutative {
        return Err(AlgebraError::NotCommutative { operation: ADD });
    }

    let multiplication = Multiplication::derive(mult);
    if !multiplication.properties.is_associative {
        return Err(AlgebraError::NotAssociative { operation: MUL });
    }
    multiplication
        .table
        .distributes_over(addition_table)
        .map_err(|(side, a, b, c)| AlgebraError::NotDistributive { side, a, b, c })?;

    let is_field = multiplication.nonzero_form_group(zero);
    let multiplication = Box::new(multiplication);
    Ok(if is_field {
        Structure::Field { addition, multiplication }
    } else {
        Structure::Ring { addition, multiplication }
    })
}

fn check_required(requested: Kind, structure: &Structure) -> crate::Result<()> {
    const OP: &str = "operation";

    let found = structure.kind();
    if found >= requested {
        return Ok(());
    }

    let props = structure.properties();
    if !requested.has_two_operations() {
        if !props.is_associative {
            return Err(AlgebraError::NotAssociative { operation: OP });
        }
        if requested >= Kind::Monoid && props.identity.is_none() {
            return Err(AlgebraError::MissingIdentity { operation: OP });
        }
        if requested >= Kind::Group && props.inverses.is_none() {
            return Err(AlgebraError::MissingInverses { operation: OP });
        }
    }
    Err(AlgebraError::StructureMismatch { requested, found })
}
