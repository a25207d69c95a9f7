//! Query construction for the tooling API.

/// A single field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The field equals the given value.
    Equals(String),
    /// The field is a member of the given set.
    In(Vec<String>),
}

/// An ordered set of field constraints.
///
/// An empty filter matches every record of the queried kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    constraints: Vec<(String, Constraint)>,
}

impl Filter {
    /// Creates a filter with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint on the given field.
    pub fn constrain(mut self, field: impl Into<String>, constraint: Constraint) -> Self {
        self.constraints.push((field.into(), constraint));
        self
    }
}

/// Renders a query selecting `fields` from `entity`, restricted by `filter`.
pub fn build_query(entity: &str, fields: &[&str], filter: &Filter) -> String {
    let clauses: Vec<String> = filter
        .constraints
        .iter()
        .map(|(field, constraint)| match constraint {
            Constraint::Equals(value) => format!("{} = {}", field, quote(value)),
            Constraint::In(values) => {
                let quoted: Vec<String> = values.iter().map(|value| quote(value)).collect();
                format!("{} IN ({})", field, quoted.join(", "))
            }
        })
        .collect();

    let select = format!("SELECT {} FROM {}", fields.join(", "), entity);
    if clauses.is_empty() {
        select
    } else {
        format!("{} WHERE {}", select, clauses.join(" AND "))
    }
}

/// Quotes a string literal, escaping backslashes and single quotes.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}
