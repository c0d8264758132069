// Reshape operations: melt and recast
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::data::{resolve_key, DataError, Header, KeyProjection, KeySpec, Row, Rows, Table, Value};
use super::group::Groups;
use super::sort::SortedRows;
use super::Reducers;

/// Default name of the variable field
pub const DEFAULT_VARIABLE_LABEL: &str = "variable";

/// Default name of the value field
pub const DEFAULT_VALUE_LABEL: &str = "value";

/// Default number of rows sampled to discover variable values
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Options for [`melt`]
#[derive(Debug, Clone)]
pub struct MeltOptions {
    /// Fields kept on every output row; defaults to all non-variable fields
    pub key: KeySpec,
    /// Fields melted into rows; defaults to all non-key fields
    pub variables: KeySpec,
    pub variable_label: String,
    pub value_label: String,
    /// Value emitted for a variable field a short row does not reach
    pub missing: Value,
}

impl Default for MeltOptions {
    fn default() -> Self {
        MeltOptions {
            key: KeySpec::empty(),
            variables: KeySpec::empty(),
            variable_label: DEFAULT_VARIABLE_LABEL.to_string(),
            value_label: DEFAULT_VALUE_LABEL.to_string(),
            missing: Value::Null,
        }
    }
}

impl MeltOptions {
    /// Create options with all defaults
    pub fn new() -> Self {
        MeltOptions::default()
    }

    /// Set the key fields
    pub fn with_key(mut self, key: impl Into<KeySpec>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the variable fields
    pub fn with_variables(mut self, variables: impl Into<KeySpec>) -> Self {
        self.variables = variables.into();
        self
    }

    /// Set the name of the output variable field
    pub fn with_variable_label(mut self, label: &str) -> Self {
        self.variable_label = label.to_string();
        self
    }

    /// Set the name of the output value field
    pub fn with_value_label(mut self, label: &str) -> Self {
        self.value_label = label.to_string();
        self
    }

    /// Set the value emitted for unreachable variable fields
    pub fn with_missing(mut self, missing: Value) -> Self {
        self.missing = missing;
        self
    }
}

/// Positions of all fields not in `taken`
fn remaining_positions(header: &Header, taken: &[usize]) -> Vec<usize> {
    (0..header.len()).filter(|i| !taken.contains(i)).collect()
}

/// Output field name for a variable value
///
/// Floats keep their fractional part, so `1.0` and `1` name different fields.
fn field_name(value: &Value) -> String {
    match value {
        Value::Float(f) => format!("{:?}", f),
        other => other.to_string(),
    }
}

/// Names of the fields at the given positions
fn names_at(header: &Header, positions: &[usize]) -> Vec<String> {
    positions
        .iter()
        .filter_map(|&i| header.field(i).map(str::to_string))
        .collect()
}

/// A view unpivoting variable fields into variable/value rows
#[derive(Debug, Clone)]
pub struct MeltView<T> {
    source: T,
    options: MeltOptions,
}

/// Reshape a table, melting fields into data
///
/// Each input row yields one output row per variable field, holding the key
/// values followed by the variable's name and the row's value for it.
pub fn melt<T: Table>(source: T, options: MeltOptions) -> MeltView<T> {
    MeltView { source, options }
}

impl<T: Table> Table for MeltView<T> {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        let (header, rows) = self.source.open()?.into_parts();
        let options = &self.options;

        let explicit_variables = resolve_key(&header, &options.variables)?;
        let key_positions = if options.key.is_empty() {
            remaining_positions(&header, &explicit_variables)
        } else {
            resolve_key(&header, &options.key)?
        };
        let variable_positions = if options.variables.is_empty() {
            remaining_positions(&header, &key_positions)
        } else {
            explicit_variables
        };

        let mut fields = names_at(&header, &key_positions);
        fields.push(options.variable_label.clone());
        fields.push(options.value_label.clone());
        let out_header = Header::new(fields);
        debug!("melt: {} into {}", header, out_header);

        let variables: Vec<(usize, Value)> = variable_positions
            .iter()
            .zip(names_at(&header, &variable_positions))
            .map(|(&i, name)| (i, Value::String(name)))
            .collect();
        let projection = KeyProjection::Positions(key_positions);
        let missing = options.missing.clone();

        let melted = rows.flat_map(move |row| {
            let row = match row {
                Ok(row) => row,
                Err(err) => return vec![Err(err)],
            };
            let key = match projection.project(&row) {
                Ok(key) => key,
                Err(err) => return vec![Err(err)],
            };
            variables
                .iter()
                .map(|(i, name)| {
                    let mut values = key.clone();
                    values.push(name.clone());
                    values.push(row.get(*i).unwrap_or(&missing).clone());
                    Ok(Row::new(values))
                })
                .collect()
        });

        Ok(Rows::new(out_header, melted))
    }
}

/// Ordered, de-duplicated values each variable field may take
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableDomain {
    entries: Vec<(String, Vec<Value>)>,
}

impl VariableDomain {
    /// Create an empty domain
    pub fn new() -> Self {
        VariableDomain::default()
    }

    /// Add or replace the values of a variable field
    ///
    /// Duplicates are dropped, keeping first occurrences in order.
    pub fn with_field<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut deduped: Vec<Value> = Vec::new();
        for value in values {
            let value = value.into();
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }

        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some(entry) => entry.1 = deduped,
            None => self.entries.push((field.to_string(), deduped)),
        }
        self
    }

    /// Values of a variable field
    pub fn get(&self, field: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    /// Variable field names, in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// Options for [`recast`]
#[derive(Debug, Clone)]
pub struct RecastOptions {
    /// Fields identifying an output row; defaults to all fields that are
    /// neither variable nor value fields
    pub key: KeySpec,
    /// Fields whose values become output fields
    pub variable_fields: KeySpec,
    pub value_field: String,
    /// Number of leading data rows scanned to discover variable values
    pub sample_size: usize,
    pub reducers: Reducers,
    /// Value of a cell no row contributes to
    pub missing: Value,
    /// Variable values supplied up front, skipping the sampling pass
    pub domain: Option<VariableDomain>,
}

impl Default for RecastOptions {
    fn default() -> Self {
        RecastOptions {
            key: KeySpec::empty(),
            variable_fields: KeySpec::from(DEFAULT_VARIABLE_LABEL),
            value_field: DEFAULT_VALUE_LABEL.to_string(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            reducers: Reducers::new(),
            missing: Value::Null,
            domain: None,
        }
    }
}

impl RecastOptions {
    /// Create options with all defaults
    pub fn new() -> Self {
        RecastOptions::default()
    }

    /// Set the key fields
    pub fn with_key(mut self, key: impl Into<KeySpec>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the variable fields
    pub fn with_variable_fields(mut self, fields: impl Into<KeySpec>) -> Self {
        self.variable_fields = fields.into();
        self
    }

    /// Set the value field
    pub fn with_value_field(mut self, field: &str) -> Self {
        self.value_field = field.to_string();
        self
    }

    /// Set the number of rows sampled for variable discovery
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the reducers applied to colliding values
    pub fn with_reducers(mut self, reducers: Reducers) -> Self {
        self.reducers = reducers;
        self
    }

    /// Set the value of empty cells
    pub fn with_missing(mut self, missing: Value) -> Self {
        self.missing = missing;
        self
    }

    /// Supply the variable domain; its fields become the variable fields
    pub fn with_domain(mut self, domain: VariableDomain) -> Self {
        self.variable_fields = KeySpec::from(domain.fields().collect::<Vec<_>>());
        self.domain = Some(domain);
        self
    }
}

/// Content of one recast output cell
#[derive(Debug, Clone, PartialEq)]
pub enum RecastCell {
    /// No row contributed a value
    Missing,
    /// Exactly one row contributed a value
    Single(Value),
    /// Several rows contributed values, in row order
    Collided(Vec<Value>),
}

impl RecastCell {
    /// Classify the values matched for a cell
    pub fn from_matches(mut values: Vec<Value>) -> Self {
        match values.len() {
            0 => RecastCell::Missing,
            1 => RecastCell::Single(values.remove(0)),
            _ => RecastCell::Collided(values),
        }
    }

    /// Resolve the cell to an output value
    ///
    /// Collisions go through the reducer registered for the variable, or are
    /// kept as an array of all values when there is none.
    pub fn into_value(self, variable: &Value, reducers: &Reducers, missing: &Value) -> Value {
        match self {
            RecastCell::Missing => missing.clone(),
            RecastCell::Single(value) => value,
            RecastCell::Collided(values) => match reducers.get(variable) {
                Some(reducer) => reducer(&values),
                None => Value::Array(values),
            },
        }
    }
}

/// A view pivoting variable/value rows back into fields
#[derive(Debug, Clone)]
pub struct RecastView<T> {
    source: T,
    options: RecastOptions,
}

/// Recast molten data
///
/// Traverses the source twice: once to sample the variable values that
/// become output fields (unless a domain is supplied), then once sorted by
/// key to build one output row per key. Variable values first seen after the
/// sampled prefix are dropped.
///
/// Sampling happens inside `open`, so a row in the sampled prefix too short
/// to hold a variable field fails `open` with [`DataError::RowTooShort`].
pub fn recast<T: Table>(source: T, options: RecastOptions) -> RecastView<T> {
    RecastView { source, options }
}

/// Resolved field roles of a recast
struct Roles {
    key: Vec<usize>,
    variables: Vec<usize>,
    value: usize,
}

fn schema_error(err: DataError) -> DataError {
    match err {
        DataError::FieldNotFound(name) => DataError::Schema(format!("invalid field: {}", name)),
        DataError::FieldIndex { index, len } => DataError::Schema(format!(
            "invalid field index {} for header of {} fields",
            index, len
        )),
        other => other,
    }
}

impl<T: Table> RecastView<T> {
    fn resolve_roles(&self, header: &Header) -> Result<Roles, DataError> {
        let options = &self.options;
        let value = header.index_of(&options.value_field).ok_or_else(|| {
            DataError::Schema(format!("invalid value field: {}", options.value_field))
        })?;

        let explicit_variables = resolve_key(header, &options.variable_fields).map_err(schema_error)?;
        let key = if options.key.is_empty() {
            (0..header.len())
                .filter(|i| *i != value && !explicit_variables.contains(i))
                .collect()
        } else {
            resolve_key(header, &options.key).map_err(schema_error)?
        };
        let variables = if explicit_variables.is_empty() {
            (0..header.len())
                .filter(|i| *i != value && !key.contains(i))
                .collect()
        } else {
            explicit_variables
        };

        if key.contains(&value) {
            return Err(DataError::Schema("value field cannot be a key field".to_string()));
        }
        if variables.contains(&value) {
            return Err(DataError::Schema(
                "value field cannot be a variable field".to_string(),
            ));
        }

        Ok(Roles { key, variables, value })
    }

    /// Discover the sorted distinct values of each variable field
    fn sample_domain(
        &self,
        rows: &mut Rows<'_>,
        variables: &[usize],
    ) -> Result<Vec<Vec<Value>>, DataError> {
        let mut observed: Vec<BTreeSet<Value>> = vec![BTreeSet::new(); variables.len()];
        for row in rows.take(self.options.sample_size) {
            let row = row?;
            for (set, &i) in observed.iter_mut().zip(variables) {
                set.insert(row.value_at(i)?.clone());
            }
        }
        Ok(observed.into_iter().map(|set| set.into_iter().collect()).collect())
    }
}

impl<T: Table> Table for RecastView<T> {
    fn open(&self) -> Result<Rows<'_>, DataError> {
        // first pass: validate roles and discover variables
        let mut first = self.source.open()?;
        let header = first.header().clone();
        let roles = self.resolve_roles(&header)?;
        let variable_names = names_at(&header, &roles.variables);

        let domains = match &self.options.domain {
            Some(domain) => variable_names
                .iter()
                .map(|name| {
                    domain.get(name).map(<[Value]>::to_vec).ok_or_else(|| {
                        DataError::Schema(format!("no domain supplied for variable field: {}", name))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => self.sample_domain(&mut first, &roles.variables)?,
        };
        drop(first);

        let mut fields = names_at(&header, &roles.key);
        for values in &domains {
            fields.extend(values.iter().map(field_name));
        }
        let out_header = Header::new(fields);
        debug!(
            "recast: variables {:?} with domains {:?} into {}",
            variable_names, domains, out_header
        );

        // second pass: group the source sorted by key
        let (_, rows) = self.source.open()?.into_parts();
        let projection = KeyProjection::Positions(roles.key);
        let sorted = SortedRows::new(rows, projection.clone(), false);
        let groups = Groups::new(Box::new(sorted), projection);

        let known: Vec<BTreeSet<Value>> = domains
            .iter()
            .map(|values| values.iter().cloned().collect())
            .collect();
        let variables: Vec<(usize, Vec<Value>)> = roles.variables.into_iter().zip(domains).collect();
        let value_index = roles.value;
        let reducers = self.options.reducers.clone();
        let missing = self.options.missing.clone();
        let mut warned = false;

        let recast_rows = groups.map(move |group| -> Result<Row, DataError> {
            let group = group?;
            let mut values = group.key;

            for ((i, domain), known) in variables.iter().zip(&known) {
                if !warned {
                    for row in &group.rows {
                        let variable = row.value_at(*i)?;
                        if !known.contains(variable) {
                            warn!(
                                "recast: variable value '{}' outside the sampled domain is dropped",
                                variable
                            );
                            warned = true;
                            break;
                        }
                    }
                }

                for variable in domain {
                    let mut matched = Vec::new();
                    for row in &group.rows {
                        if row.value_at(*i)? == variable {
                            matched.push(row.value_at(value_index)?.clone());
                        }
                    }
                    let cell = RecastCell::from_matches(matched);
                    values.push(cell.into_value(variable, &reducers, &missing));
                }
            }

            Ok(Row::new(values))
        });

        Ok(Rows::new(out_header, recast_rows))
    }
}
