// Aggregate functions and reducer registry for recast
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::data::Value;

/// A function reducing a non-empty sequence of colliding values to one
pub type Reducer = Rc<dyn Fn(&[Value]) -> Value>;

/// Built-in aggregation functions usable as reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    /// Number of non-null values
    Count,
    /// Sum of numeric values; integer unless a float is seen or the integer
    /// sum overflows
    Sum,
    /// Mean of numeric values as a float, null when there are none
    Mean,
    /// Smallest non-null value
    Min,
    /// Largest non-null value
    Max,
    /// First value
    First,
    /// Last value
    Last,
}

impl AggregateFunction {
    /// Get the name of the aggregation function
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Mean => "mean",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::First => "first",
            AggregateFunction::Last => "last",
        }
    }

    /// Reduce the values to one
    pub fn reduce(&self, values: &[Value]) -> Value {
        match self {
            AggregateFunction::Count => {
                Value::Integer(values.iter().filter(|v| !v.is_null()).count() as i64)
            }
            AggregateFunction::Sum => sum(values),
            AggregateFunction::Mean => {
                let numbers: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
                if numbers.is_empty() {
                    Value::Null
                } else {
                    Value::Float(numbers.iter().sum::<f64>() / numbers.len() as f64)
                }
            }
            AggregateFunction::Min => non_null(values).min().cloned().unwrap_or(Value::Null),
            AggregateFunction::Max => non_null(values).max().cloned().unwrap_or(Value::Null),
            AggregateFunction::First => values.first().cloned().unwrap_or(Value::Null),
            AggregateFunction::Last => values.last().cloned().unwrap_or(Value::Null),
        }
    }

    /// Wrap the function as a reducer
    pub fn reducer(self) -> Reducer {
        Rc::new(move |values: &[Value]| self.reduce(values))
    }
}

fn non_null(values: &[Value]) -> impl Iterator<Item = &Value> {
    values.iter().filter(|v| !v.is_null())
}

fn sum(values: &[Value]) -> Value {
    let mut int_sum = 0i64;
    let mut float_sum = 0.0f64;
    let mut is_float = false;

    for value in values {
        match value {
            Value::Integer(i) => {
                if is_float {
                    float_sum += *i as f64;
                } else {
                    match int_sum.checked_add(*i) {
                        Some(sum) => int_sum = sum,
                        // overflow: continue in floating point
                        None => {
                            float_sum = int_sum as f64 + *i as f64;
                            is_float = true;
                        }
                    }
                }
            }
            Value::Float(f) => {
                if !is_float {
                    float_sum = int_sum as f64;
                    is_float = true;
                }
                float_sum += *f;
            }
            _ => {} // Ignore other types
        }
    }

    if is_float {
        Value::Float(float_sum)
    } else {
        Value::Integer(int_sum)
    }
}

/// Registry of reducers keyed by variable value
///
/// Reducers are only applied when more than one value collides in a cell.
#[derive(Clone, Default)]
pub struct Reducers {
    reducers: HashMap<Value, Reducer>,
}

impl Reducers {
    /// Create an empty registry
    pub fn new() -> Self {
        Reducers::default()
    }

    /// Register a reducer for a variable value
    pub fn with<F>(mut self, variable: impl Into<Value>, reducer: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        self.reducers.insert(variable.into(), Rc::new(reducer));
        self
    }

    /// Register a built-in aggregation for a variable value
    pub fn with_aggregate(mut self, variable: impl Into<Value>, function: AggregateFunction) -> Self {
        self.reducers.insert(variable.into(), function.reducer());
        self
    }

    /// Get the reducer registered for a variable value
    pub fn get(&self, variable: &Value) -> Option<&Reducer> {
        self.reducers.get(variable)
    }

    /// Number of registered reducers
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Check if no reducer is registered
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl fmt::Debug for Reducers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.reducers.keys()).finish()
    }
}
