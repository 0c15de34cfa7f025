//! Interpreter state: one stack plus the variable store
//!
//! Created once per session and handed by `&mut` to every command.

use crate::error::{CalcError, Result};
use crate::stack::Stack;
use crate::tensor::DEFAULT_COLUMNS;
use crate::value::Value;
use std::collections::BTreeMap;

/// Presentation knobs consulted by commands that render text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Tensor elements per displayed row
    pub columns: usize,
    /// Show the top of stack after each displaying command
    pub auto_display: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            columns: DEFAULT_COLUMNS,
            auto_display: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Environment {
    pub stack: Stack,
    pub display: DisplaySettings,
    /// Sorted so persisted state is byte-stable across runs
    variables: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a variable
    pub fn store(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Result<&Value> {
        self.variables
            .get(name)
            .ok_or_else(|| CalcError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Independent copy of a stored variable
    pub fn load(&self, name: &str) -> Result<Value> {
        self.lookup(name).cloned()
    }

    /// Variables in name order
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Tensor;

    #[test]
    fn test_store_overwrites() {
        let mut env = Environment::new();
        env.store("x", Value::from(1.0));
        env.store("x", Value::from(2.0));
        assert_eq!(env.variable_count(), 1);
        assert_eq!(env.lookup("x").unwrap(), &Value::Scalar(2.0));
    }

    #[test]
    fn test_undefined_variable() {
        let env = Environment::new();
        match env.load("nope") {
            Err(CalcError::UndefinedVariable { name }) => assert_eq!(name, "nope"),
            other => panic!("Expected UndefinedVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_load_is_independent_copy() {
        let mut env = Environment::new();
        env.store("m", Value::from(Tensor::from(vec![1.0, 2.0])));
        let mut loaded = env.load("m").unwrap();
        if let Value::Tensor(t) = &mut loaded {
            t.map_in_place(|x| x * 100.0);
        }
        assert_eq!(
            env.lookup("m").unwrap().as_tensor().unwrap().as_slice(),
            &[1.0, 2.0]
        );
    }

    #[test]
    fn test_variables_sorted() {
        let mut env = Environment::new();
        env.store("b", Value::from(2.0));
        env.store("a", Value::from(1.0));
        let names: Vec<&str> = env.variables().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
