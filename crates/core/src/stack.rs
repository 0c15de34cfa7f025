//! Operand stack
//!
//! Top of stack is the highest index. Typed pops check the variant before
//! removing anything, so a failed typed pop leaves the stack exactly as it was.
//!
//! The `peek_*` family reads `index` positions below the top without
//! mutating; commands use it to validate every operand before the first pop.

use crate::error::{CalcError, Result};
use crate::tensor::Tensor;
use crate::value::{Value, ValueKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    values: Vec<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { values: Vec::new() }
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    pub fn pop(&mut self) -> Result<Value> {
        self.values.pop().ok_or(CalcError::StackUnderflow)
    }

    pub fn pop_double(&mut self) -> Result<f64> {
        let d = self.at_top()?.as_scalar()?;
        self.values.pop();
        Ok(d)
    }

    pub fn pop_symbol(&mut self) -> Result<String> {
        let name = self.at_top()?.as_symbol()?.to_string();
        self.values.pop();
        Ok(name)
    }

    pub fn pop_string(&mut self) -> Result<String> {
        let text = self.at_top()?.as_string()?.to_string();
        self.values.pop();
        Ok(text)
    }

    pub fn pop_matrix(&mut self) -> Result<Tensor> {
        self.at_top()?.as_tensor()?;
        self.pop()?.into_tensor().map_err(|v| CalcError::TypeError {
            expected: ValueKind::Tensor,
            actual: v.kind(),
        })
    }

    fn at_top(&self) -> Result<&Value> {
        self.values.last().ok_or(CalcError::StackUnderflow)
    }

    /// Read-only view `index` positions below the top (0 = top)
    pub fn at_from_top(&self, index: usize) -> Result<&Value> {
        let size = self.values.len();
        if index >= size {
            return Err(CalcError::IndexOutOfRange { index, size });
        }
        Ok(&self.values[size - index - 1])
    }

    /// Like `at_from_top`, but a short stack is an underflow rather than a
    /// bad reference
    pub fn peek(&self, index: usize) -> Result<&Value> {
        self.at_from_top(index)
            .map_err(|_| CalcError::StackUnderflow)
    }

    pub fn peek_double(&self, index: usize) -> Result<f64> {
        self.peek(index)?.as_scalar()
    }

    pub fn peek_matrix(&self, index: usize) -> Result<&Tensor> {
        self.peek(index)?.as_tensor()
    }

    pub fn peek_symbol(&self, index: usize) -> Result<&str> {
        self.peek(index)?.as_symbol()
    }

    /// Fail with `StackUnderflow` unless at least `count` values are present
    pub fn require(&self, count: usize) -> Result<()> {
        if self.values.len() < count {
            return Err(CalcError::StackUnderflow);
        }
        Ok(())
    }

    /// Drop the top `count` values
    pub fn discard(&mut self, count: usize) -> Result<()> {
        self.require(count)?;
        let keep = self.values.len() - count;
        self.values.truncate(keep);
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bottom to top
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Value> {
        self.values.iter()
    }

    /// Whole-stack listing, each line `N) = value` with the top labelled 0
    pub fn render(&self, columns: usize) -> String {
        if self.values.is_empty() {
            return "Stack Empty".to_string();
        }
        let depth = self.values.len();
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{}) {}", depth - i - 1, v.render(columns)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = Stack::new();
        stack.push(1.0);
        stack.push(2.0);
        assert_eq!(stack.size(), 2);
        assert_eq!(stack.pop().unwrap(), Value::Scalar(2.0));
        assert_eq!(stack.pop().unwrap(), Value::Scalar(1.0));
        assert!(matches!(stack.pop(), Err(CalcError::StackUnderflow)));
    }

    #[test]
    fn test_typed_pop_mismatch_leaves_stack() {
        let mut stack = Stack::new();
        stack.push(4.0);
        match stack.pop_matrix() {
            Err(CalcError::TypeError { expected, actual }) => {
                assert_eq!(expected, ValueKind::Tensor);
                assert_eq!(actual, ValueKind::Scalar);
            }
            other => panic!("Expected TypeError, got {:?}", other),
        }
        assert_eq!(stack.size(), 1);
        assert_eq!(stack.at_from_top(0).unwrap(), &Value::Scalar(4.0));
    }

    #[test]
    fn test_typed_pop_underflow() {
        let mut stack = Stack::new();
        assert!(matches!(stack.pop_double(), Err(CalcError::StackUnderflow)));
        assert!(matches!(stack.pop_symbol(), Err(CalcError::StackUnderflow)));
        assert!(matches!(stack.pop_string(), Err(CalcError::StackUnderflow)));
        assert!(matches!(stack.pop_matrix(), Err(CalcError::StackUnderflow)));
    }

    #[test]
    fn test_typed_pops_succeed() {
        let mut stack = Stack::new();
        stack.push(Tensor::from(vec![1.0]));
        stack.push(Value::string("s"));
        stack.push(Value::symbol("y"));
        stack.push(2.5);
        assert_eq!(stack.pop_double().unwrap(), 2.5);
        assert_eq!(stack.pop_symbol().unwrap(), "y");
        assert_eq!(stack.pop_string().unwrap(), "s");
        assert_eq!(stack.pop_matrix().unwrap().as_slice(), &[1.0]);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_at_from_top() {
        let mut stack = Stack::new();
        stack.push(1.0);
        stack.push(2.0);
        stack.push(3.0);
        assert_eq!(stack.at_from_top(0).unwrap(), &Value::Scalar(3.0));
        assert_eq!(stack.at_from_top(2).unwrap(), &Value::Scalar(1.0));
        assert!(matches!(
            stack.at_from_top(3),
            Err(CalcError::IndexOutOfRange { index: 3, size: 3 })
        ));
        assert_eq!(stack.size(), 3);
    }

    #[test]
    fn test_peek_and_discard() {
        let mut stack = Stack::new();
        stack.push(Tensor::filled(2, 1.0));
        stack.push(5.0);
        assert_eq!(stack.peek_double(0).unwrap(), 5.0);
        assert_eq!(stack.peek_matrix(1).unwrap().len(), 2);
        assert!(matches!(stack.peek(2), Err(CalcError::StackUnderflow)));
        assert!(stack.peek_symbol(0).is_err());

        assert!(stack.discard(3).is_err());
        assert_eq!(stack.size(), 2);
        stack.discard(2).unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_render() {
        let mut stack = Stack::new();
        assert_eq!(stack.render(4), "Stack Empty");
        stack.push(1.0);
        stack.push(Value::symbol("x"));
        assert_eq!(stack.render(4), "1) = 1.000000\n0) = $x");
    }
}
