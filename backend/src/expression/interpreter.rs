// Transform expression interpreter
//
// Evaluates a parsed expression by structural recursion over the AST.
// All arithmetic is arbitrary precision; nothing can wrap.

use crate::expression::parser::parse;
use crate::expression::types::{BinaryOperator, Expr};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use thiserror::Error;

/// Largest exponent `^` accepts
pub const MAX_EXPONENT: u32 = 4096;

/// Errors that can occur while parsing or evaluating a transform expression
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Malformed expression '{expression}': {reason}")]
    Malformed { expression: String, reason: String },

    #[error("Division by zero in expression '{expression}'")]
    DivisionByZero { expression: String },

    #[error("Invalid exponent {exponent} in expression '{expression}' (must be between 0 and {max})", max = MAX_EXPONENT)]
    InvalidExponent { expression: String, exponent: String },
}

impl ExpressionError {
    /// Source text of the expression that failed
    pub fn expression(&self) -> &str {
        match self {
            ExpressionError::Malformed { expression, .. }
            | ExpressionError::DivisionByZero { expression }
            | ExpressionError::InvalidExponent { expression, .. } => expression,
        }
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Parse and evaluate `expression` with `old` bound to `variable_value`
///
/// # Example
///
/// ```rust
/// use worry_simulator_core_rs::expression::evaluate;
/// use num_bigint::BigInt;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(evaluate("old * 19", &BigInt::from(10))?, BigInt::from(190));
/// assert_eq!(evaluate("old * old", &BigInt::from(13))?, BigInt::from(169));
/// # Ok(())
/// # }
/// ```
pub fn evaluate(expression: &str, variable_value: &BigInt) -> Result<BigInt, ExpressionError> {
    let expr = parse(expression)?;
    evaluate_expr(&expr, expression, variable_value)
}

/// Evaluate an already-parsed expression
///
/// `source` is only used to give errors their context.
pub fn evaluate_expr(expr: &Expr, source: &str, old: &BigInt) -> Result<BigInt, ExpressionError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),

        Expr::Variable => Ok(old.clone()),

        Expr::UnaryNeg { operand } => Ok(-evaluate_expr(operand, source, old)?),

        Expr::BinaryOp { op, left, right } => {
            let left_val = evaluate_expr(left, source, old)?;
            let right_val = evaluate_expr(right, source, old)?;

            match op {
                BinaryOperator::Add => Ok(left_val + right_val),
                BinaryOperator::Subtract => Ok(left_val - right_val),
                BinaryOperator::Multiply => Ok(left_val * right_val),
                BinaryOperator::Divide => {
                    if right_val.is_zero() {
                        return Err(ExpressionError::DivisionByZero {
                            expression: source.to_string(),
                        });
                    }
                    Ok(left_val.div_floor(&right_val))
                }
                BinaryOperator::Power => {
                    let exponent = right_val
                        .to_u32()
                        .filter(|exponent| *exponent <= MAX_EXPONENT)
                        .ok_or_else(|| ExpressionError::InvalidExponent {
                            expression: source.to_string(),
                            exponent: right_val.to_string(),
                        })?;
                    Ok(left_val.pow(exponent))
                }
            }
        }
    }
}

// ============================================================================
// COMPILED TRANSFORM
// ============================================================================

/// A transform expression parsed once and applied many times
///
/// Agents hold one of these so the source text is only parsed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    source: String,
    expr: Expr,
}

impl Transform {
    /// Parse `source` into a reusable transform
    pub fn compile(source: &str) -> Result<Self, ExpressionError> {
        let expr = parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// Apply the transform to one worry level
    pub fn apply(&self, old: &BigInt) -> Result<BigInt, ExpressionError> {
        evaluate_expr(&self.expr, &self.source, old)
    }

    /// Original expression text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed AST
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}
