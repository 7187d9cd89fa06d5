// Transform expression AST
//
// A closed, enumerable set of node kinds. Adding an operator means adding a
// variant here and an arm in the interpreter; there is no dynamic dispatch.

use num_bigint::BigInt;

/// Name of the single free variable an expression may reference
pub const VARIABLE_NAME: &str = "old";

/// Supported binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    /// Floor division (rounds toward negative infinity)
    Divide,
    /// Exponentiation, written `^`
    Power,
}

impl BinaryOperator {
    /// Source symbol for this operator
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
            BinaryOperator::Power => '^',
        }
    }
}

/// Parsed transform expression
///
/// # Example
///
/// ```rust
/// use worry_simulator_core_rs::expression::{parse, BinaryOperator, Expr};
/// use num_bigint::BigInt;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let expr = parse("old * 19")?;
/// assert_eq!(
///     expr,
///     Expr::BinaryOp {
///         op: BinaryOperator::Multiply,
///         left: Box::new(Expr::Variable),
///         right: Box::new(Expr::Literal(BigInt::from(19))),
///     }
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal
    Literal(BigInt),

    /// The `old` placeholder
    Variable,

    /// `<left> <op> <right>`
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary negation, `-<operand>`
    UnaryNeg { operand: Box<Expr> },
}

impl Expr {
    /// True if the placeholder variable appears anywhere in the tree
    pub fn references_variable(&self) -> bool {
        match self {
            Expr::Literal(_) => false,
            Expr::Variable => true,
            Expr::BinaryOp { left, right, .. } => {
                left.references_variable() || right.references_variable()
            }
            Expr::UnaryNeg { operand } => operand.references_variable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_variable() {
        let constant = Expr::BinaryOp {
            op: BinaryOperator::Add,
            left: Box::new(Expr::Literal(BigInt::from(1))),
            right: Box::new(Expr::Literal(BigInt::from(2))),
        };
        assert!(!constant.references_variable());

        let negated = Expr::UnaryNeg {
            operand: Box::new(Expr::Variable),
        };
        assert!(negated.references_variable());
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(BinaryOperator::Power.symbol(), '^');
        assert_eq!(BinaryOperator::Divide.symbol(), '/');
    }
}
