// Transform expressions
//
// Each agent carries a small arithmetic expression over one placeholder
// variable (`old`). Expressions are parsed into a closed AST and evaluated by
// structural recursion; nothing is ever handed to a general-purpose evaluator.
//
// Architecture:
// - types.rs: AST node definitions (Expr, BinaryOperator)
// - parser.rs: tokenizer and recursive-descent parser
// - interpreter.rs: evaluation, ExpressionError, compiled Transform

pub mod interpreter;
pub mod parser;
pub mod types;

pub use interpreter::{evaluate, evaluate_expr, ExpressionError, Transform, MAX_EXPONENT};
pub use parser::{parse, MAX_NESTING_DEPTH, MAX_TOKENS};
pub use types::{BinaryOperator, Expr, VARIABLE_NAME};
