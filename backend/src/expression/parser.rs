// Transform expression parser
//
// Grammar (standard precedence, `^` right-associative and binding tighter
// than unary minus):
//
//   expr    := term (('+' | '-') term)*
//   term    := unary (('*' | '/') unary)*
//   unary   := '-' unary | power
//   power   := primary ('^' unary)?
//   primary := INTEGER | 'old' | '(' expr ')'
//
// Anything outside this grammar is rejected as malformed. Length and nesting
// are both capped, which bounds the depth of every AST the parser returns.

use crate::expression::interpreter::ExpressionError;
use crate::expression::types::{BinaryOperator, Expr, VARIABLE_NAME};
use num_bigint::BigInt;

/// Maximum nesting of parentheses, negations and exponents
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum number of tokens in one expression
pub const MAX_TOKENS: usize = 512;

// ============================================================================
// TOKENIZER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(BigInt),
    Variable,
    Operator(BinaryOperator),
    LeftParen,
    RightParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Variable => format!("'{}'", VARIABLE_NAME),
            Token::Operator(op) => format!("operator '{}'", op.symbol()),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
        }
    }
}

/// Token plus its byte offset in the source, for error messages
type Spanned = (usize, Token);

fn tokenize(source: &str) -> Result<Vec<Spanned>, String> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&(_, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            let value = BigInt::parse_bytes(digits.as_bytes(), 10)
                .ok_or_else(|| format!("invalid number '{}' at offset {}", digits, offset))?;
            tokens.push((offset, Token::Number(value)));
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut ident = String::new();
            while let Some(&(_, a)) = chars.peek() {
                if !(a.is_alphanumeric() || a == '_') {
                    break;
                }
                ident.push(a);
                chars.next();
            }
            if ident != VARIABLE_NAME {
                return Err(format!("unknown identifier '{}' at offset {}", ident, offset));
            }
            tokens.push((offset, Token::Variable));
            continue;
        }

        let token = match c {
            '+' => Token::Operator(BinaryOperator::Add),
            '-' => Token::Operator(BinaryOperator::Subtract),
            '*' => Token::Operator(BinaryOperator::Multiply),
            '/' => Token::Operator(BinaryOperator::Divide),
            '^' => Token::Operator(BinaryOperator::Power),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            other => {
                return Err(format!(
                    "unexpected character '{}' at offset {}",
                    other, offset
                ))
            }
        };
        tokens.push((offset, token));
        chars.next();
    }

    Ok(tokens)
}

// ============================================================================
// PARSER
// ============================================================================

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_operator(&self) -> Option<BinaryOperator> {
        match self.peek() {
            Some((_, Token::Operator(op))) => Some(*op),
            _ => None,
        }
    }

    fn next(&mut self) -> Option<&'a Spanned> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Expr, String> {
        let mut left = self.term()?;
        while let Some(op @ (BinaryOperator::Add | BinaryOperator::Subtract)) = self.peek_operator()
        {
            self.pos += 1;
            let right = self.term()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, String> {
        let mut left = self.unary()?;
        while let Some(op @ (BinaryOperator::Multiply | BinaryOperator::Divide)) =
            self.peek_operator()
        {
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, String> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err("nesting too deep".to_string());
        }

        let result = if self.peek_operator() == Some(BinaryOperator::Subtract) {
            self.pos += 1;
            self.unary().map(|operand| Expr::UnaryNeg {
                operand: Box::new(operand),
            })
        } else {
            self.power()
        };

        self.depth -= 1;
        result
    }

    fn power(&mut self) -> Result<Expr, String> {
        let base = self.primary()?;
        if self.peek_operator() == Some(BinaryOperator::Power) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::BinaryOp {
                op: BinaryOperator::Power,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some((_, Token::Number(value))) => Ok(Expr::Literal(value.clone())),
            Some((_, Token::Variable)) => Ok(Expr::Variable),
            Some((offset, Token::LeftParen)) => {
                let inner = self.expr()?;
                match self.next() {
                    Some((_, Token::RightParen)) => Ok(inner),
                    _ => Err(format!(
                        "missing closing parenthesis for '(' at offset {}",
                        offset
                    )),
                }
            }
            Some((offset, token)) => Err(format!(
                "expected operand, found {} at offset {}",
                token.describe(),
                offset
            )),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

/// Parse a transform expression into its AST
///
/// # Errors
///
/// `ExpressionError::Malformed` naming the source text if it contains any
/// token or construct outside the supported grammar.
///
/// # Example
///
/// ```rust
/// use worry_simulator_core_rs::expression::{parse, ExpressionError};
///
/// assert!(parse("old * old").is_ok());
/// assert!(matches!(
///     parse("old ** import os"),
///     Err(ExpressionError::Malformed { .. })
/// ));
/// ```
pub fn parse(source: &str) -> Result<Expr, ExpressionError> {
    let malformed = |reason: String| ExpressionError::Malformed {
        expression: source.to_string(),
        reason,
    };

    let tokens = tokenize(source).map_err(malformed)?;
    if tokens.is_empty() {
        return Err(malformed("empty expression".to_string()));
    }
    if tokens.len() > MAX_TOKENS {
        return Err(malformed("expression too long".to_string()));
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr().map_err(malformed)?;

    if let Some((offset, token)) = parser.peek() {
        return Err(malformed(format!(
            "unexpected {} at offset {}",
            token.describe(),
            offset
        )));
    }

    Ok(expr)
}
