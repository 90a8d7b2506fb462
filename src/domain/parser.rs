//! Expression parser for cell formulas.
//!
//! This module implements a recursive descent parser for the restricted
//! arithmetic expressions a cell may contain. Cell content is untrusted
//! input, so the expression is never handed to any dynamic evaluation
//! facility: it is tokenized over a closed operator set and evaluated by an
//! explicit AST walk.
//!
//! # BNF Grammar
//!
//! ```bnf
//! Expression ::= Term ( ( "+" | "-" ) Term )*
//! Term       ::= Unary ( ( "*" | "/" ) Unary )*
//! Unary      ::= ( "+" | "-" ) Unary | Primary
//! Primary    ::= Number | CellRef | "(" Expression ")"
//! CellRef    ::= [A-Za-z] [0-9]+
//! Number     ::= [0-9]+ ( "." [0-9]+ )?
//! ```
//!
//! `*` and `/` bind tighter than `+` and `-`; operators of equal precedence
//! associate left to right; parentheses override precedence.

use super::errors::{DomainResult, EvalError};
use super::models::Grid;
use super::resolver;

/// Represents a token in the expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// Reference text, validated against the grid during evaluation.
    CellRef(String),

    Plus,
    Minus,
    Multiply,
    Divide,

    LeftParen,
    RightParen,

    Eof,
}

/// An expression tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    CellRef(String),
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

/// Lexical analyzer for tokenizing expressions.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            input: chars,
            position: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Reads a number token (integer or decimal).
    fn read_number(&mut self) -> DomainResult<f64> {
        let mut number_str = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char == Some('.') {
            number_str.push('.');
            self.advance();

            while let Some(ch) = self.current_char {
                if ch.is_ascii_digit() {
                    number_str.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        number_str
            .parse::<f64>()
            .map_err(|_| EvalError::Lexical(number_str))
    }

    /// Reads an alphanumeric word and classifies it as a cell reference.
    ///
    /// The only words the expression language knows are cell references:
    /// one letter followed by digits. Anything else is a lexical error.
    fn read_reference(&mut self) -> DomainResult<Token> {
        let mut word = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphanumeric() {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let mut chars = word.chars();
        let shaped = chars.next().is_some_and(|ch| ch.is_ascii_alphabetic())
            && !chars.as_str().is_empty()
            && chars.as_str().bytes().all(|b| b.is_ascii_digit());
        if shaped {
            Ok(Token::CellRef(word))
        } else {
            Err(EvalError::Lexical(word))
        }
    }

    /// Gets the next token from the input.
    pub fn next_token(&mut self) -> DomainResult<Token> {
        self.skip_whitespace();

        match self.current_char {
            None => Ok(Token::Eof),

            Some(ch) => match ch {
                '0'..='9' => {
                    let number = self.read_number()?;
                    Ok(Token::Number(number))
                }

                'A'..='Z' | 'a'..='z' => self.read_reference(),

                '+' => {
                    self.advance();
                    Ok(Token::Plus)
                }

                '-' => {
                    self.advance();
                    Ok(Token::Minus)
                }

                '*' => {
                    self.advance();
                    Ok(Token::Multiply)
                }

                '/' => {
                    self.advance();
                    Ok(Token::Divide)
                }

                '(' => {
                    self.advance();
                    Ok(Token::LeftParen)
                }

                ')' => {
                    self.advance();
                    Ok(Token::RightParen)
                }

                _ => Err(EvalError::Lexical(ch.to_string())),
            },
        }
    }
}

/// Recursive descent parser for cell expressions.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    /// Creates a new parser for the given expression.
    pub fn new(input: &str) -> DomainResult<Self> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;

        Ok(Self {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> DomainResult<()> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> DomainResult<()> {
        if self.current_token == expected {
            self.advance()
        } else {
            Err(EvalError::Parse(format!(
                "Expected {:?}, found {:?}",
                expected, self.current_token
            )))
        }
    }

    /// Parses the top-level expression and requires all input be consumed.
    pub fn parse(&mut self) -> DomainResult<Expr> {
        let expr = self.parse_expression()?;

        if self.current_token != Token::Eof {
            return Err(EvalError::Parse(format!(
                "Unexpected token at end: {:?}",
                self.current_token
            )));
        }

        Ok(expr)
    }

    /// Parses addition and subtraction (lowest precedence, left-associative).
    fn parse_expression(&mut self) -> DomainResult<Expr> {
        let mut left = self.parse_term()?;

        while matches!(self.current_token, Token::Plus | Token::Minus) {
            let op = match self.current_token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Subtract,
                _ => unreachable!(),
            };
            self.advance()?;
            let right = self.parse_term()?;
            left = Expr::Binary {
                left: Box::new(left),
                operator: op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parses multiplication and division.
    fn parse_term(&mut self) -> DomainResult<Expr> {
        let mut left = self.parse_unary()?;

        while matches!(self.current_token, Token::Multiply | Token::Divide) {
            let op = match self.current_token {
                Token::Multiply => BinaryOp::Multiply,
                Token::Divide => BinaryOp::Divide,
                _ => unreachable!(),
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                operator: op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parses unary sign expressions.
    fn parse_unary(&mut self) -> DomainResult<Expr> {
        match self.current_token {
            Token::Plus => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    operator: UnaryOp::Plus,
                    operand: Box::new(operand),
                })
            }
            Token::Minus => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    operator: UnaryOp::Minus,
                    operand: Box::new(operand),
                })
            }
            _ => self.parse_primary(),
        }
    }

    /// Parses primary expressions (highest precedence).
    fn parse_primary(&mut self) -> DomainResult<Expr> {
        match &self.current_token {
            Token::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(Expr::Number(value))
            }

            Token::CellRef(reference) => {
                let reference = reference.clone();
                self.advance()?;
                Ok(Expr::CellRef(reference))
            }

            Token::LeftParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }

            _ => Err(EvalError::Parse(format!(
                "Unexpected token: {:?}",
                self.current_token
            ))),
        }
    }
}

/// Expression evaluator that walks the AST and computes results.
///
/// References are resolved against the grid snapshot as they are reached;
/// the first failure aborts the whole evaluation, so one bad reference
/// invalidates the formula rather than partially evaluating it.
pub struct ExpressionEvaluator<'a> {
    grid: &'a Grid,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Evaluates an expression AST to a numeric result.
    pub fn evaluate(&self, expr: &Expr) -> DomainResult<f64> {
        match expr {
            Expr::Number(value) => Ok(*value),

            Expr::CellRef(reference) => Ok(resolver::resolve(reference, self.grid)?),

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;

                match operator {
                    BinaryOp::Add => Ok(left_val + right_val),
                    BinaryOp::Subtract => Ok(left_val - right_val),
                    BinaryOp::Multiply => Ok(left_val * right_val),
                    BinaryOp::Divide => {
                        if right_val == 0.0 {
                            Err(EvalError::DivisionByZero)
                        } else {
                            Ok(left_val / right_val)
                        }
                    }
                }
            }

            Expr::Unary { operator, operand } => {
                let operand_val = self.evaluate(operand)?;

                match operator {
                    UnaryOp::Plus => Ok(operand_val),
                    UnaryOp::Minus => Ok(-operand_val),
                }
            }
        }
    }
}
