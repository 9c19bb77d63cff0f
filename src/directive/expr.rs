use crate::definitions::Definitions;
use std::fmt;

/// Error raised when a directive expression cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column {column}: {reason}")]
pub struct ExpressionError {
    /// 1-based column inside the expression text
    pub column: usize,
    /// What went wrong
    pub reason: String,
}

impl ExpressionError {
    fn new(column: usize, reason: impl Into<String>) -> Self {
        Self {
            column,
            reason: reason.into(),
        }
    }
}

/// A parsed directive expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Literal `True` / `False`
    Literal(bool),
    /// Bare definition name
    Name(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    Literal(bool),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(name) => write!(f, "name '{}'", name),
            Token::Literal(value) => write!(f, "'{}'", if *value { "True" } else { "False" }),
            Token::And => write!(f, "'and'"),
            Token::Or => write!(f, "'or'"),
            Token::Not => write!(f, "'not'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

/// Split expression text into tokens, each paired with its 1-based column
fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let column = start + 1;
        if c.is_whitespace() {
            chars.next();
        } else if c == '(' {
            chars.next();
            tokens.push((column, Token::LParen));
        } else if c == ')' {
            chars.next();
            tokens.push((column, Token::RParen));
        } else if c == '_' || c.is_ascii_alphabetic() {
            let mut end = start;
            while let Some(&(i, c)) = chars.peek() {
                if c == '_' || c.is_ascii_alphanumeric() {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &text[start..end];
            let token = match word {
                "and" => Token::And,
                "or" => Token::Or,
                "not" => Token::Not,
                "True" | "true" => Token::Literal(true),
                "False" | "false" => Token::Literal(false),
                _ => Token::Name(word.to_string()),
            };
            tokens.push((column, token));
        } else {
            return Err(ExpressionError::new(column, format!("unexpected character '{}'", c)));
        }
    }

    Ok(tokens)
}

/// Deepest allowed nesting of `not` and parentheses
const MAX_DEPTH: usize = 64;

/// Longest allowed expression, in tokens
const MAX_TOKENS: usize = 1024;

/// Recursive descent parser over the token stream
struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end_column: usize,
    depth: usize,
}

impl Parser {
    fn enter(&mut self, column: usize) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::new(column, "expression nested too deeply"));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn column(&self) -> usize {
        self.tokens.get(self.pos).map(|(c, _)| *c).unwrap_or(self.end_column)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn parse_or(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_unary()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        if self.peek() == Some(&Token::Not) {
            let column = self.column();
            self.enter(column)?;
            self.advance();
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        let column = self.column();
        match self.advance() {
            Some(Token::Name(name)) => Ok(Expr::Name(name)),
            Some(Token::Literal(value)) => Ok(Expr::Literal(value)),
            Some(Token::LParen) => {
                self.enter(column)?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                let close = self.column();
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(ExpressionError::new(close, format!("expected ')', found {}", other))),
                    None => Err(ExpressionError::new(column, "unclosed '('")),
                }
            }
            Some(other) => Err(ExpressionError::new(column, format!("expected a name, found {}", other))),
            None => Err(ExpressionError::new(column, "unexpected end of expression")),
        }
    }
}

impl Expr {
    /// Parse directive expression text
    pub fn parse(text: &str) -> Result<Self, ExpressionError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ExpressionError::new(1, "empty expression"));
        }
        // Long `and`/`or` chains build equally deep trees
        if let Some((column, _)) = tokens.get(MAX_TOKENS) {
            return Err(ExpressionError::new(*column, "expression too long"));
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            end_column: text.len() + 1,
            depth: 0,
        };
        let expr = parser.parse_or()?;

        if let Some(token) = parser.peek() {
            let column = parser.column();
            return Err(ExpressionError::new(column, format!("unexpected {}", token)));
        }

        Ok(expr)
    }

    /// Evaluate against a definition set; unbound names are false
    pub fn evaluate(&self, definitions: &Definitions) -> bool {
        match self {
            Expr::Literal(value) => *value,
            Expr::Name(name) => definitions.is_defined(name),
            Expr::Not(inner) => !inner.evaluate(definitions),
            Expr::And(left, right) => left.evaluate(definitions) && right.evaluate(definitions),
            Expr::Or(left, right) => left.evaluate(definitions) || right.evaluate(definitions),
        }
    }

    /// Names referenced by the expression, in source order, without repeats
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Name(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Expr::Not(inner) => inner.collect_names(names),
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_names(names);
                right.collect_names(names);
            }
        }
    }

    /// Whether adding definitions can never turn this expression false
    pub fn is_monotone(&self) -> bool {
        match self {
            Expr::Literal(_) | Expr::Name(_) => true,
            Expr::Not(_) => false,
            Expr::And(left, right) | Expr::Or(left, right) => left.is_monotone() && right.is_monotone(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(true) => write!(f, "True"),
            Expr::Literal(false) => write!(f, "False"),
            Expr::Name(name) => write!(f, "{}", name),
            Expr::Not(inner) => write!(f, "not {}", inner),
            Expr::And(left, right) => write!(f, "({} and {})", left, right),
            Expr::Or(left, right) => write!(f, "({} or {})", left, right),
        }
    }
}
