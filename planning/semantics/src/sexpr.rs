use std::fmt::{Debug, Display, Error, Formatter};

use thiserror::Error;

use crate::Sym;
use crate::utils::disp_iter;

/// S-expression: prefix-notation token tree read from PDDL-like text.
#[derive(Eq, PartialEq, Clone)]
pub enum SExpr {
    Atom(Sym),
    List(Vec<SExpr>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SExprError {
    #[error("unexpected closing parenthesis")]
    UnexpectedClosing,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected input after the end of the expression: `{0}`")]
    TrailingInput(String),
}

impl SExpr {
    pub fn atom(a: impl Into<Sym>) -> Self {
        SExpr::Atom(a.into())
    }

    pub fn list(es: Vec<SExpr>) -> Self {
        SExpr::List(es)
    }

    pub fn as_atom(&self) -> Option<&Sym> {
        match self {
            SExpr::Atom(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Returns the first element of a list, if it is an atom.
    pub fn head(&self) -> Option<&Sym> {
        self.as_list().and_then(|l| l.first()).and_then(|e| e.as_atom())
    }

    /// If the expression is a list whose first element is the atom `f`, returns the remaining elements.
    pub fn as_application_args(&self, f: &str) -> Option<&[SExpr]> {
        match self {
            SExpr::List(v) => match v.first() {
                Some(SExpr::Atom(head)) if head == f => Some(&v[1..]),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Display for SExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            SExpr::Atom(a) => write!(f, "{a}"),
            SExpr::List(v) => {
                write!(f, "(")?;
                disp_iter(f, v, " ")?;
                write!(f, ")")
            }
        }
    }
}
impl Debug for SExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{self}")
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Sym(String),
    LParen,
    RParen,
}

/// Reads exactly one s-expression from the input.
pub fn parse(s: &str) -> Result<SExpr, SExprError> {
    let tokens = tokenize(s);
    let mut tokens = tokens.iter().peekable();
    let e = read(&mut tokens)?;
    match tokens.next() {
        None => Ok(e),
        Some(Token::Sym(s)) => Err(SExprError::TrailingInput(s.clone())),
        Some(Token::LParen) => Err(SExprError::TrailingInput("(".to_string())),
        Some(Token::RParen) => Err(SExprError::UnexpectedClosing),
    }
}

/// Reads a sequence of s-expressions (e.g. the actions of a plan, one per line).
pub fn parse_many(s: &str) -> Result<Vec<SExpr>, SExprError> {
    let tokens = tokenize(s);
    let mut tokens = tokens.iter().peekable();
    let mut exprs = Vec::new();
    while tokens.peek().is_some() {
        exprs.push(read(&mut tokens)?);
    }
    Ok(exprs)
}

fn tokenize(s: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = s.chars();
    let mut cur = String::new();
    while let Some(n) = chars.next() {
        if n == ';' {
            // drop all chars until a new line is found
            chars.by_ref().take_while(|c| *c != '\n').count();
            if !cur.is_empty() {
                tokens.push(Token::Sym(std::mem::take(&mut cur)));
            }
        } else if n.is_whitespace() || n == '(' || n == ')' {
            if !cur.is_empty() {
                tokens.push(Token::Sym(std::mem::take(&mut cur)));
            }
            if n == '(' {
                tokens.push(Token::LParen);
            }
            if n == ')' {
                tokens.push(Token::RParen);
            }
        } else {
            cur.push(n);
        }
    }
    if !cur.is_empty() {
        tokens.push(Token::Sym(cur));
    }
    tokens
}

fn read(tokens: &mut std::iter::Peekable<std::slice::Iter<Token>>) -> Result<SExpr, SExprError> {
    match tokens.next() {
        Some(Token::Sym(s)) => Ok(SExpr::atom(s.as_str())),
        Some(Token::LParen) => {
            let mut es = Vec::new();
            loop {
                match tokens.peek() {
                    Some(Token::RParen) => {
                        tokens.next();
                        return Ok(SExpr::list(es));
                    }
                    Some(_) => es.push(read(tokens)?),
                    None => return Err(SExprError::UnexpectedEnd),
                }
            }
        }
        Some(Token::RParen) => Err(SExprError::UnexpectedClosing),
        None => Err(SExprError::UnexpectedEnd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_nested() -> Result<(), SExprError> {
        let e = parse("(increase (fuel ?t) (* 2 (distance ?from ?to))) ; consumption")?;
        assert_eq!(e.head(), Some(&Sym::from("increase")));
        assert_eq!(e.to_string(), "(increase (fuel ?t) (* 2 (distance ?from ?to)))");
        let args = e.as_application_args("increase").map(|a| a.len());
        assert_eq!(args, Some(2));
        assert_eq!(e.as_application_args("decrease"), None);
        Ok(())
    }

    #[test]
    fn case_is_preserved() -> Result<(), SExprError> {
        assert_eq!(parse("(at r1 roomA)")?.to_string(), "(at r1 roomA)");
        Ok(())
    }

    #[test]
    fn errors() {
        assert_eq!(parse("(at r1"), Err(SExprError::UnexpectedEnd));
        assert_eq!(parse(")"), Err(SExprError::UnexpectedClosing));
        assert_eq!(parse(""), Err(SExprError::UnexpectedEnd));
        assert!(matches!(parse("(a) (b)"), Err(SExprError::TrailingInput(_))));
    }

    #[test]
    fn many() -> Result<(), SExprError> {
        let plan = parse_many("(move r1 roomA roomB)\n(move r1 roomB roomC)\n")?;
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].to_string(), "(move r1 roomB roomC)");
        assert_eq!(parse("42")?, SExpr::atom("42"));
        Ok(())
    }
}
