//! Errors raised while building, grounding and applying actions.
//!
//! Structural problems of the lifted input are reported when the input is constructed and never
//! at evaluation time. A fluent missing from a state is not an error: it evaluates to `0`.

use thiserror::Error;

use crate::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeclarationError {
    #[error("predicate `{0}` is declared twice")]
    DuplicatePredicate(Sym),
    #[error("function `{0}` is declared twice")]
    DuplicateFunction(Sym),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroundingError {
    #[error("parameter `{param}` of `{context}` is not bound and is not a constant of the domain")]
    UnboundParameter { param: Sym, context: Sym },
    #[error("unknown predicate `{0}`")]
    UnknownPredicate(Sym),
    #[error("unknown function `{0}`")]
    UnknownFunction(Sym),
    #[error("`{name}` expects {expected} argument(s) but {found} were given")]
    ArityMismatch { name: Sym, expected: usize, found: usize },
    #[error("object `{object}` of type `{found}` cannot be used where `{expected}` is expected")]
    IncompatibleArgument { object: Sym, found: Sym, expected: Sym },
}

/// A numeric expression that does not follow the expression grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("empty expression")]
    EmptyExpression,
    #[error("operator `{0}` used as a leaf")]
    OperatorAsLeaf(Sym),
    #[error("`{0}` is neither a number nor a function application")]
    NonNumericLeaf(Sym),
    #[error("`{0}` is not an operator")]
    UnknownOperator(String),
    #[error("operator `{op}` expects two operands but {found} were given")]
    WrongArity { op: NumOp, found: usize },
    #[error("unknown function `{0}`")]
    UnknownFunction(Sym),
    #[error("function `{name}` expects {expected} argument(s) but {found} were given")]
    FunctionArity { name: Sym, expected: usize, found: usize },
    #[error("argument `{0}` of a function application must be a parameter or an object")]
    InvalidArgument(String),
    #[error("operator `{0}` can only appear at the root of an expression")]
    MisplacedOperator(NumOp),
    #[error("the target of `{0}` must be a function application")]
    InvalidAssignmentTarget(NumOp),
}

/// A condition that does not follow the condition grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    #[error("`{head}` expects {expected} argument(s) but {found} were given")]
    WrongArity { head: Sym, expected: usize, found: usize },
    #[error("`{0}` used as a leaf of a condition")]
    OperatorAsLeaf(Sym),
    #[error("unexpected element in condition: `{0}`")]
    Unexpected(String),
    #[error("unknown comparison `{0}`")]
    UnknownComparison(Sym),
    #[error("unknown predicate `{0}`")]
    UnknownPredicate(Sym),
    #[error("`{0}` is neither a parameter in scope nor a constant")]
    UnknownTerm(Sym),
    #[error("`{application}` does not match the declaration `{declaration}`")]
    IncompatibleTerms { application: String, declaration: String },
    #[error("quantifiers cannot be nested inside a quantified condition")]
    NestedQuantifier,
    #[error("quantifiers expect a single typed variable, got `{0}`")]
    InvalidQuantifiedVariable(String),
    #[error("negation is only supported on atoms, equalities and comparisons: `{0}`")]
    UnsupportedNegation(String),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// An effect that does not follow the effect grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    #[error("conditional effects cannot be nested: `{0}`")]
    NestedConditional(String),
    #[error("universal effects cannot be nested: `{0}`")]
    NestedUniversal(String),
    #[error("unsupported effect `{0}`")]
    UnsupportedEffect(String),
    #[error(transparent)]
    Condition(#[from] ConditionError),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorError {
    #[error("action {action} is not applicable in the given state")]
    Inapplicable { action: String },
    #[error(transparent)]
    Grounding(#[from] GroundingError),
}

/// Any error raised while constructing a domain from s-expressions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("malformed {what}: `{expr}`")]
    Malformed { what: &'static str, expr: String },
    #[error(transparent)]
    SExpr(#[from] SExprError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Object(#[from] ObjectError),
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    #[error(transparent)]
    Action(#[from] ActionsError),
    #[error(transparent)]
    Condition(#[from] ConditionError),
    #[error(transparent)]
    Effect(#[from] EffectError),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

impl BuildError {
    pub(crate) fn malformed(what: &'static str, expr: impl ToString) -> Self {
        BuildError::Malformed {
            what,
            expr: expr.to_string(),
        }
    }
}
