use std::fmt::Display;
use std::str::FromStr;

use derive_more::derive::Display;

use crate::utils::format_number;
use crate::*;

/// Operators of numeric expressions: arithmetic, comparisons and fluent updates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum NumOp {
    #[display("+")]
    Add,
    #[display("-")]
    Sub,
    #[display("*")]
    Mul,
    #[display("/")]
    Div,
    #[display("=")]
    Eq,
    #[display("!=")]
    Neq,
    #[display("<")]
    Lt,
    #[display("<=")]
    Leq,
    #[display(">")]
    Gt,
    #[display(">=")]
    Geq,
    #[display("assign")]
    Assign,
    #[display("increase")]
    Increase,
    #[display("decrease")]
    Decrease,
}

impl FromStr for NumOp {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use NumOp::*;
        Ok(match s {
            "+" => Add,
            "-" => Sub,
            "*" => Mul,
            "/" => Div,
            "=" => Eq,
            "!=" => Neq,
            "<" => Lt,
            "<=" => Leq,
            ">" => Gt,
            ">=" => Geq,
            "assign" => Assign,
            "increase" => Increase,
            "decrease" => Decrease,
            _ => return Err(ExpressionError::UnknownOperator(s.to_string())),
        })
    }
}

impl NumOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, NumOp::Add | NumOp::Sub | NumOp::Mul | NumOp::Div)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            NumOp::Eq | NumOp::Neq | NumOp::Lt | NumOp::Leq | NumOp::Gt | NumOp::Geq
        )
    }

    pub fn is_assignment(self) -> bool {
        matches!(self, NumOp::Assign | NumOp::Increase | NumOp::Decrease)
    }

    /// For a comparison, the comparison that holds exactly when this one does not.
    pub fn negation(self) -> Option<NumOp> {
        use NumOp::*;
        match self {
            Eq => Some(Neq),
            Neq => Some(Eq),
            Lt => Some(Geq),
            Leq => Some(Gt),
            Gt => Some(Leq),
            Geq => Some(Lt),
            _ => None,
        }
    }
}

/// Result of the evaluation of an expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    /// Fluent updated by an `assign`, `increase` or `decrease` expression, carrying its new value.
    Assigned(Function),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Assigned(f) => Some(f.value()),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Binary tree of numeric operations over literals and fluents.
///
/// Comparisons and updates may only appear at the root: below it, every operator is arithmetic.
/// This is enforced by [`ExprTree::construct`] and [`ExprTree::binary`].
#[derive(Clone, Debug, PartialEq)]
pub enum ExprTree {
    Literal(f64),
    Fluent(Function),
    Binary {
        op: NumOp,
        lhs: Box<ExprTree>,
        rhs: Box<ExprTree>,
    },
}

impl ExprTree {
    /// Builds a binary node, checking that comparisons and updates are not nested
    /// and that updates target a fluent.
    pub fn binary(op: NumOp, lhs: ExprTree, rhs: ExprTree) -> Result<ExprTree, ExpressionError> {
        for operand in [&lhs, &rhs] {
            if let Some(nested) = operand.op() {
                if !nested.is_arithmetic() {
                    return Err(ExpressionError::MisplacedOperator(nested));
                }
            }
        }
        if op.is_assignment() && !matches!(lhs, ExprTree::Fluent(_)) {
            return Err(ExpressionError::InvalidAssignmentTarget(op));
        }
        Ok(ExprTree::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Builds a tree from a prefix-notation expression such as `(>= (fuel ?t) (* 2 (distance ?a ?b)))`.
    ///
    /// Numbers become literals and lists headed by a declared function become fluents,
    /// typed after the declaration of the function.
    pub fn construct(expr: &SExpr, functions: &Functions) -> Result<ExprTree, ExpressionError> {
        match expr {
            SExpr::Atom(a) => {
                if let Ok(value) = f64::from_str(a.as_str()) {
                    Ok(ExprTree::Literal(value))
                } else if NumOp::from_str(a.as_str()).is_ok() {
                    Err(ExpressionError::OperatorAsLeaf(a.clone()))
                } else {
                    Err(ExpressionError::NonNumericLeaf(a.clone()))
                }
            }
            SExpr::List(items) => {
                let (head, args) = match items.split_first() {
                    Some((SExpr::Atom(head), args)) => (head, args),
                    Some((other, _)) => return Err(ExpressionError::UnknownOperator(other.to_string())),
                    None => return Err(ExpressionError::EmptyExpression),
                };
                if let Ok(op) = NumOp::from_str(head.as_str()) {
                    let [lhs, rhs] = args else {
                        return Err(ExpressionError::WrongArity { op, found: args.len() });
                    };
                    let lhs = ExprTree::construct(lhs, functions)?;
                    let rhs = ExprTree::construct(rhs, functions)?;
                    ExprTree::binary(op, lhs, rhs)
                } else if let Some(declaration) = functions.get(head.as_str()) {
                    if args.len() != declaration.arity() {
                        return Err(ExpressionError::FunctionArity {
                            name: head.clone(),
                            expected: declaration.arity(),
                            found: args.len(),
                        });
                    }
                    let mut signature = Signature::new();
                    for (arg, tpe) in args.iter().zip(declaration.signature.types()) {
                        let term = arg
                            .as_atom()
                            .ok_or_else(|| ExpressionError::InvalidArgument(arg.to_string()))?;
                        signature.push(term, tpe);
                    }
                    Ok(ExprTree::Fluent(Function::new(head, signature)))
                } else {
                    Err(ExpressionError::UnknownFunction(head.clone()))
                }
            }
        }
    }

    /// Operator of the root node, if any
    pub fn op(&self) -> Option<NumOp> {
        match self {
            ExprTree::Binary { op, .. } => Some(*op),
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        self.op().is_some_and(NumOp::is_comparison)
    }

    pub fn is_assignment(&self) -> bool {
        self.op().is_some_and(NumOp::is_assignment)
    }

    /// All fluents appearing in the tree, left to right.
    pub fn fluents(&self) -> Vec<&Function> {
        fn collect<'a>(e: &'a ExprTree, out: &mut Vec<&'a Function>) {
            match e {
                ExprTree::Literal(_) => {}
                ExprTree::Fluent(f) => out.push(f),
                ExprTree::Binary { lhs, rhs, .. } => {
                    collect(lhs, out);
                    collect(rhs, out);
                }
            }
        }
        let mut fluents = Vec::new();
        collect(self, &mut fluents);
        fluents
    }

    fn visit_fluents_mut(&mut self, f: &mut impl FnMut(&mut Function)) {
        match self {
            ExprTree::Literal(_) => {}
            ExprTree::Fluent(fluent) => f(fluent),
            ExprTree::Binary { lhs, rhs, .. } => {
                lhs.visit_fluents_mut(f);
                rhs.visit_fluents_mut(f);
            }
        }
    }

    /// Sets the value of every fluent of the tree from the fluents of a state.
    /// Fluents absent from the state are considered unset and take the value `0`.
    pub fn inject_values(&mut self, fluents: &FluentMap) {
        self.visit_fluents_mut(&mut |f| {
            let value = fluents.get(&f.untyped()).map(Function::value).unwrap_or(0.0);
            f.set_value(value);
        });
    }

    /// Returns a copy of the tree where the terms of every fluent are replaced by the objects they are bound to.
    pub fn ground(&self, binding: &Binding, domain: &Domain) -> Result<ExprTree, GroundingError> {
        grounding::ground_numeric_expression(self, binding, domain)
    }

    /// Evaluates the tree with the tolerance configured for equalities.
    pub fn evaluate(&self) -> Value {
        self.evaluate_with(config::epsilon())
    }

    /// Evaluates the tree: arithmetic yields a number, a comparison yields a boolean and an update
    /// yields the updated fluent.
    /// `=` and `!=` consider numbers that differ by at most `epsilon` to be equal, other
    /// comparisons are exact.
    pub fn evaluate_with(&self, epsilon: f64) -> Value {
        match self {
            ExprTree::Binary { op, lhs, rhs } if op.is_comparison() => {
                Value::Bool(compare(*op, lhs.number(epsilon), rhs.number(epsilon), epsilon))
            }
            ExprTree::Binary { op, lhs, rhs } if op.is_assignment() => {
                let value = update(*op, lhs.number(epsilon), rhs.number(epsilon));
                match lhs.as_ref() {
                    ExprTree::Fluent(f) => Value::Assigned(f.clone().with_value(value)),
                    _ => Value::Number(value),
                }
            }
            _ => Value::Number(self.number(epsilon)),
        }
    }

    fn number(&self, epsilon: f64) -> f64 {
        match self {
            ExprTree::Literal(v) => *v,
            ExprTree::Fluent(f) => f.value(),
            ExprTree::Binary { op, lhs, rhs } => {
                let (l, r) = (lhs.number(epsilon), rhs.number(epsilon));
                match op {
                    NumOp::Add => l + r,
                    NumOp::Sub => l - r,
                    NumOp::Mul => l * r,
                    NumOp::Div => l / r,
                    op if op.is_comparison() => {
                        if compare(*op, l, r, epsilon) {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    op => update(*op, l, r),
                }
            }
        }
    }

    /// For a comparison, the comparison that holds exactly when this one does not.
    pub fn negated_comparison(self) -> Option<ExprTree> {
        match self {
            ExprTree::Binary { op, lhs, rhs } => op.negation().map(|op| ExprTree::Binary { op, lhs, rhs }),
            _ => None,
        }
    }

    /// Prefix-notation rendering, with numbers rounded to `decimal_digits`.
    pub fn render_pddl(&self, decimal_digits: usize) -> String {
        match self {
            ExprTree::Literal(v) => format_number(*v, decimal_digits),
            ExprTree::Fluent(f) => f.untyped(),
            ExprTree::Binary { op, lhs, rhs } => format!(
                "({op} {} {})",
                lhs.render_pddl(decimal_digits),
                rhs.render_pddl(decimal_digits)
            ),
        }
    }
}

fn compare(op: NumOp, l: f64, r: f64, epsilon: f64) -> bool {
    match op {
        NumOp::Eq => (l - r).abs() <= epsilon,
        NumOp::Neq => (l - r).abs() > epsilon,
        NumOp::Lt => l < r,
        NumOp::Leq => l <= r,
        NumOp::Gt => l > r,
        NumOp::Geq => l >= r,
        _ => false,
    }
}

fn update(op: NumOp, current: f64, operand: f64) -> f64 {
    match op {
        NumOp::Increase => current + operand,
        NumOp::Decrease => current - operand,
        _ => operand,
    }
}

impl Display for ExprTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render_pddl(config::decimal_digits()))
    }
}
