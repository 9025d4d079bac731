use std::fmt::Display;

use derive_more::derive::Display;

use crate::*;

/// Binary operator used to fold the operands of a compound or the instances of a quantified condition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum BoolOp {
    #[display("and")]
    And,
    #[display("or")]
    Or,
}

impl BoolOp {
    /// Neutral element of the operator: `true` for `and`, `false` for `or`.
    pub fn identity(self) -> bool {
        match self {
            BoolOp::And => true,
            BoolOp::Or => false,
        }
    }

    pub fn fold(self, acc: bool, value: bool) -> bool {
        match self {
            BoolOp::And => acc && value,
            BoolOp::Or => acc || value,
        }
    }
}

/// Lifted condition tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Atom(Predicate),
    /// A numeric comparison, e.g. `(>= (fuel ?t) 3)`
    Numeric(ExprTree),
    Compound(Compound),
    Universal(Universal),
}

impl Condition {
    pub(crate) fn contains_quantifier(&self) -> bool {
        match self {
            Condition::Atom(_) | Condition::Numeric(_) => false,
            Condition::Compound(c) => c.contains_quantifier(),
            Condition::Universal(_) => true,
        }
    }
}

/// Conjunction or disjunction of conditions, together with (in)equality constraints between terms.
#[derive(Clone, Debug, PartialEq)]
pub struct Compound {
    pub op: BoolOp,
    pub operands: Vec<Condition>,
    pub equalities: Vec<(Sym, Sym)>,
    pub inequalities: Vec<(Sym, Sym)>,
}

impl Compound {
    pub fn new(op: BoolOp) -> Self {
        Compound {
            op,
            operands: Vec::new(),
            equalities: Vec::new(),
            inequalities: Vec::new(),
        }
    }

    pub fn and() -> Self {
        Self::new(BoolOp::And)
    }

    pub fn or() -> Self {
        Self::new(BoolOp::Or)
    }

    pub fn push(&mut self, operand: Condition) {
        self.operands.push(operand);
    }

    pub fn with(mut self, operand: Condition) -> Self {
        self.push(operand);
        self
    }

    pub fn add_equality(&mut self, a: impl Into<Sym>, b: impl Into<Sym>) {
        self.equalities.push((a.into(), b.into()));
    }

    pub fn add_inequality(&mut self, a: impl Into<Sym>, b: impl Into<Sym>) {
        self.inequalities.push((a.into(), b.into()));
    }

    /// True if the compound has neither operands nor constraints (it always holds).
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty() && self.equalities.is_empty() && self.inequalities.is_empty()
    }

    pub(crate) fn contains_quantifier(&self) -> bool {
        self.operands.iter().any(Condition::contains_quantifier)
    }

    pub fn ground(&self, binding: &Binding, domain: &Domain) -> Result<GroundedCompound, GroundingError> {
        grounding::ground_compound(self, binding, domain)
    }
}

/// A condition quantified over all objects of a type: `forall` folds the instances with `and`,
/// `exists` with `or`.
#[derive(Clone, Debug, PartialEq)]
pub struct Universal {
    pub param: Sym,
    pub tpe: TypeId,
    pub op: BoolOp,
    pub inner: Compound,
}

impl Universal {
    pub fn new(param: impl Into<Sym>, tpe: TypeId, op: BoolOp, inner: Compound) -> Result<Self, ConditionError> {
        if inner.contains_quantifier() {
            return Err(ConditionError::NestedQuantifier);
        }
        Ok(Universal {
            param: param.into(),
            tpe,
            op,
            inner,
        })
    }

    pub fn forall(param: impl Into<Sym>, tpe: TypeId, inner: Compound) -> Result<Self, ConditionError> {
        Self::new(param, tpe, BoolOp::And, inner)
    }

    pub fn exists(param: impl Into<Sym>, tpe: TypeId, inner: Compound) -> Result<Self, ConditionError> {
        Self::new(param, tpe, BoolOp::Or, inner)
    }

    pub fn quantifier(&self) -> &'static str {
        match self.op {
            BoolOp::And => "forall",
            BoolOp::Or => "exists",
        }
    }
}

/// Condition tree whose parameters have been replaced by objects.
#[derive(Clone, Debug, PartialEq)]
pub enum GroundedCondition {
    Atom(GroundedPredicate),
    Numeric(ExprTree),
    Compound(GroundedCompound),
    Universal(GroundedUniversal),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundedCompound {
    pub op: BoolOp,
    pub operands: Vec<GroundedCondition>,
    pub equalities: Vec<(Sym, Sym)>,
    pub inequalities: Vec<(Sym, Sym)>,
}

/// A quantified condition whose grounding is deferred to evaluation, where the objects of the
/// quantified type are known. It keeps the binding of the enclosing parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundedUniversal {
    pub lifted: Universal,
    pub binding: Binding,
}

/// What conditions are evaluated against, besides the state: the domain (for grounding quantified
/// conditions) and the objects of the problem (the domain of quantification).
#[derive(Copy, Clone)]
pub struct Universe<'a> {
    pub domain: &'a Domain,
    pub objects: &'a Objects,
}

impl<'a> Universe<'a> {
    pub fn new(domain: &'a Domain, objects: &'a Objects) -> Self {
        Universe { domain, objects }
    }
}

impl GroundedCondition {
    pub fn is_satisfied(&self, state: &State, universe: Universe) -> Result<bool, GroundingError> {
        match self {
            GroundedCondition::Atom(p) => Ok(state.holds(p)),
            GroundedCondition::Numeric(e) => {
                let mut e = e.clone();
                e.inject_values(state.fluents());
                Ok(matches!(e.evaluate(), Value::Bool(true)))
            }
            GroundedCondition::Compound(c) => c.is_satisfied(state, universe),
            GroundedCondition::Universal(u) => u.is_satisfied(state, universe),
        }
    }
}

impl GroundedCompound {
    /// True if all equality and inequality constraints hold.
    pub fn constraints_hold(&self) -> bool {
        self.equalities.iter().all(|(a, b)| a == b) && self.inequalities.iter().all(|(a, b)| a != b)
    }

    /// Folds the operands, left to right, with the operator of the compound.
    /// The fold starts from the result of the (in)equality constraints and does not short-circuit.
    pub fn is_satisfied(&self, state: &State, universe: Universe) -> Result<bool, GroundingError> {
        let mut acc = self.constraints_hold();
        for operand in &self.operands {
            let value = operand.is_satisfied(state, universe)?;
            acc = self.op.fold(acc, value);
        }
        Ok(acc)
    }
}

impl GroundedUniversal {
    /// Grounds the inner compound once per object of the quantified type and folds the results.
    pub fn is_satisfied(&self, state: &State, universe: Universe) -> Result<bool, GroundingError> {
        let u = &self.lifted;
        let mut acc = u.op.identity();
        let mut instances = 0;
        for object in universe.objects.of_type(u.tpe) {
            let binding = self.binding.extended(u.param.clone(), object.clone());
            let inner = grounding::ground_compound(&u.inner, &binding, universe.domain)?;
            acc = u.op.fold(acc, inner.is_satisfied(state, universe)?);
            instances += 1;
        }
        tracing::trace!(quantifier = u.quantifier(), param = %u.param, instances, "quantified condition");
        Ok(acc)
    }
}

fn write_compound(
    f: &mut std::fmt::Formatter<'_>,
    op: BoolOp,
    operands: impl Iterator<Item = String>,
    equalities: &[(Sym, Sym)],
    inequalities: &[(Sym, Sym)],
) -> std::fmt::Result {
    let items = operands
        .chain(equalities.iter().map(|(a, b)| format!("(= {a} {b})")))
        .chain(inequalities.iter().map(|(a, b)| format!("(not (= {a} {b}))")));
    write!(f, "({op}")?;
    for item in items {
        write!(f, " {item}")?;
    }
    write!(f, ")")
}

impl Display for Typed<'_, &Condition> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.elem {
            Condition::Atom(p) => write!(f, "{p}"),
            Condition::Numeric(e) => write!(f, "{e}"),
            Condition::Compound(c) => write!(f, "{}", self.types / c),
            Condition::Universal(u) => write!(f, "{}", self.types / u),
        }
    }
}

impl Display for Typed<'_, &Compound> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = self.elem;
        let operands = c.operands.iter().map(|o| (self.types / o).to_string());
        write_compound(f, c.op, operands, &c.equalities, &c.inequalities)
    }
}

impl Display for Typed<'_, &Universal> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let u = self.elem;
        write!(
            f,
            "({} ({} - {}) {})",
            u.quantifier(),
            u.param,
            self.types.name(u.tpe),
            self.types / &u.inner
        )
    }
}

impl Display for Typed<'_, &GroundedCondition> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.elem {
            GroundedCondition::Atom(p) => write!(f, "{p}"),
            GroundedCondition::Numeric(e) => write!(f, "{e}"),
            GroundedCondition::Compound(c) => write!(f, "{}", self.types / c),
            GroundedCondition::Universal(u) => {
                write!(f, "{} where {}", self.types / &u.lifted, u.binding)
            }
        }
    }
}

impl Display for Typed<'_, &GroundedCompound> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = self.elem;
        let operands = c.operands.iter().map(|o| (self.types / o).to_string());
        write_compound(f, c.op, operands, &c.equalities, &c.inequalities)
    }
}
