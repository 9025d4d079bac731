//! Construction of lifted domain elements from s-expressions, e.g.
//!
//! ```
//! # use plan_semantics::*;
//! # use plan_semantics::sexpr::parse;
//! # fn main() -> Result<(), BuildError> {
//! let mut domain = Domain::new("rooms");
//! domain.declare_types(&parse("(robot room)")?)?;
//! domain.declare_predicate(&parse("(at ?x - robot ?y - room)")?)?;
//! domain.declare_action(
//!     "move",
//!     &parse("(?a - robot ?from ?to - room)")?,
//!     &parse("(and (at ?a ?from) (not (= ?from ?to)))")?,
//!     &parse("(and (not (at ?a ?from)) (at ?a ?to))")?,
//! )?;
//! assert_eq!(domain.actions.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Only the fragments of a domain are read here (typed lists, declarations, conditions and effects),
//! not complete domain or problem files.

use std::str::FromStr;

use crate::sexpr::SExpr;
use crate::*;

/// Reads a PDDL typed list such as `(?a ?b - room ?c)`. Names without a type annotation have no type.
fn typed_names(items: &[SExpr], context: &SExpr) -> Result<Vec<(Sym, Option<Sym>)>, BuildError> {
    let malformed = || BuildError::malformed("typed list", context);
    let mut names = Vec::new();
    let mut pending: Vec<Sym> = Vec::new();
    let mut items = items.iter();
    while let Some(item) = items.next() {
        let name = item.as_atom().ok_or_else(malformed)?;
        if name == "-" {
            let tpe = items.next().and_then(SExpr::as_atom).ok_or_else(malformed)?;
            if pending.is_empty() {
                return Err(malformed());
            }
            names.extend(pending.drain(..).map(|n| (n, Some(tpe.clone()))));
        } else {
            pending.push(name.clone());
        }
    }
    names.extend(pending.into_iter().map(|n| (n, None)));
    Ok(names)
}

/// Reads a typed list of already declared types. Untyped names get the root type.
fn typed_list(items: &[SExpr], context: &SExpr, types: &Types) -> Result<Vec<(Sym, TypeId)>, BuildError> {
    typed_names(items, context)?
        .into_iter()
        .map(|(name, tpe)| Ok((name, types.get_or_root(tpe.as_ref().map(Sym::as_str))?)))
        .collect()
}

fn list<'a>(e: &'a SExpr, what: &'static str) -> Result<&'a [SExpr], BuildError> {
    e.as_list().ok_or_else(|| BuildError::malformed(what, e))
}

/// Name and typed parameters of a declaration `(name ?p1 - t1 ...)`.
fn declaration(e: &SExpr, what: &'static str, types: &Types) -> Result<(Sym, Signature), BuildError> {
    let (head, params) = list(e, what)?
        .split_first()
        .ok_or_else(|| BuildError::malformed(what, e))?;
    let name = head.as_atom().ok_or_else(|| BuildError::malformed(what, e))?;
    let signature = typed_list(params, e, types)?.into_iter().collect();
    Ok((name.clone(), signature))
}

impl Objects {
    /// Objects of a typed list, e.g. `(r1 r2 - robot roomA - room)`.
    pub fn from_typed_list(e: &SExpr, types: &Types) -> Result<Objects, BuildError> {
        let mut objects = Objects::new();
        for (name, tpe) in typed_list(list(e, "object list")?, e, types)? {
            objects.add_object(name, tpe)?;
        }
        Ok(objects)
    }
}

impl Domain {
    /// Declares the types of a typed list such as `(truck car - vehicle location)`.
    /// Parents that are not declared yet are created as children of the root type.
    pub fn declare_types(&mut self, e: &SExpr) -> Result<(), BuildError> {
        for (tpe, parent) in typed_names(list(e, "type list")?, e)? {
            self.types.add_type(tpe, parent)?;
        }
        Ok(())
    }

    pub fn declare_constants(&mut self, e: &SExpr) -> Result<(), BuildError> {
        for (name, tpe) in typed_list(list(e, "constant list")?, e, &self.types)? {
            self.constants.add_object(name, tpe)?;
        }
        Ok(())
    }

    /// Declares a predicate from its typed declaration, e.g. `(at ?x - robot ?y - room)`.
    pub fn declare_predicate(&mut self, e: &SExpr) -> Result<&Predicate, BuildError> {
        let (name, signature) = declaration(e, "predicate declaration", &self.types)?;
        Ok(self.predicates.add(Predicate::new(name, signature))?)
    }

    /// Declares a numeric function from its typed declaration, e.g. `(fuel ?t - truck)`.
    pub fn declare_function(&mut self, e: &SExpr) -> Result<&Function, BuildError> {
        let (name, signature) = declaration(e, "function declaration", &self.types)?;
        Ok(self.functions.add(Function::new(name, signature))?)
    }

    pub fn declare_action(
        &mut self,
        name: &str,
        parameters: &SExpr,
        precondition: &SExpr,
        effect: &SExpr,
    ) -> Result<&Action, BuildError> {
        let action = Action::construct(name, parameters, precondition, effect, self)?;
        self.actions.add(action)?;
        Ok(self.actions.get(name)?)
    }
}

/// Type of a term used in a condition: a parameter in scope or a constant of the domain.
fn term_type(term: &Sym, scope: &Signature, domain: &Domain) -> Result<TypeId, ConditionError> {
    scope
        .get(term.as_str())
        .or_else(|| domain.constants.tpe(term.as_str()))
        .ok_or_else(|| ConditionError::UnknownTerm(term.clone()))
}

fn is_term(e: &SExpr, scope: &Signature, domain: &Domain) -> bool {
    e.as_atom().is_some_and(|a| term_type(a, scope, domain).is_ok())
}

/// A predicate application whose terms are typed after the declaration of the predicate.
fn predicate_application(
    head: &Sym,
    args: &[SExpr],
    scope: &Signature,
    domain: &Domain,
) -> Result<Predicate, ConditionError> {
    let declaration = domain
        .predicates
        .get(head.as_str())
        .ok_or_else(|| ConditionError::UnknownPredicate(head.clone()))?;
    if args.len() != declaration.arity() {
        return Err(ConditionError::WrongArity {
            head: head.clone(),
            expected: declaration.arity(),
            found: args.len(),
        });
    }
    let mut actual = Signature::new();
    for arg in args {
        let term = arg
            .as_atom()
            .ok_or_else(|| ConditionError::Unexpected(arg.to_string()))?;
        actual.push(term.clone(), term_type(term, scope, domain)?);
    }
    let application = Predicate::new(head.clone(), actual);
    if !application.is_compatible_with(declaration, &domain.types) {
        return Err(ConditionError::IncompatibleTerms {
            application: (&domain.types / &application).to_string(),
            declaration: (&domain.types / declaration).to_string(),
        });
    }
    // terms keep the types of the declaration
    let signature = application
        .signature
        .terms()
        .cloned()
        .zip(declaration.signature.types())
        .collect();
    Ok(Predicate::new(head.clone(), signature))
}

fn quantified_variable(vars: &SExpr, types: &Types) -> Result<(Sym, TypeId), ConditionError> {
    let invalid = || ConditionError::InvalidQuantifiedVariable(vars.to_string());
    let (var, tpe) = match vars.as_list() {
        Some([SExpr::Atom(var)]) => (var, types.root()),
        Some([SExpr::Atom(var), SExpr::Atom(dash), SExpr::Atom(tpe)]) if dash == "-" => (var, types.get(tpe.as_str())?),
        _ => return Err(invalid()),
    };
    if !var.is_variable() {
        return Err(invalid());
    }
    Ok((var.clone(), tpe))
}

fn expect_args<'a>(head: &Sym, args: &'a [SExpr], expected: usize) -> Result<&'a [SExpr], ConditionError> {
    if args.len() != expected {
        return Err(ConditionError::WrongArity {
            head: head.clone(),
            expected,
            found: args.len(),
        });
    }
    Ok(args)
}

impl Condition {
    /// Builds a condition tree, where `scope` gives the parameters that may appear in it.
    ///
    /// Supported: `and`, `or`, `not`, predicate applications, `=` between terms, numeric comparisons,
    /// `forall` and `exists`. Negation is restricted to atoms, equalities and comparisons.
    pub fn construct(e: &SExpr, scope: &Signature, domain: &Domain) -> Result<Condition, ConditionError> {
        let items = match e {
            SExpr::Atom(a) => {
                return Err(match a.as_str() {
                    "and" | "or" | "not" | "forall" | "exists" => ConditionError::OperatorAsLeaf(a.clone()),
                    _ if NumOp::from_str(a.as_str()).is_ok() => ConditionError::OperatorAsLeaf(a.clone()),
                    _ => ConditionError::Unexpected(a.to_string()),
                });
            }
            SExpr::List(items) => items,
        };
        let Some((SExpr::Atom(head), args)) = items.split_first() else {
            return Err(ConditionError::Unexpected(e.to_string()));
        };
        match head.as_str() {
            "and" => Ok(Condition::Compound(Compound::from_operands(BoolOp::And, args, scope, domain)?)),
            "or" => Ok(Condition::Compound(Compound::from_operands(BoolOp::Or, args, scope, domain)?)),
            "not" => {
                let [inner] = expect_args(head, args, 1)? else {
                    return Err(ConditionError::Unexpected(e.to_string()));
                };
                match Condition::construct(inner, scope, domain)? {
                    Condition::Atom(p) => Ok(Condition::Atom(p.negated())),
                    Condition::Numeric(expr) => expr
                        .negated_comparison()
                        .map(Condition::Numeric)
                        .ok_or_else(|| ConditionError::UnsupportedNegation(e.to_string())),
                    // a single equality between terms
                    Condition::Compound(c)
                        if c.operands.is_empty() && c.equalities.len() == 1 && c.inequalities.is_empty() =>
                    {
                        let mut negated = Compound::and();
                        negated.inequalities = c.equalities;
                        Ok(Condition::Compound(negated))
                    }
                    _ => Err(ConditionError::UnsupportedNegation(e.to_string())),
                }
            }
            "=" if args.len() == 2 && args.iter().all(|a| is_term(a, scope, domain)) => {
                let mut eq = Compound::and();
                eq.add_equality(args[0].to_string(), args[1].to_string());
                Ok(Condition::Compound(eq))
            }
            "forall" | "exists" => {
                let [vars, body] = expect_args(head, args, 2)? else {
                    return Err(ConditionError::Unexpected(e.to_string()));
                };
                let (var, tpe) = quantified_variable(vars, &domain.types)?;
                let inner = Compound::construct(body, &scope.extended(var.clone(), tpe), domain)?;
                let op = if head == "forall" { BoolOp::And } else { BoolOp::Or };
                Ok(Condition::Universal(Universal::new(var, tpe, op, inner)?))
            }
            _ => match NumOp::from_str(head.as_str()) {
                Ok(op) if op.is_comparison() => Ok(Condition::Numeric(ExprTree::construct(e, &domain.functions)?)),
                Ok(_) => Err(ConditionError::UnknownComparison(head.clone())),
                Err(_) => Ok(Condition::Atom(predicate_application(head, args, scope, domain)?)),
            },
        }
    }
}

impl Compound {
    /// Builds the condition and wraps it into a conjunction if it is not already a compound.
    /// The empty list `()` is the empty conjunction, which always holds.
    pub fn construct(e: &SExpr, scope: &Signature, domain: &Domain) -> Result<Compound, ConditionError> {
        if e.as_list().is_some_and(|l| l.is_empty()) {
            return Ok(Compound::and());
        }
        Ok(match Condition::construct(e, scope, domain)? {
            Condition::Compound(c) => c,
            other => Compound::and().with(other),
        })
    }

    fn from_operands(
        op: BoolOp,
        args: &[SExpr],
        scope: &Signature,
        domain: &Domain,
    ) -> Result<Compound, ConditionError> {
        let mut compound = Compound::new(op);
        for arg in args {
            match Condition::construct(arg, scope, domain)? {
                // (in)equality constraints are attached to the compound they appear in, whatever its operator
                Condition::Compound(c) if c.op == BoolOp::And && c.operands.is_empty() => {
                    compound.equalities.extend(c.equalities);
                    compound.inequalities.extend(c.inequalities);
                }
                other => compound.push(other),
            }
        }
        Ok(compound)
    }
}

impl Effect {
    /// Adds a literal or a numeric update to this effect.
    fn extend_with(&mut self, e: &SExpr, scope: &Signature, domain: &Domain) -> Result<(), EffectError> {
        let Some((SExpr::Atom(head), args)) = e.as_list().and_then(|l| l.split_first()) else {
            return Err(EffectError::UnsupportedEffect(e.to_string()));
        };
        match head.as_str() {
            "and" => {
                for arg in args {
                    self.extend_with(arg, scope, domain)?;
                }
                Ok(())
            }
            "when" => Err(EffectError::NestedConditional(e.to_string())),
            "forall" => Err(EffectError::NestedUniversal(e.to_string())),
            "not" => match Condition::construct(e, scope, domain)? {
                Condition::Atom(p) => {
                    // stored as the negative literal
                    self.discrete_effects.push(p);
                    Ok(())
                }
                _ => Err(EffectError::UnsupportedEffect(e.to_string())),
            },
            "assign" | "increase" | "decrease" => self.push_numeric(ExprTree::construct(e, &domain.functions)?),
            _ if NumOp::from_str(head.as_str()).is_ok() => Err(EffectError::UnsupportedEffect(e.to_string())),
            _ => {
                self.add(predicate_application(head, args, scope, domain)?);
                Ok(())
            }
        }
    }

    /// Builds a conditional effect `(when <condition> <effect>)` or a simple effect.
    pub fn construct(e: &SExpr, scope: &Signature, domain: &Domain) -> Result<Effect, EffectError> {
        match e.as_application_args("when") {
            Some([antecedent, body]) => {
                let mut effect = Effect::when(Compound::construct(antecedent, scope, domain)?);
                effect.extend_with(body, scope, domain)?;
                Ok(effect)
            }
            Some(_) => Err(EffectError::UnsupportedEffect(e.to_string())),
            None => {
                let mut effect = Effect::new();
                effect.extend_with(e, scope, domain)?;
                Ok(effect)
            }
        }
    }
}

impl UniversalEffect {
    /// Builds `(forall (?x - t) <effect>)` where the effect is a conjunction of simple and conditional effects.
    pub fn construct(e: &SExpr, scope: &Signature, domain: &Domain) -> Result<UniversalEffect, EffectError> {
        let Some([vars, body]) = e.as_application_args("forall") else {
            return Err(EffectError::UnsupportedEffect(e.to_string()));
        };
        let (var, tpe) = quantified_variable(vars, &domain.types)?;
        let scope = scope.extended(var.clone(), tpe);
        let parts: &[SExpr] = match body.as_application_args("and") {
            Some(parts) => parts,
            None => std::slice::from_ref(body),
        };
        let mut unconditional = Effect::new();
        let mut effects = Vec::new();
        for part in parts {
            if part.as_application_args("forall").is_some() {
                return Err(EffectError::NestedUniversal(part.to_string()));
            }
            let effect = Effect::construct(part, &scope, domain)?;
            if effect.is_conditional() {
                effects.push(effect);
            } else {
                unconditional.discrete_effects.extend(effect.discrete_effects);
                unconditional.numeric_effects.extend(effect.numeric_effects);
            }
        }
        if !unconditional.is_empty() {
            effects.insert(0, unconditional);
        }
        Ok(UniversalEffect::new(var, tpe, effects))
    }
}

impl Action {
    /// Builds an action schema from its parameters (a typed list), precondition and effect.
    pub fn construct(
        name: &str,
        parameters: &SExpr,
        precondition: &SExpr,
        effect: &SExpr,
        domain: &Domain,
    ) -> Result<Action, BuildError> {
        let signature: Signature = typed_list(list(parameters, "parameter list")?, parameters, &domain.types)?
            .into_iter()
            .collect();
        let mut action = Action::new(name, signature);
        action.preconditions = Compound::construct(precondition, &action.signature, domain)?;

        let parts: &[SExpr] = match effect.as_application_args("and") {
            Some(parts) => parts,
            None if effect.as_list().is_some_and(|l| l.is_empty()) => &[],
            None => std::slice::from_ref(effect),
        };
        for part in parts {
            if part.as_application_args("forall").is_some() {
                let universal = UniversalEffect::construct(part, &action.signature, domain)?;
                action.universal_effects.push(universal);
            } else {
                let effect = Effect::construct(part, &action.signature, domain)?;
                action.add_effect(effect);
            }
        }
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexpr::parse;

    fn domain() -> anyhow::Result<Domain> {
        let mut domain = Domain::new("rooms");
        domain.declare_types(&parse("(robot - agent room)")?)?;
        domain.declare_constants(&parse("(hall - room)")?)?;
        domain.declare_predicate(&parse("(at ?x - agent ?y - room)")?)?;
        domain.declare_predicate(&parse("(lit ?r - room)")?)?;
        domain.declare_predicate(&parse("(connected ?a ?b - room)")?)?;
        domain.declare_function(&parse("(battery ?x - robot)")?)?;
        Ok(domain)
    }

    fn scope(domain: &Domain) -> anyhow::Result<Signature> {
        let robot = domain.types.get("robot")?;
        let room = domain.types.get("room")?;
        Ok([("?r".into(), robot), ("?from".into(), room), ("?to".into(), room)]
            .into_iter()
            .collect())
    }

    fn condition(text: &str, domain: &Domain) -> anyhow::Result<Compound> {
        Ok(Compound::construct(&parse(text)?, &scope(domain)?, domain)?)
    }

    fn condition_err(text: &str, domain: &Domain) -> anyhow::Result<ConditionError> {
        Compound::construct(&parse(text)?, &scope(domain)?, domain)
            .err()
            .ok_or_else(|| anyhow::anyhow!("accepted: {text}"))
    }

    #[test]
    fn typed_lists() -> anyhow::Result<()> {
        let domain = domain()?;
        let agent = domain.types.get("agent")?;
        assert_eq!(domain.types.parent(domain.types.get("robot")?), Some(agent));
        assert_eq!(domain.types.parent(domain.types.get("room")?), Some(domain.types.root()));
        let objects = Objects::from_typed_list(&parse("(r1 r2 - robot roomA roomB - room thing)")?, &domain.types)?;
        assert_eq!(
            (&domain.types / &objects).to_string(),
            "r1 - robot r2 - robot roomA - room roomB - room thing - object"
        );
        assert!(matches!(
            Objects::from_typed_list(&parse("(r1 - )")?, &domain.types),
            Err(BuildError::Malformed { .. })
        ));
        assert!(matches!(
            Objects::from_typed_list(&parse("(r1 - boat)")?, &domain.types),
            Err(BuildError::Type(TypeError::UnknownType(_)))
        ));
        let at = domain.predicates.get("at").map(|p| (&domain.types / p).to_string());
        assert_eq!(at.as_deref(), Some("(at ?x - agent ?y - room)"));
        Ok(())
    }

    #[test]
    fn conditions() -> anyhow::Result<()> {
        let domain = domain()?;
        let types = &domain.types;
        let c = condition("(and (at ?r ?from) (connected ?from ?to) (not (= ?from ?to)) (= ?to hall))", &domain)?;
        assert_eq!(c.operands.len(), 2);
        assert_eq!(c.equalities, vec![(Sym::from("?to"), Sym::from("hall"))]);
        assert_eq!(c.inequalities, vec![(Sym::from("?from"), Sym::from("?to"))]);
        assert_eq!(
            (types / &c).to_string(),
            "(and (at ?r ?from) (connected ?from ?to) (= ?to hall) (not (= ?from ?to)))"
        );

        // atoms are wrapped into a conjunction
        assert_eq!((types / &condition("(lit hall)", &domain)?).to_string(), "(and (lit hall))");
        assert!(condition("()", &domain)?.is_empty());

        // constraints belong to the disjunction itself and seed its fold
        let or = condition("(or (lit ?to) (= ?from ?to))", &domain)?;
        assert_eq!(or.op, BoolOp::Or);
        assert_eq!(or.operands.len(), 1);
        assert_eq!(or.equalities, vec![(Sym::from("?from"), Sym::from("?to"))]);
        assert_eq!((types / &or).to_string(), "(or (lit ?to) (= ?from ?to))");

        let numeric = condition("(and (not (< (battery ?r) 10)) (= (battery ?r) 3))", &domain)?;
        assert_eq!((types / &numeric).to_string(), "(and (>= (battery ?r) 10) (= (battery ?r) 3))");

        let quantified = condition("(forall (?x - room) (or (lit ?x) (= ?x ?from)))", &domain)?;
        assert_eq!(
            (types / &quantified).to_string(),
            "(and (forall (?x - room) (or (lit ?x) (= ?x ?from))))"
        );
        let exists = condition("(exists (?x - room) (connected ?from ?x))", &domain)?;
        assert!(matches!(&exists.operands[0], Condition::Universal(u) if u.op == BoolOp::Or));
        Ok(())
    }

    #[test]
    fn disjunctions_with_equalities() -> anyhow::Result<()> {
        let domain = domain()?;
        let objects = Objects::new();
        let universe = Universe::new(&domain, &objects);
        let or = condition("(or (= ?from ?to) (lit ?to))", &domain)?;
        let holds = |from: &str, to: &str, state: &State| -> anyhow::Result<bool> {
            let binding: Binding = [(Sym::from("?from"), Sym::from(from)), (Sym::from("?to"), Sym::from(to))]
                .into_iter()
                .collect();
            Ok(or.ground(&binding, &domain)?.is_satisfied(state, universe)?)
        };
        let empty = State::new();
        assert!(!holds("roomA", "roomB", &empty)?);
        assert!(holds("roomA", "roomA", &empty)?);
        let lit = State::initial([domain.fact("lit", &["roomB"])?], []);
        assert!(holds("roomA", "roomB", &lit)?);
        Ok(())
    }

    #[test]
    fn malformed_conditions() -> anyhow::Result<()> {
        let domain = domain()?;
        assert_eq!(condition_err("(lit ?x)", &domain)?, ConditionError::UnknownTerm("?x".into()));
        assert_eq!(condition_err("(open ?to)", &domain)?, ConditionError::UnknownPredicate("open".into()));
        assert_eq!(
            condition_err("(at ?from ?to)", &domain)?,
            ConditionError::IncompatibleTerms {
                application: "(at ?from ?to - room)".to_string(),
                declaration: "(at ?x - agent ?y - room)".to_string(),
            }
        );
        assert!(matches!(condition_err("(lit ?to ?from)", &domain)?, ConditionError::WrongArity { .. }));
        assert_eq!(condition_err("(and and)", &domain)?, ConditionError::OperatorAsLeaf("and".into()));
        assert_eq!(condition_err("(and <)", &domain)?, ConditionError::OperatorAsLeaf("<".into()));
        assert_eq!(condition_err("(+ 1 2)", &domain)?, ConditionError::UnknownComparison("+".into()));
        assert!(matches!(condition_err("(not (and (lit ?to)))", &domain)?, ConditionError::UnsupportedNegation(_)));
        assert!(matches!(condition_err("(< (battery ?r) x)", &domain)?, ConditionError::Expression(_)));
        assert_eq!(
            condition_err("(forall (?x - room) (exists (?y - room) (connected ?x ?y)))", &domain)?,
            ConditionError::NestedQuantifier
        );
        assert!(matches!(
            condition_err("(forall (?x ?y - room) (connected ?x ?y))", &domain)?,
            ConditionError::InvalidQuantifiedVariable(_)
        ));
        assert!(matches!(
            condition_err("(forall (?x - boat) (lit ?x))", &domain)?,
            ConditionError::Type(TypeError::UnknownType(_))
        ));
        Ok(())
    }

    #[test]
    fn actions() -> anyhow::Result<()> {
        let mut domain = domain()?;
        let action = domain.declare_action(
            "move",
            &parse("(?r - robot ?from ?to - room)")?,
            &parse("(and (at ?r ?from) (>= (battery ?r) 1))")?,
            &parse(
                "(and (not (at ?r ?from)) (at ?r ?to) (decrease (battery ?r) 1)
                      (when (not (lit ?to)) (lit ?to))
                      (forall (?x - room) (when (connected ?to ?x) (lit ?x))))",
            )?,
        )?;
        assert_eq!(action.discrete_effects.len(), 2);
        assert_eq!(action.numeric_effects.len(), 1);
        assert_eq!(action.conditional_effects.len(), 1);
        assert_eq!(action.universal_effects.len(), 1);
        assert_eq!(action.universal_effects[0].conditional_effects.len(), 1);

        let err = |effect: &str| -> anyhow::Result<BuildError> {
            Action::construct("a", &parse("(?r - robot ?to - room)")?, &parse("()")?, &parse(effect)?, &domain)
                .err()
                .ok_or_else(|| anyhow::anyhow!("accepted: {effect}"))
        };
        assert!(matches!(
            err("(when (lit ?to) (when (lit ?to) (lit ?to)))")?,
            BuildError::Effect(EffectError::NestedConditional(_))
        ));
        assert!(matches!(
            err("(forall (?x - room) (forall (?y - room) (lit ?y)))")?,
            BuildError::Effect(EffectError::NestedUniversal(_))
        ));
        assert!(matches!(
            err("(< (battery ?r) 1)")?,
            BuildError::Effect(EffectError::UnsupportedEffect(_))
        ));
        assert!(matches!(
            err("(not (= ?r ?to))")?,
            BuildError::Effect(EffectError::UnsupportedEffect(_))
        ));
        assert!(matches!(
            err("(assign 3 (battery ?r))")?,
            BuildError::Effect(EffectError::Expression(ExpressionError::InvalidAssignmentTarget(_)))
        ));

        let duplicate = domain.declare_action("move", &parse("()")?, &parse("()")?, &parse("()")?);
        assert!(matches!(duplicate, Err(BuildError::Action(ActionsError::DuplicateAction(_)))));
        Ok(())
    }
}
