//! Substitution of objects for the parameters of lifted elements.
//!
//! All functions are pure: grounding the same element with the same binding always produces
//! structurally equal results.

use std::fmt::Display;

use itertools::Itertools;
use smallvec::SmallVec;

use crate::*;

/// Association of schema parameters to the objects they are bound to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Binding {
    pairs: SmallVec<[(Sym, Sym); 4]>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `param` to `object`, replacing any previous binding of `param`.
    pub fn bind(&mut self, param: impl Into<Sym>, object: impl Into<Sym>) {
        let param = param.into();
        let object = object.into();
        match self.pairs.iter_mut().find(|(p, _)| p == &param) {
            Some(pair) => pair.1 = object,
            None => self.pairs.push((param, object)),
        }
    }

    /// A copy of this binding where `param` is additionally bound to `object`.
    pub fn extended(&self, param: impl Into<Sym>, object: impl Into<Sym>) -> Self {
        let mut extended = self.clone();
        extended.bind(param, object);
        extended
    }

    pub fn get(&self, param: &str) -> Option<&Sym> {
        self.pairs.iter().find(|(p, _)| p == param).map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Sym, &Sym)> + '_ {
        self.pairs.iter().map(|(p, o)| (p, o))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(Sym, Sym)> for Binding {
    fn from_iter<I: IntoIterator<Item = (Sym, Sym)>>(iter: I) -> Self {
        let mut binding = Binding::new();
        for (param, object) in iter {
            binding.bind(param, object);
        }
        binding
    }
}

impl Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.pairs.iter().map(|(p, o)| format!("{p} -> {o}")).format(", "))
    }
}

/// Object a term stands for: the object bound to it, or the term itself if it is a constant of the domain.
pub fn ground_term(term: &Sym, binding: &Binding, domain: &Domain, context: &Sym) -> Result<Sym, GroundingError> {
    match binding.get(term.as_str()) {
        Some(object) => Ok(object.clone()),
        None if domain.constants.contains(term.as_str()) => Ok(term.clone()),
        None => Err(GroundingError::UnboundParameter {
            param: term.clone(),
            context: context.clone(),
        }),
    }
}

/// Grounds a lifted predicate.
///
/// The objects keep the types declared by the lifted predicate. The result is associated to the
/// untyped rendering of the domain's declaration of the predicate, which is the key of its state bucket.
pub fn ground_predicate(
    lifted: &Predicate,
    binding: &Binding,
    domain: &Domain,
) -> Result<GroundedPredicate, GroundingError> {
    let declaration = domain
        .predicates
        .get(lifted.name.as_str())
        .ok_or_else(|| GroundingError::UnknownPredicate(lifted.name.clone()))?;
    let mut signature = Signature::new();
    let mut object_mapping = SmallVec::new();
    for (term, tpe) in lifted.signature.iter() {
        let object = ground_term(term, binding, domain, &lifted.name)?;
        signature.push(object.clone(), tpe);
        object_mapping.push((term.clone(), object));
    }
    Ok(GroundedPredicate::new(
        lifted.name.clone(),
        lifted.polarity,
        signature,
        object_mapping,
        Sym::from(declaration.untyped()),
    ))
}

/// Grounds a lifted function, keeping its value and declared types.
pub fn ground_function(lifted: &Function, binding: &Binding, domain: &Domain) -> Result<Function, GroundingError> {
    if !domain.functions.contains(lifted.name.as_str()) {
        return Err(GroundingError::UnknownFunction(lifted.name.clone()));
    }
    let signature = lifted
        .signature
        .iter()
        .map(|(term, tpe)| Ok((ground_term(term, binding, domain, &lifted.name)?, tpe)))
        .collect::<Result<Signature, GroundingError>>()?;
    Ok(Function::new(lifted.name.clone(), signature).with_value(lifted.value()))
}

/// Rewrites every fluent of the tree with [`ground_function`]. Other leaves are left unchanged.
pub fn ground_numeric_expression(
    lifted: &ExprTree,
    binding: &Binding,
    domain: &Domain,
) -> Result<ExprTree, GroundingError> {
    Ok(match lifted {
        ExprTree::Literal(v) => ExprTree::Literal(*v),
        ExprTree::Fluent(f) => ExprTree::Fluent(ground_function(f, binding, domain)?),
        ExprTree::Binary { op, lhs, rhs } => ExprTree::Binary {
            op: *op,
            lhs: Box::new(ground_numeric_expression(lhs, binding, domain)?),
            rhs: Box::new(ground_numeric_expression(rhs, binding, domain)?),
        },
    })
}

pub fn ground_condition(
    lifted: &Condition,
    binding: &Binding,
    domain: &Domain,
) -> Result<GroundedCondition, GroundingError> {
    Ok(match lifted {
        Condition::Atom(p) => GroundedCondition::Atom(ground_predicate(p, binding, domain)?),
        Condition::Numeric(e) => GroundedCondition::Numeric(ground_numeric_expression(e, binding, domain)?),
        Condition::Compound(c) => GroundedCondition::Compound(ground_compound(c, binding, domain)?),
        // the quantified variable is only bound at evaluation time
        Condition::Universal(u) => GroundedCondition::Universal(GroundedUniversal {
            lifted: u.clone(),
            binding: binding.clone(),
        }),
    })
}

pub fn ground_compound(
    lifted: &Compound,
    binding: &Binding,
    domain: &Domain,
) -> Result<GroundedCompound, GroundingError> {
    let context = Sym::from("=");
    let ground_pairs = |pairs: &[(Sym, Sym)]| -> Result<Vec<(Sym, Sym)>, GroundingError> {
        pairs
            .iter()
            .map(|(a, b)| {
                Ok((
                    ground_term(a, binding, domain, &context)?,
                    ground_term(b, binding, domain, &context)?,
                ))
            })
            .collect()
    };
    Ok(GroundedCompound {
        op: lifted.op,
        operands: lifted
            .operands
            .iter()
            .map(|c| ground_condition(c, binding, domain))
            .collect::<Result<_, _>>()?,
        equalities: ground_pairs(&lifted.equalities)?,
        inequalities: ground_pairs(&lifted.inequalities)?,
    })
}

pub fn ground_effect(lifted: &Effect, binding: &Binding, domain: &Domain) -> Result<GroundedEffect, GroundingError> {
    let antecedent = match &lifted.antecedent {
        Some(antecedent) => Some(ground_compound(antecedent, binding, domain)?),
        None => None,
    };
    Ok(GroundedEffect {
        antecedent,
        discrete_effects: lifted
            .discrete_effects
            .iter()
            .map(|p| ground_predicate(p, binding, domain))
            .collect::<Result<_, _>>()?,
        numeric_effects: lifted
            .numeric_effects
            .iter()
            .map(|e| ground_numeric_expression(e, binding, domain))
            .collect::<Result<_, _>>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexpr::parse;

    fn logistics() -> Result<Domain, anyhow::Error> {
        let mut domain = Domain::new("logistics");
        domain.declare_types(&parse("(truck location - object)")?)?;
        domain.declare_constants(&parse("(depot0 - location)")?)?;
        domain.declare_predicate(&parse("(at ?t - truck ?l - location)")?)?;
        domain.declare_function(&parse("(distance ?from ?to - location)")?)?;
        Ok(domain)
    }

    #[test]
    fn predicates_keep_declared_types() -> anyhow::Result<()> {
        let domain = logistics()?;
        let truck = domain.types.get("truck")?;
        let location = domain.types.get("location")?;
        let lifted = Predicate::new("at", [("?v".into(), truck), ("?to".into(), location)].into_iter().collect());
        let binding: Binding = [("?v".into(), "t1".into()), ("?to".into(), "l2".into())].into_iter().collect();
        let grounded = ground_predicate(&lifted, &binding, &domain)?;
        assert_eq!(grounded.to_string(), "(at t1 l2)");
        assert_eq!(grounded.lifted_key().as_str(), "(at ?t ?l)");
        assert_eq!(grounded.signature().get("t1"), Some(truck));
        let mapping: Vec<_> = grounded.object_mapping().map(|(p, o)| format!("{p}={o}")).collect();
        assert_eq!(mapping, vec!["?v=t1", "?to=l2"]);
        Ok(())
    }

    #[test]
    fn constants_and_unbound_parameters() -> anyhow::Result<()> {
        let domain = logistics()?;
        let truck = domain.types.get("truck")?;
        let location = domain.types.get("location")?;
        let lifted = Predicate::new("at", [("?t".into(), truck), ("depot0".into(), location)].into_iter().collect());
        let binding: Binding = [("?t".into(), "t1".into())].into_iter().collect();
        assert_eq!(ground_predicate(&lifted, &binding, &domain)?.to_string(), "(at t1 depot0)");

        let lifted = Predicate::new("at", [("?t".into(), truck), ("?l".into(), location)].into_iter().collect());
        assert_eq!(
            ground_predicate(&lifted, &binding, &domain),
            Err(GroundingError::UnboundParameter {
                param: "?l".into(),
                context: "at".into()
            })
        );
        let unknown = Predicate::new("in", Signature::new());
        assert_eq!(
            ground_predicate(&unknown, &binding, &domain),
            Err(GroundingError::UnknownPredicate("in".into()))
        );
        Ok(())
    }

    #[test]
    fn regrounding_is_idempotent() -> anyhow::Result<()> {
        let domain = logistics()?;
        let lifted = ExprTree::construct(
            &parse("(>= (* 2 (distance ?a ?b)) (distance depot0 ?b))")?,
            &domain.functions,
        )?;
        let binding: Binding = [("?a".into(), "l1".into()), ("?b".into(), "l2".into())].into_iter().collect();
        let grounded = lifted.ground(&binding, &domain)?;
        assert_eq!(grounded.to_string(), "(>= (* 2 (distance l1 l2)) (distance depot0 l2))");

        let identity: Binding = ["l1", "l2"].into_iter().map(|o| (Sym::from(o), Sym::from(o))).collect();
        assert_eq!(grounded.ground(&identity, &domain)?, grounded);
        // the same inputs always give the same tree
        assert_eq!(lifted.ground(&binding, &domain)?, grounded);
        Ok(())
    }

    #[test]
    fn bindings() {
        let mut binding = Binding::new();
        binding.bind("?a", "r1");
        binding.bind("?b", "roomA");
        let extended = binding.extended("?a", "r2");
        assert_eq!(binding.get("?a").map(Sym::as_str), Some("r1"));
        assert_eq!(extended.get("?a").map(Sym::as_str), Some("r2"));
        assert_eq!(extended.len(), 2);
        assert_eq!(extended.to_string(), "{?a -> r2, ?b -> roomA}");
    }
}
