use std::fmt::Display;

use itertools::Itertools;

use crate::*;

/// Effect of an action, optionally guarded by an antecedent (conditional effect).
///
/// Negative literals of `discrete_effects` are deletions, positive ones are additions.
/// Numeric effects are `assign`, `increase` or `decrease` expressions, only added through
/// [`Effect::push_numeric`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effect {
    pub antecedent: Option<Compound>,
    pub discrete_effects: Vec<Predicate>,
    pub(crate) numeric_effects: Vec<ExprTree>,
}

impl Effect {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty effect that only takes place when `antecedent` holds.
    pub fn when(antecedent: Compound) -> Self {
        Effect {
            antecedent: Some(antecedent),
            ..Default::default()
        }
    }

    pub fn add(&mut self, predicate: Predicate) {
        self.discrete_effects.push(predicate);
    }

    pub fn delete(&mut self, predicate: Predicate) {
        self.discrete_effects.push(predicate.negated());
    }

    pub fn push_numeric(&mut self, expr: ExprTree) -> Result<(), EffectError> {
        if !expr.is_assignment() {
            return Err(EffectError::UnsupportedEffect(expr.to_string()));
        }
        self.numeric_effects.push(expr);
        Ok(())
    }

    pub fn numeric_effects(&self) -> &[ExprTree] {
        &self.numeric_effects
    }

    pub fn is_conditional(&self) -> bool {
        self.antecedent.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.discrete_effects.is_empty() && self.numeric_effects.is_empty()
    }

    pub fn ground(&self, binding: &Binding, domain: &Domain) -> Result<GroundedEffect, GroundingError> {
        grounding::ground_effect(self, binding, domain)
    }
}

/// Conditional effects applied once for every object of a type.
#[derive(Clone, Debug, PartialEq)]
pub struct UniversalEffect {
    pub param: Sym,
    pub tpe: TypeId,
    pub conditional_effects: Vec<Effect>,
}

impl UniversalEffect {
    pub fn new(param: impl Into<Sym>, tpe: TypeId, conditional_effects: Vec<Effect>) -> Self {
        UniversalEffect {
            param: param.into(),
            tpe,
            conditional_effects,
        }
    }

    /// Grounds the wrapped effects once for every object of the quantified type, object by object.
    pub fn ground(&self, binding: &Binding, universe: Universe) -> Result<Vec<GroundedEffect>, GroundingError> {
        let mut instances = Vec::new();
        let mut num_objects = 0;
        for object in universe.objects.of_type(self.tpe) {
            let binding = binding.extended(self.param.clone(), object.clone());
            for effect in &self.conditional_effects {
                instances.push(grounding::ground_effect(effect, &binding, universe.domain)?);
            }
            num_objects += 1;
        }
        tracing::trace!(param = %self.param, num_objects, "universal effect");
        Ok(instances)
    }

    /// Applies the wrapped effects for every object of the quantified type.
    pub fn apply(
        &self,
        binding: &Binding,
        prev: &State,
        next: &mut State,
        universe: Universe,
        allow_inapplicable: bool,
    ) -> Result<(), GroundingError> {
        let instances = self.ground(binding, universe)?;
        GroundedEffect::apply_all(&instances, prev, next, universe, allow_inapplicable)
    }
}

/// An effect whose parameters have been replaced by objects.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundedEffect {
    pub antecedent: Option<GroundedCompound>,
    pub discrete_effects: Vec<GroundedPredicate>,
    pub(crate) numeric_effects: Vec<ExprTree>,
}

impl GroundedEffect {
    pub fn numeric_effects(&self) -> &[ExprTree] {
        &self.numeric_effects
    }

    /// True if the effect has no antecedent, if inapplicable actions are tolerated, or if the
    /// antecedent holds in `prev`.
    pub fn antecedents_hold(
        &self,
        prev: &State,
        universe: Universe,
        allow_inapplicable: bool,
    ) -> Result<bool, GroundingError> {
        match &self.antecedent {
            None => Ok(true),
            Some(_) if allow_inapplicable => Ok(true),
            Some(antecedent) => antecedent.is_satisfied(prev, universe),
        }
    }

    /// Applies, in order, the effects whose antecedents hold.
    ///
    /// Antecedents are always checked against `prev`, the state before the action, so that
    /// effects do not observe each other. Effects are applied to `next`.
    pub fn apply_all(
        effects: &[GroundedEffect],
        prev: &State,
        next: &mut State,
        universe: Universe,
        allow_inapplicable: bool,
    ) -> Result<(), GroundingError> {
        for effect in effects {
            if effect.antecedents_hold(prev, universe, allow_inapplicable)? {
                tracing::trace!(effect = %(&universe.domain.types / effect), "apply");
                effect.apply(next);
            }
        }
        Ok(())
    }

    /// Applies the effect in place: deletions, then additions, then numeric updates.
    ///
    /// Numeric updates read the fluents as they were before any of them is applied, and replace
    /// the entry of the updated fluent.
    pub fn apply(&self, state: &mut State) {
        let (deletions, additions): (Vec<_>, Vec<_>) =
            self.discrete_effects.iter().partition(|p| !p.is_positive());
        for deleted in deletions {
            state.remove(&deleted.positive());
        }
        for added in additions {
            state.add(added.clone());
        }
        let fluents = state.fluents().clone();
        for expr in &self.numeric_effects {
            let mut expr = expr.clone();
            expr.inject_values(&fluents);
            // only updates are accepted by `Effect::push_numeric`
            if let Value::Assigned(fluent) = expr.evaluate() {
                state.set_fluent(fluent);
            }
        }
    }
}

fn write_effect(
    f: &mut std::fmt::Formatter<'_>,
    antecedent: Option<String>,
    discrete: impl Iterator<Item = String>,
    numeric: &[ExprTree],
) -> std::fmt::Result {
    let body = format!("(and {})", discrete.chain(numeric.iter().map(|e| e.to_string())).format(" "));
    match antecedent {
        Some(antecedent) => write!(f, "(when {antecedent} {body})"),
        None => write!(f, "{body}"),
    }
}

impl Display for Typed<'_, &Effect> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let e = self.elem;
        let antecedent = e.antecedent.as_ref().map(|a| (self.types / a).to_string());
        write_effect(f, antecedent, e.discrete_effects.iter().map(|p| p.to_string()), &e.numeric_effects)
    }
}

impl Display for Typed<'_, &UniversalEffect> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let u = self.elem;
        write!(f, "(forall ({} - {}) ", u.param, self.types.name(u.tpe))?;
        match u.conditional_effects.as_slice() {
            [single] => write!(f, "{}", self.types / single)?,
            effects => write!(f, "(and {})", effects.iter().map(|e| self.types / e).format(" "))?,
        }
        write!(f, ")")
    }
}

impl Display for Typed<'_, &GroundedEffect> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let e = self.elem;
        let antecedent = e.antecedent.as_ref().map(|a| (self.types / a).to_string());
        write_effect(f, antecedent, e.discrete_effects.iter().map(|p| p.to_string()), &e.numeric_effects)
    }
}
