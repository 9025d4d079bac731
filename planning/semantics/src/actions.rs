use std::collections::BTreeMap;
use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionsError {
    #[error("action `{0}` is declared twice")]
    DuplicateAction(Sym),
    #[error("unknown action `{0}`")]
    UnknownAction(Sym),
}

/// Lifted action schema.
///
/// Unconditional effects are split between `discrete_effects` (negative literals are deletions)
/// and numeric updates, only added through [`Action::add_effect`]. Effects guarded by an antecedent
/// are in `conditional_effects`.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub name: Sym,
    pub signature: Signature,
    pub preconditions: Compound,
    pub discrete_effects: Vec<Predicate>,
    pub(crate) numeric_effects: Vec<ExprTree>,
    pub conditional_effects: Vec<Effect>,
    pub universal_effects: Vec<UniversalEffect>,
}

impl Action {
    pub fn new(name: impl Into<Sym>, signature: Signature) -> Self {
        Action {
            name: name.into(),
            signature,
            preconditions: Compound::and(),
            discrete_effects: Vec::new(),
            numeric_effects: Vec::new(),
            conditional_effects: Vec::new(),
            universal_effects: Vec::new(),
        }
    }

    pub fn arity(&self) -> usize {
        self.signature.len()
    }

    pub fn numeric_effects(&self) -> &[ExprTree] {
        &self.numeric_effects
    }

    /// Adds an effect, dispatching it on the unconditional or conditional effects.
    pub fn add_effect(&mut self, effect: Effect) {
        if effect.is_conditional() {
            self.conditional_effects.push(effect);
        } else {
            self.discrete_effects.extend(effect.discrete_effects);
            self.numeric_effects.extend(effect.numeric_effects);
        }
    }

    /// The unconditional effects gathered as a single effect without antecedent.
    pub fn unconditional_effect(&self) -> Effect {
        Effect {
            antecedent: None,
            discrete_effects: self.discrete_effects.clone(),
            numeric_effects: self.numeric_effects.clone(),
        }
    }

    /// All effects that do not depend on a quantified variable, the unconditional one first.
    pub fn effects(&self) -> impl Iterator<Item = Effect> + '_ {
        std::iter::once(self.unconditional_effect()).chain(self.conditional_effects.iter().cloned())
    }
}

impl Display for Typed<'_, &Action> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let a = self.elem;
        writeln!(f, "(:action {}", a.name)?;
        writeln!(f, "  :parameters ({})", self.types / &a.signature)?;
        writeln!(f, "  :precondition {}", self.types / &a.preconditions)?;
        let effects = a
            .effects()
            .filter(|e| e.is_conditional() || !e.is_empty())
            .map(|e| (self.types / &e).to_string())
            .chain(a.universal_effects.iter().map(|u| (self.types / u).to_string()))
            .collect_vec();
        match effects.as_slice() {
            [single] => write!(f, "  :effect {single})"),
            effects => write!(f, "  :effect (and {}))", effects.iter().format(" ")),
        }
    }
}

/// Actions of a domain, indexed by name.
#[derive(Clone, Debug, Default)]
pub struct Actions {
    actions: BTreeMap<Sym, Action>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, action: Action) -> Result<(), ActionsError> {
        if self.actions.contains_key(&action.name) {
            return Err(ActionsError::DuplicateAction(action.name));
        }
        self.actions.insert(action.name.clone(), action);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Action, ActionsError> {
        self.actions
            .get(name)
            .ok_or_else(|| ActionsError::UnknownAction(Sym::from(name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_are_dispatched() -> anyhow::Result<()> {
        let mut types = Types::new();
        let room = types.add_type("room", None::<&str>)?;
        let mut action = Action::new("toggle", [("?r".into(), room)].into_iter().collect());
        let lit = Predicate::new("lit", [("?r".into(), room)].into_iter().collect());

        let mut on = Effect::when(Compound::and().with(Condition::Atom(lit.clone().negated())));
        on.add(lit.clone());
        action.add_effect(on);
        let mut unconditional = Effect::new();
        unconditional.add(Predicate::new("touched", [("?r".into(), room)].into_iter().collect()));
        action.add_effect(unconditional);

        assert_eq!(action.discrete_effects.len(), 1);
        assert_eq!(action.conditional_effects.len(), 1);
        assert_eq!(action.effects().count(), 2);
        assert_eq!(
            (&types / &action).to_string(),
            "(:action toggle\n  :parameters (?r - room)\n  :precondition (and)\n  \
             :effect (and (and (touched ?r)) (when (and (not (lit ?r))) (and (lit ?r)))))"
        );

        let mut actions = Actions::new();
        actions.add(action.clone())?;
        assert_eq!(actions.add(action), Err(ActionsError::DuplicateAction("toggle".into())));
        assert!(actions.get("toggle").is_ok());
        assert_eq!(actions.get("move").err(), Some(ActionsError::UnknownAction("move".into())));
        Ok(())
    }
}
