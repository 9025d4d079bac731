use std::fmt::Display;

use once_cell::unsync::OnceCell;
use tracing::Level;

use crate::predicates::render_atom;
use crate::*;

static NO_OBJECTS: Objects = Objects::new();

/// An action schema instantiated with call objects, e.g. `(move r1 roomA roomB)`.
///
/// Grounding happens on first use and is memoized. The cache is not synchronized: an operator
/// is meant to be used from a single thread, independent operators can live on different threads.
pub struct Operator<'a> {
    action: &'a Action,
    domain: &'a Domain,
    /// objects of the problem, over which quantified conditions and effects range
    objects: Option<&'a Objects>,
    call: Vec<Sym>,
    grounded: OnceCell<GroundedAction>,
}

/// Preconditions and effects of an action with its parameters bound to the call objects.
/// Universal effects are expanded into one instance per quantified object and wrapped effect.
#[derive(Clone, Debug)]
pub struct GroundedAction {
    pub binding: Binding,
    pub preconditions: GroundedCompound,
    pub effects: Vec<GroundedEffect>,
    pub universal_effects: Vec<GroundedEffect>,
}

impl<'a> Operator<'a> {
    pub fn new(action: &'a Action, domain: &'a Domain, call: Vec<Sym>, objects: Option<&'a Objects>) -> Self {
        Operator {
            action,
            domain,
            objects,
            call,
            grounded: OnceCell::new(),
        }
    }

    pub fn action(&self) -> &Action {
        self.action
    }

    pub fn call(&self) -> &[Sym] {
        &self.call
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded.get().is_some()
    }

    fn universe(&self) -> Universe<'a> {
        Universe::new(self.domain, self.objects.unwrap_or(&NO_OBJECTS))
    }

    /// Binds the parameters of the action to the call objects and grounds preconditions and effects.
    /// Subsequent calls return the cached result.
    pub fn ground(&self) -> Result<&GroundedAction, GroundingError> {
        self.grounded.get_or_try_init(|| self.compute_grounding())
    }

    fn compute_grounding(&self) -> Result<GroundedAction, GroundingError> {
        let _span = tracing::span!(Level::TRACE, "ground", action = %self.action.name).entered();
        let action = self.action;
        let types = &self.domain.types;
        if self.call.len() != action.arity() {
            return Err(GroundingError::ArityMismatch {
                name: action.name.clone(),
                expected: action.arity(),
                found: self.call.len(),
            });
        }
        let mut binding = Binding::new();
        for ((param, declared), object) in action.signature.iter().zip(&self.call) {
            // objects that are unknown are accepted with the declared type
            let actual = self
                .objects
                .and_then(|objects| objects.tpe(object.as_str()))
                .or_else(|| self.domain.constants.tpe(object.as_str()));
            if let Some(actual) = actual {
                if !types.accepts(declared, actual) {
                    return Err(GroundingError::IncompatibleArgument {
                        object: object.clone(),
                        found: types.name(actual).clone(),
                        expected: types.name(declared).clone(),
                    });
                }
            }
            binding.bind(param.clone(), object.clone());
        }
        let preconditions = grounding::ground_compound(&action.preconditions, &binding, self.domain)?;
        let effects = action
            .effects()
            .map(|e| grounding::ground_effect(&e, &binding, self.domain))
            .collect::<Result<Vec<_>, _>>()?;
        let mut universal_effects = Vec::new();
        for effect in &action.universal_effects {
            universal_effects.extend(effect.ground(&binding, self.universe())?);
        }
        tracing::debug!(call = %self, %binding, "grounded");
        Ok(GroundedAction {
            binding,
            preconditions,
            effects,
            universal_effects,
        })
    }

    /// True if the preconditions of the grounded action hold in `state`.
    pub fn is_applicable(&self, state: &State) -> Result<bool, GroundingError> {
        let grounded = self.ground()?;
        grounded.preconditions.is_satisfied(state, self.universe())
    }

    /// Returns the state resulting from the application of the action in `state`.
    ///
    /// Fails if the action is not applicable, unless `allow_inapplicable` is set, in which case the
    /// effects are applied anyway and the antecedents of conditional effects are not checked.
    pub fn apply(&self, state: &State, allow_inapplicable: bool) -> Result<State, OperatorError> {
        let grounded = self.ground()?;
        let universe = self.universe();
        if !grounded.preconditions.is_satisfied(state, universe)? {
            if !allow_inapplicable {
                return Err(OperatorError::Inapplicable { action: self.to_string() });
            }
            tracing::warn!(call = %self, "applying an inapplicable action");
        }
        let mut next = state.clone();
        GroundedEffect::apply_all(&grounded.effects, state, &mut next, universe, allow_inapplicable)?;
        GroundedEffect::apply_all(&grounded.universal_effects, state, &mut next, universe, allow_inapplicable)?;
        next.set_initial(false);
        Ok(next)
    }
}

impl Display for Operator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render_atom(&self.action.name, self.call.iter()))
    }
}
