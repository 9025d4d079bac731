use std::fmt::Display;

use thiserror::Error;

use crate::sexpr::SExpr;
use crate::*;

/// Numeric fluents of a state, indexed by their canonical rendering, e.g. `(fuel t1)`.
pub type FluentMap = im::OrdMap<String, Function>;

type Bucket = im::OrdMap<String, GroundedPredicate>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("a state must be of the form `(:init ...)` or `(:state ...)`, got `{0}`")]
    InvalidHeader(String),
    #[error("malformed state element `{0}`")]
    Malformed(String),
    #[error("invalid fluent value `{0}`")]
    InvalidValue(String),
    #[error(transparent)]
    SExpr(#[from] SExprError),
    #[error(transparent)]
    Grounding(#[from] GroundingError),
}

/// World state: the facts that hold and the value of numeric fluents.
///
/// Facts are grouped in buckets, keyed by the untyped rendering of the declaration of their
/// predicate (e.g. `(at ?t ?l)`), and identified within a bucket by their canonical rendering.
/// Both maps are persistent: cloning a state is cheap and never affects the original.
#[derive(Clone, Debug, Default)]
pub struct State {
    predicates: im::OrdMap<Sym, Bucket>,
    fluents: FluentMap,
    is_initial: bool,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state of a problem.
    pub fn initial(
        facts: impl IntoIterator<Item = GroundedPredicate>,
        fluents: impl IntoIterator<Item = Function>,
    ) -> Self {
        let mut state = State::new();
        for fact in facts {
            state.add(fact);
        }
        for fluent in fluents {
            state.set_fluent(fluent);
        }
        state.is_initial = true;
        state
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn set_initial(&mut self, is_initial: bool) {
        self.is_initial = is_initial;
    }

    /// Records that the positive form of `fact` holds.
    pub fn add(&mut self, fact: GroundedPredicate) {
        let fact = if fact.is_positive() { fact } else { fact.positive() };
        self.predicates
            .entry(fact.lifted_key().clone())
            .or_insert_with(Bucket::new)
            .insert(fact.untyped(), fact);
    }

    /// Removes the positive form of `fact`. Returns false if it was not present.
    pub fn remove(&mut self, fact: &GroundedPredicate) -> bool {
        let Some(bucket) = self.predicates.get_mut(fact.lifted_key()) else {
            return false;
        };
        let removed = bucket.remove(&fact.untyped()).is_some();
        if bucket.is_empty() {
            self.predicates.remove(fact.lifted_key());
        }
        removed
    }

    /// A positive literal holds if it is present in the state, a negative one if its positive form is absent.
    pub fn holds(&self, literal: &GroundedPredicate) -> bool {
        let present = self
            .predicates
            .get(literal.lifted_key())
            .is_some_and(|bucket| bucket.contains_key(&literal.untyped()));
        present == literal.is_positive()
    }

    /// Facts of the bucket `key`, e.g. `(at ?t ?l)`, in canonical order.
    pub fn bucket<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a GroundedPredicate> + 'a {
        self.predicates.get(key).into_iter().flat_map(|bucket| bucket.values())
    }

    /// All facts, bucket by bucket.
    pub fn facts(&self) -> impl Iterator<Item = &GroundedPredicate> + '_ {
        self.predicates.values().flat_map(|bucket| bucket.values())
    }

    pub fn num_facts(&self) -> usize {
        self.predicates.values().map(|bucket| bucket.len()).sum()
    }

    pub fn fluents(&self) -> &FluentMap {
        &self.fluents
    }

    pub fn fluent(&self, key: &str) -> Option<&Function> {
        self.fluents.get(key)
    }

    /// Sets a grounded fluent, replacing any previous value.
    pub fn set_fluent(&mut self, fluent: Function) {
        self.fluents.insert(fluent.untyped(), fluent);
    }

    /// Wire rendering: `(:init ...)` for an initial state and `(:state ...)` otherwise, with the
    /// fluent assignments first and the facts afterwards.
    pub fn render(&self, decimal_digits: usize) -> String {
        let header = if self.is_initial { ":init" } else { ":state" };
        let mut out = format!("({header}");
        for fluent in self.fluents.values() {
            out.push(' ');
            out.push_str(&fluent.render_assignment(decimal_digits));
        }
        for fact in self.facts() {
            out.push(' ');
            out.push_str(&fact.untyped());
        }
        out.push(')');
        out
    }

    /// Reads a state in its wire rendering. Facts and fluents must be declared by the domain.
    pub fn parse(text: &str, domain: &Domain) -> Result<State, StateError> {
        let expr = sexpr::parse(text)?;
        let (header, elements) = match expr.as_list() {
            Some([SExpr::Atom(header), elements @ ..]) if header == ":init" || header == ":state" => {
                (header.as_str(), elements)
            }
            _ => return Err(StateError::InvalidHeader(expr.to_string())),
        };
        let mut state = State::new();
        state.is_initial = header == ":init";
        for element in elements {
            if let Some(assignment) = element.as_application_args("=") {
                let [fluent, value] = assignment else {
                    return Err(StateError::Malformed(element.to_string()));
                };
                let (name, objects) = application(fluent)?;
                let value = value
                    .as_atom()
                    .and_then(|v| v.as_str().parse::<f64>().ok())
                    .ok_or_else(|| StateError::InvalidValue(value.to_string()))?;
                state.set_fluent(domain.fluent(name, &objects, value)?);
            } else {
                let (name, objects) = application(element)?;
                state.add(domain.fact(name, &objects)?);
            }
        }
        Ok(state)
    }
}

/// Name and objects of a ground application `(name o1 o2 ...)`.
fn application(e: &SExpr) -> Result<(&str, Vec<&str>), StateError> {
    let malformed = || StateError::Malformed(e.to_string());
    let (head, args) = e.as_list().and_then(|l| l.split_first()).ok_or_else(malformed)?;
    let name = head.as_atom().ok_or_else(malformed)?;
    let objects = args
        .iter()
        .map(|a| a.as_atom().map(Sym::as_str))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(malformed)?;
    Ok((name.as_str(), objects))
}

/// Value equality over the canonical renderings of facts and fluents. Whether a state is initial
/// is not taken into account.
impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.num_facts() == other.num_facts()
            && self.facts().all(|fact| other.holds(fact))
            && self.fluents.len() == other.fluents.len()
            && self
                .fluents
                .iter()
                .all(|(key, f)| other.fluents.get(key).is_some_and(|g| g.value() == f.value()))
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(config::decimal_digits()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexpr::parse;

    fn rooms() -> anyhow::Result<Domain> {
        let mut domain = Domain::new("rooms");
        domain.declare_types(&parse("(robot room)")?)?;
        domain.declare_predicate(&parse("(at ?x - robot ?y - room)")?)?;
        domain.declare_predicate(&parse("(lit ?r - room)")?)?;
        domain.declare_function(&parse("(battery ?x - robot)")?)?;
        Ok(domain)
    }

    #[test]
    fn facts_are_bucketed_by_declaration() -> anyhow::Result<()> {
        let domain = rooms()?;
        let mut state = State::new();
        state.add(domain.fact("at", &["r1", "roomA"])?);
        state.add(domain.fact("at", &["r2", "roomB"])?);
        state.add(domain.fact("at", &["r1", "roomA"])?);
        state.add(domain.fact("lit", &["roomA"])?);
        assert_eq!(state.num_facts(), 3);
        assert_eq!(state.bucket("(at ?x ?y)").count(), 2);
        assert_eq!(state.bucket("(lit ?r)").count(), 1);
        assert_eq!(state.bucket("(at ?a ?b)").count(), 0);

        let at = domain.fact("at", &["r1", "roomA"])?;
        assert!(state.holds(&at));
        assert!(!state.holds(&at.clone().negated()));
        assert!(state.remove(&at));
        assert!(!state.remove(&at));
        assert!(state.holds(&at.negated()));
        Ok(())
    }

    #[test]
    fn copies_are_independent() -> anyhow::Result<()> {
        let domain = rooms()?;
        let mut state = State::new();
        state.add(domain.fact("lit", &["roomA"])?);
        let mut copy = state.clone();
        copy.add(domain.fact("lit", &["roomB"])?);
        copy.set_fluent(domain.fluent("battery", &["r1"], 3.0)?);
        assert_eq!(state.num_facts(), 1);
        assert!(state.fluents().is_empty());
        assert_ne!(state, copy);
        Ok(())
    }

    #[test]
    fn equality_ignores_order_and_initial_flag() -> anyhow::Result<()> {
        let domain = rooms()?;
        let a = State::initial(
            [domain.fact("lit", &["roomA"])?, domain.fact("at", &["r1", "roomA"])?],
            [domain.fluent("battery", &["r1"], 2.0)?],
        );
        let mut b = State::new();
        b.set_fluent(domain.fluent("battery", &["r1"], 2.0)?);
        b.add(domain.fact("at", &["r1", "roomA"])?);
        b.add(domain.fact("lit", &["roomA"])?);
        assert!(a.is_initial());
        assert!(!b.is_initial());
        assert_eq!(a, b);
        b.set_fluent(domain.fluent("battery", &["r1"], 2.5)?);
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn wire_format() -> anyhow::Result<()> {
        let domain = rooms()?;
        let state = State::initial(
            [domain.fact("lit", &["roomA"])?, domain.fact("at", &["r1", "roomA"])?],
            [domain.fluent("battery", &["r1"], 2.5)?],
        );
        let text = state.render(4);
        assert_eq!(text, "(:init (= (battery r1) 2.5) (at r1 roomA) (lit roomA))");
        let parsed = State::parse(&text, &domain)?;
        assert!(parsed.is_initial());
        assert_eq!(parsed, state);
        assert_eq!(parsed.render(4), text);

        let mut next = parsed;
        next.set_initial(false);
        assert_eq!(next.render(4), "(:state (= (battery r1) 2.5) (at r1 roomA) (lit roomA))");
        assert_eq!(State::new().render(4), "(:state)");

        assert!(matches!(State::parse("(:goal (lit roomA))", &domain), Err(StateError::InvalidHeader(_))));
        assert!(matches!(State::parse("(:state (= (battery r1) high))", &domain), Err(StateError::InvalidValue(_))));
        assert!(matches!(State::parse("(:state (lit (roomA)))", &domain), Err(StateError::Malformed(_))));
        assert!(matches!(State::parse("(:state (open roomA))", &domain), Err(StateError::Grounding(_))));
        Ok(())
    }
}
