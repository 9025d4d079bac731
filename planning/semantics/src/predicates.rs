use std::collections::BTreeMap;
use std::fmt::Display;

use derive_more::derive::Display;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Polarity {
    #[display("positive")]
    Positive,
    #[display("negative")]
    Negative,
}

impl std::ops::Not for Polarity {
    type Output = Polarity;

    fn not(self) -> Self::Output {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }
}

/// A (possibly negated) relation over schema parameters and domain constants.
///
/// `==` is structural: same name, polarity, terms and types. Two predicates denote the same
/// relation when [`Predicate::is_compatible_with`] holds, which is how applications are checked
/// against their declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub name: Sym,
    pub signature: Signature,
    pub polarity: Polarity,
}

impl Predicate {
    pub fn new(name: impl Into<Sym>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            polarity: Polarity::Positive,
        }
    }

    pub fn negated(mut self) -> Self {
        self.polarity = !self.polarity;
        self
    }

    pub fn is_positive(&self) -> bool {
        self.polarity == Polarity::Positive
    }

    pub fn arity(&self) -> usize {
        self.signature.len()
    }

    /// Untyped rendering of the positive literal, e.g. `(at ?t ?l)`, used as key of state buckets.
    pub fn untyped(&self) -> String {
        render_atom(&self.name, self.signature.terms())
    }

    /// Same name and polarity, with a signature that matches the one of `other`, accounting for subtypes.
    pub fn is_compatible_with(&self, other: &Predicate, types: &Types) -> bool {
        self.name == other.name && self.polarity == other.polarity && self.signature.matches(&other.signature, types)
    }
}

pub(crate) fn render_atom<T: Display>(name: &Sym, terms: impl Iterator<Item = T>) -> String {
    let mut terms = terms.peekable();
    if terms.peek().is_none() {
        format!("({name})")
    } else {
        format!("({name} {})", terms.format(" "))
    }
}

fn write_literal(f: &mut std::fmt::Formatter<'_>, polarity: Polarity, atom: &str) -> std::fmt::Result {
    match polarity {
        Polarity::Positive => write!(f, "{atom}"),
        Polarity::Negative => write!(f, "(not {atom})"),
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_literal(f, self.polarity, &self.untyped())
    }
}

/// Typed rendering, as in a predicate declaration: `(at ?t - truck ?l - location)`
impl Display for Typed<'_, &Predicate> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pred = self.elem;
        let atom = if pred.signature.is_empty() {
            format!("({})", pred.name)
        } else {
            format!("({} {})", pred.name, self.types / &pred.signature)
        };
        write_literal(f, pred.polarity, &atom)
    }
}

/// A predicate whose parameters have all been bound to objects.
///
/// Equality and hashing are based on the canonical rendering (name, polarity and objects).
#[derive(Clone, Debug)]
pub struct GroundedPredicate {
    name: Sym,
    polarity: Polarity,
    /// objects of the predicate, with the types declared by the lifted predicate
    signature: Signature,
    /// for each lifted term, the object it was bound to
    object_mapping: SmallVec<[(Sym, Sym); 3]>,
    /// untyped rendering of the predicate declaration this instance belongs to
    lifted_key: Sym,
}

impl GroundedPredicate {
    pub(crate) fn new(
        name: Sym,
        polarity: Polarity,
        signature: Signature,
        object_mapping: SmallVec<[(Sym, Sym); 3]>,
        lifted_key: Sym,
    ) -> Self {
        GroundedPredicate {
            name,
            polarity,
            signature,
            object_mapping,
            lifted_key,
        }
    }

    pub fn name(&self) -> &Sym {
        &self.name
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn is_positive(&self) -> bool {
        self.polarity == Polarity::Positive
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn object_mapping(&self) -> impl Iterator<Item = (&Sym, &Sym)> + '_ {
        self.object_mapping.iter().map(|(param, obj)| (param, obj))
    }

    /// Objects the predicate applies to, in order.
    pub fn objects(&self) -> impl Iterator<Item = &Sym> + '_ {
        self.object_mapping.iter().map(|(_, obj)| obj)
    }

    /// Key of the state bucket holding the instances of this predicate, e.g. `(at ?t ?l)`
    pub fn lifted_key(&self) -> &Sym {
        &self.lifted_key
    }

    /// Canonical rendering of the positive literal, e.g. `(at truck1 depot0)`
    pub fn untyped(&self) -> String {
        render_atom(&self.name, self.objects())
    }

    pub fn positive(&self) -> Self {
        let mut pos = self.clone();
        pos.polarity = Polarity::Positive;
        pos
    }

    pub fn negated(mut self) -> Self {
        self.polarity = !self.polarity;
        self
    }
}

impl PartialEq for GroundedPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.polarity == other.polarity && self.objects().eq(other.objects())
    }
}
impl Eq for GroundedPredicate {}

impl std::hash::Hash for GroundedPredicate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.polarity.hash(state);
        for o in self.objects() {
            o.hash(state);
        }
    }
}

impl Display for GroundedPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_literal(f, self.polarity, &self.untyped())
    }
}

/// Predicates declared by a domain, indexed by name.
#[derive(Clone, Debug, Default)]
pub struct Predicates {
    predicates: BTreeMap<Sym, Predicate>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, predicate: Predicate) -> Result<&Predicate, DeclarationError> {
        if self.predicates.contains_key(&predicate.name) {
            return Err(DeclarationError::DuplicatePredicate(predicate.name));
        }
        let name = predicate.name.clone();
        Ok(self.predicates.entry(name).or_insert(predicate))
    }

    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> + '_ {
        self.predicates.values()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}
