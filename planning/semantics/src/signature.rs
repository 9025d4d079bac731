use std::fmt::Display;

use smallvec::SmallVec;

use crate::*;

/// Ordered association of terms to their declared types.
///
/// In a lifted element the terms are schema parameters (or domain constants), in a grounded one
/// they are the objects the parameters were bound to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    entries: SmallVec<[(Sym, TypeId); 3]>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a term. A term may appear several times, as in `(connected ?x ?x)`.
    pub fn push(&mut self, term: impl Into<Sym>, tpe: TypeId) {
        self.entries.push((term.into(), tpe));
    }

    /// Sets the type of a term, appending it if it is not present yet.
    pub fn insert(&mut self, term: impl Into<Sym>, tpe: TypeId) {
        let term = term.into();
        match self.entries.iter_mut().find(|(t, _)| t == &term) {
            Some(entry) => entry.1 = tpe,
            None => self.entries.push((term, tpe)),
        }
    }

    /// Returns a copy of this signature extended with an additional term.
    /// A term already present has its type replaced.
    pub fn extended(&self, term: impl Into<Sym>, tpe: TypeId) -> Self {
        let mut extended = self.clone();
        extended.insert(term, tpe);
        extended
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Sym, TypeId)> + '_ {
        self.entries.iter().map(|(t, tpe)| (t, *tpe))
    }

    pub fn terms(&self) -> impl Iterator<Item = &Sym> + '_ {
        self.entries.iter().map(|(t, _)| t)
    }

    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.entries.iter().map(|(_, tpe)| *tpe)
    }

    pub fn get(&self, term: &str) -> Option<TypeId> {
        self.entries.iter().find(|(t, _)| t == term).map(|(_, tpe)| *tpe)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.get(term).is_some()
    }

    /// Positional, subtype-aware comparison: `self` matches `lifted` if both have the same length
    /// and, entry by entry, the type in `self` is equal to or a subtype of the type in `lifted`.
    /// Term names are not compared.
    pub fn matches(&self, lifted: &Signature, types: &Types) -> bool {
        self.len() == lifted.len()
            && self
                .types()
                .zip(lifted.types())
                .all(|(actual, declared)| types.accepts(declared, actual))
    }
}

impl FromIterator<(Sym, TypeId)> for Signature {
    fn from_iter<I: IntoIterator<Item = (Sym, TypeId)>>(iter: I) -> Self {
        let mut signature = Signature::new();
        for (term, tpe) in iter {
            signature.push(term, tpe);
        }
        signature
    }
}

/// Displays the signature as a PDDL typed list, e.g. `?t - truck ?from ?to - location`
impl Display for Typed<'_, &Signature> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = &self.elem.entries;
        for (i, (term, tpe)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
            // consecutive terms of the same type share a single type annotation
            let shares_next = entries.get(i + 1).is_some_and(|(_, next)| next == tpe);
            if !shares_next {
                write!(f, " - {}", self.types.name(*tpe))?;
            }
        }
        Ok(())
    }
}
