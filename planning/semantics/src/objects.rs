use std::collections::BTreeMap;
use std::fmt::Display;

use thiserror::Error;

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    name: Sym,
    tpe: TypeId,
}

impl Object {
    pub fn new(name: impl Into<Sym>, tpe: TypeId) -> Self {
        Self { name: name.into(), tpe }
    }

    pub fn name(&self) -> &Sym {
        &self.name
    }

    pub fn tpe(&self) -> TypeId {
        self.tpe
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjectError {
    #[error("object `{0}` is declared twice with different types")]
    DuplicateObject(Sym),
    #[error("unknown object `{0}`")]
    UnknownObject(Sym),
}

/// A set of typed objects: the objects of a problem, or the constants of a domain.
///
/// Iteration follows the lexicographic order of names so that quantified conditions and effects
/// are always expanded in the same order.
#[derive(Clone, Debug, Default)]
pub struct Objects {
    objects: BTreeMap<Sym, TypeId>,
}

impl Objects {
    pub const fn new() -> Self {
        Objects {
            objects: BTreeMap::new(),
        }
    }

    pub fn add_object(&mut self, name: impl Into<Sym>, tpe: TypeId) -> Result<(), ObjectError> {
        let name = name.into();
        match self.objects.get(&name) {
            // objects are exactly the same, ignore as some PDDL domain contain such patterns
            Some(&previous) if previous == tpe => Ok(()),
            Some(_) => Err(ObjectError::DuplicateObject(name)),
            None => {
                self.objects.insert(name, tpe);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<Object, ObjectError> {
        match self.objects.get_key_value(name) {
            Some((name, &tpe)) => Ok(Object::new(name.clone(), tpe)),
            None => Err(ObjectError::UnknownObject(Sym::from(name))),
        }
    }

    pub fn tpe(&self, name: &str) -> Option<TypeId> {
        self.objects.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = Object> + '_ {
        self.objects.iter().map(|(k, v)| Object::new(k.clone(), *v))
    }

    /// Objects whose type is exactly `tpe` (objects of a subtype are not included).
    pub fn of_type(&self, tpe: TypeId) -> impl Iterator<Item = &Sym> + '_ {
        self.objects.iter().filter(move |(_, t)| **t == tpe).map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Display for Typed<'_, &Objects> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, o) in self.elem.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{} - {}", o.name, self.types.name(o.tpe))?;
        }
        Ok(())
    }
}
