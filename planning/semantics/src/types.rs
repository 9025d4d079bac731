use std::fmt::{Debug, Display};

use thiserror::Error;

use crate::*;

/// Name of the universal type, root of every type hierarchy.
pub const ROOT_TYPE: &str = "object";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("unknown type `{0}`")]
    UnknownType(Sym),
    #[error("type `{tpe}` is declared with parent `{new}` but was previously declared with parent `{previous}`")]
    ConflictingParent { tpe: Sym, previous: Sym, new: Sym },
}

/// Index of a type in its [`Types`] registry.
#[derive(Debug, PartialEq, PartialOrd, Ord, Eq, Hash, Clone, Copy)]
pub struct TypeId(u32);

impl From<TypeId> for usize {
    fn from(value: TypeId) -> Self {
        value.0 as usize
    }
}

#[derive(Clone, Debug)]
struct TypeNode {
    name: Sym,
    parent: Option<TypeId>,
}

/// Registry of the user types of a domain, organized as a tree rooted in a single universal type.
///
/// Types are stored in an arena and referred to by their [`TypeId`]. The registry is only extended
/// while a domain is being loaded and is read-only afterwards.
#[derive(Clone, Debug)]
pub struct Types {
    nodes: Vec<TypeNode>,
    by_name: hashbrown::HashMap<Sym, TypeId>,
}

impl Default for Types {
    fn default() -> Self {
        Self::new()
    }
}

impl Types {
    /// Creates a registry containing only the `object` root type.
    pub fn new() -> Self {
        Self::with_root(ROOT_TYPE)
    }

    pub fn with_root(root: impl Into<Sym>) -> Self {
        let root = root.into();
        let mut by_name = hashbrown::HashMap::new();
        by_name.insert(root.clone(), TypeId(0));
        Types {
            nodes: vec![TypeNode {
                name: root,
                parent: None,
            }],
            by_name,
        }
    }

    pub fn root(&self) -> TypeId {
        TypeId(0)
    }

    /// Records a new type with the given parent (the root type if `None`).
    /// If the parent is not recorded yet, it is created as a direct child of the root.
    /// Declaring an existing type again is accepted as long as the parent is the same.
    pub fn add_type(&mut self, tpe: impl Into<Sym>, parent: Option<impl Into<Sym>>) -> Result<TypeId, TypeError> {
        let tpe = tpe.into();
        let parent = match parent {
            Some(parent) => {
                let parent = parent.into();
                match self.by_name.get(&parent) {
                    Some(&id) => id,
                    None => self.insert(parent, self.root()),
                }
            }
            None => self.root(),
        };
        if let Some(&existing) = self.by_name.get(&tpe) {
            let previous = self.parent(existing);
            return match previous {
                Some(previous) if previous == parent => Ok(existing),
                // redeclaring the root (e.g. `object - object`) is a no-op
                None if existing == self.root() => Ok(existing),
                _ => Err(TypeError::ConflictingParent {
                    tpe,
                    previous: previous.map(|p| self.name(p).clone()).unwrap_or_default(),
                    new: self.name(parent).clone(),
                }),
            };
        }
        Ok(self.insert(tpe, parent))
    }

    fn insert(&mut self, name: Sym, parent: TypeId) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(TypeNode {
            name: name.clone(),
            parent: Some(parent),
        });
        self.by_name.insert(name, id);
        id
    }

    pub fn get(&self, name: &str) -> Result<TypeId, TypeError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TypeError::UnknownType(Sym::from(name)))
    }

    /// Returns the type with the given name, or the root type if no name is given.
    pub fn get_or_root(&self, name: Option<&str>) -> Result<TypeId, TypeError> {
        match name {
            Some(name) => self.get(name),
            None => Ok(self.root()),
        }
    }

    pub fn name(&self, tpe: TypeId) -> &Sym {
        &self.nodes[usize::from(tpe)].name
    }

    pub fn parent(&self, tpe: TypeId) -> Option<TypeId> {
        self.nodes[usize::from(tpe)].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // the root is always present
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.nodes.len()).map(|i| TypeId(i as u32))
    }

    /// Returns true if `other` is met when walking up the parent chain starting at `tpe`.
    ///
    /// The walk only starts for types that have a parent: the root type is not a subtype
    /// of anything, not even of itself. Use [`Types::accepts`] for the reflexive relation.
    pub fn is_subtype_of(&self, tpe: TypeId, other: TypeId) -> bool {
        if self.parent(tpe).is_none() {
            return false;
        }
        let target = self.name(other);
        let mut current = Some(tpe);
        while let Some(t) = current {
            if self.name(t) == target {
                return true;
            }
            current = self.parent(t);
        }
        false
    }

    /// Returns true if a value of type `actual` can be used where `declared` is expected,
    /// i.e. if both types are equal or `actual` is a subtype of `declared`.
    pub fn accepts(&self, declared: TypeId, actual: TypeId) -> bool {
        declared == actual || self.is_subtype_of(actual, declared)
    }
}

/// An element of the model, associated with the type registry needed to display it with its types.
#[derive(Copy, Clone)]
pub struct Typed<'a, T> {
    pub elem: T,
    pub types: &'a Types,
}

impl<'a, T> std::ops::Div<T> for &'a Types {
    type Output = Typed<'a, T>;

    fn div(self, rhs: T) -> Self::Output {
        Typed { elem: rhs, types: self }
    }
}

impl Display for Typed<'_, TypeId> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.types.name(self.elem))
    }
}

impl Debug for Typed<'_, TypeId> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
