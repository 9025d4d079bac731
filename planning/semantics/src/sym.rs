use std::{
    borrow::Cow,
    fmt::{Debug, Display},
};

/// Name of an entity of the model: type, object, parameter, predicate, function or action.
///
/// Unlike names in a source file, symbols are compared exactly (no case folding) since their
/// rendering is used as canonical keys of the world state.
#[derive(Clone, Default)]
pub struct Sym {
    /// The underlying type uses small string optimization to avoid heap allocation for short identifiers
    symbol: compact_str::CompactString,
}

impl Sym {
    pub fn new<'a>(s: impl Into<Cow<'a, str>>) -> Sym {
        Sym {
            symbol: s.into().into(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.symbol.as_str()
    }

    /// Returns true if the symbol denotes a schema variable, e.g. `?truck`
    pub fn is_variable(&self) -> bool {
        self.symbol.starts_with('?')
    }
}

impl AsRef<str> for Sym {
    fn as_ref(&self) -> &str {
        &self.symbol
    }
}

impl std::borrow::Borrow<str> for Sym {
    fn borrow(&self) -> &str {
        &self.symbol
    }
}

impl From<&str> for Sym {
    fn from(value: &str) -> Self {
        Sym { symbol: value.into() }
    }
}

impl From<String> for Sym {
    fn from(value: String) -> Self {
        Sym { symbol: value.into() }
    }
}

impl From<&String> for Sym {
    fn from(value: &String) -> Self {
        Sym::from(value.as_str())
    }
}

impl From<&Sym> for Sym {
    fn from(value: &Sym) -> Self {
        value.clone()
    }
}

impl Debug for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
impl Display for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl PartialEq for Sym {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl PartialEq<str> for Sym {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}
impl PartialEq<&str> for Sym {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Eq for Sym {}

impl PartialOrd for Sym {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Sym {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

// must agree with the `Borrow<str>` implementation
impl std::hash::Hash for Sym {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables() {
        assert!(Sym::from("?x").is_variable());
        assert!(!Sym::from("truck1").is_variable());
    }

    #[test]
    fn lookup_by_str() {
        let mut map = hashbrown::HashMap::new();
        map.insert(Sym::from("roomA"), 1);
        assert_eq!(map.get("roomA"), Some(&1));
        assert_eq!(map.get("rooma"), None);
    }
}
