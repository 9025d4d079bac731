use std::collections::BTreeMap;
use std::fmt::Display;

use crate::predicates::render_atom;
use crate::*;

/// A numeric fluent: a function from its (typed) terms to a real value.
///
/// A lifted function is a template, its value is only meaningful once it is grounded and
/// associated to a state.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: Sym,
    pub signature: Signature,
    value: f64,
}

impl Function {
    pub fn new(name: impl Into<Sym>, signature: Signature) -> Self {
        Function {
            name: name.into(),
            signature,
            value: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn arity(&self) -> usize {
        self.signature.len()
    }

    /// Canonical rendering, e.g. `(fuel ?t)` or `(fuel truck1)` once grounded.
    /// Used as the key of the fluent in a state.
    pub fn untyped(&self) -> String {
        render_atom(&self.name, self.signature.terms())
    }

    /// Renders the value assignment of a grounded fluent: `(= (fuel truck1) 7)`
    pub fn render_assignment(&self, digits: usize) -> String {
        format!("(= {} {})", self.untyped(), utils::format_number(self.value, digits))
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.untyped())
    }
}

impl Display for Typed<'_, &Function> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fun = self.elem;
        if fun.signature.is_empty() {
            write!(f, "({})", fun.name)
        } else {
            write!(f, "({} {})", fun.name, self.types / &fun.signature)
        }
    }
}

/// Numeric functions declared by a domain, indexed by name.
#[derive(Clone, Debug, Default)]
pub struct Functions {
    functions: BTreeMap<Sym, Function>,
}

impl Functions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, function: Function) -> Result<&Function, DeclarationError> {
        if self.functions.contains_key(&function.name) {
            return Err(DeclarationError::DuplicateFunction(function.name));
        }
        let name = function.name.clone();
        Ok(self.functions.entry(name).or_insert(function))
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> + '_ {
        self.functions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderings() -> Result<(), TypeError> {
        let mut types = Types::new();
        let truck = types.add_type("truck", None::<&str>)?;
        let mut fuel = Function::new("fuel", [("?t".into(), truck)].into_iter().collect());
        assert_eq!(fuel.to_string(), "(fuel ?t)");
        assert_eq!((&types / &fuel).to_string(), "(fuel ?t - truck)");
        assert_eq!(fuel.value(), 0.0);
        fuel.set_value(7.25);
        assert_eq!(fuel.render_assignment(4), "(= (fuel ?t) 7.25)");
        assert_eq!(Function::new("total-cost", Signature::new()).to_string(), "(total-cost)");
        Ok(())
    }
}
