use smallvec::SmallVec;

use crate::*;

/// Lifted description of a planning domain: its types, constants, predicate and function
/// declarations, and action schemas.
///
/// A domain is built once and is read-only while actions are grounded and applied.
#[derive(Clone, Debug)]
pub struct Domain {
    pub name: Sym,
    pub types: Types,
    pub constants: Objects,
    pub predicates: Predicates,
    pub functions: Functions,
    pub actions: Actions,
}

impl Domain {
    pub fn new(name: impl Into<Sym>) -> Self {
        Domain {
            name: name.into(),
            types: Types::new(),
            constants: Objects::new(),
            predicates: Predicates::new(),
            functions: Functions::new(),
            actions: Actions::new(),
        }
    }

    /// Ground instance of a declared predicate, e.g. `domain.fact("at", &["r1", "roomA"])`.
    pub fn fact(&self, name: &str, objects: &[&str]) -> Result<GroundedPredicate, GroundingError> {
        let declaration = self
            .predicates
            .get(name)
            .ok_or_else(|| GroundingError::UnknownPredicate(Sym::from(name)))?;
        check_arity(name, declaration.arity(), objects.len())?;
        let mut signature = Signature::new();
        let mut object_mapping = SmallVec::new();
        for ((param, tpe), &object) in declaration.signature.iter().zip(objects) {
            signature.push(object, tpe);
            object_mapping.push((param.clone(), Sym::from(object)));
        }
        Ok(GroundedPredicate::new(
            declaration.name.clone(),
            Polarity::Positive,
            signature,
            object_mapping,
            Sym::from(declaration.untyped()),
        ))
    }

    /// Ground instance of a declared function with the given value, e.g. `domain.fluent("fuel", &["t1"], 10.0)`.
    pub fn fluent(&self, name: &str, objects: &[&str], value: f64) -> Result<Function, GroundingError> {
        let declaration = self
            .functions
            .get(name)
            .ok_or_else(|| GroundingError::UnknownFunction(Sym::from(name)))?;
        check_arity(name, declaration.arity(), objects.len())?;
        let signature = declaration
            .signature
            .types()
            .zip(objects)
            .map(|(tpe, &object)| (Sym::from(object), tpe))
            .collect();
        Ok(Function::new(declaration.name.clone(), signature).with_value(value))
    }

    /// Operator for a call of the action `action`, e.g. `(move r1 roomA roomB)`.
    pub fn operator<'a>(
        &'a self,
        action: &str,
        call: &[&str],
        objects: Option<&'a Objects>,
    ) -> Result<Operator<'a>, ActionsError> {
        let action = self.actions.get(action)?;
        Ok(Operator::new(action, self, call.iter().map(|&o| Sym::from(o)).collect(), objects))
    }
}

fn check_arity(name: &str, expected: usize, found: usize) -> Result<(), GroundingError> {
    if expected != found {
        return Err(GroundingError::ArityMismatch {
            name: Sym::from(name),
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexpr::parse;

    #[test]
    fn facts_and_fluents() -> anyhow::Result<()> {
        let mut domain = Domain::new("logistics");
        domain.declare_types(&parse("(truck location)")?)?;
        domain.declare_predicate(&parse("(at ?t - truck ?l - location)")?)?;
        domain.declare_function(&parse("(fuel ?t - truck)")?)?;

        let fact = domain.fact("at", &["t1", "depot"])?;
        assert_eq!(fact.to_string(), "(at t1 depot)");
        assert_eq!(fact.lifted_key().as_str(), "(at ?t ?l)");
        assert_eq!(fact.signature().get("depot"), Some(domain.types.get("location")?));
        assert_eq!(
            domain.fact("at", &["t1"]),
            Err(GroundingError::ArityMismatch {
                name: "at".into(),
                expected: 2,
                found: 1
            })
        );
        assert_eq!(domain.fact("in", &[]), Err(GroundingError::UnknownPredicate("in".into())));

        let fuel = domain.fluent("fuel", &["t1"], 10.0)?;
        assert_eq!(fuel.render_assignment(4), "(= (fuel t1) 10)");
        assert_eq!(domain.fluent("speed", &[], 1.0), Err(GroundingError::UnknownFunction("speed".into())));
        Ok(())
    }
}
