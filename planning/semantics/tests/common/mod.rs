#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use plan_semantics::sexpr::{self, SExpr};
use plan_semantics::{Domain, Objects, State, Sym};

/// A domain, the objects of a problem, an initial state and a sequence of action calls.
///
/// Scenario files are sequences of sections:
/// `(:types ...)`, `(:constants ...)`, `(:predicates ...)`, `(:functions ...)`,
/// `(:action name :parameters (...) :precondition ... :effect ...)`, `(:objects ...)`,
/// `(:init ...)` and either `(:plan ...)` or `(:replay ...)`.
/// Calls of a `:replay` section are applied even if they are not applicable.
pub struct Scenario {
    pub domain: Domain,
    pub objects: Objects,
    pub init: State,
    pub steps: Vec<Vec<String>>,
    pub tolerant: bool,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .try_init();
}

pub fn read(name: &str) -> Result<String> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path.set_extension("scenario");
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

fn section(args: &[SExpr]) -> SExpr {
    SExpr::list(args.to_vec())
}

fn call(e: &SExpr) -> Result<Vec<String>> {
    let Some(items) = e.as_list() else {
        bail!("invalid action call: {e}")
    };
    items
        .iter()
        .map(|i| i.as_atom().map(|a| a.to_string()).context("invalid action call"))
        .collect()
}

fn declare_action(domain: &mut Domain, args: &[SExpr]) -> Result<()> {
    let Some((name, options)) = args.split_first() else {
        bail!("action without name")
    };
    let name = name.as_atom().context("invalid action name")?.clone();
    let empty = SExpr::list(vec![]);
    let (mut parameters, mut precondition, mut effect) = (&empty, &empty, &empty);
    for option in options.chunks(2) {
        let [key, value] = option else {
            bail!("missing value for {}", option[0])
        };
        match key.as_atom().map(Sym::as_str) {
            Some(":parameters") => parameters = value,
            Some(":precondition") => precondition = value,
            Some(":effect") => effect = value,
            _ => bail!("unexpected {key} in action {name}"),
        }
    }
    domain.declare_action(name.as_str(), parameters, precondition, effect)?;
    Ok(())
}

pub fn load(text: &str) -> Result<Scenario> {
    let mut domain = Domain::new("scenario");
    let mut objects = Objects::new();
    let mut init = None;
    let mut steps = Vec::new();
    let mut tolerant = false;
    for e in sexpr::parse_many(text)? {
        let Some((head, args)) = e.as_list().and_then(|l| l.split_first()) else {
            bail!("unexpected section: {e}")
        };
        match head.as_atom().map(Sym::as_str) {
            Some(":types") => domain.declare_types(&section(args))?,
            Some(":constants") => domain.declare_constants(&section(args))?,
            Some(":predicates") => {
                for p in args {
                    domain.declare_predicate(p)?;
                }
            }
            Some(":functions") => {
                for f in args {
                    domain.declare_function(f)?;
                }
            }
            Some(":action") => declare_action(&mut domain, args)?,
            Some(":objects") => objects = Objects::from_typed_list(&section(args), &domain.types)?,
            Some(":init") => init = Some(State::parse(&e.to_string(), &domain)?),
            Some(kind @ (":plan" | ":replay")) => {
                tolerant = kind == ":replay";
                steps = args.iter().map(call).collect::<Result<_>>()?;
            }
            _ => bail!("unexpected section: {head}"),
        }
    }
    Ok(Scenario {
        domain,
        objects,
        init: init.context("missing :init section")?,
        steps,
        tolerant,
    })
}

/// Applies the calls in sequence and returns all the states visited, starting from the initial one.
pub fn run(scenario: &Scenario) -> Result<Vec<State>> {
    let mut states = vec![scenario.init.clone()];
    for step in &scenario.steps {
        let Some((action, args)) = step.split_first() else {
            bail!("empty action call")
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let op = scenario.domain.operator(action, &args, Some(&scenario.objects))?;
        let current = states.last().context("no state")?;
        let next = op.apply(current, scenario.tolerant)?;
        states.push(next);
    }
    Ok(states)
}
