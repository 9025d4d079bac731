//! Grounding and state-transition semantics of typed, numeric PDDL action schemas.
//!
//! A lifted [`Action`] of a [`Domain`] is instantiated with call objects into an [`Operator`],
//! which grounds its preconditions and effects, decides whether it is applicable in a [`State`]
//! and computes the state resulting from its application.
//!
//! ```
//! # use plan_semantics::*;
//! # use plan_semantics::sexpr::parse;
//! # fn main() -> anyhow::Result<()> {
//! let mut domain = Domain::new("rooms");
//! domain.declare_predicate(&parse("(at ?x ?y)")?)?;
//! domain.declare_action(
//!     "move",
//!     &parse("(?a ?from ?to)")?,
//!     &parse("(at ?a ?from)")?,
//!     &parse("(and (not (at ?a ?from)) (at ?a ?to))")?,
//! )?;
//! let init = State::parse("(:init (at r1 roomA))", &domain)?;
//! let next = domain.operator("move", &["r1", "roomA", "roomB"], None)?.apply(&init, false)?;
//! assert_eq!(next.to_string(), "(:state (at r1 roomB))");
//! # Ok(())
//! # }
//! ```

mod actions;
mod build;
mod conditions;
pub mod config;
mod domain;
mod effects;
pub mod errors;
mod expressions;
mod fluents;
pub mod grounding;
mod objects;
mod operator;
mod predicates;
pub mod sexpr;
mod signature;
mod state;
mod sym;
mod types;
pub(crate) mod utils;

pub use actions::*;
pub use conditions::*;
pub use domain::*;
pub use effects::*;
pub use errors::*;
pub use expressions::*;
pub use fluents::*;
pub use grounding::Binding;
pub use objects::*;
pub use operator::*;
pub use predicates::*;
pub use sexpr::{SExpr, SExprError};
pub use signature::*;
pub use state::*;
pub use sym::*;
pub use types::*;
