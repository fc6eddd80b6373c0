//! Type check and data-flow passes for the conec compiler front-end.
//!
//! This crate provides:
//! - `relate` - the type algebra (equality, coercion, matching, auto-deref)
//! - `CheckerState` and `type_check` - the type-check pass
//! - `flow_check` - the data-flow pass over references and moves
//! - `analyze` - the full pipeline entry for one compilation unit

use conec_ir::{CompileUnit, NodeId};
use tracing::{Level, span};

pub mod relate;
pub use relate::{Match, can_coerce, coerce, deref_auto, type_eq, type_of, vtype_of};

pub mod state;
pub use state::{CheckerState, type_check};

mod assignment_checker;
mod call_checker;
mod expr;
mod stmt;

pub mod flow_analysis;
pub use flow_analysis::flow_check;

/// Run the full semantic pipeline over a parsed program: name resolution,
/// type check, then data-flow checks. Passes always run to completion;
/// the caller consults `unit.diags.error_count()` before emitting code.
pub fn analyze(unit: &mut CompileUnit, program: NodeId) {
    let _span = span!(Level::DEBUG, "analyze", file = %unit.file).entered();
    conec_binder::resolve_names(unit, program);
    type_check(unit, program);
    flow_check(unit, program);
}
