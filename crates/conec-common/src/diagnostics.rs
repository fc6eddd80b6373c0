//! Structured diagnostics for the semantic passes.
//!
//! Analysis never aborts on an error: each pass records a `Diagnostic` in
//! the `Diagnostics` sink and keeps going so one invocation reports as many
//! problems as it can find. The embedder checks `error_count()` after the
//! passes to decide whether code emission may proceed.

use serde::{Deserialize, Serialize};

use crate::position::LineMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// Diagnostic codes for the semantic passes.
///
/// Codes are stable; messages may be reworded.
pub mod diagnostic_codes {
    /// A name use with no visible binding.
    pub const UNKNOWN_NAME: u32 = 1001;
    /// Two declarations of the same name at the same scope depth.
    pub const DUPLICATE_NAME: u32 = 1002;
    /// Coercion failure or illegal cast.
    pub const INVALID_TYPE: u32 = 1003;
    /// Dereference of a non-reference value.
    pub const NOT_POINTER: u32 = 1004;
    /// Call of a non-callable value.
    pub const NOT_FUNCTION: u32 = 1005;
    /// Assignment target is not an lvalue.
    pub const NOT_LVAL: u32 = 1006;
    /// Lvalue permission denies writes.
    pub const NOT_MUTABLE: u32 = 1007;
    /// Borrow target's permission cannot supply the reference's permission.
    pub const BAD_PERMISSION: u32 = 1008;
    /// Too many or too few call arguments with no defaults to fill in.
    pub const ARG_COUNT_MISMATCH: u32 = 1009;
    /// Member call on a type without a matching method.
    pub const NO_METHOD: u32 = 1010;
    /// Global or parameter initializer is not a literal.
    pub const NON_LITERAL_INIT: u32 = 1011;
    /// Function body does not yield a return value on some path.
    pub const MISSING_RETURN: u32 = 1012;
    /// Declaration lacks both a type and an initializer.
    pub const MISSING_TYPE: u32 = 1013;
    /// Operand is not a value-producing expression.
    pub const BAD_TERM: u32 = 1014;
    /// `break` or `continue` outside any loop.
    pub const OUTSIDE_LOOP: u32 = 1015;
    /// Value moved out of a variable and used again before reassignment.
    pub const MOVED_VALUE: u32 = 1016;
}

/// Message templates keyed by diagnostic code. `{0}`, `{1}`, ... are
/// substituted by `format_message`.
pub mod diagnostic_messages {
    pub const UNKNOWN_NAME: &str = "The name `{0}` does not refer to a declared name";
    pub const DUPLICATE_NAME: &str = "The name `{0}` is already defined at this scope";
    pub const DUPLICATE_NAME_PRIOR: &str = "This is the conflicting definition for `{0}`";
    pub const INVALID_TYPE: &str = "Expression's type does not match the expected type";
    pub const INVALID_CAST: &str = "Expression may not be cast to this type";
    pub const NOT_POINTER: &str = "Cannot dereference a non-reference value";
    pub const NOT_FUNCTION: &str = "Cannot call a value that is not a function";
    pub const NOT_LVAL: &str = "Expression to the left of assignment must be an lval";
    pub const NOT_MUTABLE: &str = "No permission to modify this lval";
    pub const BAD_PERMISSION: &str = "Borrowed reference cannot obtain this permission";
    pub const MANY_ARGS: &str = "Too many arguments vs. the function's declaration";
    pub const FEW_ARGS: &str = "Function call requires more arguments than specified";
    pub const NO_METHOD: &str = "The method `{0}` is not defined by the object's type";
    pub const NO_FIELD: &str = "The field `{0}` is not defined by the object's type";
    pub const NO_MEMBERS: &str = "Object's type does not support methods or fields";
    pub const NON_LITERAL_INIT: &str = "Variable may only be initialized with a literal";
    pub const MISSING_RETURN: &str = "A return value is expected but this statement cannot give one";
    pub const MISSING_TYPE: &str = "Name must specify a type";
    pub const BAD_TERM: &str = "Needs to be an expression";
    pub const OUTSIDE_LOOP: &str = "`{0}` is only allowed inside a loop";
    pub const MOVED_VALUE: &str = "The value of `{0}` was moved away and not restored";
    pub const RETURN_TYPE_MISMATCH: &str =
        "Return expression type does not match the function's return type";
    pub const DECLARED_RETURN_TYPE: &str = "This is the declared return type";
    pub const TUPLE_ARITY: &str = "Not enough return values";
    pub const BORROW_NOT_LVAL: &str = "May only borrow from lvals (e.g., a variable)";
}

/// Substitute `{0}`-style placeholders in a message template.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
            related_information: Vec::new(),
        }
    }

    /// Attach a related-information note pointing at another location.
    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        });
        self
    }
}

/// Accumulating diagnostic sink shared by all passes of one unit.
#[derive(Debug, Default)]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
    errors: u32,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic, bumping the error counter for error-category
    /// records.
    pub fn push(&mut self, diag: Diagnostic) {
        if diag.category == DiagnosticCategory::Error {
            self.errors += 1;
        }
        self.list.push(diag);
    }

    /// Number of error-category diagnostics recorded so far.
    pub fn error_count(&self) -> u32 {
        self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// All recorded diagnostics, in emission order.
    pub fn all(&self) -> &[Diagnostic] {
        &self.list
    }

    /// Export line/column records for an error stream, resolving byte
    /// offsets through the unit's line map.
    pub fn records(&self, lines: &LineMap) -> Vec<DiagnosticRecord> {
        self.list
            .iter()
            .map(|diag| {
                let loc = lines.location(diag.start);
                DiagnosticRecord {
                    file: diag.file.clone(),
                    line: loc.line,
                    column: loc.column,
                    severity: diag.category,
                    code: diag.code,
                    message: diag.message_text.clone(),
                }
            })
            .collect()
    }
}

/// One line/column-resolved record of the external diagnostic format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub severity: DiagnosticCategory,
    pub code: u32,
    pub message: String,
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
