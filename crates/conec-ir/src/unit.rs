//! The per-unit compiler context.
//!
//! Arena, interner, diagnostics, and options travel together through every
//! pass as one explicit context. There is no global state; dropping the
//! unit is the arena reset between compilations.

use conec_common::{
    Atom, CompilerOptions, Diagnostic, Diagnostics, Interner, Span,
};

use crate::arena::{IrArena, NodeId};
use crate::intrinsics;

/// One compilation unit's worth of compiler state.
#[derive(Debug)]
pub struct CompileUnit {
    /// Source file name, used to stamp diagnostics.
    pub file: String,
    pub options: CompilerOptions,
    pub interner: Interner,
    pub arena: IrArena,
    pub diags: Diagnostics,
}

impl CompileUnit {
    pub fn new(file: impl Into<String>) -> Self {
        Self::with_options(file, CompilerOptions::default())
    }

    pub fn with_options(file: impl Into<String>, options: CompilerOptions) -> Self {
        let mut interner = Interner::new();
        let mut arena = IrArena::new(&options);
        intrinsics::install_numeric_methods(&mut arena, &mut interner);
        CompileUnit {
            file: file.into(),
            options,
            interner,
            arena,
            diags: Diagnostics::new(),
        }
    }

    pub fn intern(&mut self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    /// Resolve a name symbol for diagnostics.
    pub fn name(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    /// Record an error anchored at a node's source span. Analysis
    /// continues; the error count gates code emission later.
    pub fn error_at(&mut self, node: NodeId, code: u32, message: impl Into<String>) {
        let (start, length) = self.anchor(node);
        self.diags
            .push(Diagnostic::error(&self.file, start, length, message, code));
    }

    /// Record an error with a related note anchored at a second node.
    pub fn error_at_related(
        &mut self,
        node: NodeId,
        code: u32,
        message: impl Into<String>,
        related: NodeId,
        related_message: impl Into<String>,
    ) {
        let (start, length) = self.anchor(node);
        let (rstart, rlength) = self.anchor(related);
        self.diags.push(
            Diagnostic::error(&self.file, start, length, message, code).with_related(
                &self.file,
                rstart,
                rlength,
                related_message,
            ),
        );
    }

    fn anchor(&self, node: NodeId) -> (u32, u32) {
        let span: Span = self.arena.span(node);
        if span.is_dummy() {
            (0, 0)
        } else {
            (span.start, span.len())
        }
    }
}

#[cfg(test)]
#[path = "tests/unit_tests.rs"]
mod unit_tests;
