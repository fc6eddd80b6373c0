//! Common types and utilities for the conec compiler front-end.
//!
//! This crate provides foundational types used across all conec crates:
//! - String interning (`Atom`, `Interner`) for name symbols
//! - Source spans (`Span`, `Spanned`)
//! - Line maps for offset/position conversion
//! - Structured diagnostics and the diagnostic sink
//! - Compiler options

// String interning for name symbol deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, SourceLocation};

// Structured diagnostics
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics};

// Compiler options
pub mod options;
pub use options::{CompilerOptions, PtrWidth};
