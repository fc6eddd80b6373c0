//! Compiler options threaded through the semantic passes.

use serde::{Deserialize, Serialize};

/// Pointer width of the compilation target, which fixes the width of
/// `usize` and the value-type of `sizeof`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PtrWidth {
    Bits32,
    #[default]
    Bits64,
}

impl PtrWidth {
    pub const fn bits(self) -> u8 {
        match self {
            PtrWidth::Bits32 => 32,
            PtrWidth::Bits64 => 64,
        }
    }
}

/// Options for one compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
    /// Target pointer width.
    pub ptr_width: PtrWidth,
}
