//! Name resolution for the conec compiler front-end.
//!
//! This crate provides:
//! - `NameTable` - the global symbol table with hook/unhook scoping
//! - `resolve_names` - the name-resolution pass binding every name use to
//!   its declaration and assigning scope depths

pub mod nametbl;
pub use nametbl::NameTable;

pub mod state;
pub use state::resolve_names;
