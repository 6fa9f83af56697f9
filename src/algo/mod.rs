//! Algorithm implementations for list diffing.
//!
//! - `heckel`: the diff engine (passes 1-5 and step emission)
//! - `symbol`: symbol table and reference arrays
//! - `step`: edit step output type
//! - `hash`: stable hashing utilities

mod hash;
mod heckel;
mod step;
mod symbol;

pub use hash::{StableHasher, StableKey};
pub use heckel::{process, process_with_config, DiffConfig, Matching};
pub use step::{DiffStats, EditStep};
pub use symbol::{Count, Reference, Side, Symbol, SymbolId, SymbolTable};
