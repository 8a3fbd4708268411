#![doc = include_str!("../README.md")]

mod array;
pub mod engine;
pub mod error;
mod file;
mod names;
pub mod parse;
pub mod prelude;
pub mod sets;
pub mod store;
mod utils;
mod variables;
mod write_exo;

pub use engine::{Database, EntityKind, Header, VarDomain};
pub use engine::{MAX_LINE_LENGTH, MAX_NODES_PER_SIDE, MAX_STR_LENGTH};
pub use file::{File, FileAccess, State};
pub use sets::{ElementBlock, NodeSet, SideSet};
pub use store::{Encoding, Options, Store};

pub use ndarray;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// the storage engine reported a failure
    #[error(transparent)]
    Engine(#[from] error::EngineFailure),
    /// an operation was called in the wrong state or with invalid arguments
    #[error(transparent)]
    Logic(#[from] error::LogicError),
    #[error(transparent)]
    OutOfRange(#[from] error::OutOfRange),
    #[error("Could not arrange data into a matrix: `{0}`")]
    Shape(#[from] ndarray::ShapeError),
}
