use crate::engine::{EntityKind, VarDomain};
use crate::parse::ParseError;
use crate::FileAccess;

/// Failures reported by the bundled [`Store`](super::Store) engine
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while parsing exodus xml: {0}")]
    Parse(#[from] ParseError),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("databases cannot be opened with {0:?} access, create them instead")]
    UnsupportedAccess(FileAccess),
    #[error("database is opened read-only")]
    ReadOnly,
    #[error("database header has already been written")]
    HeaderWritten,
    #[error("database header has not been written")]
    NoHeader,
    #[error("number of dimensions {0} is outside 1..=3")]
    NumDim(i32),
    #[error("{field} must not be negative, got {value}")]
    NegativeCount { field: &'static str, value: i64 },
    #[error("a block of {num_elems} elements with {nodes_per_elem} nodes each is too large")]
    ConnectivitySize {
        num_elems: usize,
        nodes_per_elem: usize,
    },
    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("coordinate axis {axis} does not exist in a {num_dim}D database")]
    Axis { axis: usize, num_dim: usize },
    #[error("more {what} given than the {limit} declared")]
    TooMany { what: &'static str, limit: usize },
    #[error("{kind} {id} is already defined")]
    DuplicateId { kind: EntityKind, id: i64 },
    #[error("no {kind} with id {id}")]
    UnknownId { kind: EntityKind, id: i64 },
    #[error("{0} has no set parameters")]
    NotASet(EntityKind),
    #[error("{0} variables are already declared")]
    VariablesDeclared(VarDomain),
    #[error("{0} variables have not been declared")]
    VariablesUndeclared(VarDomain),
    #[error("{domain} variable index {index} is outside 1..={count}")]
    VarIndex {
        domain: VarDomain,
        index: i64,
        count: usize,
    },
    #[error("partial writes are not supported for {0} variables")]
    PartialUnsupported(VarDomain),
    #[error("entries {start}..{end} are outside the {size} values of the object")]
    EntryRange { start: i64, end: i64, size: usize },
    #[error("time step {step} is outside 1..={count}")]
    TimeStep { step: i32, count: usize },
    #[error("element {0} does not belong to any element block")]
    UnknownElement(i64),
    #[error("side node lists are not supported for element type `{0}`")]
    UnknownTopology(String),
    #[error("side {side} does not exist on a {elem_type} element")]
    SideNumber { elem_type: String, side: i32 },
    #[error("side node list needs room for {needed} nodes, buffer holds {available}")]
    NodeBuffer { needed: usize, available: usize },
}
