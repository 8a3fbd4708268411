//! # Entity sets
//!
//! Value objects exchanged with a [`File`](crate::File): one element block, node set or side
//! set each. They hold an ID, an optional name and their payload arrays, perform no I/O and
//! carry no reference back to the file they were read from, so they stay valid after the
//! file is closed.
//!
//! Every positional accessor is bounds checked and returns
//! [`Error::OutOfRange`](crate::Error::OutOfRange) instead of panicking.

mod element_block;
mod node_set;
mod side_set;

pub use element_block::ElementBlock;
pub use node_set::NodeSet;
pub use side_set::SideSet;
