//! Common traits and types that are useful for working with `exodus`
#![allow(unused_imports)]

pub use crate::engine::{Database, EntityKind, Header, VarDomain};
pub use crate::sets::{ElementBlock, NodeSet, SideSet};
pub use crate::store::{Encoding, Options, Store};
pub use crate::{Error, File, FileAccess, State};

pub(crate) use crate::error::{Check, EngineFailure, LogicError, OutOfRange};
pub(crate) use crate::utils;

pub(crate) use derive_more::{Constructor, Display, From};
pub(crate) use tracing::{debug, trace, warn};

pub(crate) use std::collections::BTreeMap;
pub(crate) use std::path::{Path, PathBuf};
