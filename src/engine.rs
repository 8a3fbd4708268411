//! # Engine interface
//!
//! The session in [`File`](crate::File) never touches the physical encoding of a mesh
//! database. Every read and write goes through the [`Database`] trait: a narrow, procedural
//! interface addressed by entity kind and numeric entity ID. Output parameters are caller
//! owned buffers, exactly sized by the caller from counts it has already queried, which is
//! why most `get_*` methods take `&mut [T]` instead of returning a `Vec`.
//!
//! Conventions shared by every implementation:
//!
//! * entity IDs are caller assigned and independent of storage position
//! * time steps, variable indices and `start_index` offsets are 1-based
//! * node numbers stored in connectivity and set payloads are 1-based
//! * names travel in fixed-length [`NameBuffer`]s, NUL padded
//!
//! The crate ships one implementation, [`Store`](crate::store::Store).

use crate::FileAccess;
use derive_more::{Constructor, Display};
use std::path::Path;

/// maximum length of an entity, coordinate or variable name
pub const MAX_STR_LENGTH: usize = 32;

/// maximum length of the title and of a single info record
pub const MAX_LINE_LENGTH: usize = 80;

/// largest number of nodes on a single side of any supported element (a `QUAD9` face)
pub const MAX_NODES_PER_SIDE: usize = 9;

/// fixed-length buffer a name is read into
pub type NameBuffer = [u8; MAX_STR_LENGTH + 1];

/// Topological entities that carry an ID and an optional name
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    #[display(fmt = "element block")]
    ElementBlock,
    #[display(fmt = "node set")]
    NodeSet,
    #[display(fmt = "side set")]
    SideSet,
}

/// The three independent namespaces of time-varying variables
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VarDomain {
    #[display(fmt = "nodal")]
    Nodal,
    #[display(fmt = "element block")]
    ElementBlock,
    #[display(fmt = "global")]
    Global,
}

impl EntityKind {
    pub(crate) const ALL: [EntityKind; 3] = [Self::ElementBlock, Self::NodeSet, Self::SideSet];

    /// attribute value naming this kind in a store document
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Self::ElementBlock => "element_block",
            Self::NodeSet => "node_set",
            Self::SideSet => "side_set",
        }
    }

    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl VarDomain {
    pub(crate) const ALL: [VarDomain; 3] = [Self::Nodal, Self::ElementBlock, Self::Global];

    pub(crate) fn tag(self) -> &'static str {
        match self {
            Self::Nodal => "nodal",
            Self::ElementBlock => "element_block",
            Self::Global => "global",
        }
    }

    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.tag() == tag)
    }
}

/// Database header: title and the six size fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Constructor)]
pub struct Header {
    pub title: String,
    pub num_dim: i32,
    pub num_nodes: i32,
    pub num_elems: i32,
    pub num_elem_blks: i32,
    pub num_node_sets: i32,
    pub num_side_sets: i32,
}

/// Parameters describing one element block
#[derive(Debug, Clone, PartialEq, Eq, Default, Constructor)]
pub struct BlockParams {
    pub elem_type: String,
    pub num_elems: i64,
    pub nodes_per_elem: i64,
    pub num_attrs: i64,
}

/// Parameters describing one node set or side set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Constructor)]
pub struct SetParams {
    pub num_entries: i64,
    /// number of distribution factors, stored but not interpreted
    pub num_dist_factors: i64,
}

/// Procedural access to one open mesh database.
///
/// An implementing value *is* the open handle: it is created by [`Database::open`] or
/// [`Database::create`] and consumed by [`Database::close`].
pub trait Database: Sized {
    /// failure reported by any call into the engine
    type Error: std::error::Error + Send + Sync + 'static;

    /// engine specific configuration, held by the session and passed to every open
    type Options: Default + Clone;

    /// open an existing database with `Read` or `Append` access
    fn open(path: &Path, access: FileAccess, options: &Self::Options) -> Result<Self, Self::Error>;

    /// create a new database, replacing any existing file at `path`
    fn create(path: &Path, options: &Self::Options) -> Result<Self, Self::Error>;

    /// format version stored in the database
    fn version(&self) -> f32;

    /// `(cpu_word_size, io_word_size)` in bytes
    fn word_sizes(&self) -> (i32, i32);

    fn get_init(&self) -> Result<Header, Self::Error>;

    fn put_init(&mut self, header: &Header) -> Result<(), Self::Error>;

    fn get_info(&self) -> Result<Vec<String>, Self::Error>;

    fn put_info(&mut self, lines: &[String]) -> Result<(), Self::Error>;

    /// read the coordinate arrays of the requested axes, each exactly `num_nodes` long
    fn get_coord(
        &self,
        x: Option<&mut [f64]>,
        y: Option<&mut [f64]>,
        z: Option<&mut [f64]>,
    ) -> Result<(), Self::Error>;

    /// write the coordinate arrays of the supplied axes
    fn put_coord(
        &mut self,
        x: Option<&[f64]>,
        y: Option<&[f64]>,
        z: Option<&[f64]>,
    ) -> Result<(), Self::Error>;

    /// read one name per spatial dimension, `names.len()` must not exceed `num_dim`
    fn get_coord_names(&self, names: &mut [NameBuffer]) -> Result<(), Self::Error>;

    fn put_coord_names(&mut self, names: &[&str]) -> Result<(), Self::Error>;

    fn get_map(&self, map: &mut [i32]) -> Result<(), Self::Error>;

    fn put_map(&mut self, map: &[i32]) -> Result<(), Self::Error>;

    /// IDs of all entities of `kind`, in definition order
    fn get_ids(&self, kind: EntityKind, ids: &mut [i64]) -> Result<(), Self::Error>;

    fn get_name(&self, kind: EntityKind, id: i64, name: &mut NameBuffer)
        -> Result<(), Self::Error>;

    /// assign one name per entity of `kind`, in definition order
    fn put_names(&mut self, kind: EntityKind, names: &[&str]) -> Result<(), Self::Error>;

    fn get_block(&self, id: i64) -> Result<BlockParams, Self::Error>;

    fn put_block(&mut self, id: i64, params: &BlockParams) -> Result<(), Self::Error>;

    fn get_conn(&self, id: i64, connect: &mut [i32]) -> Result<(), Self::Error>;

    fn put_conn(&mut self, id: i64, connect: &[i32]) -> Result<(), Self::Error>;

    fn get_set_param(&self, kind: EntityKind, id: i64) -> Result<SetParams, Self::Error>;

    fn put_set_param(
        &mut self,
        kind: EntityKind,
        id: i64,
        params: SetParams,
    ) -> Result<(), Self::Error>;

    /// read a set payload; `extra` receives the local side numbers of a side set
    fn get_set(
        &self,
        kind: EntityKind,
        id: i64,
        entries: &mut [i32],
        extra: Option<&mut [i32]>,
    ) -> Result<(), Self::Error>;

    fn put_set(
        &mut self,
        kind: EntityKind,
        id: i64,
        entries: &[i32],
        extra: Option<&[i32]>,
    ) -> Result<(), Self::Error>;

    /// expand a side set into per-side node counts and the flattened node list.
    ///
    /// `node_counts` holds exactly one slot per side. `nodes` only has to be large enough;
    /// entries past the sum of `node_counts` are left untouched.
    fn get_side_set_node_list(
        &self,
        id: i64,
        node_counts: &mut [i32],
        nodes: &mut [i32],
    ) -> Result<(), Self::Error>;

    fn get_variable_param(&self, domain: VarDomain) -> Result<i32, Self::Error>;

    fn put_variable_param(&mut self, domain: VarDomain, count: i32) -> Result<(), Self::Error>;

    fn get_variable_names(
        &self,
        domain: VarDomain,
        names: &mut [NameBuffer],
    ) -> Result<(), Self::Error>;

    fn put_variable_names(&mut self, domain: VarDomain, names: &[&str])
        -> Result<(), Self::Error>;

    /// read the values of one variable at one step.
    ///
    /// `obj_id` is the block ID for elemental variables and ignored otherwise. For global
    /// variables `values` receives consecutive variables starting at `var_index`.
    fn get_var(
        &self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        values: &mut [f64],
    ) -> Result<(), Self::Error>;

    fn put_var(
        &mut self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        values: &[f64],
    ) -> Result<(), Self::Error>;

    /// write `values` starting at the 1-based `start_index` of the addressed object
    fn put_partial_var(
        &mut self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        start_index: i64,
        values: &[f64],
    ) -> Result<(), Self::Error>;

    /// read one entry of a variable over the steps `begin_step..=end_step`
    fn get_var_time(
        &self,
        domain: VarDomain,
        var_index: i32,
        entry: i64,
        begin_step: i32,
        end_step: i32,
        values: &mut [f64],
    ) -> Result<(), Self::Error>;

    /// number of time steps currently stored
    fn inquire_num_times(&self) -> Result<i32, Self::Error>;

    fn get_all_times(&self, times: &mut [f64]) -> Result<(), Self::Error>;

    fn put_time(&mut self, step: i32, time: f64) -> Result<(), Self::Error>;

    /// make everything written so far visible to subsequent readers
    fn update(&mut self) -> Result<(), Self::Error>;

    fn close(self) -> Result<(), Self::Error>;
}
