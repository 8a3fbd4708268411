//! The bundled storage engine.
//!
//! A [`Store`] holds an entire database in memory and persists it as an xml document
//! whose numeric payloads are `DataArray` elements, either inline ascii or base64
//! encoded binary. The document is rewritten on [`Database::create`],
//! [`Database::update`] and [`Database::close`] whenever something changed since the
//! last write.

mod error;
pub(crate) mod model;
mod topology;

pub use error::StoreError;

use crate::engine::{BlockParams, Database, EntityKind, Header, NameBuffer, SetParams, VarDomain};
use crate::FileAccess;
use model::Model;

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// the encoding to use when writing the payload of a `DataArray`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    Ascii,
    #[default]
    Base64,
}

impl Encoding {
    pub(crate) fn to_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }

    pub(crate) fn from_format(format: &str) -> Option<Self> {
        match format {
            "ascii" => Some(Self::Ascii),
            "binary" => Some(Self::Base64),
            _ => None,
        }
    }
}

/// Configuration of a [`Store`]
///
/// ```
/// use exodus::{Encoding, Options};
///
/// let options = Options::new().encoding(Encoding::Ascii).indent(None);
/// assert_eq!(options.get_encoding(), Encoding::Ascii);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    encoding: Encoding,
    indent: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            encoding: Encoding::Base64,
            indent: Some(2),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// payload encoding of every array written from now on
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// spaces per nesting level in the written document, `None` writes it on one line
    pub fn indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    pub fn get_encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn get_indent(&self) -> Option<usize> {
        self.indent
    }
}

/// An open database backed by a single xml document
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    access: FileAccess,
    options: Options,
    model: Model,
    dirty: bool,
}

impl Store {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// apply `change` to the model of a database opened for writing,
    /// marking it for a flush only when the change is accepted
    fn modify<F>(&mut self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Model) -> Result<(), StoreError>,
    {
        if self.access == FileAccess::Read {
            return Err(StoreError::ReadOnly);
        }
        change(&mut self.model)?;
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        let file = std::fs::File::create(&self.path)?;
        let mut writer = std::io::BufWriter::new(file);
        crate::write_exo::write_model(&mut writer, &self.model, &self.options)?;
        writer.flush()?;
        self.dirty = false;

        debug!(path = %self.path.display(), "wrote store document");
        Ok(())
    }
}

impl Database for Store {
    type Error = StoreError;
    type Options = Options;

    fn open(path: &Path, access: FileAccess, options: &Options) -> Result<Self, StoreError> {
        if access == FileAccess::Write {
            return Err(StoreError::UnsupportedAccess(access));
        }

        let model = crate::parse::read_model(path)?;
        debug!(path = %path.display(), ?access, "opened store");

        Ok(Self {
            path: path.to_path_buf(),
            access,
            options: options.clone(),
            model,
            dirty: false,
        })
    }

    fn create(path: &Path, options: &Options) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.to_path_buf(),
            access: FileAccess::Write,
            options: options.clone(),
            model: Model::default(),
            dirty: false,
        };
        store.flush()?;
        Ok(store)
    }

    fn version(&self) -> f32 {
        self.model.version
    }

    fn word_sizes(&self) -> (i32, i32) {
        (model::WORD_SIZE, self.model.word_size)
    }

    fn get_init(&self) -> Result<Header, StoreError> {
        self.model.header().cloned()
    }

    fn put_init(&mut self, header: &Header) -> Result<(), StoreError> {
        self.modify(|model| model.put_init(header))
    }

    fn get_info(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.model.info.clone())
    }

    fn put_info(&mut self, lines: &[String]) -> Result<(), StoreError> {
        self.modify(|model| model.put_info(lines))
    }

    fn get_coord(
        &self,
        x: Option<&mut [f64]>,
        y: Option<&mut [f64]>,
        z: Option<&mut [f64]>,
    ) -> Result<(), StoreError> {
        self.model.get_coord([x, y, z])
    }

    fn put_coord(
        &mut self,
        x: Option<&[f64]>,
        y: Option<&[f64]>,
        z: Option<&[f64]>,
    ) -> Result<(), StoreError> {
        self.modify(|model| model.put_coord([x, y, z]))
    }

    fn get_coord_names(&self, names: &mut [NameBuffer]) -> Result<(), StoreError> {
        self.model.get_coord_names(names)
    }

    fn put_coord_names(&mut self, names: &[&str]) -> Result<(), StoreError> {
        self.modify(|model| model.put_coord_names(names))
    }

    fn get_map(&self, map: &mut [i32]) -> Result<(), StoreError> {
        self.model.get_map(map)
    }

    fn put_map(&mut self, map: &[i32]) -> Result<(), StoreError> {
        self.modify(|model| model.put_map(map))
    }

    fn get_ids(&self, kind: EntityKind, ids: &mut [i64]) -> Result<(), StoreError> {
        self.model.get_ids(kind, ids)
    }

    fn get_name(&self, kind: EntityKind, id: i64, name: &mut NameBuffer) -> Result<(), StoreError> {
        self.model.get_name(kind, id, name)
    }

    fn put_names(&mut self, kind: EntityKind, names: &[&str]) -> Result<(), StoreError> {
        self.modify(|model| model.put_names(kind, names))
    }

    fn get_block(&self, id: i64) -> Result<BlockParams, StoreError> {
        self.model.get_block(id)
    }

    fn put_block(&mut self, id: i64, params: &BlockParams) -> Result<(), StoreError> {
        trace!(id, elem_type = %params.elem_type, "put_block");
        self.modify(|model| model.put_block(id, params))
    }

    fn get_conn(&self, id: i64, connect: &mut [i32]) -> Result<(), StoreError> {
        self.model.get_conn(id, connect)
    }

    fn put_conn(&mut self, id: i64, connect: &[i32]) -> Result<(), StoreError> {
        self.modify(|model| model.put_conn(id, connect))
    }

    fn get_set_param(&self, kind: EntityKind, id: i64) -> Result<SetParams, StoreError> {
        self.model.get_set_param(kind, id)
    }

    fn put_set_param(
        &mut self,
        kind: EntityKind,
        id: i64,
        params: SetParams,
    ) -> Result<(), StoreError> {
        trace!(%kind, id, entries = params.num_entries, "put_set_param");
        self.modify(|model| model.put_set_param(kind, id, params))
    }

    fn get_set(
        &self,
        kind: EntityKind,
        id: i64,
        entries: &mut [i32],
        extra: Option<&mut [i32]>,
    ) -> Result<(), StoreError> {
        self.model.get_set(kind, id, entries, extra)
    }

    fn put_set(
        &mut self,
        kind: EntityKind,
        id: i64,
        entries: &[i32],
        extra: Option<&[i32]>,
    ) -> Result<(), StoreError> {
        self.modify(|model| model.put_set(kind, id, entries, extra))
    }

    fn get_side_set_node_list(
        &self,
        id: i64,
        node_counts: &mut [i32],
        nodes: &mut [i32],
    ) -> Result<(), StoreError> {
        self.model.get_side_set_node_list(id, node_counts, nodes)
    }

    fn get_variable_param(&self, domain: VarDomain) -> Result<i32, StoreError> {
        Ok(self.model.variable_count(domain) as i32)
    }

    fn put_variable_param(&mut self, domain: VarDomain, count: i32) -> Result<(), StoreError> {
        self.modify(|model| model.put_variable_param(domain, count))
    }

    fn get_variable_names(
        &self,
        domain: VarDomain,
        names: &mut [NameBuffer],
    ) -> Result<(), StoreError> {
        self.model.get_variable_names(domain, names)
    }

    fn put_variable_names(&mut self, domain: VarDomain, names: &[&str]) -> Result<(), StoreError> {
        self.modify(|model| model.put_variable_names(domain, names))
    }

    fn get_var(
        &self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        values: &mut [f64],
    ) -> Result<(), StoreError> {
        self.model.get_var(step, domain, var_index, obj_id, values)
    }

    fn put_var(
        &mut self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        values: &[f64],
    ) -> Result<(), StoreError> {
        self.modify(|model| model.put_var(step, domain, var_index, obj_id, values))
    }

    fn put_partial_var(
        &mut self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        start_index: i64,
        values: &[f64],
    ) -> Result<(), StoreError> {
        self.modify(|model| {
            model.put_partial_var(step, domain, var_index, obj_id, start_index, values)
        })
    }

    fn get_var_time(
        &self,
        domain: VarDomain,
        var_index: i32,
        entry: i64,
        begin_step: i32,
        end_step: i32,
        values: &mut [f64],
    ) -> Result<(), StoreError> {
        self.model
            .get_var_time(domain, var_index, entry, begin_step, end_step, values)
    }

    fn inquire_num_times(&self) -> Result<i32, StoreError> {
        Ok(self.model.times.len() as i32)
    }

    fn get_all_times(&self, times: &mut [f64]) -> Result<(), StoreError> {
        self.model.get_all_times(times)
    }

    fn put_time(&mut self, step: i32, time: f64) -> Result<(), StoreError> {
        self.modify(|model| model.put_time(step, time))
    }

    fn update(&mut self) -> Result<(), StoreError> {
        if self.dirty {
            self.flush()?;
        }
        Ok(())
    }

    fn close(mut self) -> Result<(), StoreError> {
        if self.dirty {
            self.flush()?;
        }
        debug!(path = %self.path.display(), "closed store");
        Ok(())
    }
}
