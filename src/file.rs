//! The mesh database session

use crate::engine::{BlockParams, NameBuffer, SetParams, MAX_NODES_PER_SIDE, MAX_STR_LENGTH};
use crate::error::{invalid_argument, out_of_range};
use crate::names;
use crate::prelude::*;
use crate::variables;

use ndarray::{Array2, ArrayView1, Axis};

/// How a database is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAccess {
    /// read an existing database
    Read,
    /// create a new database, replacing any existing file
    Write,
    /// continue writing to an existing database, e.g. additional time steps
    Append,
}

/// Lifecycle of a [`File`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// no database is open
    Closed,
    /// a database is open but its header has not been read or written yet
    Opened,
    /// the header is known, reads and writes are allowed
    Ready,
}

/// A session over one open mesh database.
///
/// The session owns the engine handle together with an in-memory snapshot of everything
/// read from the database: counts, coordinates, coordinate names, element blocks, node
/// sets, side sets and time values. Writes go straight through to the engine.
///
/// Operations that are illegal in the current [`State`] or [`FileAccess`] fail with
/// [`Error::Logic`] before the engine is called.
pub struct File<D: Database = Store> {
    access: FileAccess,
    options: D::Options,
    db: Option<D>,
    initialized: bool,

    version: f32,
    word_sizes: (i32, i32),

    title: String,
    n_dim: i32,
    n_nodes: i32,
    n_elems: i32,
    n_elem_blks: i32,
    n_node_sets: i32,
    n_side_sets: i32,

    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    coord_names: Vec<String>,
    elem_map: Vec<i32>,
    info: Vec<String>,

    element_blocks: Vec<ElementBlock>,
    node_sets: Vec<NodeSet>,
    side_sets: Vec<SideSet>,
    time_values: Vec<f64>,
}

impl File<Store> {
    /// A closed session using the bundled [`Store`] engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or create `path` right away.
    ///
    /// `Read` opens the database and reads its header, `Write` creates it and `Append`
    /// opens it for further writing.
    pub fn with_access<P: AsRef<Path>>(path: P, access: FileAccess) -> Result<Self, Error> {
        Self::with_access_and_options(path, access, Options::default())
    }
}

impl<D: Database> Default for File<D> {
    fn default() -> Self {
        Self::with_options(D::Options::default())
    }
}

impl<D: Database> File<D> {
    /// A closed session whose engine is configured with `options`
    pub fn with_options(options: D::Options) -> Self {
        Self {
            access: FileAccess::Read,
            options,
            db: None,
            initialized: false,
            version: 0.0,
            word_sizes: (0, 0),
            title: String::new(),
            n_dim: -1,
            n_nodes: -1,
            n_elems: -1,
            n_elem_blks: -1,
            n_node_sets: -1,
            n_side_sets: -1,
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            coord_names: Vec::new(),
            elem_map: Vec::new(),
            info: Vec::new(),
            element_blocks: Vec::new(),
            node_sets: Vec::new(),
            side_sets: Vec::new(),
            time_values: Vec::new(),
        }
    }

    pub fn with_access_and_options<P: AsRef<Path>>(
        path: P,
        access: FileAccess,
        options: D::Options,
    ) -> Result<Self, Error> {
        let mut file = Self::with_options(options);
        match access {
            FileAccess::Read => {
                file.open(path)?;
                file.init()?;
            }
            FileAccess::Write => file.create(path)?,
            FileAccess::Append => file.append(path)?,
        }
        Ok(file)
    }

    //
    // guards
    //

    fn opened(&self, operation: &'static str) -> Result<&D, Error> {
        self.db
            .as_ref()
            .ok_or_else(|| LogicError::NotOpened { operation }.into())
    }

    /// the engine, once the header is known
    fn ready(&self, operation: &'static str) -> Result<&D, Error> {
        let db = self.opened(operation)?;
        if !self.initialized {
            return Err(LogicError::NotInitialized { operation }.into());
        }
        Ok(db)
    }

    /// the engine, once the header is known and the access mode allows writing
    fn writable(&mut self, operation: &'static str) -> Result<&mut D, Error> {
        self.ready(operation)?;
        if self.access == FileAccess::Read {
            return Err(LogicError::WrongAccess {
                operation,
                required: FileAccess::Write,
                actual: self.access,
            }
            .into());
        }

        self.db
            .as_mut()
            .ok_or_else(|| LogicError::NotOpened { operation }.into())
    }

    fn expect_closed(&self) -> Result<(), Error> {
        if self.db.is_some() {
            return Err(LogicError::AlreadyOpened.into());
        }
        Ok(())
    }

    /// take ownership of a freshly opened engine, dropping any previous snapshot
    fn attach(&mut self, db: D, access: FileAccess) {
        let options = self.options.clone();
        *self = Self::with_options(options);

        self.version = db.version();
        self.word_sizes = db.word_sizes();
        self.access = access;
        self.db = Some(db);
    }

    fn cache_header(&mut self, header: Header) {
        self.title = header.title;
        self.n_dim = header.num_dim;
        self.n_nodes = header.num_nodes;
        self.n_elems = header.num_elems;
        self.n_elem_blks = header.num_elem_blks;
        self.n_node_sets = header.num_node_sets;
        self.n_side_sets = header.num_side_sets;
        self.coord_names = vec![String::new(); utils::len_of(self.n_dim)];
        self.initialized = true;
    }

    fn load_header(&mut self, operation: &'static str) -> Result<(), Error> {
        let header = self.opened(operation)?.get_init().check("get_init")?;
        debug!(
            title = %header.title,
            num_dim = header.num_dim,
            num_nodes = header.num_nodes,
            num_elems = header.num_elems,
            "read header"
        );
        self.cache_header(header);
        Ok(())
    }

    //
    // lifecycle
    //

    /// Open an existing database for reading
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        self.expect_closed()?;
        let path = path.as_ref();

        let db = D::open(path, FileAccess::Read, &self.options).check("open")?;
        self.attach(db, FileAccess::Read);

        debug!(path = %path.display(), "opened database for reading");
        Ok(())
    }

    /// Create a new database, replacing any existing file at `path`
    pub fn create<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        self.expect_closed()?;
        let path = path.as_ref();

        let db = D::create(path, &self.options).check("create")?;
        self.attach(db, FileAccess::Write);

        debug!(path = %path.display(), "created database");
        Ok(())
    }

    /// Open an existing database for continued writing.
    ///
    /// The header is loaded as part of opening, so the session is immediately ready.
    pub fn append<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        self.expect_closed()?;
        let path = path.as_ref();

        let db = D::open(path, FileAccess::Append, &self.options).check("open")?;
        self.attach(db, FileAccess::Append);
        self.load_header("append")?;

        debug!(path = %path.display(), "opened database for appending");
        Ok(())
    }

    /// Read the title and the six size fields of a database opened for reading
    pub fn init(&mut self) -> Result<(), Error> {
        self.opened("init")?;
        if self.access != FileAccess::Read {
            return Err(LogicError::WrongAccess {
                operation: "init",
                required: FileAccess::Read,
                actual: self.access,
            }
            .into());
        }

        self.load_header("init")
    }

    /// Write the header of a freshly created database
    #[allow(clippy::too_many_arguments)]
    pub fn write_init(
        &mut self,
        title: &str,
        n_dims: i32,
        n_nodes: i32,
        n_elems: i32,
        n_elem_blks: i32,
        n_node_sets: i32,
        n_side_sets: i32,
    ) -> Result<(), Error> {
        self.opened("write_init")?;
        if self.access != FileAccess::Write {
            return Err(LogicError::WrongAccess {
                operation: "write_init",
                required: FileAccess::Write,
                actual: self.access,
            }
            .into());
        }

        let header = Header::new(
            utils::truncate_to(title, crate::MAX_LINE_LENGTH).to_string(),
            n_dims,
            n_nodes,
            n_elems,
            n_elem_blks,
            n_node_sets,
            n_side_sets,
        );

        if let Some(db) = self.db.as_mut() {
            db.put_init(&header).check("put_init")?;
        }
        debug!(title, n_dims, n_nodes, n_elems, "wrote header");

        self.cache_header(header);
        Ok(())
    }

    pub fn is_opened(&self) -> bool {
        self.db.is_some()
    }

    pub fn state(&self) -> State {
        match (&self.db, self.initialized) {
            (None, _) => State::Closed,
            (Some(_), false) => State::Opened,
            (Some(_), true) => State::Ready,
        }
    }

    pub fn access(&self) -> FileAccess {
        self.access
    }

    /// Close the database. Calling this on a closed session does nothing.
    pub fn close(&mut self) -> Result<(), Error> {
        self.initialized = false;
        if let Some(db) = self.db.take() {
            db.close().check("close")?;
            debug!("closed database");
        }
        Ok(())
    }

    //
    // cached header and snapshot
    //

    pub fn get_title(&self) -> &str {
        &self.title
    }

    /// spatial dimension, `-1` before the header is known
    pub fn get_dim(&self) -> i32 {
        self.n_dim
    }

    pub fn get_num_nodes(&self) -> i32 {
        self.n_nodes
    }

    pub fn get_num_elements(&self) -> i32 {
        self.n_elems
    }

    pub fn get_num_element_blocks(&self) -> i32 {
        self.n_elem_blks
    }

    pub fn get_num_node_sets(&self) -> i32 {
        self.n_node_sets
    }

    pub fn get_num_side_sets(&self) -> i32 {
        self.n_side_sets
    }

    pub fn get_version(&self) -> f32 {
        self.version
    }

    /// `(cpu_word_size, io_word_size)` reported by the engine when the database was opened
    pub fn get_word_sizes(&self) -> (i32, i32) {
        self.word_sizes
    }

    pub fn get_x_coords(&self) -> &[f64] {
        &self.x
    }

    pub fn get_y_coords(&self) -> &[f64] {
        &self.y
    }

    pub fn get_z_coords(&self) -> &[f64] {
        &self.z
    }

    /// The coordinates read by [`File::read_coords`] as a `(nodes, dimension)` matrix
    pub fn coordinates(&self) -> Result<Array2<f64>, Error> {
        let dim = utils::len_of(self.n_dim).min(3);
        let axes: Vec<ArrayView1<'_, f64>> = [&self.x, &self.y, &self.z][..dim]
            .iter()
            .map(|axis| ArrayView1::from(axis.as_slice()))
            .collect();

        Ok(ndarray::stack(Axis(1), &axes)?)
    }

    pub fn get_coord_names(&self) -> &[String] {
        &self.coord_names
    }

    pub fn get_elem_map(&self) -> &[i32] {
        &self.elem_map
    }

    pub fn get_info(&self) -> &[String] {
        &self.info
    }

    pub fn get_element_blocks(&self) -> &[ElementBlock] {
        &self.element_blocks
    }

    /// element block at position `idx` in read order
    pub fn get_element_block(&self, idx: usize) -> Result<&ElementBlock, Error> {
        self.element_blocks
            .get(idx)
            .ok_or_else(|| out_of_range("element blocks", idx, self.element_blocks.len()))
    }

    pub fn get_node_sets(&self) -> &[NodeSet] {
        &self.node_sets
    }

    pub fn get_side_sets(&self) -> &[SideSet] {
        &self.side_sets
    }

    /// time values read by [`File::read_times`]
    pub fn get_times(&self) -> &[f64] {
        &self.time_values
    }

    //
    // read api
    //

    /// Read coordinates, coordinate names, element blocks, node sets, side sets and time
    /// values, in that order
    pub fn read(&mut self) -> Result<(), Error> {
        self.read_coords()?;
        self.read_coord_names()?;
        self.read_blocks()?;
        self.read_node_sets()?;
        self.read_side_sets()?;
        self.read_times()
    }

    /// Read one coordinate array per spatial dimension
    pub fn read_coords(&mut self) -> Result<(), Error> {
        let db = self.ready("read_coords")?;
        let n_nodes = utils::len_of(self.n_nodes);

        let mut x = vec![0.0; n_nodes];
        db.get_coord(Some(&mut x), None, None).check("get_coord")?;

        let mut y = Vec::new();
        if self.n_dim >= 2 {
            y = vec![0.0; n_nodes];
            db.get_coord(None, Some(&mut y), None).check("get_coord")?;
        }

        let mut z = Vec::new();
        if self.n_dim == 3 {
            z = vec![0.0; n_nodes];
            db.get_coord(None, None, Some(&mut z)).check("get_coord")?;
        }

        debug!(n_nodes, "read coordinates");
        self.x = x;
        self.y = y;
        self.z = z;
        Ok(())
    }

    pub fn read_coord_names(&mut self) -> Result<(), Error> {
        let db = self.ready("read_coord_names")?;
        let dim = utils::len_of(self.n_dim).min(3);

        let mut buffers: Vec<NameBuffer> = vec![[0; MAX_STR_LENGTH + 1]; dim];
        db.get_coord_names(&mut buffers).check("get_coord_names")?;

        self.coord_names = buffers.iter().map(|buffer| utils::trim_name(buffer)).collect();
        Ok(())
    }

    /// Read the element map. Not part of [`File::read`].
    pub fn read_elem_map(&mut self) -> Result<(), Error> {
        let db = self.ready("read_elem_map")?;

        let mut map = vec![0; utils::len_of(self.n_elems)];
        db.get_map(&mut map).check("get_map")?;

        self.elem_map = map;
        Ok(())
    }

    pub fn read_info(&mut self) -> Result<(), Error> {
        let info = self.ready("read_info")?.get_info().check("get_info")?;
        self.info = info;
        Ok(())
    }

    /// Read every element block, replacing the blocks read before
    pub fn read_blocks(&mut self) -> Result<(), Error> {
        let db = self.ready("read_blocks")?;
        let mut blocks = Vec::new();

        let count = utils::len_of(self.n_elem_blks);
        for id in names::read_ids(db, EntityKind::ElementBlock, count)? {
            let name = names::read_name(db, EntityKind::ElementBlock, id)?;
            let params = db.get_block(id).check("get_block")?;

            let n_elems = to_i32("get_block", params.num_elems)?;
            let n_nodes_per_elem = to_i32("get_block", params.nodes_per_elem)?;

            let mut connect = Vec::new();
            if n_elems > 0 {
                connect = vec![0; utils::len_of(n_elems) * utils::len_of(n_nodes_per_elem)];
                db.get_conn(id, &mut connect).check("get_conn")?;
            }
            trace!(id, elem_type = %params.elem_type, n_elems, "read element block");

            let mut block = ElementBlock::new();
            block.set_id(id);
            block.set_name(name);
            block.set_connectivity(params.elem_type, n_elems, n_nodes_per_elem, connect)?;
            blocks.push(block);
        }

        self.element_blocks = blocks;
        Ok(())
    }

    /// Read every node set, replacing the node sets read before
    pub fn read_node_sets(&mut self) -> Result<(), Error> {
        let db = self.ready("read_node_sets")?;
        let mut sets = Vec::new();

        let count = utils::len_of(self.n_node_sets);
        for id in names::read_ids(db, EntityKind::NodeSet, count)? {
            let name = names::read_name(db, EntityKind::NodeSet, id)?;
            let params = db
                .get_set_param(EntityKind::NodeSet, id)
                .check("get_set_param")?;

            let mut nodes = vec![0; utils::len_of(params.num_entries)];
            db.get_set(EntityKind::NodeSet, id, &mut nodes, None)
                .check("get_set")?;
            trace!(id, size = nodes.len(), "read node set");

            let mut set = NodeSet::new();
            set.set_id(id);
            set.set_name(name);
            set.set_nodes(nodes);
            sets.push(set);
        }

        self.node_sets = sets;
        Ok(())
    }

    /// Read every side set, replacing the side sets read before
    pub fn read_side_sets(&mut self) -> Result<(), Error> {
        let db = self.ready("read_side_sets")?;
        let mut sets = Vec::new();

        let count = utils::len_of(self.n_side_sets);
        for id in names::read_ids(db, EntityKind::SideSet, count)? {
            let name = names::read_name(db, EntityKind::SideSet, id)?;
            let params = db
                .get_set_param(EntityKind::SideSet, id)
                .check("get_set_param")?;

            let n_sides = utils::len_of(params.num_entries);
            let mut elems = vec![0; n_sides];
            let mut sides = vec![0; n_sides];
            db.get_set(EntityKind::SideSet, id, &mut elems, Some(&mut sides))
                .check("get_set")?;
            trace!(id, size = n_sides, "read side set");

            let mut set = SideSet::new();
            set.set_id(id);
            set.set_name(name);
            set.set_sides(elems, sides)?;
            sets.push(set);
        }

        self.side_sets = sets;
        Ok(())
    }

    pub fn read_block_names(&self) -> Result<BTreeMap<i64, String>, Error> {
        let db = self.ready("read_block_names")?;
        names::read_name_map(db, EntityKind::ElementBlock, utils::len_of(self.n_elem_blks))
    }

    pub fn read_node_set_names(&self) -> Result<BTreeMap<i64, String>, Error> {
        let db = self.ready("read_node_set_names")?;
        names::read_name_map(db, EntityKind::NodeSet, utils::len_of(self.n_node_sets))
    }

    pub fn read_side_set_names(&self) -> Result<BTreeMap<i64, String>, Error> {
        let db = self.ready("read_side_set_names")?;
        names::read_name_map(db, EntityKind::SideSet, utils::len_of(self.n_side_sets))
    }

    /// Read every stored time value
    pub fn read_times(&mut self) -> Result<(), Error> {
        let db = self.ready("read_times")?;

        let count = db.inquire_num_times().check("inquire_num_times")?;
        let mut times = vec![0.0; utils::len_of(count)];
        db.get_all_times(&mut times).check("get_all_times")?;

        self.time_values = times;
        Ok(())
    }

    //
    // queries
    //

    /// Expand the side set `side_set_id` into `(node_count_list, node_list)`.
    ///
    /// `node_count_list` has one entry per side, `node_list` holds the nodes of every side
    /// back to back and is exactly as long as the sum of the counts.
    pub fn get_side_set_node_list(&self, side_set_id: i64) -> Result<(Vec<i32>, Vec<i32>), Error> {
        let db = self.ready("get_side_set_node_list")?;
        let params = db
            .get_set_param(EntityKind::SideSet, side_set_id)
            .check("get_set_param")?;

        let n_sides = utils::len_of(params.num_entries);
        let mut node_count_list = vec![0; n_sides];
        // upper bound, the real length is only known once the counts are filled in
        let mut node_list = vec![0; n_sides * MAX_NODES_PER_SIDE];
        db.get_side_set_node_list(side_set_id, &mut node_count_list, &mut node_list)
            .check("get_side_set_node_list")?;

        let total: usize = node_count_list.iter().map(|count| utils::len_of(*count)).sum();
        node_list.truncate(total);
        Ok((node_count_list, node_list))
    }

    /// number of time steps currently stored in the database
    pub fn get_num_times(&self) -> Result<i32, Error> {
        self.ready("get_num_times")?
            .inquire_num_times()
            .check("inquire_num_times")
    }

    pub fn get_nodal_variable_names(&self) -> Result<Vec<String>, Error> {
        variables::read_variable_names(self.ready("get_nodal_variable_names")?, VarDomain::Nodal)
    }

    pub fn get_elemental_variable_names(&self) -> Result<Vec<String>, Error> {
        variables::read_variable_names(
            self.ready("get_elemental_variable_names")?,
            VarDomain::ElementBlock,
        )
    }

    pub fn get_global_variable_names(&self) -> Result<Vec<String>, Error> {
        variables::read_variable_names(self.ready("get_global_variable_names")?, VarDomain::Global)
    }

    /// values of the nodal variable `var_idx` at `time_step`, both 1-based
    pub fn get_nodal_variable_values(
        &self,
        time_step: i32,
        var_idx: i32,
    ) -> Result<Vec<f64>, Error> {
        let db = self.ready("get_nodal_variable_values")?;
        let n_nodes = utils::len_of(self.n_nodes);
        variables::read_values(db, time_step, VarDomain::Nodal, var_idx, 1, n_nodes)
    }

    /// values of the elemental variable `var_idx` on the block `block_id` at `time_step`
    pub fn get_elemental_variable_values(
        &self,
        time_step: i32,
        var_idx: i32,
        block_id: i64,
    ) -> Result<Vec<f64>, Error> {
        let db = self.ready("get_elemental_variable_values")?;
        let params = db.get_block(block_id).check("get_block")?;
        let len = utils::len_of(params.num_elems);
        variables::read_values(db, time_step, VarDomain::ElementBlock, var_idx, block_id, len)
    }

    /// every global variable at `time_step`
    pub fn get_global_variable_values_at(&self, time_step: i32) -> Result<Vec<f64>, Error> {
        let db = self.ready("get_global_variable_values_at")?;
        let count = db
            .get_variable_param(VarDomain::Global)
            .check("get_variable_param")?;
        if count <= 0 {
            return Ok(Vec::new());
        }

        variables::read_values(db, time_step, VarDomain::Global, 1, 0, utils::len_of(count))
    }

    /// The global variable `var_idx` over the steps `begin_idx..=end_idx`.
    ///
    /// `None` for `end_idx` runs through the last step currently stored in the database.
    pub fn get_global_variable_values(
        &self,
        var_idx: i32,
        begin_idx: i32,
        end_idx: Option<i32>,
    ) -> Result<Vec<f64>, Error> {
        let db = self.ready("get_global_variable_values")?;
        let last_idx = match end_idx {
            Some(end_idx) => end_idx,
            None => db.inquire_num_times().check("inquire_num_times")?,
        };

        variables::read_values_over_time(db, VarDomain::Global, var_idx, 1, begin_idx, last_idx)
    }

    //
    // write api
    //

    /// write the x coordinates of a 1D mesh
    pub fn write_coords(&mut self, x: &[f64]) -> Result<(), Error> {
        self.writable("write_coords")?
            .put_coord(Some(x), None, None)
            .check("put_coord")
    }

    pub fn write_coords_xy(&mut self, x: &[f64], y: &[f64]) -> Result<(), Error> {
        self.writable("write_coords")?
            .put_coord(Some(x), Some(y), None)
            .check("put_coord")
    }

    pub fn write_coords_xyz(&mut self, x: &[f64], y: &[f64], z: &[f64]) -> Result<(), Error> {
        self.writable("write_coords")?
            .put_coord(Some(x), Some(y), Some(z))
            .check("put_coord")
    }

    /// Write the default axis labels `x`, `y` and `z`, one per spatial dimension
    pub fn write_coord_names(&mut self) -> Result<(), Error> {
        let dim = utils::len_of(self.n_dim).min(3);
        self.write_custom_coord_names(&["x", "y", "z"][..dim])
    }

    /// Write at most three axis labels and keep them for [`File::get_coord_names`]
    pub fn write_custom_coord_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), Error> {
        if names.len() > 3 {
            return Err(invalid_argument(
                "write_coord_names",
                format!("{} coordinate names given, at most 3 are allowed", names.len()),
            ));
        }

        let names: Vec<&str> = names
            .iter()
            .map(|name| utils::truncate_name(name.as_ref()))
            .collect();
        self.writable("write_coord_names")?
            .put_coord_names(&names)
            .check("put_coord_names")?;

        self.coord_names = names.into_iter().map(String::from).collect();
        Ok(())
    }

    /// Write free-text records, each padded or truncated to the fixed line length
    pub fn write_info<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), Error> {
        let lines: Vec<String> = lines.iter().map(|line| utils::pad_line(line.as_ref())).collect();
        self.writable("write_info")?
            .put_info(&lines)
            .check("put_info")
    }

    /// Store the time value of the 1-based `time_step`
    pub fn write_time(&mut self, time_step: i32, time: f64) -> Result<(), Error> {
        self.writable("write_time")?
            .put_time(time_step, time)
            .check("put_time")?;
        trace!(time_step, time, "wrote time");
        Ok(())
    }

    pub fn write_elem_map(&mut self, map: &[i32]) -> Result<(), Error> {
        self.writable("write_elem_map")?
            .put_map(map)
            .check("put_map")
    }

    /// Write an element block.
    ///
    /// The number of nodes per element is `connect.len() / n_elems_in_block`. A connectivity
    /// that does not split evenly into `n_elems_in_block` elements is rejected before the
    /// engine is called; an empty block is written with zero nodes per element.
    pub fn write_block(
        &mut self,
        blk_id: i64,
        elem_type: &str,
        n_elems_in_block: i64,
        connect: &[i32],
    ) -> Result<(), Error> {
        let len = connect.len() as i64;
        let n_nodes_per_elem = match n_elems_in_block {
            n if n > 0 && len % n == 0 => len / n,
            0 if connect.is_empty() => 0,
            n => {
                return Err(invalid_argument(
                    "write_block",
                    format!("{len} connectivity entries cannot be split into {n} elements"),
                ))
            }
        };

        let params = BlockParams::new(elem_type.into(), n_elems_in_block, n_nodes_per_elem, 0);
        let db = self.writable("write_block")?;
        db.put_block(blk_id, &params).check("put_block")?;
        db.put_conn(blk_id, connect).check("put_conn")?;

        trace!(blk_id, elem_type, n_elems_in_block, n_nodes_per_elem, "wrote element block");
        Ok(())
    }

    pub fn write_node_set(&mut self, set_id: i64, node_set: &[i32]) -> Result<(), Error> {
        let params = SetParams::new(node_set.len() as i64, 0);
        let db = self.writable("write_node_set")?;
        db.put_set_param(EntityKind::NodeSet, set_id, params)
            .check("put_set_param")?;
        db.put_set(EntityKind::NodeSet, set_id, node_set, None)
            .check("put_set")?;

        trace!(set_id, size = node_set.len(), "wrote node set");
        Ok(())
    }

    /// Write a side set from parallel element and local side lists
    pub fn write_side_set(
        &mut self,
        set_id: i64,
        elem_list: &[i32],
        side_list: &[i32],
    ) -> Result<(), Error> {
        if elem_list.len() != side_list.len() {
            return Err(LogicError::LengthMismatch {
                left: "elem_list",
                left_len: elem_list.len(),
                right: "side_list",
                right_len: side_list.len(),
            }
            .into());
        }

        let params = SetParams::new(elem_list.len() as i64, 0);
        let db = self.writable("write_side_set")?;
        db.put_set_param(EntityKind::SideSet, set_id, params)
            .check("put_set_param")?;
        db.put_set(EntityKind::SideSet, set_id, elem_list, Some(side_list))
            .check("put_set")?;

        trace!(set_id, size = elem_list.len(), "wrote side set");
        Ok(())
    }

    /// Name the element blocks in the order they were written, an empty list does nothing
    pub fn write_block_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), Error> {
        names::write_names(self.writable("write_block_names")?, EntityKind::ElementBlock, names)
    }

    pub fn write_node_set_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), Error> {
        names::write_names(self.writable("write_node_set_names")?, EntityKind::NodeSet, names)
    }

    pub fn write_side_set_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), Error> {
        names::write_names(self.writable("write_side_set_names")?, EntityKind::SideSet, names)
    }

    /// Declare the nodal variables. An empty list declares nothing.
    pub fn write_nodal_var_names<S: AsRef<str>>(&mut self, var_names: &[S]) -> Result<(), Error> {
        variables::write_variable_names(
            self.writable("write_nodal_var_names")?,
            VarDomain::Nodal,
            var_names,
        )
    }

    pub fn write_elem_var_names<S: AsRef<str>>(&mut self, var_names: &[S]) -> Result<(), Error> {
        variables::write_variable_names(
            self.writable("write_elem_var_names")?,
            VarDomain::ElementBlock,
            var_names,
        )
    }

    pub fn write_global_var_names<S: AsRef<str>>(&mut self, var_names: &[S]) -> Result<(), Error> {
        variables::write_variable_names(
            self.writable("write_global_var_names")?,
            VarDomain::Global,
            var_names,
        )
    }

    /// write every nodal value of one variable at one step
    pub fn write_nodal_var(
        &mut self,
        step_num: i32,
        var_index: i32,
        values: &[f64],
    ) -> Result<(), Error> {
        self.writable("write_nodal_var")?
            .put_var(step_num, VarDomain::Nodal, var_index, 1, values)
            .check("put_var")
    }

    /// write every value of one elemental variable on the block `block_id` at one step
    pub fn write_elem_var(
        &mut self,
        step_num: i32,
        var_index: i32,
        block_id: i64,
        values: &[f64],
    ) -> Result<(), Error> {
        self.writable("write_elem_var")?
            .put_var(step_num, VarDomain::ElementBlock, var_index, block_id, values)
            .check("put_var")
    }

    /// write a single nodal value at the 1-based `start_index`
    pub fn write_partial_nodal_var(
        &mut self,
        step_num: i32,
        var_index: i32,
        obj_id: i64,
        start_index: i64,
        var_value: f64,
    ) -> Result<(), Error> {
        self.writable("write_partial_nodal_var")?
            .put_partial_var(
                step_num,
                VarDomain::Nodal,
                var_index,
                obj_id,
                start_index,
                &[var_value],
            )
            .check("put_partial_var")
    }

    /// write a single elemental value of the block `obj_id` at the 1-based `start_index`
    pub fn write_partial_elem_var(
        &mut self,
        step_num: i32,
        var_index: i32,
        obj_id: i64,
        start_index: i64,
        var_value: f64,
    ) -> Result<(), Error> {
        self.writable("write_partial_elem_var")?
            .put_partial_var(
                step_num,
                VarDomain::ElementBlock,
                var_index,
                obj_id,
                start_index,
                &[var_value],
            )
            .check("put_partial_var")
    }

    pub fn write_global_var(
        &mut self,
        step_num: i32,
        var_index: i32,
        value: f64,
    ) -> Result<(), Error> {
        self.writable("write_global_var")?
            .put_var(step_num, VarDomain::Global, var_index, 0, &[value])
            .check("put_var")
    }

    /// Make everything written so far visible to readers of the database
    pub fn update(&mut self) -> Result<(), Error> {
        self.writable("update")?.update().check("update")?;
        debug!("flushed database");
        Ok(())
    }
}

impl<D: Database> Drop for File<D> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(%err, "failed to close database on drop");
        }
    }
}

fn to_i32(operation: &'static str, value: i64) -> Result<i32, Error> {
    i32::try_from(value)
        .map_err(|_| invalid_argument(operation, format!("{value} does not fit in 32 bits")))
}
