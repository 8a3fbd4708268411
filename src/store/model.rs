//! In-memory contents of a store database and the rules guarding every mutation

use super::error::StoreError;
use super::topology::Topology;
use crate::engine::{BlockParams, EntityKind, Header, NameBuffer, SetParams, VarDomain};
use crate::engine::MAX_LINE_LENGTH;
use crate::utils;

use std::collections::BTreeMap;

/// format version written by this engine
pub(crate) const VERSION: f32 = 8.11;

/// byte width of the floating point payloads
pub(crate) const WORD_SIZE: i32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Model {
    pub(crate) version: f32,
    pub(crate) word_size: i32,
    pub(crate) header: Option<Header>,
    pub(crate) info: Vec<String>,
    /// one array per spatial dimension, each `num_nodes` long
    pub(crate) coords: Vec<Vec<f64>>,
    pub(crate) coord_names: Vec<String>,
    pub(crate) elem_map: Option<Vec<i32>>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) node_sets: Vec<Set>,
    pub(crate) side_sets: Vec<Set>,
    /// entity names, positional in definition order
    pub(crate) names: BTreeMap<EntityKind, Vec<String>>,
    pub(crate) variables: BTreeMap<VarDomain, Vec<String>>,
    pub(crate) times: Vec<f64>,
    /// always as long as `times`
    pub(crate) steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    pub(crate) id: i64,
    pub(crate) elem_type: String,
    pub(crate) num_elems: usize,
    pub(crate) nodes_per_elem: usize,
    pub(crate) num_attrs: i64,
    pub(crate) connect: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Set {
    pub(crate) id: i64,
    pub(crate) num_dist_factors: i64,
    pub(crate) entries: Vec<i32>,
    /// local side numbers of a side set, empty for node sets
    pub(crate) sides: Vec<i32>,
}

/// variable values recorded at one time step
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Step {
    /// keyed by 1-based variable index
    pub(crate) nodal: BTreeMap<i32, Vec<f64>>,
    /// keyed by 1-based variable index and block ID
    pub(crate) elemental: BTreeMap<(i32, i64), Vec<f64>>,
    pub(crate) global: Vec<f64>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            version: VERSION,
            word_size: WORD_SIZE,
            header: None,
            info: Vec::new(),
            coords: Vec::new(),
            coord_names: Vec::new(),
            elem_map: None,
            blocks: Vec::new(),
            node_sets: Vec::new(),
            side_sets: Vec::new(),
            names: BTreeMap::new(),
            variables: BTreeMap::new(),
            times: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// copy `src` into an exactly sized caller buffer
fn copy_into<T: Copy>(what: &'static str, src: &[T], dst: &mut [T]) -> Result<(), StoreError> {
    if src.len() != dst.len() {
        return Err(StoreError::LengthMismatch {
            what,
            expected: src.len(),
            actual: dst.len(),
        });
    }
    dst.copy_from_slice(src);
    Ok(())
}

fn expect_len(what: &'static str, expected: usize, actual: usize) -> Result<(), StoreError> {
    if expected != actual {
        return Err(StoreError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: i64) -> Result<usize, StoreError> {
    usize::try_from(value).map_err(|_| StoreError::NegativeCount { field, value })
}

impl Model {
    pub(crate) fn header(&self) -> Result<&Header, StoreError> {
        self.header.as_ref().ok_or(StoreError::NoHeader)
    }

    pub(crate) fn num_dim(&self) -> Result<usize, StoreError> {
        Ok(utils::len_of(self.header()?.num_dim))
    }

    pub(crate) fn num_nodes(&self) -> Result<usize, StoreError> {
        Ok(utils::len_of(self.header()?.num_nodes))
    }

    pub(crate) fn num_elems(&self) -> Result<usize, StoreError> {
        Ok(utils::len_of(self.header()?.num_elems))
    }

    /// number of entities of `kind` declared in the header
    fn declared(&self, kind: EntityKind) -> Result<usize, StoreError> {
        let header = self.header()?;
        let count = match kind {
            EntityKind::ElementBlock => header.num_elem_blks,
            EntityKind::NodeSet => header.num_node_sets,
            EntityKind::SideSet => header.num_side_sets,
        };
        Ok(utils::len_of(count))
    }

    pub(crate) fn put_init(&mut self, header: &Header) -> Result<(), StoreError> {
        if self.header.is_some() {
            return Err(StoreError::HeaderWritten);
        }
        if !(1..=3).contains(&header.num_dim) {
            return Err(StoreError::NumDim(header.num_dim));
        }

        let counts = [
            ("num_nodes", header.num_nodes),
            ("num_elems", header.num_elems),
            ("num_elem_blks", header.num_elem_blks),
            ("num_node_sets", header.num_node_sets),
            ("num_side_sets", header.num_side_sets),
        ];
        for (field, value) in counts {
            non_negative(field, value.into())?;
        }

        let mut header = header.clone();
        header.title = utils::truncate_to(&header.title, MAX_LINE_LENGTH).to_string();
        self.set_header(header);
        Ok(())
    }

    /// install a header and size the geometry arrays it implies
    pub(crate) fn set_header(&mut self, header: Header) {
        let num_dim = utils::len_of(header.num_dim);
        let num_nodes = utils::len_of(header.num_nodes);
        self.coords = vec![vec![0.0; num_nodes]; num_dim];
        self.coord_names = vec![String::new(); num_dim];
        self.header = Some(header);
    }

    pub(crate) fn put_info(&mut self, lines: &[String]) -> Result<(), StoreError> {
        self.header()?;
        self.info = lines
            .iter()
            .map(|line| utils::truncate_to(line, MAX_LINE_LENGTH).to_string())
            .collect();
        Ok(())
    }

    pub(crate) fn get_coord(
        &self,
        axes: [Option<&mut [f64]>; 3],
    ) -> Result<(), StoreError> {
        let num_dim = self.num_dim()?;
        for (axis, buffer) in axes.into_iter().enumerate() {
            if let Some(buffer) = buffer {
                let coords = self
                    .coords
                    .get(axis)
                    .ok_or(StoreError::Axis { axis, num_dim })?;
                copy_into("coordinate buffer", coords, buffer)?;
            }
        }
        Ok(())
    }

    pub(crate) fn put_coord(&mut self, axes: [Option<&[f64]>; 3]) -> Result<(), StoreError> {
        let num_dim = self.num_dim()?;
        let num_nodes = self.num_nodes()?;

        // validate every axis before touching any of them
        for (axis, values) in axes.iter().enumerate() {
            if let Some(values) = values {
                if axis >= num_dim {
                    return Err(StoreError::Axis { axis, num_dim });
                }
                expect_len("coordinate array", num_nodes, values.len())?;
            }
        }

        for (axis, values) in axes.into_iter().enumerate() {
            if let Some(values) = values {
                self.coords[axis] = values.to_vec();
            }
        }
        Ok(())
    }

    pub(crate) fn get_coord_names(&self, names: &mut [NameBuffer]) -> Result<(), StoreError> {
        let num_dim = self.num_dim()?;
        if names.len() > num_dim {
            return Err(StoreError::TooMany {
                what: "coordinate names",
                limit: num_dim,
            });
        }

        for (buffer, name) in names.iter_mut().zip(&self.coord_names) {
            utils::fill_name(buffer, name);
        }
        Ok(())
    }

    pub(crate) fn put_coord_names(&mut self, names: &[&str]) -> Result<(), StoreError> {
        let num_dim = self.num_dim()?;
        if names.len() > num_dim {
            return Err(StoreError::TooMany {
                what: "coordinate names",
                limit: num_dim,
            });
        }

        for (slot, name) in self.coord_names.iter_mut().zip(names) {
            *slot = utils::truncate_name(name).to_string();
        }
        Ok(())
    }

    pub(crate) fn get_map(&self, map: &mut [i32]) -> Result<(), StoreError> {
        let num_elems = self.num_elems()?;
        expect_len("element map buffer", num_elems, map.len())?;

        match &self.elem_map {
            Some(stored) => copy_into("element map buffer", stored, map),
            None => {
                // identity numbering when no map was written
                for (slot, number) in map.iter_mut().zip(1..) {
                    *slot = number;
                }
                Ok(())
            }
        }
    }

    pub(crate) fn put_map(&mut self, map: &[i32]) -> Result<(), StoreError> {
        expect_len("element map", self.num_elems()?, map.len())?;
        self.elem_map = Some(map.to_vec());
        Ok(())
    }

    pub(crate) fn ids(&self, kind: EntityKind) -> Vec<i64> {
        match kind {
            EntityKind::ElementBlock => self.blocks.iter().map(|block| block.id).collect(),
            EntityKind::NodeSet => self.node_sets.iter().map(|set| set.id).collect(),
            EntityKind::SideSet => self.side_sets.iter().map(|set| set.id).collect(),
        }
    }

    pub(crate) fn get_ids(&self, kind: EntityKind, ids: &mut [i64]) -> Result<(), StoreError> {
        self.header()?;
        copy_into("id buffer", &self.ids(kind), ids)
    }

    pub(crate) fn get_name(
        &self,
        kind: EntityKind,
        id: i64,
        name: &mut NameBuffer,
    ) -> Result<(), StoreError> {
        let position = self
            .ids(kind)
            .iter()
            .position(|known| *known == id)
            .ok_or(StoreError::UnknownId { kind, id })?;

        let stored = self
            .names
            .get(&kind)
            .and_then(|names| names.get(position))
            .map(String::as_str)
            .unwrap_or("");
        utils::fill_name(name, stored);
        Ok(())
    }

    pub(crate) fn put_names(&mut self, kind: EntityKind, names: &[&str]) -> Result<(), StoreError> {
        let limit = self.declared(kind)?;
        if names.len() > limit {
            return Err(StoreError::TooMany {
                what: "names",
                limit,
            });
        }

        let names = names
            .iter()
            .map(|name| utils::truncate_name(name).to_string())
            .collect();
        self.names.insert(kind, names);
        Ok(())
    }

    /// reserve a slot for one more entity of `kind` with the given ID
    fn check_new_entity(&self, kind: EntityKind, id: i64) -> Result<(), StoreError> {
        let limit = self.declared(kind)?;
        let ids = self.ids(kind);
        if ids.contains(&id) {
            return Err(StoreError::DuplicateId { kind, id });
        }
        if ids.len() >= limit {
            return Err(StoreError::TooMany {
                what: match kind {
                    EntityKind::ElementBlock => "element blocks",
                    EntityKind::NodeSet => "node sets",
                    EntityKind::SideSet => "side sets",
                },
                limit,
            });
        }
        Ok(())
    }

    pub(crate) fn block(&self, id: i64) -> Result<&Block, StoreError> {
        self.blocks
            .iter()
            .find(|block| block.id == id)
            .ok_or(StoreError::UnknownId {
                kind: EntityKind::ElementBlock,
                id,
            })
    }

    fn block_mut(&mut self, id: i64) -> Result<&mut Block, StoreError> {
        self.blocks
            .iter_mut()
            .find(|block| block.id == id)
            .ok_or(StoreError::UnknownId {
                kind: EntityKind::ElementBlock,
                id,
            })
    }

    pub(crate) fn get_block(&self, id: i64) -> Result<BlockParams, StoreError> {
        let block = self.block(id)?;
        Ok(BlockParams::new(
            block.elem_type.clone(),
            block.num_elems as i64,
            block.nodes_per_elem as i64,
            block.num_attrs,
        ))
    }

    pub(crate) fn put_block(&mut self, id: i64, params: &BlockParams) -> Result<(), StoreError> {
        self.check_new_entity(EntityKind::ElementBlock, id)?;
        let num_elems = non_negative("num_elems", params.num_elems)?;
        let nodes_per_elem = non_negative("nodes_per_elem", params.nodes_per_elem)?;
        non_negative("num_attrs", params.num_attrs)?;
        let connect_len =
            num_elems
                .checked_mul(nodes_per_elem)
                .ok_or(StoreError::ConnectivitySize {
                    num_elems,
                    nodes_per_elem,
                })?;

        self.blocks.push(Block {
            id,
            elem_type: utils::truncate_name(&params.elem_type).to_string(),
            num_elems,
            nodes_per_elem,
            num_attrs: params.num_attrs,
            connect: vec![0; connect_len],
        });
        Ok(())
    }

    pub(crate) fn get_conn(&self, id: i64, connect: &mut [i32]) -> Result<(), StoreError> {
        copy_into("connectivity buffer", &self.block(id)?.connect, connect)
    }

    pub(crate) fn put_conn(&mut self, id: i64, connect: &[i32]) -> Result<(), StoreError> {
        let block = self.block_mut(id)?;
        expect_len(
            "connectivity",
            block.num_elems * block.nodes_per_elem,
            connect.len(),
        )?;
        block.connect = connect.to_vec();
        Ok(())
    }

    fn sets(&self, kind: EntityKind) -> Result<&Vec<Set>, StoreError> {
        match kind {
            EntityKind::NodeSet => Ok(&self.node_sets),
            EntityKind::SideSet => Ok(&self.side_sets),
            EntityKind::ElementBlock => Err(StoreError::NotASet(kind)),
        }
    }

    fn sets_mut(&mut self, kind: EntityKind) -> Result<&mut Vec<Set>, StoreError> {
        match kind {
            EntityKind::NodeSet => Ok(&mut self.node_sets),
            EntityKind::SideSet => Ok(&mut self.side_sets),
            EntityKind::ElementBlock => Err(StoreError::NotASet(kind)),
        }
    }

    fn set(&self, kind: EntityKind, id: i64) -> Result<&Set, StoreError> {
        self.sets(kind)?
            .iter()
            .find(|set| set.id == id)
            .ok_or(StoreError::UnknownId { kind, id })
    }

    pub(crate) fn get_set_param(&self, kind: EntityKind, id: i64) -> Result<SetParams, StoreError> {
        let set = self.set(kind, id)?;
        Ok(SetParams::new(set.entries.len() as i64, set.num_dist_factors))
    }

    pub(crate) fn put_set_param(
        &mut self,
        kind: EntityKind,
        id: i64,
        params: SetParams,
    ) -> Result<(), StoreError> {
        self.sets(kind)?;
        self.check_new_entity(kind, id)?;
        let num_entries = non_negative("num_entries", params.num_entries)?;
        non_negative("num_dist_factors", params.num_dist_factors)?;

        let sides = match kind {
            EntityKind::SideSet => vec![0; num_entries],
            _ => Vec::new(),
        };
        self.sets_mut(kind)?.push(Set {
            id,
            num_dist_factors: params.num_dist_factors,
            entries: vec![0; num_entries],
            sides,
        });
        Ok(())
    }

    pub(crate) fn get_set(
        &self,
        kind: EntityKind,
        id: i64,
        entries: &mut [i32],
        sides: Option<&mut [i32]>,
    ) -> Result<(), StoreError> {
        let set = self.set(kind, id)?;
        copy_into("set buffer", &set.entries, entries)?;
        if let (EntityKind::SideSet, Some(sides)) = (kind, sides) {
            copy_into("side buffer", &set.sides, sides)?;
        }
        Ok(())
    }

    pub(crate) fn put_set(
        &mut self,
        kind: EntityKind,
        id: i64,
        entries: &[i32],
        sides: Option<&[i32]>,
    ) -> Result<(), StoreError> {
        let set = self
            .sets_mut(kind)?
            .iter_mut()
            .find(|set| set.id == id)
            .ok_or(StoreError::UnknownId { kind, id })?;

        expect_len("set entries", set.entries.len(), entries.len())?;
        if kind == EntityKind::SideSet {
            let sides = sides.unwrap_or(&[]);
            expect_len("side list", set.entries.len(), sides.len())?;
            set.sides = sides.to_vec();
        }
        set.entries = entries.to_vec();
        Ok(())
    }

    /// find the block holding the 1-based global element number and the element's
    /// 0-based position inside it
    fn locate_element(&self, element: i64) -> Result<(&Block, usize), StoreError> {
        let mut remaining = usize::try_from(element)
            .ok()
            .and_then(|element| element.checked_sub(1))
            .ok_or(StoreError::UnknownElement(element))?;

        for block in &self.blocks {
            if remaining < block.num_elems {
                return Ok((block, remaining));
            }
            remaining -= block.num_elems;
        }
        Err(StoreError::UnknownElement(element))
    }

    pub(crate) fn get_side_set_node_list(
        &self,
        id: i64,
        node_counts: &mut [i32],
        nodes: &mut [i32],
    ) -> Result<(), StoreError> {
        let set = self.set(EntityKind::SideSet, id)?;
        expect_len("node count buffer", set.entries.len(), node_counts.len())?;

        let mut cursor = 0;
        for ((element, side), count) in set.entries.iter().zip(&set.sides).zip(node_counts) {
            let (block, local) = self.locate_element(i64::from(*element))?;
            let topology = Topology::of(&block.elem_type)
                .ok_or_else(|| StoreError::UnknownTopology(block.elem_type.clone()))?;
            let side_nodes = topology
                .side(*side)
                .ok_or_else(|| StoreError::SideNumber {
                    elem_type: block.elem_type.clone(),
                    side: *side,
                })?;

            let needed = cursor + topology.nodes_per_side();
            if needed > nodes.len() {
                return Err(StoreError::NodeBuffer {
                    needed,
                    available: nodes.len(),
                });
            }

            let element_nodes =
                &block.connect[local * block.nodes_per_elem..(local + 1) * block.nodes_per_elem];
            for (slot, position) in nodes[cursor..needed].iter_mut().zip(side_nodes) {
                *slot = *element_nodes
                    .get(position - 1)
                    .ok_or_else(|| StoreError::SideNumber {
                        elem_type: block.elem_type.clone(),
                        side: *side,
                    })?;
            }

            *count = topology.nodes_per_side() as i32;
            cursor = needed;
        }
        Ok(())
    }

    pub(crate) fn variable_count(&self, domain: VarDomain) -> usize {
        self.variables.get(&domain).map(Vec::len).unwrap_or(0)
    }

    pub(crate) fn put_variable_param(
        &mut self,
        domain: VarDomain,
        count: i32,
    ) -> Result<(), StoreError> {
        self.header()?;
        let count = non_negative("variable count", count.into())?;
        if self.variables.contains_key(&domain) {
            return Err(StoreError::VariablesDeclared(domain));
        }
        self.variables.insert(domain, vec![String::new(); count]);
        Ok(())
    }

    pub(crate) fn get_variable_names(
        &self,
        domain: VarDomain,
        names: &mut [NameBuffer],
    ) -> Result<(), StoreError> {
        let stored = self.variables.get(&domain).map(Vec::as_slice).unwrap_or(&[]);
        if names.len() > stored.len() {
            return Err(StoreError::TooMany {
                what: "variable names",
                limit: stored.len(),
            });
        }

        for (buffer, name) in names.iter_mut().zip(stored) {
            utils::fill_name(buffer, name);
        }
        Ok(())
    }

    pub(crate) fn put_variable_names(
        &mut self,
        domain: VarDomain,
        names: &[&str],
    ) -> Result<(), StoreError> {
        let stored = self
            .variables
            .get_mut(&domain)
            .ok_or(StoreError::VariablesUndeclared(domain))?;
        if names.len() > stored.len() {
            return Err(StoreError::TooMany {
                what: "variable names",
                limit: stored.len(),
            });
        }

        for (slot, name) in stored.iter_mut().zip(names) {
            *slot = utils::truncate_name(name).to_string();
        }
        Ok(())
    }

    /// 0-based position of a 1-based variable index, `span` consecutive variables wide
    fn variable_slot(
        &self,
        domain: VarDomain,
        index: i32,
        span: usize,
    ) -> Result<usize, StoreError> {
        let count = self.variable_count(domain);
        let slot = usize::try_from(index)
            .ok()
            .and_then(|index| index.checked_sub(1))
            .filter(|slot| slot + span.max(1) <= count);

        slot.ok_or(StoreError::VarIndex {
            domain,
            index: index.into(),
            count,
        })
    }

    /// number of values one variable holds on the addressed object
    fn object_len(&self, domain: VarDomain, obj_id: i64) -> Result<usize, StoreError> {
        match domain {
            VarDomain::Nodal => self.num_nodes(),
            VarDomain::ElementBlock => Ok(self.block(obj_id)?.num_elems),
            VarDomain::Global => Ok(self.variable_count(domain)),
        }
    }

    fn step(&self, step: i32) -> Result<&Step, StoreError> {
        usize::try_from(step)
            .ok()
            .and_then(|step| step.checked_sub(1))
            .and_then(|idx| self.steps.get(idx))
            .ok_or(StoreError::TimeStep {
                step,
                count: self.steps.len(),
            })
    }

    /// the addressed step, growing the stored steps as needed
    fn step_mut(&mut self, step: i32) -> Result<&mut Step, StoreError> {
        let idx = usize::try_from(step)
            .ok()
            .and_then(|step| step.checked_sub(1))
            .ok_or(StoreError::TimeStep {
                step,
                count: self.steps.len(),
            })?;

        if idx >= self.steps.len() {
            self.steps.resize_with(idx + 1, Step::default);
            self.times.resize(idx + 1, 0.0);
        }
        Ok(&mut self.steps[idx])
    }

    pub(crate) fn get_var(
        &self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        values: &mut [f64],
    ) -> Result<(), StoreError> {
        let stored = self.step(step)?;

        match domain {
            VarDomain::Nodal | VarDomain::ElementBlock => {
                self.variable_slot(domain, var_index, 1)?;
                let len = self.object_len(domain, obj_id)?;
                let recorded = match domain {
                    VarDomain::Nodal => stored.nodal.get(&var_index),
                    _ => stored.elemental.get(&(var_index, obj_id)),
                };
                match recorded {
                    Some(recorded) => copy_into("variable buffer", recorded, values),
                    None => {
                        expect_len("variable buffer", len, values.len())?;
                        values.fill(0.0);
                        Ok(())
                    }
                }
            }
            VarDomain::Global => {
                let slot = self.variable_slot(domain, var_index, values.len())?;
                for (offset, value) in values.iter_mut().enumerate() {
                    *value = stored.global.get(slot + offset).copied().unwrap_or(0.0);
                }
                Ok(())
            }
        }
    }

    pub(crate) fn put_var(
        &mut self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        values: &[f64],
    ) -> Result<(), StoreError> {
        self.header()?;

        match domain {
            VarDomain::Nodal | VarDomain::ElementBlock => {
                self.variable_slot(domain, var_index, 1)?;
                expect_len("variable values", self.object_len(domain, obj_id)?, values.len())?;

                let stored = self.step_mut(step)?;
                match domain {
                    VarDomain::Nodal => stored.nodal.insert(var_index, values.to_vec()),
                    _ => stored.elemental.insert((var_index, obj_id), values.to_vec()),
                };
            }
            VarDomain::Global => {
                let slot = self.variable_slot(domain, var_index, values.len())?;
                let count = self.variable_count(domain);

                let stored = self.step_mut(step)?;
                stored.global.resize(count, 0.0);
                stored.global[slot..slot + values.len()].copy_from_slice(values);
            }
        }
        Ok(())
    }

    pub(crate) fn put_partial_var(
        &mut self,
        step: i32,
        domain: VarDomain,
        var_index: i32,
        obj_id: i64,
        start_index: i64,
        values: &[f64],
    ) -> Result<(), StoreError> {
        if domain == VarDomain::Global {
            return Err(StoreError::PartialUnsupported(domain));
        }
        self.variable_slot(domain, var_index, 1)?;
        let size = self.object_len(domain, obj_id)?;

        let end = start_index.saturating_add(values.len() as i64);
        let start = usize::try_from(start_index)
            .ok()
            .and_then(|start| start.checked_sub(1))
            .filter(|start| start + values.len() <= size)
            .ok_or(StoreError::EntryRange {
                start: start_index,
                end,
                size,
            })?;

        let stored = self.step_mut(step)?;
        let recorded = match domain {
            VarDomain::Nodal => stored
                .nodal
                .entry(var_index)
                .or_insert_with(|| vec![0.0; size]),
            _ => stored
                .elemental
                .entry((var_index, obj_id))
                .or_insert_with(|| vec![0.0; size]),
        };
        recorded[start..start + values.len()].copy_from_slice(values);
        Ok(())
    }

    pub(crate) fn get_var_time(
        &self,
        domain: VarDomain,
        var_index: i32,
        entry: i64,
        begin_step: i32,
        end_step: i32,
        values: &mut [f64],
    ) -> Result<(), StoreError> {
        // both ends must name stored steps
        self.step(begin_step)?;
        self.step(end_step)?;
        if end_step < begin_step {
            return Err(StoreError::TimeStep {
                step: end_step,
                count: self.steps.len(),
            });
        }
        expect_len(
            "variable history buffer",
            utils::len_of(end_step - begin_step + 1),
            values.len(),
        )?;

        let slot = self.variable_slot(domain, var_index, 1)?;
        let position = match domain {
            VarDomain::Global => slot,
            VarDomain::Nodal => {
                let num_nodes = self.num_nodes()?;
                usize::try_from(entry)
                    .ok()
                    .and_then(|node| node.checked_sub(1))
                    .filter(|node| *node < num_nodes)
                    .ok_or(StoreError::EntryRange {
                        start: entry,
                        end: entry.saturating_add(1),
                        size: num_nodes,
                    })?
            }
            VarDomain::ElementBlock => self.locate_element(entry)?.1,
        };
        let block_id = match domain {
            VarDomain::ElementBlock => self.locate_element(entry)?.0.id,
            _ => 0,
        };

        let first = utils::len_of(begin_step - 1);
        for (value, step) in values.iter_mut().zip(&self.steps[first..]) {
            let recorded = match domain {
                VarDomain::Global => Some(&step.global),
                VarDomain::Nodal => step.nodal.get(&var_index),
                VarDomain::ElementBlock => step.elemental.get(&(var_index, block_id)),
            };
            *value = recorded
                .and_then(|recorded| recorded.get(position))
                .copied()
                .unwrap_or(0.0);
        }
        Ok(())
    }

    pub(crate) fn get_all_times(&self, times: &mut [f64]) -> Result<(), StoreError> {
        copy_into("time buffer", &self.times, times)
    }

    pub(crate) fn put_time(&mut self, step: i32, time: f64) -> Result<(), StoreError> {
        self.header()?;
        self.step_mut(step)?;
        self.times[utils::len_of(step - 1)] = time;
        Ok(())
    }
}
