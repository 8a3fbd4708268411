use crate::error::{invalid_argument, out_of_range};
use crate::prelude::*;
use ndarray::ArrayView2;

/// A contiguous group of elements sharing one element type.
///
/// Connectivity is stored flat and row-major: the nodes of element `i` occupy
/// `[i * k, (i + 1) * k)` where `k` is the number of nodes per element.
///
/// A default constructed block has ID, size and nodes per element set to `-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBlock {
    id: i64,
    name: String,
    elem_type: String,
    n_elems: i32,
    n_nodes_per_elem: i32,
    connect: Vec<i32>,
}

impl Default for ElementBlock {
    fn default() -> Self {
        Self {
            id: -1,
            name: String::new(),
            elem_type: String::new(),
            n_elems: -1,
            n_nodes_per_elem: -1,
            connect: Vec::new(),
        }
    }
}

impl ElementBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_id(&self) -> i64 {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn set_name<T: Into<String>>(&mut self, name: T) {
        self.name = name.into();
    }

    /// Element type tag such as `"TET4"`
    pub fn get_element_type(&self) -> &str {
        &self.elem_type
    }

    /// Number of elements in the block, `-1` if connectivity was never set
    pub fn get_size(&self) -> i32 {
        self.n_elems
    }

    pub fn get_num_elements(&self) -> i32 {
        self.n_elems
    }

    pub fn get_num_nodes_per_element(&self) -> i32 {
        self.n_nodes_per_elem
    }

    /// The flat connectivity array `[e0n0, e0n1, ..., e1n0, ...]`
    pub fn get_connectivity(&self) -> &[i32] {
        &self.connect
    }

    /// Connectivity of the element at `element_idx` (0-based position within the block)
    pub fn get_element_connectivity(&self, element_idx: usize) -> Result<&[i32], Error> {
        let n_elems = utils::len_of(self.n_elems);
        if element_idx >= n_elems {
            return Err(out_of_range("element block", element_idx, n_elems));
        }

        let stride = utils::len_of(self.n_nodes_per_elem);
        let offset = element_idx * stride;
        Ok(&self.connect[offset..offset + stride])
    }

    /// Set type, element count, nodes per element and connectivity in one step.
    ///
    /// `connect` must hold exactly `n_elems * n_nodes_per_elem` entries. On error the block
    /// is left untouched.
    pub fn set_connectivity<T: Into<String>>(
        &mut self,
        elem_type: T,
        n_elems: i32,
        n_nodes_per_elem: i32,
        connect: Vec<i32>,
    ) -> Result<(), Error> {
        if n_elems < 0 || n_nodes_per_elem < 0 {
            return Err(invalid_argument(
                "set_connectivity",
                format!("negative block shape {n_elems} x {n_nodes_per_elem}"),
            ));
        }

        let expected = utils::len_of(n_elems) * utils::len_of(n_nodes_per_elem);
        if connect.len() != expected {
            return Err(invalid_argument(
                "set_connectivity",
                format!(
                    "{} connectivity entries given, {n_elems} elements \
                     with {n_nodes_per_elem} nodes need {expected}",
                    connect.len()
                ),
            ));
        }

        self.elem_type = elem_type.into();
        self.n_elems = n_elems;
        self.n_nodes_per_elem = n_nodes_per_elem;
        self.connect = connect;
        Ok(())
    }

    /// View the connectivity as an `(elements, nodes per element)` matrix
    pub fn connectivity_matrix(&self) -> Result<ArrayView2<'_, i32>, Error> {
        let shape = (
            utils::len_of(self.n_elems),
            utils::len_of(self.n_nodes_per_elem),
        );
        Ok(ArrayView2::from_shape(shape, &self.connect)?)
    }
}
