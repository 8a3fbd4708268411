use crate::error::out_of_range;
use crate::prelude::*;

/// Named subset of `(element ID, local side number)` pairs.
///
/// The pairs are kept in two parallel arrays that always have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideSet {
    id: i64,
    name: String,
    elem_ids: Vec<i32>,
    side_ids: Vec<i32>,
}

impl Default for SideSet {
    fn default() -> Self {
        Self {
            id: -1,
            name: String::new(),
            elem_ids: Vec::new(),
            side_ids: Vec::new(),
        }
    }
}

impl SideSet {
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

    /// Number of sides in the set
    pub fn get_size(&self) -> usize {
        self.elem_ids.len()
    }

    pub fn get_element_id(&self, idx: usize) -> Result<i32, Error> {
        self.elem_ids
            .get(idx)
            .copied()
            .ok_or_else(|| out_of_range("side set", idx, self.elem_ids.len()))
    }

    pub fn get_side_id(&self, idx: usize) -> Result<i32, Error> {
        self.side_ids
            .get(idx)
            .copied()
            .ok_or_else(|| out_of_range("side set", idx, self.side_ids.len()))
    }

    pub fn get_element_ids(&self) -> &[i32] {
        &self.elem_ids
    }

    pub fn get_side_ids(&self) -> &[i32] {
        &self.side_ids
    }

    /// Replace the sides of the set.
    ///
    /// Fails with a logic error, leaving the set unmodified, when the lengths differ.
    pub fn set_sides(&mut self, elems: Vec<i32>, sides: Vec<i32>) -> Result<(), Error> {
        if elems.len() != sides.len() {
            return Err(LogicError::LengthMismatch {
                left: "elems",
                left_len: elems.len(),
                right: "sides",
                right_len: sides.len(),
            }
            .into());
        }

        self.elem_ids = elems;
        self.side_ids = sides;
        Ok(())
    }

    /// Append one `(element, side)` pair
    pub fn add(&mut self, elem: i32, side: i32) {
        self.elem_ids.push(elem);
        self.side_ids.push(side);
    }
}
