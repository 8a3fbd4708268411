use crate::error::out_of_range;
use crate::prelude::*;

/// Named subset of node IDs.
///
/// Order is kept as given and duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet {
    id: i64,
    name: String,
    node_ids: Vec<i32>,
}

impl Default for NodeSet {
    fn default() -> Self {
        Self {
            id: -1,
            name: String::new(),
            node_ids: Vec::new(),
        }
    }
}

impl NodeSet {
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

    /// Number of nodes in the set
    pub fn get_size(&self) -> usize {
        self.node_ids.len()
    }

    pub fn get_node_id(&self, idx: usize) -> Result<i32, Error> {
        self.node_ids
            .get(idx)
            .copied()
            .ok_or_else(|| out_of_range("node set", idx, self.node_ids.len()))
    }

    pub fn get_node_ids(&self) -> &[i32] {
        &self.node_ids
    }

    pub fn set_nodes(&mut self, nodes: Vec<i32>) {
        self.node_ids = nodes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_set() {
        let mut ns = NodeSet::new();
        assert_eq!(ns.get_id(), -1);
        assert_eq!(ns.get_size(), 0);

        ns.set_id(201);
        assert_eq!(ns.get_id(), 201);

        ns.set_name("node_set");
        assert_eq!(ns.get_name(), "node_set");

        ns.set_nodes(vec![1, 2, 3]);
        assert_eq!(ns.get_size(), 3);
        assert_eq!(ns.get_node_id(0).unwrap(), 1);
        assert_eq!(ns.get_node_id(1).unwrap(), 2);
        assert_eq!(ns.get_node_id(2).unwrap(), 3);
        assert!(matches!(ns.get_node_id(3), Err(Error::OutOfRange(_))));
        assert_eq!(ns.get_node_ids(), &[1, 2, 3]);
    }

    #[test]
    fn duplicates_keep_their_order() {
        let mut ns = NodeSet::new();
        ns.set_nodes(vec![7, 3, 7]);
        assert_eq!(ns.get_node_ids(), &[7, 3, 7]);
    }
}
