use exodus::error::LogicError;
use exodus::{Error, File, FileAccess, State};

use std::path::PathBuf;
use tempfile::TempDir;

fn scratch(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}

/// a 2 x 1 grid of QUAD4 elements with a node set and a side set
fn write_quads(path: &PathBuf) {
    let mut file = File::with_access(path, FileAccess::Write).unwrap();
    file.write_init("quads", 2, 6, 2, 1, 1, 1).unwrap();
    file.write_coords_xy(
        &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0],
        &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
    )
    .unwrap();
    file.write_coord_names().unwrap();
    file.write_block(7, "QUAD4", 2, &[1, 2, 5, 4, 2, 3, 6, 5])
        .unwrap();
    file.write_node_set(3, &[1, 4]).unwrap();
    file.write_side_set(5, &[1, 2], &[1, 1]).unwrap();
    file.close().unwrap();
}

#[test]
fn round_trip_1d() {
    let (_dir, path) = scratch("line.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("line", 1, 4, 3, 1, 1, 1).unwrap();
    file.write_coords(&[0.0, 0.25, 0.5, 1.0]).unwrap();
    file.write_coord_names().unwrap();
    file.write_block(1, "BAR2", 3, &[1, 2, 2, 3, 3, 4]).unwrap();
    file.write_node_set(10, &[1, 4]).unwrap();
    file.write_side_set(20, &[3], &[2]).unwrap();
    file.close().unwrap();

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read().unwrap();

    assert_eq!(file.get_title(), "line");
    assert_eq!(file.get_dim(), 1);
    assert_eq!(file.get_num_nodes(), 4);
    assert_eq!(file.get_num_elements(), 3);
    assert_eq!(file.get_x_coords(), &[0.0, 0.25, 0.5, 1.0]);
    assert!(file.get_y_coords().is_empty());
    assert!(file.get_z_coords().is_empty());
    assert_eq!(file.get_coord_names(), &["x".to_string()]);

    let block = file.get_element_block(0).unwrap();
    assert_eq!(block.get_id(), 1);
    assert_eq!(block.get_element_type(), "BAR2");
    assert_eq!(block.get_num_elements(), 3);
    assert_eq!(block.get_num_nodes_per_element(), 2);
    assert_eq!(block.get_element_connectivity(2).unwrap(), &[3, 4]);

    assert_eq!(file.get_node_sets()[0].get_node_ids(), &[1, 4]);
    assert_eq!(file.get_side_sets()[0].get_element_ids(), &[3]);
    assert_eq!(file.get_side_sets()[0].get_side_ids(), &[2]);

    let (counts, nodes) = file.get_side_set_node_list(20).unwrap();
    assert_eq!(counts, vec![1]);
    assert_eq!(nodes, vec![4]);
}

#[test]
fn round_trip_2d() {
    let (_dir, path) = scratch("quads.exo");
    write_quads(&path);

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read().unwrap();

    assert_eq!(file.get_dim(), 2);
    assert_eq!(file.get_num_element_blocks(), 1);
    assert_eq!(file.get_num_node_sets(), 1);
    assert_eq!(file.get_num_side_sets(), 1);
    assert_eq!(file.get_y_coords(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    assert_eq!(file.get_coord_names(), &["x".to_string(), "y".to_string()]);

    let coordinates = file.coordinates().unwrap();
    assert_eq!(coordinates.shape(), &[6, 2]);
    assert_eq!(coordinates[[4, 0]], 1.0);
    assert_eq!(coordinates[[4, 1]], 1.0);

    let block = &file.get_element_blocks()[0];
    assert_eq!(block.get_connectivity(), &[1, 2, 5, 4, 2, 3, 6, 5]);
    let matrix = block.connectivity_matrix().unwrap();
    assert_eq!(matrix.row(1).to_vec(), vec![2, 3, 6, 5]);

    let (counts, nodes) = file.get_side_set_node_list(5).unwrap();
    assert_eq!(counts, vec![2, 2]);
    assert_eq!(nodes, vec![1, 2, 2, 3]);
}

#[test]
fn round_trip_3d() {
    let (_dir, path) = scratch("hex.exo");

    let x = [0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];
    let y = [0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0];
    let z = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("cube", 3, 8, 1, 1, 1, 1).unwrap();
    file.write_coords_xyz(&x, &y, &z).unwrap();
    file.write_custom_coord_names(&["X", "Y", "Z"]).unwrap();
    assert_eq!(file.get_coord_names(), &["X", "Y", "Z"]);
    file.write_block(1, "HEX8", 1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    file.write_node_set(1, &[5, 6, 7, 8]).unwrap();
    file.write_side_set(1, &[1], &[6]).unwrap();
    file.close().unwrap();

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read().unwrap();

    assert_eq!(file.get_x_coords(), &x);
    assert_eq!(file.get_y_coords(), &y);
    assert_eq!(file.get_z_coords(), &z);
    assert_eq!(file.get_coord_names(), &["X", "Y", "Z"]);
    assert_eq!(file.get_element_block(0).unwrap().get_num_nodes_per_element(), 8);
    assert_eq!(file.get_node_sets()[0].get_size(), 4);

    let (counts, nodes) = file.get_side_set_node_list(1).unwrap();
    assert_eq!(counts, vec![4]);
    assert_eq!(nodes, vec![5, 6, 7, 8]);
}

#[test]
fn bar_with_a_nodal_variable() {
    let (_dir, path) = scratch("bar.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("bar", 1, 3, 2, 1, 0, 0).unwrap();
    file.write_coords(&[0.0, 1.0, 2.0]).unwrap();
    file.write_block(1, "BAR2", 2, &[1, 2, 2, 3]).unwrap();
    file.write_nodal_var_names(&["u"]).unwrap();
    file.write_time(1, 0.0).unwrap();
    file.write_nodal_var(1, 1, &[10.0, 11.0, 12.0]).unwrap();
    file.update().unwrap();
    file.close().unwrap();

    let file = File::with_access(&path, FileAccess::Read).unwrap();
    assert_eq!(file.get_dim(), 1);
    assert_eq!(file.get_num_nodes(), 3);
    assert_eq!(file.get_num_elements(), 2);
    assert_eq!(file.get_nodal_variable_names().unwrap(), vec!["u"]);
    assert_eq!(
        file.get_nodal_variable_values(1, 1).unwrap(),
        vec![10.0, 11.0, 12.0]
    );
}

#[test]
fn global_variables_over_time() {
    let (_dir, path) = scratch("globals.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("globals", 1, 1, 0, 0, 0, 0).unwrap();
    file.write_global_var_names(&["energy", "mass"]).unwrap();
    for step in 1..=10 {
        file.write_time(step, f64::from(step) * 0.1).unwrap();
        file.write_global_var(step, 1, f64::from(step)).unwrap();
        file.write_global_var(step, 2, -f64::from(step)).unwrap();
    }
    file.close().unwrap();

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read_times().unwrap();
    assert_eq!(file.get_num_times().unwrap(), 10);
    assert_eq!(file.get_times().len(), 10);
    assert!((file.get_times()[9] - 1.0).abs() < 1e-12);

    assert_eq!(
        file.get_global_variable_names().unwrap(),
        vec!["energy", "mass"]
    );

    let all: Vec<f64> = (1..=10).map(f64::from).collect();
    assert_eq!(file.get_global_variable_values(1, 1, None).unwrap(), all);
    assert_eq!(
        file.get_global_variable_values(1, 1, Some(10)).unwrap(),
        all
    );
    assert_eq!(
        file.get_global_variable_values(1, 4, Some(7)).unwrap(),
        vec![4.0, 5.0, 6.0, 7.0]
    );
    assert_eq!(
        file.get_global_variable_values(2, 10, None).unwrap(),
        vec![-10.0]
    );

    assert_eq!(
        file.get_global_variable_values_at(3).unwrap(),
        vec![3.0, -3.0]
    );

    assert!(matches!(
        file.get_global_variable_values(1, 1, Some(11)),
        Err(Error::Engine(_))
    ));
}

#[test]
fn elemental_and_partial_variables() {
    let (_dir, path) = scratch("partial.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("partial", 1, 4, 3, 2, 0, 0).unwrap();
    file.write_coords(&[0.0, 1.0, 2.0, 3.0]).unwrap();
    file.write_block(1, "BAR2", 2, &[1, 2, 2, 3]).unwrap();
    file.write_block(2, "BAR2", 1, &[3, 4]).unwrap();
    file.write_nodal_var_names(&["t"]).unwrap();
    file.write_elem_var_names(&["stress", "strain"]).unwrap();
    file.write_time(1, 0.5).unwrap();

    for node in 1..=4 {
        file.write_partial_nodal_var(1, 1, 1, node, node as f64 * 100.0)
            .unwrap();
    }
    file.write_elem_var(1, 1, 1, &[1.5, 2.5]).unwrap();
    file.write_partial_elem_var(1, 2, 2, 1, 9.0).unwrap();
    file.close().unwrap();

    let file = File::with_access(&path, FileAccess::Read).unwrap();
    assert_eq!(
        file.get_elemental_variable_names().unwrap(),
        vec!["stress", "strain"]
    );
    assert_eq!(
        file.get_nodal_variable_values(1, 1).unwrap(),
        vec![100.0, 200.0, 300.0, 400.0]
    );
    assert_eq!(
        file.get_elemental_variable_values(1, 1, 1).unwrap(),
        vec![1.5, 2.5]
    );
    assert_eq!(
        file.get_elemental_variable_values(1, 2, 2).unwrap(),
        vec![9.0]
    );
    // never written, reads back as zeros
    assert_eq!(
        file.get_elemental_variable_values(1, 2, 1).unwrap(),
        vec![0.0, 0.0]
    );
}

#[test]
fn side_set_node_list_is_shrunk_to_fit() {
    let (_dir, path) = scratch("mixed.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("mixed", 2, 8, 2, 2, 0, 1).unwrap();
    file.write_coords_xy(&[0.0; 8], &[0.0; 8]).unwrap();
    file.write_block(1, "QUAD4", 1, &[1, 2, 5, 4]).unwrap();
    file.write_block(2, "TRI6", 1, &[2, 3, 5, 6, 7, 8]).unwrap();
    file.write_side_set(4, &[1, 2], &[1, 1]).unwrap();
    file.close().unwrap();

    let file = File::with_access(&path, FileAccess::Read).unwrap();
    let (counts, nodes) = file.get_side_set_node_list(4).unwrap();
    assert_eq!(counts, vec![2, 3]);
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes, vec![1, 2, 2, 3, 6]);
}

#[test]
fn name_maps_keep_unnamed_entities() {
    let (_dir, path) = scratch("names.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("names", 1, 3, 2, 2, 1, 0).unwrap();
    file.write_block(10, "BAR2", 1, &[1, 2]).unwrap();
    file.write_block(20, "BAR2", 1, &[2, 3]).unwrap();
    file.write_node_set(1, &[1]).unwrap();
    file.write_block_names(&["left", ""]).unwrap();
    // an empty list writes nothing
    file.write_node_set_names::<&str>(&[]).unwrap();
    file.close().unwrap();

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    let blocks = file.read_block_names().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[&10], "left");
    assert_eq!(blocks[&20], "");

    let node_sets = file.read_node_set_names().unwrap();
    assert_eq!(node_sets.len(), 1);
    assert_eq!(node_sets[&1], "");

    assert!(file.read_side_set_names().unwrap().is_empty());

    file.read_blocks().unwrap();
    assert_eq!(file.get_element_blocks()[0].get_name(), "left");
    assert_eq!(file.get_element_blocks()[1].get_name(), "");
}

#[test]
fn long_names_are_truncated() {
    let (_dir, path) = scratch("long.exo");
    let long = "n".repeat(exodus::MAX_STR_LENGTH + 8);

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("long", 1, 1, 0, 0, 0, 0).unwrap();
    file.write_nodal_var_names(&[long.as_str()]).unwrap();
    file.close().unwrap();

    let file = File::with_access(&path, FileAccess::Read).unwrap();
    let names = file.get_nodal_variable_names().unwrap();
    assert_eq!(names[0].len(), exodus::MAX_STR_LENGTH);
}

#[test]
fn info_and_element_map() {
    let (_dir, path) = scratch("info.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("info", 1, 3, 2, 1, 0, 0).unwrap();
    file.write_info(&["created by a test", "second line"]).unwrap();
    file.write_block(1, "BAR2", 2, &[1, 2, 2, 3]).unwrap();
    file.write_elem_map(&[2, 1]).unwrap();
    file.close().unwrap();

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read_info().unwrap();
    file.read_elem_map().unwrap();

    let info = file.get_info();
    assert_eq!(info.len(), 2);
    assert_eq!(info[0].len(), exodus::MAX_LINE_LENGTH);
    assert_eq!(info[0].trim_end(), "created by a test");
    assert_eq!(file.get_elem_map(), &[2, 1]);
}

#[test]
fn element_map_defaults_to_identity() {
    let (_dir, path) = scratch("map.exo");
    write_quads(&path);

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read_elem_map().unwrap();
    assert_eq!(file.get_elem_map(), &[1, 2]);
}

#[test]
fn append_another_time_step() {
    let (_dir, path) = scratch("append.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("append", 1, 2, 1, 1, 0, 0).unwrap();
    file.write_coords(&[0.0, 1.0]).unwrap();
    file.write_block(1, "BAR2", 1, &[1, 2]).unwrap();
    file.write_nodal_var_names(&["u"]).unwrap();
    file.write_time(1, 0.0).unwrap();
    file.write_nodal_var(1, 1, &[1.0, 2.0]).unwrap();
    file.close().unwrap();

    let mut file = File::with_access(&path, FileAccess::Append).unwrap();
    assert_eq!(file.state(), State::Ready);
    assert_eq!(file.get_num_nodes(), 2);
    assert_eq!(file.get_num_times().unwrap(), 1);

    // the header already exists
    assert!(matches!(
        file.write_init("again", 1, 2, 1, 1, 0, 0),
        Err(Error::Logic(LogicError::WrongAccess { .. }))
    ));
    // and is not read again through init
    assert!(matches!(
        file.init(),
        Err(Error::Logic(LogicError::WrongAccess {
            required: FileAccess::Read,
            actual: FileAccess::Append,
            ..
        }))
    ));
    assert_eq!(file.state(), State::Ready);

    file.write_time(2, 0.5).unwrap();
    file.write_nodal_var(2, 1, &[3.0, 4.0]).unwrap();
    file.update().unwrap();
    file.close().unwrap();

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read().unwrap();
    assert_eq!(file.get_times(), &[0.0, 0.5]);
    assert_eq!(file.get_nodal_variable_values(2, 1).unwrap(), vec![3.0, 4.0]);
    assert_eq!(file.get_nodal_variable_values(1, 1).unwrap(), vec![1.0, 2.0]);
}

#[test]
fn read_init_on_a_written_file_is_a_logic_error() {
    let (_dir, path) = scratch("write_mode.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    assert_eq!(file.state(), State::Opened);
    assert!(matches!(
        file.init(),
        Err(Error::Logic(LogicError::WrongAccess {
            operation: "init",
            required: FileAccess::Read,
            actual: FileAccess::Write,
        }))
    ));

    // nothing may be written before the header
    assert!(matches!(
        file.write_coords(&[0.0]),
        Err(Error::Logic(LogicError::NotInitialized { .. }))
    ));
}

#[test]
fn write_init_on_a_read_file_is_a_logic_error() {
    let (_dir, path) = scratch("read_mode.exo");
    write_quads(&path);

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    let err = file.write_init("quads", 2, 6, 2, 1, 1, 1).unwrap_err();
    assert!(matches!(
        err,
        Error::Logic(LogicError::WrongAccess {
            required: FileAccess::Write,
            actual: FileAccess::Read,
            ..
        })
    ));

    assert!(matches!(
        file.write_node_set(9, &[1]),
        Err(Error::Logic(LogicError::WrongAccess { .. }))
    ));
}

#[test]
fn opening_twice_is_a_logic_error() {
    let (_dir, path) = scratch("twice.exo");
    write_quads(&path);

    let mut file = File::new();
    file.open(&path).unwrap();
    assert_eq!(file.state(), State::Opened);
    assert!(matches!(
        file.open(&path),
        Err(Error::Logic(LogicError::AlreadyOpened))
    ));

    file.init().unwrap();
    assert_eq!(file.state(), State::Ready);
    file.close().unwrap();
    assert_eq!(file.state(), State::Closed);

    // a closed session can be reused
    file.open(&path).unwrap();
    file.init().unwrap();
    assert_eq!(file.get_num_elements(), 2);
}

#[test]
fn missing_files_are_engine_errors() {
    let (_dir, path) = scratch("does_not_exist.exo");

    match File::with_access(&path, FileAccess::Read) {
        Err(Error::Engine(failure)) => assert_eq!(failure.operation(), "open"),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("opened a file that does not exist"),
    }
}

#[test]
fn block_index_out_of_range() {
    let (_dir, path) = scratch("bounds.exo");
    write_quads(&path);

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read().unwrap();
    assert!(file.get_element_block(0).is_ok());
    assert!(matches!(
        file.get_element_block(1),
        Err(Error::OutOfRange(_))
    ));

    let block = file.get_element_block(0).unwrap();
    assert!(matches!(
        block.get_element_connectivity(2),
        Err(Error::OutOfRange(_))
    ));
    assert!(matches!(
        file.get_node_sets()[0].get_node_id(2),
        Err(Error::OutOfRange(_))
    ));
    assert!(matches!(
        file.get_side_sets()[0].get_side_id(2),
        Err(Error::OutOfRange(_))
    ));
}

#[test]
fn engine_rejections_name_the_call() {
    let (_dir, path) = scratch("reject.exo");

    let mut file = File::with_access(&path, FileAccess::Write).unwrap();
    file.write_init("reject", 1, 2, 1, 1, 0, 0).unwrap();

    // two coordinates are declared
    match file.write_coords(&[0.0, 1.0, 2.0]) {
        Err(Error::Engine(failure)) => assert_eq!(failure.operation(), "put_coord"),
        other => panic!("unexpected result {other:?}"),
    }

    // values for undeclared variables
    match file.write_nodal_var(1, 1, &[0.0, 1.0]) {
        Err(Error::Engine(failure)) => assert_eq!(failure.operation(), "put_var"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn reading_repeatedly_replaces_the_snapshot() {
    let (_dir, path) = scratch("repeat.exo");
    write_quads(&path);

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read().unwrap();
    file.read().unwrap();

    assert_eq!(file.get_element_blocks().len(), 1);
    assert_eq!(file.get_node_sets().len(), 1);
    assert_eq!(file.get_side_sets().len(), 1);
}
