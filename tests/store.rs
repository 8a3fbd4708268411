use exodus::engine::{BlockParams, EntityKind, SetParams, VarDomain};
use exodus::store::StoreError;
use exodus::{Database, Encoding, Error, File, FileAccess, Header, Options, Store};

use std::error::Error as _;
use std::path::Path;

fn write_bar<D: Database>(path: &Path, options: D::Options) {
    let mut file = File::<D>::with_access_and_options(path, FileAccess::Write, options).unwrap();
    file.write_init("bar", 1, 3, 2, 1, 0, 0).unwrap();
    file.write_coords(&[0.0, 0.5, 1.0]).unwrap();
    file.write_block(1, "BAR2", 2, &[1, 2, 2, 3]).unwrap();
    file.write_nodal_var_names(&["u"]).unwrap();
    file.write_time(1, 0.25).unwrap();
    file.write_nodal_var(1, 1, &[10.0, 11.0, 12.0]).unwrap();
    file.close().unwrap();
}

#[test]
fn ascii_documents_are_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bar.exo");

    let options = Options::new().encoding(Encoding::Ascii).indent(None);
    write_bar::<Store>(&path, options);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#"<ExodusFile version="8.11" word_size="8">"#));
    assert!(text.contains(
        r#"<DataArray Name="x" type="Float64" format="ascii" NumberOfTuples="3">0.0 0.5 1.0</DataArray>"#
    ));
    assert!(text.contains(
        r#"<DataArray Name="connect" type="Int32" format="ascii" NumberOfTuples="4">1 2 2 3</DataArray>"#
    ));
    assert!(text.contains(r#"<TimeStep step="1" time="0.25">"#));

    // the encoding of a document does not matter to its reader
    let file = File::with_access(&path, FileAccess::Read).unwrap();
    assert_eq!(
        file.get_nodal_variable_values(1, 1).unwrap(),
        vec![10.0, 11.0, 12.0]
    );
}

#[test]
fn binary_documents_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bar.exo");
    write_bar::<Store>(&path, Options::default());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(r#"format="binary""#));

    let mut file = File::with_access(&path, FileAccess::Read).unwrap();
    file.read().unwrap();
    assert_eq!(file.get_x_coords(), &[0.0, 0.5, 1.0]);
    assert_eq!(file.get_times(), &[0.25]);
    assert_eq!(file.get_version(), 8.11);
    assert_eq!(file.get_word_sizes(), (8, 8));
}

#[test]
fn corrupt_documents_fail_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.exo");
    std::fs::write(
        &path,
        r#"<ExodusFile version="8.11" word_size="8"><Header title="x" num_dim="1"/></ExodusFile>"#,
    )
    .unwrap();

    match File::with_access(&path, FileAccess::Read) {
        Err(Error::Engine(failure)) => {
            assert_eq!(failure.operation(), "open");
            let source = failure.source().unwrap();
            assert!(matches!(
                source.downcast_ref::<StoreError>(),
                Some(StoreError::Parse(_))
            ));
            assert!(failure.to_string().contains("num_nodes"));
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("opened a corrupt document"),
    }
}

#[test]
fn read_only_stores_reject_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bar.exo");
    write_bar::<Store>(&path, Options::default());

    let mut store = Store::open(&path, FileAccess::Read, &Options::default()).unwrap();
    assert_eq!(store.path(), path.as_path());
    assert!(matches!(
        store.put_time(2, 1.0),
        Err(StoreError::ReadOnly)
    ));
    assert!(matches!(
        Store::open(&path, FileAccess::Write, &Options::default()),
        Err(StoreError::UnsupportedAccess(FileAccess::Write))
    ));
    store.close().unwrap();
}

#[test]
fn engine_calls_follow_the_format_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.exo");

    let mut store = Store::create(&path, &Options::default()).unwrap();
    assert!(matches!(
        store.put_coord(Some(&[0.0][..]), None, None),
        Err(StoreError::NoHeader)
    ));

    store
        .put_init(&Header::new("engine".into(), 2, 4, 1, 1, 1, 0))
        .unwrap();
    store
        .put_block(1, &BlockParams::new("QUAD4".into(), 1, 4, 0))
        .unwrap();
    assert!(matches!(
        store.put_conn(1, &[1, 2, 3]),
        Err(StoreError::LengthMismatch { .. })
    ));
    store.put_conn(1, &[1, 2, 3, 4]).unwrap();

    assert!(matches!(
        store.put_set_param(EntityKind::ElementBlock, 1, SetParams::new(1, 0)),
        Err(StoreError::NotASet(EntityKind::ElementBlock))
    ));
    store
        .put_set_param(EntityKind::NodeSet, 3, SetParams::new(2, 0))
        .unwrap();
    store
        .put_set(EntityKind::NodeSet, 3, &[1, 4], None)
        .unwrap();

    store.put_variable_param(VarDomain::Nodal, 1).unwrap();
    assert!(matches!(
        store.put_variable_param(VarDomain::Nodal, 1),
        Err(StoreError::VariablesDeclared(VarDomain::Nodal))
    ));
    assert!(matches!(
        store.put_var(1, VarDomain::Nodal, 2, 1, &[0.0; 4]),
        Err(StoreError::VarIndex { index: 2, count: 1, .. })
    ));
    store.put_var(2, VarDomain::Nodal, 1, 1, &[1.0; 4]).unwrap();
    assert_eq!(store.inquire_num_times().unwrap(), 2);

    store.update().unwrap();
    store.close().unwrap();

    let store = Store::open(&path, FileAccess::Read, &Options::default()).unwrap();
    let mut ids = [0; 1];
    store.get_ids(EntityKind::NodeSet, &mut ids).unwrap();
    assert_eq!(ids, [3]);

    let mut values = [0.0; 4];
    store
        .get_var(2, VarDomain::Nodal, 1, 1, &mut values)
        .unwrap();
    assert_eq!(values, [1.0; 4]);
}
