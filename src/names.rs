//! Pairing entity IDs with their optional names

use crate::engine::{NameBuffer, MAX_STR_LENGTH};
use crate::prelude::*;

/// IDs of the `count` entities of `kind`, in definition order
pub(crate) fn read_ids<D: Database>(
    db: &D,
    kind: EntityKind,
    count: usize,
) -> Result<Vec<i64>, Error> {
    let mut ids = vec![0; count];
    if count > 0 {
        db.get_ids(kind, &mut ids).check("get_ids")?;
    }
    Ok(ids)
}

/// name of a single entity, the empty string when none was assigned
pub(crate) fn read_name<D: Database>(db: &D, kind: EntityKind, id: i64) -> Result<String, Error> {
    let mut buffer: NameBuffer = [0; MAX_STR_LENGTH + 1];
    db.get_name(kind, id, &mut buffer).check("get_name")?;
    Ok(utils::trim_name(&buffer))
}

/// map every ID of `kind` to its name. Unnamed entities map to `""` and are never omitted.
pub(crate) fn read_name_map<D: Database>(
    db: &D,
    kind: EntityKind,
    count: usize,
) -> Result<BTreeMap<i64, String>, Error> {
    let mut map = BTreeMap::new();
    for id in read_ids(db, kind, count)? {
        let name = read_name(db, kind, id)?;
        map.insert(id, name);
    }
    Ok(map)
}

/// assign names to the entities of `kind` in definition order
pub(crate) fn write_names<D: Database, S: AsRef<str>>(
    db: &mut D,
    kind: EntityKind,
    names: &[S],
) -> Result<(), Error> {
    if names.is_empty() {
        return Ok(());
    }

    let names: Vec<&str> = names
        .iter()
        .map(|name| utils::truncate_name(name.as_ref()))
        .collect();
    trace!(%kind, count = names.len(), "writing names");
    db.put_names(kind, &names).check("put_names")
}
