//! Reading and writing the three variable directories (nodal, element block, global)

use crate::engine::{NameBuffer, MAX_STR_LENGTH};
use crate::prelude::*;

pub(crate) fn read_variable_names<D: Database>(
    db: &D,
    domain: VarDomain,
) -> Result<Vec<String>, Error> {
    let count = db.get_variable_param(domain).check("get_variable_param")?;
    let count = utils::len_of(count);
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut buffers: Vec<NameBuffer> = vec![[0; MAX_STR_LENGTH + 1]; count];
    db.get_variable_names(domain, &mut buffers)
        .check("get_variable_names")?;

    Ok(buffers.iter().map(|buffer| utils::trim_name(buffer)).collect())
}

/// declare the variables of `domain`; an empty list declares nothing
pub(crate) fn write_variable_names<D: Database, S: AsRef<str>>(
    db: &mut D,
    domain: VarDomain,
    names: &[S],
) -> Result<(), Error> {
    if names.is_empty() {
        return Ok(());
    }

    let count = i32::try_from(names.len()).map_err(|_| {
        crate::error::invalid_argument("write_variable_names", "too many variable names")
    })?;
    db.put_variable_param(domain, count)
        .check("put_variable_param")?;

    let names: Vec<&str> = names
        .iter()
        .map(|name| utils::truncate_name(name.as_ref()))
        .collect();
    db.put_variable_names(domain, &names)
        .check("put_variable_names")?;

    debug!(%domain, count, "declared variables");
    Ok(())
}

/// `len` values of one variable at one step
pub(crate) fn read_values<D: Database>(
    db: &D,
    step: i32,
    domain: VarDomain,
    var_index: i32,
    obj_id: i64,
    len: usize,
) -> Result<Vec<f64>, Error> {
    let mut values = vec![0.0; len];
    db.get_var(step, domain, var_index, obj_id, &mut values)
        .check("get_var")?;
    Ok(values)
}

/// one entry of a variable over the inclusive step range `begin..=end`
pub(crate) fn read_values_over_time<D: Database>(
    db: &D,
    domain: VarDomain,
    var_index: i32,
    entry: i64,
    begin: i32,
    end: i32,
) -> Result<Vec<f64>, Error> {
    if end < begin {
        return Err(crate::error::invalid_argument(
            "get_var_time",
            format!("end step {end} precedes begin step {begin}"),
        ));
    }

    let mut values = vec![0.0; utils::len_of(end - begin + 1)];
    db.get_var_time(domain, var_index, entry, begin, end, &mut values)
        .check("get_var_time")?;
    Ok(values)
}
