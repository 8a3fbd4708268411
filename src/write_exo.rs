//! Serializing a store database into its xml document

use crate::array::{self, Numeric};
use crate::engine::VarDomain;
use crate::store::model::{Block, Model, Set, Step};
use crate::store::{Encoding, Options};

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

type XmlResult = Result<(), quick_xml::Error>;

/// Write a whole database to `writer`
pub(crate) fn write_model<W: Write>(writer: W, model: &Model, options: &Options) -> XmlResult {
    let mut writer = match options.get_indent() {
        Some(indent) => Writer::new_with_indent(writer, b' ', indent),
        None => Writer::new(writer),
    };
    let encoding = options.get_encoding();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let version = model.version.to_string();
    let word_size = model.word_size.to_string();
    start(
        &mut writer,
        "ExodusFile",
        &[("version", version.as_str()), ("word_size", word_size.as_str())],
    )?;

    if let Some(header) = &model.header {
        let counts = [
            header.num_dim,
            header.num_nodes,
            header.num_elems,
            header.num_elem_blks,
            header.num_node_sets,
            header.num_side_sets,
        ]
        .map(|count| count.to_string());

        empty(
            &mut writer,
            "Header",
            &[
                ("title", header.title.as_str()),
                ("num_dim", counts[0].as_str()),
                ("num_nodes", counts[1].as_str()),
                ("num_elems", counts[2].as_str()),
                ("num_elem_blks", counts[3].as_str()),
                ("num_node_sets", counts[4].as_str()),
                ("num_side_sets", counts[5].as_str()),
            ],
        )?;
    }

    write_name_list(&mut writer, "Info", "Line", &[], &model.info)?;

    if !model.coords.is_empty() {
        start(&mut writer, "Coordinates", &[])?;
        for (axis, values) in ["x", "y", "z"].iter().zip(&model.coords) {
            write_dataarray(&mut writer, axis, &[], values, encoding)?;
        }
        end(&mut writer, "Coordinates")?;
    }

    write_name_list(
        &mut writer,
        "CoordinateNames",
        "Name",
        &[],
        &model.coord_names,
    )?;

    if let Some(map) = &model.elem_map {
        start(&mut writer, "ElementMap", &[])?;
        write_dataarray(&mut writer, "map", &[], map, encoding)?;
        end(&mut writer, "ElementMap")?;
    }

    for block in &model.blocks {
        write_block(&mut writer, block, encoding)?;
    }
    for set in &model.node_sets {
        write_set(&mut writer, "NodeSet", set, encoding)?;
    }
    for set in &model.side_sets {
        write_set(&mut writer, "SideSet", set, encoding)?;
    }

    for (kind, names) in &model.names {
        write_name_list(&mut writer, "Names", "Name", &[("kind", kind.tag())], names)?;
    }
    for (domain, names) in &model.variables {
        write_name_list(
            &mut writer,
            "Variables",
            "Name",
            &[("domain", domain.tag())],
            names,
        )?;
    }

    for (idx, (time, step)) in model.times.iter().zip(&model.steps).enumerate() {
        write_step(&mut writer, idx + 1, *time, step, encoding)?;
    }

    end(&mut writer, "ExodusFile")
}

fn write_block<W: Write>(writer: &mut Writer<W>, block: &Block, encoding: Encoding) -> XmlResult {
    let id = block.id.to_string();
    let num_elems = block.num_elems.to_string();
    let nodes_per_elem = block.nodes_per_elem.to_string();
    let num_attrs = block.num_attrs.to_string();

    start(
        writer,
        "ElementBlock",
        &[
            ("id", id.as_str()),
            ("elem_type", block.elem_type.as_str()),
            ("num_elems", num_elems.as_str()),
            ("nodes_per_elem", nodes_per_elem.as_str()),
            ("num_attrs", num_attrs.as_str()),
        ],
    )?;
    write_dataarray(writer, "connect", &[], &block.connect, encoding)?;
    end(writer, "ElementBlock")
}

fn write_set<W: Write>(
    writer: &mut Writer<W>,
    element: &str,
    set: &Set,
    encoding: Encoding,
) -> XmlResult {
    let id = set.id.to_string();
    let num_dist_factors = set.num_dist_factors.to_string();

    start(
        writer,
        element,
        &[("id", id.as_str()), ("num_dist_factors", num_dist_factors.as_str())],
    )?;
    write_dataarray(writer, "entries", &[], &set.entries, encoding)?;
    if element == "SideSet" {
        write_dataarray(writer, "sides", &[], &set.sides, encoding)?;
    }
    end(writer, element)
}

fn write_step<W: Write>(
    writer: &mut Writer<W>,
    step_number: usize,
    time: f64,
    step: &Step,
    encoding: Encoding,
) -> XmlResult {
    let step_number = step_number.to_string();
    let mut time_buffer = ryu::Buffer::new();
    let time = time_buffer.format(time);

    start(writer, "TimeStep", &[("step", step_number.as_str()), ("time", time)])?;

    for (var_index, values) in &step.nodal {
        let var = var_index.to_string();
        write_dataarray(
            writer,
            VarDomain::Nodal.tag(),
            &[("var", var.as_str())],
            values,
            encoding,
        )?;
    }
    for ((var_index, block_id), values) in &step.elemental {
        let var = var_index.to_string();
        let block = block_id.to_string();
        write_dataarray(
            writer,
            VarDomain::ElementBlock.tag(),
            &[("var", var.as_str()), ("block", block.as_str())],
            values,
            encoding,
        )?;
    }
    if !step.global.is_empty() {
        write_dataarray(writer, VarDomain::Global.tag(), &[], &step.global, encoding)?;
    }

    end(writer, "TimeStep")
}

/// a container element holding one `<item value=".."/>` per string
fn write_name_list<W: Write>(
    writer: &mut Writer<W>,
    element: &str,
    item: &str,
    attributes: &[(&str, &str)],
    names: &[String],
) -> XmlResult {
    if names.is_empty() {
        return Ok(());
    }

    start(writer, element, attributes)?;
    for name in names {
        empty(writer, item, &[("value", name.as_str())])?;
    }
    end(writer, element)
}

/// write a single (inline) array of data to the document
fn write_dataarray<W: Write, T: Numeric>(
    writer: &mut Writer<W>,
    name: &str,
    extra_attributes: &[(&str, &str)],
    values: &[T],
    encoding: Encoding,
) -> XmlResult {
    let tuples = values.len().to_string();

    let mut array_start = BytesStart::new("DataArray");
    array_start.push_attribute(("Name", name));
    array_start.push_attribute(("type", T::TYPE_NAME));
    array_start.push_attribute(("format", encoding.to_str()));
    array_start.push_attribute(("NumberOfTuples", tuples.as_str()));
    for attribute in extra_attributes {
        array_start.push_attribute(*attribute);
    }

    if values.is_empty() {
        return writer.write_event(Event::Empty(array_start));
    }

    let data = array::encode(values, encoding);
    writer.write_event(Event::Start(array_start))?;
    writer.write_event(Event::Text(BytesText::new(&data)))?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))
}

fn start<W: Write>(writer: &mut Writer<W>, name: &str, attributes: &[(&str, &str)]) -> XmlResult {
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    writer.write_event(Event::Start(element))
}

fn empty<W: Write>(writer: &mut Writer<W>, name: &str, attributes: &[(&str, &str)]) -> XmlResult {
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    writer.write_event(Event::Empty(element))
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> XmlResult {
    writer.write_event(Event::End(BytesEnd::new(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Header;

    fn written(model: &Model, options: &Options) -> String {
        let mut output = Vec::new();
        write_model(&mut output, model, options).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn empty_database_is_a_bare_root() {
        let text = written(&Model::default(), &Options::default().indent(None));
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(text.contains(r#"<ExodusFile version="8.11" word_size="8">"#));
        assert!(!text.contains("<Header"));
    }

    #[test]
    fn ascii_arrays_are_inline_text() {
        let mut model = Model::default();
        model.set_header(Header::new("bar".into(), 1, 3, 2, 1, 0, 0));
        model.coords[0] = vec![0.0, 1.0, 2.0];

        let options = Options::default().encoding(Encoding::Ascii).indent(None);
        let text = written(&model, &options);

        assert!(text.contains(r#"<Header title="bar" num_dim="1" num_nodes="3""#));
        assert!(text.contains(
            r#"<DataArray Name="x" type="Float64" format="ascii" NumberOfTuples="3">0.0 1.0 2.0</DataArray>"#
        ));
        assert!(text.contains(r#"<CoordinateNames><Name value=""/></CoordinateNames>"#));
    }

    #[test]
    fn names_are_escaped() {
        let mut model = Model::default();
        model.set_header(Header::new("a < b".into(), 1, 0, 0, 0, 0, 0));

        let text = written(&model, &Options::default());
        assert!(text.contains(r#"title="a &lt; b""#));
    }
}
