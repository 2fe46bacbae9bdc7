//! C# source rendering for a finished schema.
//!
//! Rendering never touches the filesystem: both artifacts are produced as
//! complete strings so the caller can write all of them or none.

use std::fmt;

use crate::schema::{ColumnDescriptor, Schema};

const ARTIFACT_EXTENSION: &str = "cs";

/// Where the index and name decorations go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// CsvHelper attributes on each property.
    #[default]
    InlineDecorated,
    /// A separate `ClassMap<T>` carrying the index and name facts.
    MappingBased,
}

#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub namespace: String,
    pub class_name: String,
    pub display_attribute: bool,
    pub index_attribute: bool,
    pub name_attribute: bool,
    pub mode: RenderMode,
}

impl EmitOptions {
    fn wants_column_metadata(&self) -> bool {
        self.index_attribute || self.name_attribute
    }

    fn inline_metadata(&self) -> bool {
        self.mode == RenderMode::InlineDecorated && self.wants_column_metadata()
    }

    fn produces_map(&self) -> bool {
        self.mode == RenderMode::MappingBased && self.wants_column_metadata()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub class: Artifact,
    pub map: Option<Artifact>,
}

impl Artifacts {
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        std::iter::once(&self.class).chain(self.map.as_ref())
    }
}

pub fn render(schema: &Schema, options: &EmitOptions) -> Artifacts {
    let mut columns: Vec<&ColumnDescriptor> = schema.columns.iter().collect();
    columns.sort_by_key(|c| c.index);

    let class = Artifact {
        file_name: format!("{}.{ARTIFACT_EXTENSION}", options.class_name),
        contents: ClassSource {
            columns: &columns,
            options,
        }
        .to_string(),
    };
    let map = options.produces_map().then(|| Artifact {
        file_name: format!("{}Map.{ARTIFACT_EXTENSION}", options.class_name),
        contents: MapSource {
            columns: &columns,
            options,
        }
        .to_string(),
    });
    Artifacts { class, map }
}

struct ClassSource<'a> {
    columns: &'a [&'a ColumnDescriptor],
    options: &'a EmitOptions,
}

impl fmt::Display for ClassSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.options;
        writeln!(f, "using System;")?;
        if options.display_attribute {
            writeln!(f, "using System.ComponentModel.DataAnnotations;")?;
        }
        if options.inline_metadata() {
            writeln!(f, "using CsvHelper.Configuration.Attributes;")?;
        }
        writeln!(f, "namespace {}", options.namespace)?;
        writeln!(f, "{{")?;
        writeln!(f, "    class {}", options.class_name)?;
        writeln!(f, "    {{")?;
        for column in self.columns {
            if options.display_attribute {
                writeln!(
                    f,
                    "        [Display(Name = \"{}\")]",
                    escape_literal(&column.display_name)
                )?;
            }
            if options.mode == RenderMode::InlineDecorated {
                if options.index_attribute {
                    writeln!(f, "        [Index({})]", column.index)?;
                }
                if options.name_attribute {
                    writeln!(f, "        [Name(\"{}\")]", escape_literal(&column.display_name))?;
                    if let Some(name_index) = column.name_index {
                        writeln!(f, "        [NameIndex({name_index})]")?;
                    }
                }
            }
            writeln!(
                f,
                "        public {} {} {{ get; set; }}",
                column.property_type, column.property_name
            )?;
        }
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}

struct MapSource<'a> {
    columns: &'a [&'a ColumnDescriptor],
    options: &'a EmitOptions,
}

impl fmt::Display for MapSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.options;
        let class_name = &options.class_name;
        writeln!(f, "using System;")?;
        writeln!(f, "using CsvHelper.Configuration;")?;
        writeln!(f, "namespace {}", options.namespace)?;
        writeln!(f, "{{")?;
        writeln!(f, "    class {class_name}Map : ClassMap<{class_name}>")?;
        writeln!(f, "    {{")?;
        writeln!(f, "        public {class_name}Map()")?;
        writeln!(f, "        {{")?;
        for column in self.columns {
            write!(f, "            Map(m => m.{})", column.property_name)?;
            if options.index_attribute {
                write!(f, ".Index({})", column.index)?;
            }
            if options.name_attribute {
                write!(f, ".Name(\"{}\")", escape_literal(&column.display_name))?;
                if let Some(name_index) = column.name_index {
                    write!(f, ".NameIndex({name_index})")?;
                }
            }
            writeln!(f, ";")?;
        }
        writeln!(f, "        }}")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}

/// Escapes text for a regular C# string literal.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PropertyKind, PropertyType};

    fn sample_schema() -> Schema {
        Schema {
            columns: vec![
                ColumnDescriptor {
                    display_name: "Order ID".into(),
                    index: 0,
                    property_name: "OrderID".into(),
                    property_type: PropertyType::new(PropertyKind::Int, false),
                    name_index: None,
                },
                ColumnDescriptor {
                    display_name: "A".into(),
                    index: 1,
                    property_name: "A".into(),
                    property_type: PropertyType::new(PropertyKind::Double, true),
                    name_index: Some(0),
                },
                ColumnDescriptor {
                    display_name: "A".into(),
                    index: 2,
                    property_name: "A_2".into(),
                    property_type: PropertyType::new(PropertyKind::String, true),
                    name_index: Some(1),
                },
            ],
        }
    }

    fn options(mode: RenderMode) -> EmitOptions {
        EmitOptions {
            namespace: "Demo".into(),
            class_name: "Orders".into(),
            display_attribute: false,
            index_attribute: false,
            name_attribute: false,
            mode,
        }
    }

    #[test]
    fn plain_class_has_one_property_per_line() {
        let artifacts = render(&sample_schema(), &options(RenderMode::InlineDecorated));
        let expected = "\
using System;
namespace Demo
{
    class Orders
    {
        public int OrderID { get; set; }
        public double? A { get; set; }
        public string A_2 { get; set; }
    }
}
";
        assert_eq!(artifacts.class.file_name, "Orders.cs");
        assert_eq!(artifacts.class.contents, expected);
        assert!(artifacts.map.is_none());
    }

    #[test]
    fn inline_decorations_follow_label_index_name_order() {
        let mut opts = options(RenderMode::InlineDecorated);
        opts.display_attribute = true;
        opts.index_attribute = true;
        opts.name_attribute = true;
        let artifacts = render(&sample_schema(), &opts);
        let expected = "\
using System;
using System.ComponentModel.DataAnnotations;
using CsvHelper.Configuration.Attributes;
namespace Demo
{
    class Orders
    {
        [Display(Name = \"Order ID\")]
        [Index(0)]
        [Name(\"Order ID\")]
        public int OrderID { get; set; }
        [Display(Name = \"A\")]
        [Index(1)]
        [Name(\"A\")]
        [NameIndex(0)]
        public double? A { get; set; }
        [Display(Name = \"A\")]
        [Index(2)]
        [Name(\"A\")]
        [NameIndex(1)]
        public string A_2 { get; set; }
    }
}
";
        assert_eq!(artifacts.class.contents, expected);
        assert!(artifacts.map.is_none());
    }

    #[test]
    fn mapping_mode_moves_index_and_name_into_a_class_map() {
        let mut opts = options(RenderMode::MappingBased);
        opts.display_attribute = true;
        opts.index_attribute = true;
        opts.name_attribute = true;
        let artifacts = render(&sample_schema(), &opts);

        assert!(!artifacts.class.contents.contains("[Index("));
        assert!(!artifacts.class.contents.contains("CsvHelper"));
        assert!(artifacts.class.contents.contains("[Display(Name = \"A\")]"));

        let map = artifacts.map.expect("map artifact");
        let expected = "\
using System;
using CsvHelper.Configuration;
namespace Demo
{
    class OrdersMap : ClassMap<Orders>
    {
        public OrdersMap()
        {
            Map(m => m.OrderID).Index(0).Name(\"Order ID\");
            Map(m => m.A).Index(1).Name(\"A\").NameIndex(0);
            Map(m => m.A_2).Index(2).Name(\"A\").NameIndex(1);
        }
    }
}
";
        assert_eq!(map.file_name, "OrdersMap.cs");
        assert_eq!(map.contents, expected);
    }

    #[test]
    fn mapping_mode_without_index_or_name_skips_the_map() {
        let mut opts = options(RenderMode::MappingBased);
        opts.display_attribute = true;
        let artifacts = render(&sample_schema(), &opts);
        assert!(artifacts.map.is_none());
        assert_eq!(artifacts.iter().count(), 1);
    }

    #[test]
    fn columns_render_in_index_order() {
        let mut schema = sample_schema();
        schema.columns.reverse();
        let artifacts = render(&schema, &options(RenderMode::InlineDecorated));
        let first = artifacts.class.contents.find("OrderID").unwrap();
        let last = artifacts.class.contents.find("A_2").unwrap();
        assert!(first < last);
    }

    #[test]
    fn literals_are_escaped() {
        assert_eq!(escape_literal(r#"say "hi"\now"#), r#"say \"hi\"\\now"#);
        assert_eq!(escape_literal("tab\there"), "tab\\there");
        assert_eq!(escape_literal("bell\u{7}"), "bell\\u0007");
    }
}
