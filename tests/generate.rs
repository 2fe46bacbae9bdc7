use clap::Parser;
use csv2class::{
    cli::Cli,
    config::GenerationConfig,
    generate::infer_and_render,
    schema::{PropertyKind, PropertyType},
    Error,
};
use tempfile::tempdir;

fn config(args: &[&str]) -> GenerationConfig {
    let mut full = vec!["csv2class", "-p", "Demo"];
    full.extend_from_slice(args);
    let cli = Cli::try_parse_from(full).expect("parse cli");
    let dir = tempdir().expect("temp dir");
    GenerationConfig::resolve(&cli, dir.path()).expect("resolve config")
}

#[test]
fn infers_types_and_names_from_an_in_memory_reader() {
    let config = config(&["-i", "events.csv", "-h", "-x"]);
    let input = "\
id,big,ratio,when,elapsed,flag,label
1,3000000000,0.5,2024-02-29T12:00:00Z,1.00:00:00,false,a
2,1,1e3,2024-03-01,00:30:00,TRUE,
";
    let (schema, artifacts) = infer_and_render(&config, input.as_bytes()).expect("generate");

    let kinds: Vec<PropertyKind> = schema
        .columns
        .iter()
        .map(|c| c.property_type.kind)
        .collect();
    assert_eq!(
        kinds,
        [
            PropertyKind::Int,
            PropertyKind::Long,
            PropertyKind::Double,
            PropertyKind::DateTime,
            PropertyKind::TimeSpan,
            PropertyKind::Bool,
            PropertyKind::String,
        ]
    );
    assert_eq!(
        schema.column("Label").map(|c| c.property_type),
        Some(PropertyType::new(PropertyKind::String, true))
    );
    assert_eq!(artifacts.class.file_name, "Events.cs");
    assert!(artifacts.class.contents.contains("        [Index(4)]\n        public TimeSpan Elapsed { get; set; }\n"));
}

#[test]
fn quoted_fields_are_classified_by_their_content() {
    let config = config(&["-i", "quoted.csv", "-h"]);
    let input = "\"amount\",\"code\"\n\"12\",\"007\"\n\"\",\"A1\"\n";
    let (schema, _) = infer_and_render(&config, input.as_bytes()).expect("generate");
    assert_eq!(
        schema.columns[0].property_type,
        PropertyType::new(PropertyKind::Int, true)
    );
    assert_eq!(schema.columns[1].property_type.kind, PropertyKind::String);
}

#[test]
fn empty_input_without_header_is_a_schema_error() {
    let config = config(&["-i", "empty.csv"]);
    let err = infer_and_render(&config, "".as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[test]
fn header_only_input_produces_nullable_strings() {
    let config = config(&["-i", "empty.csv", "-h"]);
    let (schema, artifacts) = infer_and_render(&config, "a,b\n".as_bytes()).expect("generate");
    assert_eq!(schema.columns.len(), 2);
    assert!(artifacts.class.contents.contains("public string A { get; set; }"));
}
