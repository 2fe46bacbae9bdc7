//! End-to-end generation: read the input, infer the schema, write artifacts.

use std::{env, io::Read};

use anyhow::{Context, Result};
use log::info;

use crate::{
    classify::TypeClassifier,
    cli::Cli,
    config::GenerationConfig,
    emit::{self, Artifacts},
    io_utils,
    printable_delimiter,
    schema::{Schema, SchemaBuilder},
};

pub fn execute(cli: &Cli) -> Result<()> {
    let working_dir = env::current_dir().context("Resolving the current directory")?;
    let config = GenerationConfig::resolve(cli, &working_dir)
        .context("Resolving generation options")?;
    info!(
        "Reading '{}' with separator '{}' and culture '{}'",
        config.input.display(),
        printable_delimiter(config.delimiter),
        config.culture
    );

    let reader = io_utils::open_input(&config.input)?;
    let (schema, artifacts) = infer_and_render(&config, reader)
        .with_context(|| format!("Inferring schema from {:?}", config.input))?;

    let export = match &config.schema_out {
        Some(path) => Some((
            path.clone(),
            schema
                .render_export(path)
                .with_context(|| format!("Serializing schema for {path:?}"))?,
        )),
        None => None,
    };

    let mut files = io_utils::artifact_files(&config.output_dir, &artifacts);
    if let Some((path, contents)) = &export {
        files.push((path.clone(), contents.as_str()));
    }

    let written = io_utils::commit_files(&files)
        .with_context(|| format!("Writing artifacts to {:?}", config.output_dir))?;
    for path in &written {
        info!("Wrote {path:?}");
    }
    if export.is_some() {
        info!("Inferred schema covers {} column(s)", schema.columns.len());
    }
    Ok(())
}

/// Runs inference and rendering over an already opened input.
pub fn infer_and_render<R: Read>(
    config: &GenerationConfig,
    reader: R,
) -> crate::error::Result<(Schema, Artifacts)> {
    let mut csv_reader = io_utils::open_csv_reader(reader, config.delimiter);
    let table = io_utils::read_table(&mut csv_reader, config.has_header, config.encoding)?;

    let classifier = TypeClassifier::new(config.culture.clone())
        .with_date_only_types(config.allow_date_only_types);
    let schema = SchemaBuilder::new(classifier).build(table.headers, &table.rows)?;
    info!(
        "Inferred {} column(s) from {} row(s)",
        schema.columns.len(),
        table.rows.len()
    );

    let artifacts = emit::render(&schema, &config.emit);
    Ok((schema, artifacts))
}
