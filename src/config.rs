//! Resolution of command-line options into a complete generation config.
//!
//! Everything that can fail for configuration reasons (namespace discovery,
//! unknown culture or encoding, missing class name) fails here, before any
//! input is read.

use std::{
    fs,
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use log::debug;

use crate::{
    cli::Cli,
    culture::Culture,
    emit::{EmitOptions, RenderMode},
    error::{Error, Result},
    io_utils, sanitize,
};

const PROJECT_EXTENSION: &str = "csproj";

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub input: PathBuf,
    pub delimiter: u8,
    pub has_header: bool,
    pub output_dir: PathBuf,
    pub culture: Culture,
    pub encoding: &'static Encoding,
    pub allow_date_only_types: bool,
    pub schema_out: Option<PathBuf>,
    pub emit: EmitOptions,
}

impl GenerationConfig {
    /// Resolves defaults relative to `working_dir`.
    pub fn resolve(cli: &Cli, working_dir: &Path) -> Result<Self> {
        let namespace = match cli.namespace.as_deref().map(str::trim) {
            Some(explicit) if !explicit.is_empty() => explicit.to_string(),
            _ => discover_namespace(working_dir)?,
        };
        let culture = Culture::from_code(cli.culture.as_deref())?;
        let encoding = io_utils::resolve_encoding(cli.input_encoding.as_deref())?;
        let delimiter = resolve_delimiter(&cli.input, cli.separator, &culture)?;

        let output_dir = match &cli.output_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => working_dir.join(dir),
            None => working_dir.to_path_buf(),
        };

        let class_name = match &cli.class_name {
            Some(name) => name.clone(),
            None => default_class_name(&cli.input)?,
        };

        let mode = if cli.map {
            RenderMode::MappingBased
        } else {
            RenderMode::InlineDecorated
        };

        debug!(
            "Resolved namespace '{namespace}', class '{class_name}', culture '{culture}', output {output_dir:?}"
        );

        Ok(Self {
            input: cli.input.clone(),
            delimiter,
            has_header: cli.header,
            output_dir,
            culture,
            encoding,
            allow_date_only_types: cli.date_only_types,
            schema_out: cli.schema_out.clone(),
            emit: EmitOptions {
                namespace,
                class_name,
                display_attribute: cli.display_attribute,
                index_attribute: cli.index_attribute,
                name_attribute: cli.name_attribute,
                mode,
            },
        })
    }
}

/// Derives a namespace from the first `.csproj` file in `dir`.
pub fn discover_namespace(dir: &Path) -> Result<String> {
    let mut projects: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION))
        })
        .collect();
    projects.sort();

    let stem = projects
        .first()
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| {
            Error::Configuration(format!(
                "Could not find a project in {dir:?}. Run again specifying the namespace."
            ))
        })?;
    Ok(stem.replace(' ', "_"))
}

fn resolve_delimiter(input: &Path, provided: Option<u8>, culture: &Culture) -> Result<u8> {
    if let Some(delimiter) = provided {
        return Ok(delimiter);
    }
    if io_utils::has_tsv_extension(input) {
        return Ok(io_utils::DEFAULT_TSV_DELIMITER);
    }
    if culture.list_separator.is_ascii() {
        Ok(culture.list_separator as u8)
    } else {
        Err(Error::Configuration(format!(
            "Culture '{culture}' list separator cannot be used as a field separator"
        )))
    }
}

fn default_class_name(input: &Path) -> Result<String> {
    if io_utils::is_dash(input) {
        return Err(Error::Configuration(
            "A class name is required when reading from standard input".to_string(),
        ));
    }
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::Configuration(format!("Cannot derive a class name from {input:?}")))?;
    sanitize::sanitize_identifier(stem)
}
