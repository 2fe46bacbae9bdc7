//! I/O utilities for reading the delimited input and writing artifacts.
//!
//! All file I/O in csv2class flows through this module. It provides:
//!
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Reading**: the whole input is materialized as raw string rows, with the
//!   optional header row split off.
//! - **stdin**: the `-` path convention routes through standard input.
//! - **Writing**: artifacts and the optional schema export are staged in
//!   temporary files and committed all-or-nothing.

use std::{
    fs::{self, File},
    io::{BufReader, Read, Write},
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use tempfile::{NamedTempFile, TempPath};

use crate::{
    emit::Artifacts,
    error::{Error, Result},
};

pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

const STAGING_PREFIX: &str = ".csv2class-";

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| Error::Configuration(format!("Unknown encoding '{value}'")))
    } else {
        Ok(UTF_8)
    }
}

pub fn has_tsv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"))
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = File::open(path)
        .map_err(|err| Error::Configuration(format!("Opening input file {path:?}: {err}")))?;
    Ok(Box::new(BufReader::new(file)))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        Err(Error::Parse(format!(
            "Failed to decode text with encoding {}",
            encoding.name()
        )))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
    record_number: usize,
) -> Result<Vec<String>> {
    record
        .iter()
        .enumerate()
        .map(|(column, field)| {
            decode_bytes(field, encoding).map_err(|err| {
                Error::Parse(format!("Record {record_number}, column {column}: {err}"))
            })
        })
        .collect()
}

/// Raw contents of a delimited file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

/// Reads every record into memory, taking the first as the header row when
/// `has_header` is set.
pub fn read_table<R>(
    reader: &mut csv::Reader<R>,
    has_header: bool,
    encoding: &'static Encoding,
) -> Result<RawTable>
where
    R: Read,
{
    let mut table = RawTable::default();
    let mut record = csv::ByteRecord::new();
    let mut record_number = 0usize;
    while reader.read_byte_record(&mut record)? {
        record_number += 1;
        let mut decoded = decode_record(&record, encoding, record_number)?;
        if record_number == 1 {
            if let Some(first) = decoded.first_mut() {
                if let Some(stripped) = first.strip_prefix('\u{feff}') {
                    *first = stripped.to_string();
                }
            }
        }
        if has_header && table.headers.is_none() {
            table.headers = Some(decoded);
        } else {
            table.rows.push(decoded);
        }
    }
    if has_header && table.headers.is_none() {
        table.headers = Some(Vec::new());
    }
    debug!("Read {} data row(s)", table.rows.len());
    Ok(table)
}

/// Writes every artifact into `dir`, creating it if needed.
pub fn write_artifacts(dir: &Path, artifacts: &Artifacts) -> Result<Vec<PathBuf>> {
    commit_files(&artifact_files(dir, artifacts))
}

/// Pairs each artifact with its destination inside `dir`.
pub fn artifact_files<'a>(dir: &Path, artifacts: &'a Artifacts) -> Vec<(PathBuf, &'a str)> {
    artifacts
        .iter()
        .map(|artifact| (dir.join(&artifact.file_name), artifact.contents.as_str()))
        .collect()
}

/// Writes all of `files` or none of them.
///
/// Contents are staged in temporary siblings of their targets and only
/// renamed into place once every file is staged. Targets that already exist
/// are moved aside first and put back if a later rename fails.
pub fn commit_files(files: &[(PathBuf, &str)]) -> Result<Vec<PathBuf>> {
    let staged = files
        .iter()
        .map(|(path, contents)| stage_file(path, contents))
        .collect::<Result<Vec<_>>>()?;

    let mut committed: Vec<(PathBuf, Option<TempPath>)> = Vec::with_capacity(staged.len());
    for (target, file) in staged {
        match replace_target(file, &target) {
            Ok(backup) => committed.push((target, backup)),
            Err(err) => {
                roll_back(committed);
                return Err(err);
            }
        }
    }
    Ok(committed.into_iter().map(|(target, _)| target).collect())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn stage_file(target: &Path, contents: &str) -> Result<(PathBuf, NamedTempFile)> {
    let parent = parent_dir(target);
    fs::create_dir_all(parent)?;
    let mut file = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".tmp")
        .tempfile_in(parent)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    debug!("Staged {target:?} at {:?}", file.path());
    Ok((target.to_path_buf(), file))
}

fn replace_target(file: NamedTempFile, target: &Path) -> Result<Option<TempPath>> {
    let backup = if fs::symlink_metadata(target).is_ok() {
        let backup = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(".bak")
            .tempfile_in(parent_dir(target))?
            .into_temp_path();
        fs::rename(target, &backup)?;
        Some(backup)
    } else {
        None
    };

    if let Err(err) = file.persist(target) {
        if let Some(backup) = &backup {
            if let Err(restore) = fs::rename(backup, target) {
                warn!("Could not restore previous {target:?}: {restore}");
            }
        }
        return Err(err.error.into());
    }
    Ok(backup)
}

fn roll_back(committed: Vec<(PathBuf, Option<TempPath>)>) {
    for (target, backup) in committed.into_iter().rev() {
        let restored = match &backup {
            Some(backup) => fs::rename(backup, &target),
            None => fs::remove_file(&target),
        };
        if let Err(err) = restored {
            warn!("Could not roll back {target:?}: {err}");
        }
    }
}
