//! Column descriptors and the schema builder.
//!
//! This module owns [`ColumnDescriptor`] (one inferred entry per source
//! column), the [`PropertyKind`]/[`PropertyType`] type model, and
//! [`SchemaBuilder`], which classifies every column, derives identifiers from
//! the headers and then resolves collisions across the finished list.
//!
//! ## Responsibilities
//!
//! - Placeholder header synthesis (`Column 0`, `Column 1`, ...) for files
//!   without a header row
//! - Ragged row detection before any column is classified
//! - YAML/JSON export of the finished schema

use std::{fmt, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    classify::TypeClassifier,
    error::{Error, Result},
    resolve, sanitize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Int,
    Long,
    Double,
    DateTime,
    TimeSpan,
    Bool,
    String,
    DateOnly,
    TimeOnly,
}

impl PropertyKind {
    /// C# keyword or BCL type name.
    pub fn csharp_name(&self) -> &'static str {
        match self {
            PropertyKind::Int => "int",
            PropertyKind::Long => "long",
            PropertyKind::Double => "double",
            PropertyKind::DateTime => "DateTime",
            PropertyKind::TimeSpan => "TimeSpan",
            PropertyKind::Bool => "bool",
            PropertyKind::String => "string",
            PropertyKind::DateOnly => "DateOnly",
            PropertyKind::TimeOnly => "TimeOnly",
        }
    }

    pub fn is_reference_type(&self) -> bool {
        matches!(self, PropertyKind::String)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    pub kind: PropertyKind,
    pub nullable: bool,
}

impl PropertyType {
    pub fn new(kind: PropertyKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.csharp_name())?;
        if self.nullable && !self.kind.is_reference_type() {
            f.write_str("?")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub display_name: String,
    pub index: usize,
    pub property_name: String,
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnDescriptor>,
}

impl Schema {
    pub fn column(&self, property_name: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.property_name == property_name)
    }

    /// Serializes the schema as JSON when `path` ends in `.json`, YAML
    /// otherwise.
    pub fn render_export(&self, path: &Path) -> Result<String> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::to_string_pretty(self).map_err(|err| Error::Serialization(err.to_string()))
        } else {
            serde_yaml::to_string(self).map_err(|err| Error::Serialization(err.to_string()))
        }
    }
}

pub fn placeholder_header(index: usize) -> String {
    format!("Column {index}")
}

pub fn placeholder_headers(count: usize) -> Vec<String> {
    (0..count).map(placeholder_header).collect()
}

#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    classifier: TypeClassifier,
}

impl SchemaBuilder {
    pub fn new(classifier: TypeClassifier) -> Self {
        Self { classifier }
    }

    /// Builds one descriptor per header, in column order.
    ///
    /// Without headers the column count comes from the first row and
    /// placeholder headers are synthesized. Every row must hold at least as
    /// many fields as there are columns.
    pub fn build(&self, headers: Option<Vec<String>>, rows: &[Vec<String>]) -> Result<Schema> {
        let headers = match headers {
            Some(headers) => headers,
            None => {
                let width = rows.first().map(Vec::len).ok_or_else(|| {
                    Error::Schema("No header row and no data rows to infer column count".into())
                })?;
                placeholder_headers(width)
            }
        };
        if headers.is_empty() {
            return Err(Error::Schema("Input does not contain any columns".into()));
        }
        ensure_rectangular(&headers, rows)?;

        let mut bases = Vec::with_capacity(headers.len());
        let mut types = Vec::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let source = if header.trim().is_empty() {
                placeholder_header(idx)
            } else {
                header.clone()
            };
            bases.push(sanitize::sanitize_identifier(&source)?);

            let values: Vec<&str> = rows.iter().map(|row| row[idx].as_str()).collect();
            let property_type = self.classifier.classify(&values);
            debug!("Column {idx} '{header}' classified as {property_type}");
            types.push(property_type);
        }

        let property_names = resolve::resolve_property_names(&bases);
        let name_indices = resolve::name_indices(&headers);

        let columns = headers
            .into_iter()
            .zip(property_names)
            .zip(types)
            .zip(name_indices)
            .enumerate()
            .map(
                |(index, (((display_name, property_name), property_type), name_index))| {
                    ColumnDescriptor {
                        display_name,
                        index,
                        property_name,
                        property_type,
                        name_index,
                    }
                },
            )
            .collect();
        Ok(Schema { columns })
    }
}

fn ensure_rectangular(headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        if row.len() < headers.len() {
            return Err(Error::Schema(format!(
                "Record {} has {} field(s) but column {} ('{}') was expected",
                row_idx + 1,
                row.len(),
                row.len(),
                headers[row.len()]
            )));
        }
    }
    Ok(())
}
