use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Generate C# record classes and CsvHelper maps from a CSV file",
    long_about = None,
    disable_help_flag = true
)]
pub struct Cli {
    /// Input CSV file ('-' reads standard input)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Field separator (defaults to the culture list separator; '\t' or 'tab' for tabs)
    #[arg(short = 's', long = "separator", value_parser = parse_delimiter)]
    pub separator: Option<u8>,
    /// The first row of the file holds column headers
    #[arg(short = 'h', long = "header")]
    pub header: bool,
    /// Destination namespace (defaults to the name of the .csproj in the current folder)
    #[arg(short = 'p', long = "namespace")]
    pub namespace: Option<String>,
    /// Output directory (defaults to the current folder)
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Name of the class to generate (defaults to the input file name)
    #[arg(short = 'c', long = "class-name")]
    pub class_name: Option<String>,
    /// Culture code used to parse numbers and dates, e.g. en-US (defaults to invariant)
    #[arg(short = 't', long = "culture")]
    pub culture: Option<String>,
    /// Generate the DataAnnotations "Display" attribute
    #[arg(short = 'd', long = "display-attribute")]
    pub display_attribute: bool,
    /// Generate the CsvHelper "Index" attribute
    #[arg(short = 'x', long = "index-attribute")]
    pub index_attribute: bool,
    /// Generate the CsvHelper "Name" attribute
    #[arg(short = 'n', long = "name-attribute")]
    pub name_attribute: bool,
    /// Use a CsvHelper class map instead of attributes
    #[arg(short = 'm', long = "map")]
    pub map: bool,
    /// Allow DateOnly and TimeOnly when guessing column types
    #[arg(short = 'e', long = "datetimeonly")]
    pub date_only_types: bool,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Also write the inferred schema as YAML (or JSON for a .json path)
    #[arg(long = "schema-out")]
    pub schema_out: Option<PathBuf>,
    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Separator cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Separator must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Separator must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
