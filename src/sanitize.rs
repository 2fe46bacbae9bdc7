//! Header text to C# identifier conversion.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{Error, Result};

static DISALLOWED: OnceLock<Regex> = OnceLock::new();
static UNDERSCORE_RUNS: OnceLock<Regex> = OnceLock::new();
static WORD_STARTS: OnceLock<Regex> = OnceLock::new();

fn disallowed() -> &'static Regex {
    DISALLOWED.get_or_init(|| {
        Regex::new(r"[^\p{L}\p{Nd}\p{Pc}\p{Cf}]").expect("identifier character class")
    })
}

fn underscore_runs() -> &'static Regex {
    UNDERSCORE_RUNS.get_or_init(|| Regex::new(r"_{2,}").expect("underscore run pattern"))
}

fn word_starts() -> &'static Regex {
    WORD_STARTS.get_or_init(|| {
        Regex::new(r"(?:\b|([\d_]))(\p{Ll})").expect("word start pattern")
    })
}

/// Turns arbitrary header text into a readable identifier.
///
/// The result is never empty, starts with a letter or `_`, holds only
/// letters, decimal digits, connector punctuation and format characters, and
/// never contains two consecutive underscores.
pub fn sanitize_identifier(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "Identifier source text cannot be empty or whitespace".to_string(),
        ));
    }

    let pascal = to_pascal_case(text);
    let mut identifier = disallowed().replace_all(&pascal, "").into_owned();

    let starts_legally = identifier
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_legally {
        identifier.insert(0, '_');
    }

    Ok(underscore_runs().replace_all(&identifier, "_").into_owned())
}

/// Uppercases the first letter of every word, then drops the space, hyphen
/// and underscore separators.
///
/// A lowercase letter starts a word when it sits on a Unicode word boundary
/// or follows a digit or an underscore. Letters whose uppercase form is more
/// than one character are left alone.
pub fn to_pascal_case(text: &str) -> String {
    let capitalized = word_starts().replace_all(text, |caps: &Captures<'_>| {
        let mut out = caps.get(1).map_or_else(String::new, |m| m.as_str().to_string());
        let letter = &caps[2];
        let mut upper = letter.chars().flat_map(char::to_uppercase);
        match (upper.next(), upper.next()) {
            (Some(single), None) => out.push(single),
            _ => out.push_str(letter),
        }
        out
    });
    capitalized.replace([' ', '-', '_'], "")
}
