//! Locale rule sets used when classifying column values.
//!
//! A [`Culture`] carries only what the type trials need: the decimal
//! separator for floating point values, the list separator used as the
//! default field delimiter, and the short date layout. Cultures are looked up
//! by code from a fixed table; the invariant rules apply when no code is
//! given.

use std::fmt;

use itertools::Itertools;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Culture {
    pub code: &'static str,
    pub decimal_separator: char,
    pub list_separator: char,
    pub date_order: DateOrder,
    pub date_separator: char,
    pub english_month_names: bool,
}

const fn culture(
    code: &'static str,
    decimal_separator: char,
    list_separator: char,
    date_order: DateOrder,
    date_separator: char,
    english_month_names: bool,
) -> Culture {
    Culture {
        code,
        decimal_separator,
        list_separator,
        date_order,
        date_separator,
        english_month_names,
    }
}

const INVARIANT: Culture = culture("", '.', ',', DateOrder::MonthDayYear, '/', true);

const KNOWN_CULTURES: &[Culture] = &[
    culture("en-US", '.', ',', DateOrder::MonthDayYear, '/', true),
    culture("en-GB", '.', ',', DateOrder::DayMonthYear, '/', true),
    culture("en-AU", '.', ',', DateOrder::DayMonthYear, '/', true),
    culture("en-CA", '.', ',', DateOrder::YearMonthDay, '-', true),
    culture("de-DE", ',', ';', DateOrder::DayMonthYear, '.', false),
    culture("de-AT", ',', ';', DateOrder::DayMonthYear, '.', false),
    culture("de-CH", '.', ';', DateOrder::DayMonthYear, '.', false),
    culture("fr-FR", ',', ';', DateOrder::DayMonthYear, '/', false),
    culture("fr-CA", ',', ';', DateOrder::YearMonthDay, '-', false),
    culture("es-ES", ',', ';', DateOrder::DayMonthYear, '/', false),
    culture("es-MX", '.', ',', DateOrder::DayMonthYear, '/', false),
    culture("it-IT", ',', ';', DateOrder::DayMonthYear, '/', false),
    culture("pt-BR", ',', ';', DateOrder::DayMonthYear, '/', false),
    culture("pt-PT", ',', ';', DateOrder::DayMonthYear, '/', false),
    culture("nl-NL", ',', ';', DateOrder::DayMonthYear, '-', false),
    culture("sv-SE", ',', ';', DateOrder::YearMonthDay, '-', false),
    culture("pl-PL", ',', ';', DateOrder::DayMonthYear, '.', false),
    culture("ru-RU", ',', ';', DateOrder::DayMonthYear, '.', false),
    culture("ja-JP", '.', ',', DateOrder::YearMonthDay, '/', false),
    culture("zh-CN", '.', ',', DateOrder::YearMonthDay, '/', false),
    culture("ko-KR", '.', ',', DateOrder::YearMonthDay, '-', false),
];

impl Culture {
    pub fn invariant() -> Self {
        INVARIANT
    }

    /// Resolves a culture code such as `en-US` or `de`.
    ///
    /// `None`, an empty string, and `invariant` all select the invariant
    /// rules. A bare language code picks the first table entry for that
    /// language.
    pub fn from_code(code: Option<&str>) -> Result<Self> {
        let Some(raw) = code.map(str::trim) else {
            return Ok(Self::invariant());
        };
        if raw.is_empty() || raw.eq_ignore_ascii_case("invariant") {
            return Ok(Self::invariant());
        }
        let normalized = raw.replace('_', "-");
        if let Some(found) = KNOWN_CULTURES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(&normalized))
        {
            return Ok(found.clone());
        }
        KNOWN_CULTURES
            .iter()
            .find(|c| {
                c.code
                    .split('-')
                    .next()
                    .is_some_and(|lang| lang.eq_ignore_ascii_case(&normalized))
            })
            .cloned()
            .ok_or_else(|| Error::Configuration(format!("Unknown culture code '{raw}'")))
    }

    pub fn is_invariant(&self) -> bool {
        self.code.is_empty()
    }

    /// chrono patterns for the culture's numeric short date.
    pub(crate) fn short_date_patterns(&self) -> Vec<String> {
        let s = self.date_separator;
        let pattern = match self.date_order {
            DateOrder::MonthDayYear => format!("%m{s}%d{s}%Y"),
            DateOrder::DayMonthYear => format!("%d{s}%m{s}%Y"),
            DateOrder::YearMonthDay => format!("%Y{s}%m{s}%d"),
        };
        let mut patterns = vec![pattern, "%Y-%m-%d".to_string(), "%Y/%m/%d".to_string()];
        if self.english_month_names {
            patterns.extend(
                ["%d %b %Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y", "%d-%b-%Y"]
                    .iter()
                    .map(|p| p.to_string()),
            );
        }
        patterns.into_iter().unique().collect()
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invariant() {
            f.write_str("invariant")
        } else {
            f.write_str(self.code)
        }
    }
}
