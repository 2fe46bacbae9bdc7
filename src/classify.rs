//! Column type classification.
//!
//! The classifier walks an ordered table of `(PropertyKind, predicate)`
//! trials and picks the first kind whose predicate accepts every non-blank
//! value of the column. Narrow types come first so that numeric-looking
//! values never widen into dates or durations.

use log::debug;

use crate::{
    culture::Culture,
    data,
    schema::{PropertyKind, PropertyType},
};

type Trial = (PropertyKind, fn(&str, &Culture) -> bool);

const STANDARD_TRIALS: &[Trial] = &[
    (PropertyKind::Int, is_int),
    (PropertyKind::Long, is_long),
    (PropertyKind::Double, is_double),
    (PropertyKind::DateTime, is_datetime),
    (PropertyKind::TimeSpan, is_time_span),
    (PropertyKind::Bool, is_bool),
];

const DATE_ONLY_TRIALS: &[Trial] = &[
    (PropertyKind::Int, is_int),
    (PropertyKind::Long, is_long),
    (PropertyKind::Double, is_double),
    (PropertyKind::DateOnly, is_date),
    (PropertyKind::TimeOnly, is_time),
    (PropertyKind::DateTime, is_datetime),
    (PropertyKind::TimeSpan, is_time_span),
    (PropertyKind::Bool, is_bool),
];

fn is_int(value: &str, _: &Culture) -> bool {
    data::parse_int(value).is_some()
}

fn is_long(value: &str, _: &Culture) -> bool {
    data::parse_long(value).is_some()
}

fn is_double(value: &str, culture: &Culture) -> bool {
    data::parse_double(value, culture).is_some()
}

fn is_date(value: &str, culture: &Culture) -> bool {
    data::parse_date(value, culture).is_some()
}

fn is_time(value: &str, _: &Culture) -> bool {
    data::parse_time(value).is_some()
}

fn is_datetime(value: &str, culture: &Culture) -> bool {
    data::parse_datetime(value, culture).is_some()
}

fn is_time_span(value: &str, culture: &Culture) -> bool {
    data::parse_time_span(value, culture).is_some()
}

fn is_bool(value: &str, _: &Culture) -> bool {
    data::parse_bool(value).is_some()
}

#[derive(Debug, Clone)]
pub struct TypeClassifier {
    culture: Culture,
    trials: &'static [Trial],
}

impl TypeClassifier {
    pub fn new(culture: Culture) -> Self {
        Self {
            culture,
            trials: STANDARD_TRIALS,
        }
    }

    /// Also try pure date and pure time-of-day types ahead of date-time.
    pub fn with_date_only_types(mut self, allow: bool) -> Self {
        self.trials = if allow {
            DATE_ONLY_TRIALS
        } else {
            STANDARD_TRIALS
        };
        self
    }

    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    /// Picks the best-fit type for one column's raw values.
    pub fn classify<S: AsRef<str>>(&self, values: &[S]) -> PropertyType {
        let cleaned: Vec<&str> = values.iter().map(|v| strip_quotes(v.as_ref())).collect();
        let nullable = cleaned.iter().any(|v| is_blank(v));
        let non_empty: Vec<&str> = cleaned.into_iter().filter(|v| !is_blank(v)).collect();

        if non_empty.is_empty() {
            return PropertyType::new(PropertyKind::String, true);
        }

        for &(kind, accepts) in self.trials {
            if non_empty.iter().all(|&v| accepts(v, &self.culture)) {
                return PropertyType::new(kind, nullable);
            }
            debug!("Rejected {kind:?} across {} value(s)", non_empty.len());
        }
        PropertyType::new(PropertyKind::String, nullable)
    }
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::new(Culture::invariant())
    }
}

pub(crate) fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
