//! tix-feeds
//!
//! Record parser for the three tab-separated input feeds:
//! - declared preferences: name, four counts, two venue codes
//! - delegated applications: applicant, beneficiary, four counts
//! - results/holdings: applicant, optional beneficiary, four counts
//!
//! Lines are split on tabs; blank lines are skipped. Any structural failure
//! (wrong arity, bad number, bad venue code, count-pair rule violation) is a
//! fatal [`FeedError`] carrying the 1-based line number.
//!
//! Pure parsing. No IO; callers hand in the full feed text.

use std::fmt;

use tix_model::{Day, TicketCounts, Venue};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal structural errors raised while parsing a feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedError {
    /// The row has the wrong number of tab-separated fields.
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A ticket count field is not a non-negative integer.
    BadCount { line: usize, field: String },
    /// A declared venue code is not one of E, W, X.
    BadVenueCode { line: usize, code: String },
    /// Both counts for one day are zero where one side must be nonzero.
    BothZero { line: usize, day: Day },
    /// Both counts for one day are nonzero where one side must be zero.
    BothNonZero { line: usize, day: Day },
    /// A required name field is empty.
    EmptyName { line: usize },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line}: expected {expected} tab-separated fields, found {found}"
            ),
            Self::BadCount { line, field } => {
                write!(f, "line {line}: ticket count '{field}' is not a non-negative integer")
            }
            Self::BadVenueCode { line, code } => {
                write!(f, "line {line}: venue code '{code}' is not one of E, W, X")
            }
            Self::BothZero { line, day } => {
                write!(f, "line {line}: both {day} counts are zero, exactly one side must be nonzero")
            }
            Self::BothNonZero { line, day } => {
                write!(f, "line {line}: both {day} counts are nonzero, exactly one side must be zero")
            }
            Self::EmptyName { line } => write!(f, "line {line}: name field is empty"),
        }
    }
}

impl std::error::Error for FeedError {}

// ---------------------------------------------------------------------------
// Venue codes
// ---------------------------------------------------------------------------

/// Declared target venue code: E (east), W (west), X (no opinion).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VenueCode {
    East,
    West,
    NoOpinion,
}

impl VenueCode {
    fn parse(raw: &str, line: usize) -> Result<Self, FeedError> {
        match raw {
            "E" => Ok(VenueCode::East),
            "W" => Ok(VenueCode::West),
            "X" => Ok(VenueCode::NoOpinion),
            other => Err(FeedError::BadVenueCode {
                line,
                code: other.to_string(),
            }),
        }
    }

    /// The concrete venue, or `None` for no opinion.
    pub fn venue(self) -> Option<Venue> {
        match self {
            VenueCode::East => Some(Venue::East),
            VenueCode::West => Some(Venue::West),
            VenueCode::NoOpinion => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One declared-preference row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredRecord {
    pub name: String,
    pub counts: TicketCounts,
    pub target_day1: VenueCode,
    pub target_day2: VenueCode,
}

/// One delegated-application row: `applied_by` holds tickets on behalf of
/// `applied_for`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegatedRecord {
    pub applied_by: String,
    pub applied_for: String,
    pub counts: TicketCounts,
}

/// One results/holdings row. A blank beneficiary means self-application;
/// the pool builder resolves the default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRecord {
    pub applied_by: String,
    pub applied_for: Option<String>,
    pub counts: TicketCounts,
}

// ---------------------------------------------------------------------------
// Count parsing
// ---------------------------------------------------------------------------

/// How the per-day count pair is constrained for a feed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CountRule {
    /// Per day, exactly one of the two counts must be nonzero
    /// (declared and delegated feeds).
    ExactlyOneSide,
    /// Counts are free non-negative values (results feed).
    Unrestricted,
}

fn parse_counts(fields: &[&str], line: usize, rule: CountRule) -> Result<TicketCounts, FeedError> {
    debug_assert_eq!(fields.len(), 4, "callers check row arity first");

    let mut parsed = [0u32; 4];
    for (i, raw) in fields.iter().enumerate() {
        parsed[i] = raw.parse().map_err(|_| FeedError::BadCount {
            line,
            field: raw.to_string(),
        })?;
    }
    let counts = TicketCounts::new(parsed[0], parsed[1], parsed[2], parsed[3]);

    if rule == CountRule::ExactlyOneSide {
        for day in [Day::First, Day::Second] {
            let (east, west) = counts.day_pair(day);
            if east == 0 && west == 0 {
                return Err(FeedError::BothZero { line, day });
            }
            if east != 0 && west != 0 {
                return Err(FeedError::BothNonZero { line, day });
            }
        }
    }

    Ok(counts)
}

// ---------------------------------------------------------------------------
// Feed parsing
// ---------------------------------------------------------------------------

/// Non-blank lines with their 1-based line numbers, split on tabs.
fn rows(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> + '_ {
    text.lines().enumerate().filter_map(|(idx, raw)| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some((idx + 1, trimmed.split('\t').collect()))
        }
    })
}

fn require_name(raw: &str, line: usize) -> Result<String, FeedError> {
    if raw.is_empty() {
        return Err(FeedError::EmptyName { line });
    }
    Ok(raw.to_string())
}

/// Parse the declared-preference feed:
/// `name \t e1 \t w1 \t e2 \t w2 \t code1 \t code2`.
pub fn parse_declared(text: &str) -> Result<Vec<DeclaredRecord>, FeedError> {
    let mut records = Vec::new();
    for (line, fields) in rows(text) {
        if fields.len() != 7 {
            return Err(FeedError::FieldCount {
                line,
                expected: 7,
                found: fields.len(),
            });
        }
        records.push(DeclaredRecord {
            name: require_name(fields[0], line)?,
            counts: parse_counts(&fields[1..5], line, CountRule::ExactlyOneSide)?,
            target_day1: VenueCode::parse(fields[5], line)?,
            target_day2: VenueCode::parse(fields[6], line)?,
        });
    }
    Ok(records)
}

/// Parse the delegated-application feed:
/// `applied_by \t applied_for \t e1 \t w1 \t e2 \t w2`.
pub fn parse_delegated(text: &str) -> Result<Vec<DelegatedRecord>, FeedError> {
    let mut records = Vec::new();
    for (line, fields) in rows(text) {
        if fields.len() != 6 {
            return Err(FeedError::FieldCount {
                line,
                expected: 6,
                found: fields.len(),
            });
        }
        records.push(DelegatedRecord {
            applied_by: require_name(fields[0], line)?,
            applied_for: require_name(fields[1], line)?,
            counts: parse_counts(&fields[2..6], line, CountRule::ExactlyOneSide)?,
        });
    }
    Ok(records)
}

/// Parse the results/holdings feed:
/// `applied_by \t applied_for? \t e1 \t w1 \t e2 \t w2`.
///
/// Counts here are unconstrained non-negative values; a blank beneficiary
/// field is kept as `None`.
pub fn parse_results(text: &str) -> Result<Vec<ResultRecord>, FeedError> {
    let mut records = Vec::new();
    for (line, fields) in rows(text) {
        if fields.len() != 6 {
            return Err(FeedError::FieldCount {
                line,
                expected: 6,
                found: fields.len(),
            });
        }
        let applied_for = if fields[1].is_empty() {
            None
        } else {
            Some(fields[1].to_string())
        };
        records.push(ResultRecord {
            applied_by: require_name(fields[0], line)?,
            applied_for,
            counts: parse_counts(&fields[2..6], line, CountRule::Unrestricted)?,
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
