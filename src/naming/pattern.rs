//! Name pattern language.
//!
//! Fields are wrapped in braces; `{{` and `}}` are literal braces.
//!
//! | field              | expands to                                           |
//! |--------------------|------------------------------------------------------|
//! | `{n}` `{N}`        | counter in the configured radix (lower/upper digits) |
//! | `{n0}` `{N0}`      | counter zero-padded to the widest counter value      |
//! | `{n:0K}` `{n:0Kd}` | counter zero-padded to K characters                  |
//! | `{a}` `{A}`        | alphabetic counter (a..z, aa..)                      |
//! | `{d}`              | date `YYYY<sep>MM<sep>DD`                            |
//! | `{t}`              | time `hh<sep>mm<sep>ss`                              |
//! | `{tc}` `{tm}` `{tu}` | time plus centi/milli/micro seconds                |
//! | `{ext}`            | original extension including the dot                 |
//! | `{name}`           | original name without the extension                  |
//! | `{unixt}`          | unix seconds of the selected time stamp              |
//! | `{0}`..`{K}`       | regex capture (0 is the whole match)                 |

use chrono::{DateTime, Datelike, Local, Timelike};
use std::fmt;

use super::counters::{to_alpha, to_radix};
use crate::errors::RenameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pad {
    None,
    Widest,
    Width(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubSecond {
    None,
    Centi,
    Milli,
    Micro,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Counter { upper: bool, pad: Pad },
    Alpha { upper: bool },
    Date,
    Time(SubSecond),
    Ext,
    Name,
    UnixTime,
    Capture(usize),
}

/// Values a pattern can draw from for one entry.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    pub counter: u64,
    pub radix: u32,
    /// Width used by `{n0}`/`{N0}`.
    pub widest: usize,
    pub alpha: u64,
    pub timestamp: DateTime<Local>,
    pub time_separator: &'a str,
    pub stem: &'a str,
    pub ext: &'a str,
    pub captures: &'a [String],
}

/// A parsed pattern. Parsing rejects unknown fields and unbalanced braces up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    source: String,
    segments: Vec<Segment>,
}

impl NamePattern {
    pub fn parse(pattern: &str) -> Result<Self, RenameError> {
        let invalid = |reason: String| RenameError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(invalid("unmatched '}'".into())),
                '{' => {
                    let mut field = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        field.push(c);
                    }
                    if !closed {
                        return Err(invalid("unterminated '{'".into()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_field(&field).ok_or_else(|| invalid(format!("unknown field '{{{field}}}'")))?);
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Highest capture index referenced, if any.
    pub fn max_capture(&self) -> Option<usize> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Capture(i) => Some(*i),
                _ => None,
            })
            .max()
    }

    pub fn render(&self, fields: &Fields<'_>) -> Result<String, RenameError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Counter { upper, pad } => {
                    let digits = to_radix(fields.counter, fields.radix, *upper);
                    let width = match pad {
                        Pad::None => 0,
                        Pad::Widest => fields.widest,
                        Pad::Width(w) => *w,
                    };
                    out.push_str(&format!("{digits:0>width$}"));
                }
                Segment::Alpha { upper } => out.push_str(&to_alpha(fields.alpha, *upper)),
                Segment::Date => {
                    let ts = &fields.timestamp;
                    let sep = fields.time_separator;
                    out.push_str(&format!("{:04}{sep}{:02}{sep}{:02}", ts.year(), ts.month(), ts.day()));
                }
                Segment::Time(sub) => {
                    let ts = &fields.timestamp;
                    let sep = fields.time_separator;
                    out.push_str(&format!("{:02}{sep}{:02}{sep}{:02}", ts.hour(), ts.minute(), ts.second()));
                    // Leap-second nanos can exceed 1e9; keep the fraction in range.
                    let micros = (ts.nanosecond() % 1_000_000_000) / 1_000;
                    match sub {
                        SubSecond::None => {}
                        SubSecond::Centi => out.push_str(&format!("{sep}{:02}", micros / 10_000)),
                        SubSecond::Milli => out.push_str(&format!("{sep}{:03}", micros / 1_000)),
                        SubSecond::Micro => out.push_str(&format!("{sep}{micros:06}")),
                    }
                }
                Segment::Ext => out.push_str(fields.ext),
                Segment::Name => out.push_str(fields.stem),
                Segment::UnixTime => out.push_str(&fields.timestamp.timestamp().to_string()),
                Segment::Capture(i) => {
                    let value = fields.captures.get(*i).ok_or_else(|| RenameError::InvalidPattern {
                        pattern: self.source.clone(),
                        reason: format!(
                            "capture {{{i}}} requested but only {} available",
                            fields.captures.len()
                        ),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_field(field: &str) -> Option<Segment> {
    let seg = match field {
        "n" => Segment::Counter { upper: false, pad: Pad::None },
        "N" => Segment::Counter { upper: true, pad: Pad::None },
        "n0" => Segment::Counter { upper: false, pad: Pad::Widest },
        "N0" => Segment::Counter { upper: true, pad: Pad::Widest },
        "a" => Segment::Alpha { upper: false },
        "A" => Segment::Alpha { upper: true },
        "d" => Segment::Date,
        "t" => Segment::Time(SubSecond::None),
        "tc" => Segment::Time(SubSecond::Centi),
        "tm" => Segment::Time(SubSecond::Milli),
        "tu" => Segment::Time(SubSecond::Micro),
        "ext" => Segment::Ext,
        "name" => Segment::Name,
        "unixt" => Segment::UnixTime,
        _ if !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()) => {
            Segment::Capture(field.parse().ok()?)
        }
        _ => return parse_padded_counter(field),
    };
    Some(seg)
}

/// `n:0K` or `n:0Kd` (also with `N`).
fn parse_padded_counter(field: &str) -> Option<Segment> {
    let (name, fmt_spec) = field.split_once(':')?;
    let upper = match name {
        "n" => false,
        "N" => true,
        _ => return None,
    };
    let fmt_spec = fmt_spec.strip_prefix('0')?;
    let fmt_spec = fmt_spec.strip_suffix('d').unwrap_or(fmt_spec);
    if fmt_spec.is_empty() || !fmt_spec.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(Segment::Counter {
        upper,
        pad: Pad::Width(fmt_spec.parse().ok()?),
    })
}
