//! Textual UID parsing and canonical serialization.
//!
//! # Responsibility
//! - Convert raw `@owner:module:tier1:name[:tier2...][:doc]` text into a
//!   structured [`Uid`] with diagnosed syntax errors.
//! - Produce the canonical string form back from a structure.
//!
//! # Invariants
//! - Parsing is pure: it never consults the registry or the grammar table's
//!   tier1 set, and never mutates anything.
//! - `serialize(parse(s)) == s` for every canonical input `s`.
//! - Bracketed index notation (`params[0]`) never splits a segment, even when
//!   the bracket body contains a separator.

use crate::grammar::{
    is_well_formed_segment, DOC_SUFFIX, INDEX_CLOSE, INDEX_OPEN, OWNER_PREFIX, SEGMENT_SEPARATOR,
};
use crate::model::uid::Uid;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ParseResult<T> = Result<T, ParseError>;

/// Syntax errors for raw UID text.
///
/// All variants carry the offending input so callers can log a diagnosable
/// message without re-threading context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Structurally broken input: too few segments, unbalanced brackets,
    /// reserved characters inside a segment.
    MalformedUid { raw: String, reason: String },
    /// The first segment does not begin with `@`.
    MissingOwnerPrefix { raw: String },
    /// Two consecutive separators, a trailing separator, or a bare `@` owner.
    EmptySegment { raw: String, position: usize },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedUid { raw, reason } => write!(f, "malformed uid `{raw}`: {reason}"),
            Self::MissingOwnerPrefix { raw } => {
                write!(f, "uid `{raw}` must start with `{OWNER_PREFIX}`")
            }
            Self::EmptySegment { raw, position } => {
                write!(f, "uid `{raw}` has an empty segment at position {position}")
            }
        }
    }
}

impl Error for ParseError {}

/// Parses one raw UID string into its structured form.
///
/// # Contract
/// - Requires at least the 4 segments `owner`, `module`, `tier1`, `name`.
/// - A trailing literal `doc` segment sets `doc_ref` only when more than 4
///   segments are present; with exactly 4 the last segment is the required
///   `name`, even when it spells `doc`.
/// - In the tail after `name`, the first segment beginning with `@` starts a
///   nested `type_ref` parsed from the re-joined remainder; `@` is reserved,
///   so a remainder that is not itself a well-formed UID fails the parse.
pub fn parse(raw: &str) -> ParseResult<Uid> {
    if raw.is_empty() {
        return Err(ParseError::MalformedUid {
            raw: raw.to_string(),
            reason: "input is empty".to_string(),
        });
    }

    let segments = split_segments(raw)?;
    for (position, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            return Err(ParseError::EmptySegment {
                raw: raw.to_string(),
                position,
            });
        }
    }
    if segments.len() < 4 {
        return Err(ParseError::MalformedUid {
            raw: raw.to_string(),
            reason: format!("expected at least 4 segments, got {}", segments.len()),
        });
    }

    let owner = match segments[0].strip_prefix(OWNER_PREFIX) {
        Some(owner) => owner,
        None => {
            return Err(ParseError::MissingOwnerPrefix {
                raw: raw.to_string(),
            })
        }
    };
    if owner.is_empty() {
        return Err(ParseError::EmptySegment {
            raw: raw.to_string(),
            position: 0,
        });
    }

    let mut end = segments.len();
    let mut doc_ref = false;
    if end > 4 && segments[end - 1] == DOC_SUFFIX {
        doc_ref = true;
        end -= 1;
    }

    for (label, value) in [
        ("owner", owner),
        ("module", segments[1]),
        ("tier1", segments[2]),
        ("name", segments[3]),
    ] {
        if !is_well_formed_segment(value) {
            return Err(ParseError::MalformedUid {
                raw: raw.to_string(),
                reason: format!("{label} segment is malformed: {value}"),
            });
        }
    }

    let tail = &segments[4..end];
    let mut tier2 = Vec::new();
    let mut type_ref = None;
    for (offset, segment) in tail.iter().enumerate() {
        if segment.starts_with(OWNER_PREFIX) {
            let remainder = tail[offset..].join(&SEGMENT_SEPARATOR.to_string());
            type_ref = Some(Box::new(parse(&remainder)?));
            break;
        }
        if !is_well_formed_segment(segment) {
            return Err(ParseError::MalformedUid {
                raw: raw.to_string(),
                reason: format!("tier2 segment is malformed: {segment}"),
            });
        }
        tier2.push((*segment).to_string());
    }

    Ok(Uid {
        owner: owner.to_string(),
        module: segments[1].to_string(),
        tier1: segments[2].to_string(),
        name: segments[3].to_string(),
        tier2,
        doc_ref,
        type_ref,
    })
}

/// Serializes one structured identifier into canonical textual form.
///
/// Segment order is fixed: required four, tier2 in stored order, nested
/// `type_ref`, then the `doc` marker.
pub fn serialize(uid: &Uid) -> String {
    let mut out = String::with_capacity(32);
    out.push(OWNER_PREFIX);
    out.push_str(&uid.owner);
    for part in [&uid.module, &uid.tier1, &uid.name] {
        out.push(SEGMENT_SEPARATOR);
        out.push_str(part);
    }
    for segment in &uid.tier2 {
        out.push(SEGMENT_SEPARATOR);
        out.push_str(segment);
    }
    if let Some(type_ref) = &uid.type_ref {
        out.push(SEGMENT_SEPARATOR);
        out.push_str(&serialize(type_ref));
    }
    if uid.doc_ref {
        out.push(SEGMENT_SEPARATOR);
        out.push_str(DOC_SUFFIX);
    }
    out
}

/// Splits raw text on the separator, keeping bracketed spans intact.
fn split_segments(raw: &str) -> ParseResult<Vec<&str>> {
    let mut segments = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    for (idx, ch) in raw.char_indices() {
        match ch {
            INDEX_OPEN => depth += 1,
            INDEX_CLOSE => {
                depth = depth.checked_sub(1).ok_or_else(|| ParseError::MalformedUid {
                    raw: raw.to_string(),
                    reason: "unbalanced brackets".to_string(),
                })?;
            }
            SEGMENT_SEPARATOR if depth == 0 => {
                segments.push(&raw[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ParseError::MalformedUid {
            raw: raw.to_string(),
            reason: "unbalanced brackets".to_string(),
        });
    }
    segments.push(&raw[start..]);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::{split_segments, ParseError};

    #[test]
    fn split_keeps_bracketed_spans_intact() {
        let segments = split_segments("@a:b:class:C:params[0]").unwrap();
        assert_eq!(segments, vec!["@a", "b", "class", "C", "params[0]"]);
    }

    #[test]
    fn split_does_not_treat_bracketed_separator_as_boundary() {
        let segments = split_segments("a:b[c:d]:e").unwrap();
        assert_eq!(segments, vec!["a", "b[c:d]", "e"]);
    }

    #[test]
    fn split_preserves_empty_segments_for_diagnosis() {
        let segments = split_segments("a::b:").unwrap();
        assert_eq!(segments, vec!["a", "", "b", ""]);
    }

    #[test]
    fn split_rejects_unbalanced_brackets() {
        let open = split_segments("a:b[0").unwrap_err();
        assert!(matches!(open, ParseError::MalformedUid { .. }));

        let close = split_segments("a:b]0").unwrap_err();
        assert!(matches!(close, ParseError::MalformedUid { .. }));
    }
}
