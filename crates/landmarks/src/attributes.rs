//! The attribute sub-parser: from a position just past a tag name, scans
//! attributes (value-less, quoted, unquoted, `/`-tolerant names) until the
//! tag's closing `>` or `/>`.

use crate::events::Attribute;
use crate::position::{Position, Range, NPOS};
use crate::policy::Policy;
use crate::scan::{find_byte_from, skip_until, skip_while};

/// What the sub-parser found at the tag's close.
pub struct AttributesEnd {
    /// Position immediately after the closing `>`, or `NPOS` on truncation.
    pub pos: Position,
    /// Whether the byte immediately before `>` was `/`.
    pub self_closing_marker: bool,
}

fn is_attribute_space<P: Policy>(policy: &P, b: u8) -> bool {
    policy.is_space(b) || b == b'/'
}

fn is_attribute_name_end<P: Policy>(policy: &P, b: u8) -> bool {
    is_attribute_space(policy, b) || b == b'>' || b == b'='
}

fn is_attribute_value_end<P: Policy>(policy: &P, b: u8) -> bool {
    policy.is_space(b) || b == b'>'
}

const TRUNCATED: AttributesEnd = AttributesEnd {
    pos: NPOS,
    self_closing_marker: false,
};

/// Scans attributes starting at `pos` (just past the tag/end-tag name),
/// invoking `on_attribute` for each one found, and returns the position
/// past the closing `>` along with whether a self-closing `/` preceded it.
///
/// `on_attribute` returning `false` requests early termination (used by the
/// driver to propagate a handler break without threading `ControlFlow`
/// through this loop).
pub fn scan_attributes<P: Policy>(
    policy: &P,
    source: &[u8],
    mut pos: Position,
    mut on_attribute: impl FnMut(Attribute) -> bool,
) -> AttributesEnd {
    loop {
        pos = skip_while(source, pos, |b| is_attribute_space(policy, b));

        let Some(&b) = source.get(pos) else {
            return TRUNCATED;
        };

        if b == b'>' {
            let self_closing_marker = pos > 0 && source[pos - 1] == b'/';
            return AttributesEnd {
                pos: pos + 1,
                self_closing_marker,
            };
        }

        let name_start = pos;
        pos = skip_until(source, pos, |b| is_attribute_name_end(policy, b));
        let name_end = pos;
        let name = Range::new(name_start, name_end);

        if matches!(source.get(pos), Some(b'>') | None) {
            let attribute = Attribute {
                name,
                value: name,
                all: name,
            };
            let truncated = source.get(pos).is_none();
            if !on_attribute(attribute) || truncated {
                return TRUNCATED;
            }
            continue;
        }

        let before_eq = pos;
        pos = skip_while(source, pos, |b| policy.is_space(b));
        if source.get(pos) != Some(&b'=') {
            pos = before_eq;
            let attribute = Attribute {
                name,
                value: name,
                all: name,
            };
            if !on_attribute(attribute) {
                return TRUNCATED;
            }
            continue;
        }

        pos += 1;
        pos = skip_while(source, pos, |b| policy.is_space(b));

        let (value, all_end) = match source.get(pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                let value_start = pos + 1;
                match find_byte_from(source, value_start, quote) {
                    NPOS => {
                        pos = NPOS;
                        (Range::incomplete(value_start), NPOS)
                    }
                    value_end => {
                        pos = value_end + 1;
                        (Range::new(value_start, value_end), pos)
                    }
                }
            }
            Some(_) => {
                let value_start = pos;
                let value_end = skip_until(source, pos, |b| is_attribute_value_end(policy, b));
                pos = value_end;
                (Range::new(value_start, value_end), pos)
            }
            None => {
                pos = NPOS;
                (Range::incomplete(pos), NPOS)
            }
        };

        let attribute = Attribute {
            name,
            value,
            all: Range::new(name_start, if all_end == NPOS { pos.min(source.len()) } else { all_end }),
        };
        let truncated = pos == NPOS;
        if !on_attribute(attribute) || truncated {
            return TRUNCATED;
        }
    }
}
