//! Qualified name splitting (`prefix:local` vs. bare names).

use crate::position::Range;
use memchr::memchr;

/// A name range split on the first `:`. Unprefixed names get an empty
/// `prefix` range sitting at the start of `local_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName {
    pub prefix: Range,
    pub local_name: Range,
}

impl QualifiedName {
    /// Splits a name range taken from the source document.
    pub fn from_name_range(source: &[u8], name: Range) -> Self {
        let bytes = name.text(source);
        match memchr(b':', bytes) {
            Some(colon) => {
                let colon = name.start() + colon;
                QualifiedName {
                    prefix: Range::new(name.start(), colon),
                    local_name: Range::new(colon + 1, name.end()),
                }
            }
            None => QualifiedName {
                prefix: Range::new(name.start(), name.start()),
                local_name: name,
            },
        }
    }
}
