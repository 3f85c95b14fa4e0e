//! The extension surface the tokenizer is parameterized over. A `Policy` is
//! a pure, stateless value: no mutation, safe to call repeatedly on the same
//! input, safe to share across concurrent parses (a single parse is not
//! reentrant, but nothing stops two threads each running their own parse
//! against the same `Policy` reference).

use crate::position::{Position, NPOS};

/// Classifies tag names and answers every variability question the
/// tokenizer needs. Implementations are composed in, not subclassed from —
/// see `policies::Xml` and `policies::Html5` for reference shapes.
pub trait Policy {
    /// The identifier a tag name normalizes to. Equality between ids is
    /// defined by `is_same_element`, not by deriving `PartialEq` on this
    /// type — a case-insensitive policy may use distinct `TagId` values that
    /// still compare equal.
    type TagId: Clone;

    /// The id representing "no valid or known tag name here."
    fn unknown_tag_id(&self) -> Self::TagId;

    /// Whether `byte` is ASCII whitespace under this policy. Default is the
    /// conventional HTML/XML set.
    fn is_space(&self, byte: u8) -> bool {
        matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
    }

    /// Returns `pos` if the byte there can start an element name, else
    /// `NPOS`. The default requires an ASCII alphanumeric; a policy may
    /// choose to skip leading whitespace here, which turns `< foo>` into a
    /// start tag instead of text.
    fn element_name_start(&self, source: &[u8], pos: Position) -> Position {
        match source.get(pos) {
            Some(b) if b.is_ascii_alphanumeric() => pos,
            _ => NPOS,
        }
    }

    /// Maps a source name to an id — the only case-folding point in the
    /// whole pipeline.
    fn tag_id(&self, name: &[u8]) -> Self::TagId;

    /// Id equality, which may be case-insensitive even when source names
    /// are preserved verbatim.
    fn is_same_element(&self, a: &Self::TagId, b: &Self::TagId) -> bool;

    /// Start tag is implicitly self-closing (e.g. `br`, `img`).
    fn is_void_element(&self, id: &Self::TagId) -> bool;

    /// Self-closing marker is ignored; the tag always opens (e.g. a
    /// namespace's non-empty container elements under XML rules).
    fn is_content_element(&self, id: &Self::TagId) -> bool;

    /// After the start tag, scan raw bytes for the matching end tag without
    /// further markup parsing (e.g. `script`, `style`).
    fn is_opaque_element(&self, id: &Self::TagId) -> bool;

    /// Seeing `<new_id>` while `open_id` is on the stack closes `open_id`
    /// (e.g. a second `<li>` closes the first).
    fn is_autoclosing_sibling(&self, open_id: &Self::TagId, new_id: &Self::TagId) -> bool;

    /// This element auto-closes when its parent closes, or at EOF (e.g.
    /// `<p>`, `<li>`).
    fn is_autoclose_by_parent(&self, id: &Self::TagId) -> bool;

    /// This end tag adopts the top-of-stack id rather than naming one
    /// itself.
    fn is_wildcard_end_tag(&self, id: &Self::TagId) -> bool;

    /// Matching this end tag closes every contained open element, not just
    /// the immediate child (a "landmark" end tag).
    fn is_autoclosing_end_tag(&self, id: &Self::TagId) -> bool;
}
