//! A small HTML5-flavored reference policy: case-insensitive via
//! lowercasing, a void-element set, `script`/`style` as opaque, and a
//! handful of the autoclose-by-parent and autoclose-by-sibling rules a real
//! HTML5 tree builder would apply. This is illustrative, not a conformance
//! dataset — see spec's non-goals on tree building and validation.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::policy::Policy;

const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"source", b"track", b"wbr",
];

const OPAQUE_ELEMENTS: &[&[u8]] = &[b"script", b"style"];

const AUTOCLOSE_BY_PARENT_ELEMENTS: &[&[u8]] =
    &[b"p", b"li", b"dt", b"dd", b"option", b"tr", b"td", b"th"];

fn void_set() -> &'static FxHashSet<&'static [u8]> {
    static SET: OnceLock<FxHashSet<&'static [u8]>> = OnceLock::new();
    SET.get_or_init(|| VOID_ELEMENTS.iter().copied().collect())
}

fn opaque_set() -> &'static FxHashSet<&'static [u8]> {
    static SET: OnceLock<FxHashSet<&'static [u8]>> = OnceLock::new();
    SET.get_or_init(|| OPAQUE_ELEMENTS.iter().copied().collect())
}

fn autoclose_by_parent_set() -> &'static FxHashSet<&'static [u8]> {
    static SET: OnceLock<FxHashSet<&'static [u8]>> = OnceLock::new();
    SET.get_or_init(|| AUTOCLOSE_BY_PARENT_ELEMENTS.iter().copied().collect())
}

/// Zero-sized: an `Html5` policy carries no configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5;

impl Policy for Html5 {
    type TagId = Box<[u8]>;

    fn unknown_tag_id(&self) -> Self::TagId {
        Box::from(&b""[..])
    }

    fn tag_id(&self, name: &[u8]) -> Self::TagId {
        if name.is_empty() {
            log::trace!("html5 policy: empty tag name, falling back to unknown tag id");
            return self.unknown_tag_id();
        }
        Box::from(name.to_ascii_lowercase())
    }

    fn is_same_element(&self, a: &Self::TagId, b: &Self::TagId) -> bool {
        a == b
    }

    fn is_void_element(&self, id: &Self::TagId) -> bool {
        void_set().contains(id.as_ref())
    }

    fn is_content_element(&self, _id: &Self::TagId) -> bool {
        false
    }

    fn is_opaque_element(&self, id: &Self::TagId) -> bool {
        opaque_set().contains(id.as_ref())
    }

    fn is_autoclosing_sibling(&self, open_id: &Self::TagId, new_id: &Self::TagId) -> bool {
        match (open_id.as_ref(), new_id.as_ref()) {
            (b"li", b"li") => true,
            (b"p", b"p") => true,
            (b"dt", b"dt" | b"dd") => true,
            (b"dd", b"dt" | b"dd") => true,
            (b"tr", b"tr") => true,
            (b"td" | b"th", b"td" | b"th" | b"tr") => true,
            (b"option", b"option") => true,
            _ => false,
        }
    }

    fn is_autoclose_by_parent(&self, id: &Self::TagId) -> bool {
        autoclose_by_parent_set().contains(id.as_ref())
    }

    fn is_wildcard_end_tag(&self, _id: &Self::TagId) -> bool {
        false
    }

    fn is_autoclosing_end_tag(&self, _id: &Self::TagId) -> bool {
        false
    }
}
