//! A case-sensitive, no-autoclose reference policy: names are preserved
//! verbatim, nothing is void or opaque, and no element implicitly closes
//! another. Useful as a baseline and as the policy most of this crate's
//! unit tests run against.

use crate::policy::Policy;

/// Zero-sized: an `Xml` policy carries no configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xml;

impl Policy for Xml {
    type TagId = Box<[u8]>;

    fn unknown_tag_id(&self) -> Self::TagId {
        Box::from(&b""[..])
    }

    fn tag_id(&self, name: &[u8]) -> Self::TagId {
        if name.is_empty() {
            log::trace!("xml policy: empty tag name, falling back to unknown tag id");
            return self.unknown_tag_id();
        }
        Box::from(name)
    }

    fn is_same_element(&self, a: &Self::TagId, b: &Self::TagId) -> bool {
        a == b
    }

    fn is_void_element(&self, _id: &Self::TagId) -> bool {
        false
    }

    fn is_content_element(&self, _id: &Self::TagId) -> bool {
        false
    }

    fn is_opaque_element(&self, _id: &Self::TagId) -> bool {
        false
    }

    fn is_autoclosing_sibling(&self, _open_id: &Self::TagId, _new_id: &Self::TagId) -> bool {
        false
    }

    fn is_autoclose_by_parent(&self, _id: &Self::TagId) -> bool {
        false
    }

    fn is_wildcard_end_tag(&self, _id: &Self::TagId) -> bool {
        false
    }

    fn is_autoclosing_end_tag(&self, _id: &Self::TagId) -> bool {
        false
    }
}
