//! A customizable, single-pass tokenizer for angle-bracket markup (HTML,
//! XML, and dialects in between).
//!
//! Given a complete in-memory source document, a [`policy::Policy`], and a
//! [`handler::Handler`], [`tokenizer::parse`] emits a stream of typed
//! events delimiting regions of the source by byte offset: text runs,
//! comments, CDATA, processing instructions, declarations, and start/end
//! tags with their attributes. It performs no tree construction, no
//! namespace resolution, and no validation — those are layered on top by
//! the application, not by this crate.

pub mod attributes;
pub mod events;
pub mod handler;
pub mod policies;
pub mod policy;
pub mod position;
pub mod qname;
mod scan;
pub mod stack;
pub mod tokenizer;

pub use events::{Attribute, EndTag, EndTagState, SelfClosingMarker, SelfClosingPolicy, StartTag, TagPrefix};
pub use handler::{BaseHandler, Handler};
pub use policy::Policy;
pub use position::{Position, Range, NPOS};
pub use qname::QualifiedName;
pub use stack::OpenElementStack;
pub use tokenizer::{parse, Tokenizer};
