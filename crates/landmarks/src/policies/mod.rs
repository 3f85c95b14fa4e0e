//! Reference `Policy` implementations. These exist to exercise the
//! tokenizer's contract end-to-end and to back the tests that mirror the
//! named scenarios; neither is a conformance dataset for its namesake
//! format.

pub mod html;
pub mod xml;

pub use html::Html5;
pub use xml::Xml;
