//! Event payloads delivered to a `Handler`. Composition over inheritance:
//! `StartTag`/`EndTag` carry a `TagPrefix` field and `Deref` to it rather than
//! extending it, so `tag.name` and `tag.prefix.name` both read naturally.

use std::ops::Deref;

use crate::position::Range;

/// One attribute discovered by the attribute sub-parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: Range,
    pub value: Range,
    pub all: Range,
}

/// The part common to start tags and end tags: an identified name inside a
/// `<...>`/`</...>` span.
#[derive(Debug, Clone)]
pub struct TagPrefix<Id> {
    pub tag_id: Id,
    pub name: Range,
    pub all: Range,
}

/// Whether a start tag's self-closing marker is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfClosingPolicy {
    /// The marker, if present, is honored.
    Allowed,
    /// `isContentElement`: the marker is ignored, the tag always opens.
    Prohibited,
    /// `isVoidElement`: the tag is self-closing whether or not the marker
    /// was written.
    Required,
}

/// Whether the literal `/` before `>` was present in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfClosingMarker {
    Absent,
    Present,
}

#[derive(Debug, Clone)]
pub struct StartTag<Id> {
    pub prefix: TagPrefix<Id>,
    pub self_closing_policy: SelfClosingPolicy,
    pub self_closing_marker: SelfClosingMarker,
}

impl<Id> Deref for StartTag<Id> {
    type Target = TagPrefix<Id>;
    fn deref(&self) -> &Self::Target {
        &self.prefix
    }
}

impl<Id> StartTag<Id> {
    pub fn is_self_closing(&self) -> bool {
        match self.self_closing_policy {
            SelfClosingPolicy::Required => true,
            SelfClosingPolicy::Prohibited => false,
            SelfClosingPolicy::Allowed => {
                matches!(self.self_closing_marker, SelfClosingMarker::Present)
            }
        }
    }
}

/// How an end tag came to close what it closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTagState {
    /// Named no open element; nothing was popped.
    Unmatched,
    /// Named (or wildcard-resolved to) the top of the stack; matched
    /// directly.
    Matched,
    /// Synthesized because the parent closed (or EOF was reached) while
    /// this element was still open.
    AutoclosedByParent,
    /// Synthesized because a sibling that autocloses this element opened.
    AutoclosedBySibling,
    /// Synthesized because an enclosing landmark end tag matched and swept
    /// this element off the stack along the way.
    AutoclosedByAncestor,
}

impl EndTagState {
    pub fn is_autoclosed(&self) -> bool {
        matches!(
            self,
            EndTagState::AutoclosedByParent
                | EndTagState::AutoclosedBySibling
                | EndTagState::AutoclosedByAncestor
        )
    }
}

#[derive(Debug, Clone)]
pub struct EndTag<Id> {
    pub prefix: TagPrefix<Id>,
    pub state: EndTagState,
}

impl<Id> Deref for EndTag<Id> {
    type Target = TagPrefix<Id>;
    fn deref(&self) -> &Self::Target {
        &self.prefix
    }
}
