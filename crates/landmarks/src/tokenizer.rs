//! The outer scan loop: finds the next syntactic opener, classifies it,
//! dispatches to the matching sub-scanner, maintains the open-element
//! stack, and synthesizes autoclose end-tag events.

use std::ops::ControlFlow;

use crate::attributes::scan_attributes;
use crate::events::{EndTag, EndTagState, SelfClosingMarker, SelfClosingPolicy, StartTag, TagPrefix};
use crate::handler::{propagate, Handler};
use crate::policy::Policy;
use crate::position::{Position, Range, NPOS};
use crate::scan::find_from;
use crate::stack::OpenElementStack;

/// What a per-opener scan found: either resume the main loop normally, or
/// the source was truncated mid-token and the parse must wind down to
/// `EndOfInput` without the usual autoclose-by-parent tail.
enum Step {
    Continue,
    Truncated,
}

enum OpenerKind {
    EndTag,
    Comment,
    CData,
    Declaration,
    Processing,
    StartTag,
}

/// Runs a policy-driven, single-pass scan of `source`, delivering events to
/// `handler`. One instance is good for exactly one `run()`.
pub struct Tokenizer<'s, P: Policy, H> {
    source: &'s [u8],
    policy: P,
    handler: H,
    stack: OpenElementStack<P::TagId>,
}

/// Parses `source` under `policy`, delivering events to `handler`, and
/// returns the handler back (so an accumulating handler's results can be
/// read out) unless a handler aborted the parse with `ControlFlow::Break`.
pub fn parse<P: Policy, H: Handler<P>>(
    source: &[u8],
    policy: P,
    handler: H,
) -> ControlFlow<H::Break, H> {
    Tokenizer::new(source, policy, handler).run()
}

impl<'s, P: Policy, H: Handler<P>> Tokenizer<'s, P, H> {
    pub fn new(source: &'s [u8], policy: P, handler: H) -> Self {
        Tokenizer {
            source,
            policy,
            handler,
            stack: OpenElementStack::new(),
        }
    }

    pub fn run(mut self) -> ControlFlow<H::Break, H> {
        match self.main_loop() {
            ControlFlow::Continue(()) => ControlFlow::Continue(self.handler),
            ControlFlow::Break(b) => ControlFlow::Break(b),
        }
    }

    fn main_loop(&mut self) -> ControlFlow<H::Break> {
        let mut anchor: Position = 0;
        let mut pos: Position = 0;

        loop {
            let lt = find_from(self.source, pos, b"<");

            if lt == NPOS {
                propagate!(self.flush_text(anchor, self.source.len()));
                propagate!(self.autoclose_tail());
                propagate!(self.emit_end_of_input());
                return ControlFlow::Continue(());
            }

            // A start-tag candidate may turn out to have no legal name-start
            // character, in which case the `<` folds back into the
            // surrounding text run rather than becoming a token boundary —
            // so unlike every other opener kind, it must not flush text
            // up front. `scan_start_tag` flushes internally once the name
            // start is confirmed.
            let kind = self.classify_opener(lt);
            if !matches!(kind, OpenerKind::StartTag) {
                propagate!(self.flush_text(anchor, lt));
            }

            let step = match kind {
                OpenerKind::EndTag => propagate!(self.scan_end_tag(lt, &mut anchor, &mut pos)),
                OpenerKind::Comment => propagate!(self.scan_closed_span(
                    lt,
                    b"-->",
                    &mut anchor,
                    &mut pos,
                    |h, doc, r| h.comment(doc, r)
                )),
                OpenerKind::CData => propagate!(self.scan_closed_span(
                    lt,
                    b"]]>",
                    &mut anchor,
                    &mut pos,
                    |h, doc, r| h.cdata(doc, r)
                )),
                OpenerKind::Declaration => propagate!(self.scan_closed_span(
                    lt,
                    b">",
                    &mut anchor,
                    &mut pos,
                    |h, doc, r| h.declaration(doc, r)
                )),
                OpenerKind::Processing => propagate!(self.scan_closed_span(
                    lt,
                    b"?>",
                    &mut anchor,
                    &mut pos,
                    |h, doc, r| h.processing(doc, r)
                )),
                OpenerKind::StartTag => propagate!(self.scan_start_tag(lt, &mut anchor, &mut pos)),
            };

            if let Step::Truncated = step {
                propagate!(self.emit_end_of_input());
                return ControlFlow::Continue(());
            }
        }
    }

    fn flush_text(&mut self, anchor: Position, end: Position) -> ControlFlow<H::Break> {
        if end > anchor {
            self.handler.text(self.source, Range::new(anchor, end))
        } else {
            ControlFlow::Continue(())
        }
    }

    fn classify_opener(&self, lt: Position) -> OpenerKind {
        let rest = &self.source[lt..];
        if rest.starts_with(b"</") {
            OpenerKind::EndTag
        } else if rest.starts_with(b"<!--") {
            OpenerKind::Comment
        } else if rest.starts_with(b"<![CDATA[") {
            OpenerKind::CData
        } else if rest.starts_with(b"<!") {
            OpenerKind::Declaration
        } else if rest.starts_with(b"<?") {
            OpenerKind::Processing
        } else {
            OpenerKind::StartTag
        }
    }

    /// Comment/CData/Declaration/Processing all share this shape: find the
    /// closer searching from the *opener's* start (not after it), so a
    /// degenerate overlap like `<!-->` still terminates as one token.
    fn scan_closed_span(
        &mut self,
        lt: Position,
        closer: &[u8],
        anchor: &mut Position,
        pos: &mut Position,
        emit: impl FnOnce(&mut H, &[u8], Range) -> ControlFlow<H::Break>,
    ) -> ControlFlow<H::Break, Step> {
        match find_from(self.source, lt, closer) {
            NPOS => {
                propagate!(emit(&mut self.handler, self.source, Range::incomplete(lt)));
                ControlFlow::Continue(Step::Truncated)
            }
            close_pos => {
                let end = close_pos + closer.len();
                propagate!(emit(&mut self.handler, self.source, Range::new(lt, end)));
                *anchor = end;
                *pos = end;
                ControlFlow::Continue(Step::Continue)
            }
        }
    }

    fn is_element_name_end(&self, b: u8) -> bool {
        self.policy.is_space(b) || b == b'/' || b == b'>'
    }

    /// The position of the first byte at or after `start` that terminates
    /// an element name, or `NPOS` if the source ends first.
    fn find_name_end(&self, start: Position) -> Position {
        let mut pos = start;
        loop {
            match self.source.get(pos) {
                None => return NPOS,
                Some(&b) if self.is_element_name_end(b) => return pos,
                _ => pos += 1,
            }
        }
    }

    fn sibling_autoclose_depth(&self, new_id: &P::TagId) -> usize {
        let mut depth = 0;
        for open_id in self.stack.top_down() {
            depth += 1;
            if self.policy.is_autoclosing_sibling(open_id, new_id) {
                return depth;
            }
        }
        0
    }

    fn emit_synthesized_end_tag(
        &mut self,
        tag_id: P::TagId,
        pos: Position,
        state: EndTagState,
    ) -> ControlFlow<H::Break> {
        let empty = Range::new(pos, pos);
        let prefix = TagPrefix {
            tag_id: tag_id.clone(),
            name: empty,
            all: empty,
        };
        propagate!(self.handler.end_tag_prefix(self.source, &prefix));
        let end_tag = EndTag {
            prefix: TagPrefix {
                tag_id,
                name: empty,
                all: empty,
            },
            state,
        };
        self.handler.end_tag(self.source, &end_tag)
    }

    fn autoclose_tail(&mut self) -> ControlFlow<H::Break> {
        loop {
            let top = match self.stack.current() {
                Some(id) => id.clone(),
                None => break,
            };
            if !self.policy.is_autoclose_by_parent(&top) {
                break;
            }
            self.stack.pop();
            propagate!(self.emit_synthesized_end_tag(top, self.source.len(), EndTagState::AutoclosedByParent));
        }
        ControlFlow::Continue(())
    }

    fn emit_end_of_input(&mut self) -> ControlFlow<H::Break> {
        self.handler.end_of_input(self.source, self.stack.as_slice())
    }

    fn scan_start_tag(
        &mut self,
        lt: Position,
        anchor: &mut Position,
        pos: &mut Position,
    ) -> ControlFlow<H::Break, Step> {
        let name_start = self.policy.element_name_start(self.source, lt + 1);
        if name_start == NPOS {
            // Fold this `<` into the surrounding text run; anchor stays put.
            *pos = lt + 1;
            return ControlFlow::Continue(Step::Continue);
        }

        propagate!(self.flush_text(*anchor, lt));

        let name_end = self.find_name_end(name_start);
        if name_end == NPOS {
            let tag_id = self.policy.tag_id(&self.source[name_start..]);
            let name = Range::incomplete(name_start);
            let all = Range::incomplete(lt);
            propagate!(self.handler.start_tag_prefix(
                self.source,
                &TagPrefix { tag_id: tag_id.clone(), name, all }
            ));
            let start_tag = StartTag {
                prefix: TagPrefix { tag_id, name, all },
                self_closing_policy: SelfClosingPolicy::Allowed,
                self_closing_marker: SelfClosingMarker::Absent,
            };
            propagate!(self.handler.start_tag(self.source, &start_tag));
            return ControlFlow::Continue(Step::Truncated);
        }

        let tag_id = self.policy.tag_id(&self.source[name_start..name_end]);

        let sibling_depth = self.sibling_autoclose_depth(&tag_id);
        for _ in 0..sibling_depth {
            let closed = self.stack.pop().expect("sibling_autoclose_depth counted live frames");
            propagate!(self.emit_synthesized_end_tag(closed, lt, EndTagState::AutoclosedBySibling));
        }

        let name = Range::new(name_start, name_end);
        let prefix_all = Range::new(lt, name_end);
        propagate!(self.handler.start_tag_prefix(
            self.source,
            &TagPrefix { tag_id: tag_id.clone(), name, all: prefix_all }
        ));

        let self_closing_policy = if self.policy.is_void_element(&tag_id) {
            SelfClosingPolicy::Required
        } else if self.policy.is_content_element(&tag_id) {
            SelfClosingPolicy::Prohibited
        } else {
            SelfClosingPolicy::Allowed
        };

        let mut attribute_break = None;
        let attrs_end = scan_attributes(&self.policy, self.source, name_end, |attribute| {
            match self.handler.start_tag_attribute(self.source, &attribute) {
                ControlFlow::Continue(()) => true,
                ControlFlow::Break(b) => {
                    attribute_break = Some(b);
                    false
                }
            }
        });
        if let Some(b) = attribute_break {
            return ControlFlow::Break(b);
        }

        if attrs_end.pos == NPOS {
            let all = Range::incomplete(lt);
            let start_tag = StartTag {
                prefix: TagPrefix { tag_id, name, all },
                self_closing_policy,
                self_closing_marker: SelfClosingMarker::Absent,
            };
            propagate!(self.handler.start_tag(self.source, &start_tag));
            return ControlFlow::Continue(Step::Truncated);
        }

        let all = Range::new(lt, attrs_end.pos);
        let self_closing_marker = if attrs_end.self_closing_marker {
            SelfClosingMarker::Present
        } else {
            SelfClosingMarker::Absent
        };
        let start_tag = StartTag {
            prefix: TagPrefix { tag_id: tag_id.clone(), name, all },
            self_closing_policy,
            self_closing_marker,
        };
        let is_self_closing = start_tag.is_self_closing();
        propagate!(self.handler.start_tag(self.source, &start_tag));

        *anchor = attrs_end.pos;
        *pos = attrs_end.pos;

        if !is_self_closing {
            self.stack.push(tag_id.clone());
            if self.policy.is_opaque_element(&tag_id) {
                self.scan_opaque_element(&tag_id, pos);
            }
        }

        ControlFlow::Continue(Step::Continue)
    }

    /// Scans raw bytes past an opaque element's start tag for the matching
    /// end tag, without interpreting any markup in between. Rewinds `pos`
    /// to just before the matching `</` so the main loop emits the
    /// buffered content as one Text event, then the end tag normally. If no
    /// match exists before the source ends, `pos` is left at the end of the
    /// source and the element stays open.
    fn scan_opaque_element(&mut self, tag_id: &P::TagId, pos: &mut Position) {
        let mut search_from = *pos;
        loop {
            let lt = find_from(self.source, search_from, b"</");
            if lt == NPOS {
                *pos = self.source.len();
                return;
            }

            let name_start = self.policy.element_name_start(self.source, lt + 2);
            if name_start == NPOS {
                search_from = lt + 2;
                continue;
            }
            // `name_start > source.len()` cannot arise: `element_name_start`
            // only ever returns a position it found a byte at.
            debug_assert!(name_start <= self.source.len());

            let name_end = self.find_name_end(name_start);
            if name_end == NPOS {
                *pos = self.source.len();
                return;
            }

            let candidate_id = self.policy.tag_id(&self.source[name_start..name_end]);
            if self.policy.is_same_element(tag_id, &candidate_id) {
                *pos = lt;
                return;
            }
            search_from = name_end;
        }
    }

    fn scan_end_tag(
        &mut self,
        lt: Position,
        anchor: &mut Position,
        pos: &mut Position,
    ) -> ControlFlow<H::Break, Step> {
        let name_candidate_start = lt + 2;
        let raw_name_start = self.policy.element_name_start(self.source, name_candidate_start);
        let name_missing = raw_name_start == NPOS;
        let name_start = if name_missing { name_candidate_start } else { raw_name_start };
        let name_end = self.find_name_end(name_start);

        if name_end == NPOS {
            let tag_id = if name_missing {
                self.policy.unknown_tag_id()
            } else {
                self.policy.tag_id(self.source.get(name_start..).unwrap_or(&[]))
            };
            let name = Range::incomplete(name_start);
            let all = Range::incomplete(lt);
            propagate!(self.handler.end_tag_prefix(
                self.source,
                &TagPrefix { tag_id: tag_id.clone(), name, all }
            ));
            let end_tag = EndTag {
                prefix: TagPrefix { tag_id, name, all },
                state: EndTagState::Unmatched,
            };
            propagate!(self.handler.end_tag(self.source, &end_tag));
            return ControlFlow::Continue(Step::Truncated);
        }

        let mut tag_id = if name_missing {
            self.policy.unknown_tag_id()
        } else {
            self.policy.tag_id(&self.source[name_start..name_end])
        };

        let mut state = EndTagState::Unmatched;

        if !self.stack.is_empty() {
            if self.policy.is_wildcard_end_tag(&tag_id) {
                tag_id = self.stack.current().expect("checked non-empty").clone();
            }

            let top_matches = self
                .stack
                .current()
                .map_or(false, |top| self.policy.is_same_element(&tag_id, top));

            if top_matches {
                self.stack.pop();
                state = EndTagState::Matched;
            } else {
                let landmark = self.policy.is_autoclosing_end_tag(&tag_id);
                let per_pop_state = if landmark {
                    EndTagState::AutoclosedByAncestor
                } else {
                    EndTagState::AutoclosedByParent
                };

                let mut found_depth = None;
                let mut depth = 0;
                for open_id in self.stack.top_down() {
                    depth += 1;
                    if self.policy.is_same_element(open_id, &tag_id) {
                        found_depth = Some(depth);
                        break;
                    }
                    if !(landmark || self.policy.is_autoclose_by_parent(open_id)) {
                        break;
                    }
                }

                if let Some(depth) = found_depth {
                    for _ in 0..depth - 1 {
                        let closed = self.stack.pop().expect("walk stayed within stack bounds");
                        propagate!(self.emit_synthesized_end_tag(closed, lt, per_pop_state));
                    }
                    self.stack.pop();
                    state = EndTagState::Matched;
                }
            }
        }

        let name = Range::new(name_start, name_end);
        let prefix_all = Range::new(lt, name_end);
        propagate!(self.handler.end_tag_prefix(
            self.source,
            &TagPrefix { tag_id: tag_id.clone(), name, all: prefix_all }
        ));

        let mut attribute_break = None;
        let attrs_end = scan_attributes(&self.policy, self.source, name_end, |attribute| {
            match self.handler.end_tag_attribute(self.source, &attribute) {
                ControlFlow::Continue(()) => true,
                ControlFlow::Break(b) => {
                    attribute_break = Some(b);
                    false
                }
            }
        });
        if let Some(b) = attribute_break {
            return ControlFlow::Break(b);
        }

        if attrs_end.pos == NPOS {
            let all = Range::incomplete(lt);
            let end_tag = EndTag { prefix: TagPrefix { tag_id, name, all }, state };
            propagate!(self.handler.end_tag(self.source, &end_tag));
            return ControlFlow::Continue(Step::Truncated);
        }

        let all = Range::new(lt, attrs_end.pos);
        let end_tag = EndTag { prefix: TagPrefix { tag_id, name, all }, state };
        propagate!(self.handler.end_tag(self.source, &end_tag));

        *anchor = attrs_end.pos;
        *pos = attrs_end.pos;

        ControlFlow::Continue(Step::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Attribute;
    use crate::policies::{html::Html5, xml::Xml};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Text(String),
        Comment(String),
        CData(String),
        Processing(String),
        Declaration(String),
        StartTagPrefix(String),
        StartTagAttribute(String, String),
        StartTag(String, bool),
        EndTagPrefix(String),
        EndTagAttribute(String, String),
        EndTag(String, &'static str),
        EndOfInput(Vec<String>),
    }

    fn state_label(state: EndTagState) -> &'static str {
        match state {
            EndTagState::Unmatched => "unmatched",
            EndTagState::Matched => "matched",
            EndTagState::AutoclosedByParent => "autoclosed-by-parent",
            EndTagState::AutoclosedBySibling => "autoclosed-by-sibling",
            EndTagState::AutoclosedByAncestor => "autoclosed-by-ancestor",
        }
    }

    fn text_of(doc: &[u8], range: Range) -> String {
        String::from_utf8_lossy(range.text(doc)).into_owned()
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl<P: Policy> Handler<P> for Recorder
    where
        P::TagId: AsRef<[u8]>,
    {
        type Break = ();

        fn text(&mut self, doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(Event::Text(text_of(doc, range)));
            ControlFlow::Continue(())
        }

        fn comment(&mut self, doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(Event::Comment(text_of(doc, range)));
            ControlFlow::Continue(())
        }

        fn cdata(&mut self, doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(Event::CData(text_of(doc, range)));
            ControlFlow::Continue(())
        }

        fn processing(&mut self, doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(Event::Processing(text_of(doc, range)));
            ControlFlow::Continue(())
        }

        fn declaration(&mut self, doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(Event::Declaration(text_of(doc, range)));
            ControlFlow::Continue(())
        }

        fn start_tag_prefix(&mut self, doc: &[u8], prefix: &TagPrefix<P::TagId>) -> ControlFlow<()> {
            self.0
                .push(Event::StartTagPrefix(text_of(doc, prefix.name)));
            ControlFlow::Continue(())
        }

        fn start_tag_attribute(&mut self, doc: &[u8], attribute: &Attribute) -> ControlFlow<()> {
            self.0.push(Event::StartTagAttribute(
                text_of(doc, attribute.name),
                text_of(doc, attribute.value),
            ));
            ControlFlow::Continue(())
        }

        fn start_tag(&mut self, doc: &[u8], tag: &StartTag<P::TagId>) -> ControlFlow<()> {
            self.0
                .push(Event::StartTag(text_of(doc, tag.name), tag.is_self_closing()));
            ControlFlow::Continue(())
        }

        fn end_tag_prefix(&mut self, doc: &[u8], prefix: &TagPrefix<P::TagId>) -> ControlFlow<()> {
            self.0.push(Event::EndTagPrefix(if prefix.name.is_empty() {
                String::from_utf8_lossy(prefix.tag_id.as_ref()).into_owned()
            } else {
                text_of(doc, prefix.name)
            }));
            ControlFlow::Continue(())
        }

        fn end_tag_attribute(&mut self, doc: &[u8], attribute: &Attribute) -> ControlFlow<()> {
            self.0.push(Event::EndTagAttribute(
                text_of(doc, attribute.name),
                text_of(doc, attribute.value),
            ));
            ControlFlow::Continue(())
        }

        fn end_tag(&mut self, doc: &[u8], tag: &EndTag<P::TagId>) -> ControlFlow<()> {
            let name = if tag.name.is_empty() {
                String::from_utf8_lossy(tag.tag_id.as_ref()).into_owned()
            } else {
                text_of(doc, tag.name)
            };
            self.0.push(Event::EndTag(name, state_label(tag.state)));
            ControlFlow::Continue(())
        }

        fn end_of_input(&mut self, _doc: &[u8], open: &[P::TagId]) -> ControlFlow<()> {
            let ids = open
                .iter()
                .map(|id| String::from_utf8_lossy(id.as_ref()).into_owned())
                .collect();
            self.0.push(Event::EndOfInput(ids));
            ControlFlow::Continue(())
        }
    }

    fn run<P: Policy>(source: &[u8], policy: P) -> Vec<Event>
    where
        P::TagId: AsRef<[u8]>,
    {
        match parse(source, policy, Recorder::default()) {
            ControlFlow::Continue(recorder) => recorder.0,
            ControlFlow::Break(()) => unreachable!("recorder never breaks"),
        }
    }

    #[test]
    fn scenario_1_attributes_quoted_unquoted_and_valueless() {
        let events = run(b"<a b='1' c=\"2\" d e>x</a>", Xml);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("a".into()),
                Event::StartTagAttribute("b".into(), "1".into()),
                Event::StartTagAttribute("c".into(), "2".into()),
                Event::StartTagAttribute("d".into(), "".into()),
                Event::StartTagAttribute("e".into(), "".into()),
                Event::StartTag("a".into(), false),
                Event::Text("x".into()),
                Event::EndTagPrefix("a".into()),
                Event::EndTag("a".into(), "matched"),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn scenario_2_p_autocloses_by_parent_at_eof() {
        let events = run(b"<p>hi", Html5);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("p".into()),
                Event::StartTag("p".into(), false),
                Event::Text("hi".into()),
                Event::EndTagPrefix("p".into()),
                Event::EndTag("p".into(), "autoclosed-by-parent"),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn scenario_3_script_is_opaque() {
        let events = run(b"<script>if (a<b) { }</script>", Html5);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("script".into()),
                Event::StartTag("script".into(), false),
                Event::Text("if (a<b) { }".into()),
                Event::EndTagPrefix("script".into()),
                Event::EndTag("script".into(), "matched"),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn scenario_4_br_is_void_and_self_closing() {
        let events = run(b"<br/>", Html5);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("br".into()),
                Event::StartTag("br".into(), true),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn scenario_5_unmatched_end_tag_closes_nothing() {
        let events = run(b"<a><b></a>", Xml);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("a".into()),
                Event::StartTag("a".into(), false),
                Event::StartTagPrefix("b".into()),
                Event::StartTag("b".into(), false),
                Event::EndTagPrefix("a".into()),
                Event::EndTag("a".into(), "unmatched"),
                Event::EndOfInput(vec!["a".into(), "b".into()]),
            ]
        );
    }

    /// A policy identical to `Xml` except `</a>` is a landmark end tag that
    /// sweeps every open descendant, used to exercise scenario 6 in
    /// isolation from any reference policy's own landmark rules.
    #[derive(Clone, Copy, Default)]
    struct LandmarkA;

    impl Policy for LandmarkA {
        type TagId = Box<[u8]>;

        fn unknown_tag_id(&self) -> Self::TagId {
            Box::from(&b""[..])
        }

        fn tag_id(&self, name: &[u8]) -> Self::TagId {
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

        fn is_autoclosing_end_tag(&self, id: &Self::TagId) -> bool {
            id.as_ref() == b"a"
        }
    }

    #[test]
    fn scenario_6_landmark_end_tag_sweeps_descendants() {
        let events = run(b"<a><b></a>", LandmarkA);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("a".into()),
                Event::StartTag("a".into(), false),
                Event::StartTagPrefix("b".into()),
                Event::StartTag("b".into(), false),
                Event::EndTagPrefix("b".into()),
                Event::EndTag("b".into(), "autoclosed-by-ancestor"),
                Event::EndTagPrefix("a".into()),
                Event::EndTag("a".into(), "matched"),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn scenario_7_li_autocloses_sibling_li() {
        let events = run(b"<li>x<li>y", Html5);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("li".into()),
                Event::StartTag("li".into(), false),
                Event::Text("x".into()),
                Event::EndTagPrefix("li".into()),
                Event::EndTag("li".into(), "autoclosed-by-sibling"),
                Event::StartTagPrefix("li".into()),
                Event::StartTag("li".into(), false),
                Event::Text("y".into()),
                Event::EndTagPrefix("li".into()),
                Event::EndTag("li".into(), "autoclosed-by-parent"),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    /// The default `element_name_start` requires an ASCII alphanumeric, so
    /// a `<` followed by a space never starts a tag and folds back into
    /// the surrounding text run.
    #[test]
    fn scenario_8_angle_brackets_without_a_name_fold_into_text() {
        let source = b"5 < 10 and 10 > 5";
        let events = run(source, Xml);
        assert_eq!(
            events,
            vec![
                Event::Text(String::from_utf8_lossy(source).into_owned()),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn self_closing_tag_does_not_push_the_stack() {
        let events = run(b"<x/>", Xml);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("x".into()),
                Event::StartTag("x".into(), true),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn duplicate_attributes_are_each_reported() {
        let events = run(b"<a x='1' x='2'></a>", Xml);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("a".into()),
                Event::StartTagAttribute("x".into(), "1".into()),
                Event::StartTagAttribute("x".into(), "2".into()),
                Event::StartTag("a".into(), false),
                Event::EndTagPrefix("a".into()),
                Event::EndTag("a".into(), "matched"),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn attributes_on_end_tags_are_reported() {
        let events = run(b"<a></a foo='bar'>", Xml);
        assert_eq!(
            events,
            vec![
                Event::StartTagPrefix("a".into()),
                Event::StartTag("a".into(), false),
                Event::EndTagPrefix("a".into()),
                Event::EndTagAttribute("foo".into(), "bar".into()),
                Event::EndTag("a".into(), "matched"),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn truncated_comment_has_incomplete_range_and_ends_the_parse() {
        let events = run(b"text <!-- unterminated", Xml);
        assert_eq!(
            events,
            vec![
                Event::Text("text ".into()),
                Event::Comment("<!-- unterminated".into()),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn degenerate_comment_terminates_at_first_closer_overlap() {
        // `<!-->` searches for `-->` starting at the opener itself, so the
        // comment closes immediately rather than swallowing more input.
        let events = run(b"<!-->after", Xml);
        assert_eq!(
            events,
            vec![
                Event::Comment("<!-->".into()),
                Event::Text("after".into()),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn well_formed_comment_is_emitted_whole() {
        let events = run(b"before<!-- hello -->after", Xml);
        assert_eq!(
            events,
            vec![
                Event::Text("before".into()),
                Event::Comment("<!-- hello -->".into()),
                Event::Text("after".into()),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn well_formed_cdata_section_is_emitted_whole() {
        let events = run(b"before<![CDATA[hi]]>after", Xml);
        assert_eq!(
            events,
            vec![
                Event::Text("before".into()),
                Event::CData("<![CDATA[hi]]>".into()),
                Event::Text("after".into()),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn well_formed_processing_instruction_is_emitted_whole() {
        let events = run(b"before<?xml version=\"1.0\"?>after", Xml);
        assert_eq!(
            events,
            vec![
                Event::Text("before".into()),
                Event::Processing("<?xml version=\"1.0\"?>".into()),
                Event::Text("after".into()),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn well_formed_declaration_is_emitted_whole() {
        let events = run(b"before<!DOCTYPE html>after", Xml);
        assert_eq!(
            events,
            vec![
                Event::Text("before".into()),
                Event::Declaration("<!DOCTYPE html>".into()),
                Event::Text("after".into()),
                Event::EndOfInput(vec![]),
            ]
        );
    }

    #[test]
    fn early_exit_stops_delivery_immediately() {
        struct StopAfterFirstStartTag {
            seen: usize,
        }

        impl<P: Policy> Handler<P> for StopAfterFirstStartTag {
            type Break = ();

            fn start_tag(&mut self, _doc: &[u8], _tag: &StartTag<P::TagId>) -> ControlFlow<()> {
                self.seen += 1;
                ControlFlow::Break(())
            }
        }

        let handler = StopAfterFirstStartTag { seen: 0 };
        let result = parse(b"<a><b></b></a>", Xml, handler);
        match result {
            ControlFlow::Break(()) => {}
            ControlFlow::Continue(_) => panic!("expected the parse to abort"),
        }
    }

    /// Splices every `Text`/`Comment`/`CData`/`Processing`/`Declaration`
    /// range and every full `StartTag`/`EndTag` `all` range, in emission
    /// order, and checks the result reconstructs the source exactly — the
    /// round-trip invariant from the testable-properties section, for
    /// inputs with no autoclose rules and no opaque content.
    #[derive(Default)]
    struct SpanRecorder(Vec<Range>);

    impl<P: Policy> Handler<P> for SpanRecorder {
        type Break = ();

        fn text(&mut self, _doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(range);
            ControlFlow::Continue(())
        }

        fn comment(&mut self, _doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(range);
            ControlFlow::Continue(())
        }

        fn cdata(&mut self, _doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(range);
            ControlFlow::Continue(())
        }

        fn processing(&mut self, _doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(range);
            ControlFlow::Continue(())
        }

        fn declaration(&mut self, _doc: &[u8], range: Range) -> ControlFlow<()> {
            self.0.push(range);
            ControlFlow::Continue(())
        }

        fn start_tag(&mut self, _doc: &[u8], tag: &StartTag<P::TagId>) -> ControlFlow<()> {
            self.0.push(tag.all);
            ControlFlow::Continue(())
        }

        fn end_tag(&mut self, _doc: &[u8], tag: &EndTag<P::TagId>) -> ControlFlow<()> {
            self.0.push(tag.all);
            ControlFlow::Continue(())
        }
    }

    #[derive(Clone, Debug)]
    enum Token {
        Text(String),
        Open(&'static str),
        Close(&'static str),
        SelfClose(&'static str),
    }

    const NAMES: &[&str] = &["a", "b", "c", "div", "span"];
    const TEXT_CHARS: &[char] = &['x', 'y', 'z', ' ', '0', '1'];

    impl quickcheck::Arbitrary for Token {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let name = *g.choose(NAMES).unwrap();
            match u8::arbitrary(g) % 4 {
                0 => {
                    let len = usize::arbitrary(g) % 5;
                    let text = (0..len)
                        .map(|_| *g.choose(TEXT_CHARS).unwrap())
                        .collect();
                    Token::Text(text)
                }
                1 => Token::Open(name),
                2 => Token::Close(name),
                _ => Token::SelfClose(name),
            }
        }
    }

    fn render(tokens: &[Token]) -> String {
        let mut source = String::new();
        for token in tokens {
            match token {
                Token::Text(s) => source.push_str(s),
                Token::Open(name) => {
                    source.push('<');
                    source.push_str(name);
                    source.push('>');
                }
                Token::Close(name) => {
                    source.push_str("</");
                    source.push_str(name);
                    source.push('>');
                }
                Token::SelfClose(name) => {
                    source.push('<');
                    source.push_str(name);
                    source.push_str("/>");
                }
            }
        }
        source
    }

    #[quickcheck_macros::quickcheck]
    fn splicing_recorded_ranges_reconstructs_the_source(tokens: Vec<Token>) -> bool {
        let source = render(&tokens);
        let bytes = source.as_bytes();
        let recorder = match parse(bytes, Xml, SpanRecorder::default()) {
            ControlFlow::Continue(r) => r,
            ControlFlow::Break(()) => return false,
        };

        let mut spliced = Vec::new();
        for range in &recorder.0 {
            spliced.extend_from_slice(range.text(bytes));
        }
        spliced == bytes
    }
}
