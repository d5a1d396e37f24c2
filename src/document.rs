use crate::emitter::AnchorData;
use crate::{
    AliasData, ComposerError, Emitter, EmitterError, EmitterMode, Event, EventData, MappingStyle,
    Mark, Parser, ScalarStyle, SequenceStyle, TagDirective, VersionDirective, DEFAULT_MAPPING_TAG,
    DEFAULT_SCALAR_TAG, DEFAULT_SEQUENCE_TAG,
};

/// The document structure.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Document {
    /// The document nodes.
    pub nodes: Vec<Node>,
    /// The version directive.
    pub version_directive: Option<VersionDirective>,
    /// The list of tag directives.
    ///
    /// ```
    /// # const _: &str = stringify! {
    /// struct {
    ///     /// The beginning of the tag directives list.
    ///     start: *mut yaml_tag_directive_t,
    ///     /// The end of the tag directives list.
    ///     end: *mut yaml_tag_directive_t,
    /// }
    /// # };
    /// ```
    pub tag_directives: Vec<TagDirective>,
    /// Is the document start indicator implicit?
    pub start_implicit: bool,
    /// Is the document end indicator implicit?
    pub end_implicit: bool,
    /// The beginning of the document.
    pub start_mark: Mark,
    /// The end of the document.
    pub end_mark: Mark,
}

/// The node structure.
#[derive(Clone, Default, Debug)]
#[non_exhaustive]
pub struct Node {
    /// The node type.
    pub data: NodeData,
    /// The node tag.
    pub tag: Option<String>,
    /// The anchor name this node was defined under, if any. Kept separately
    /// from the anchor registry so that style-preserving emission (and the
    /// `fy` test-suite CLI) can report the name the source actually used,
    /// rather than a synthesized `idNNN` anchor.
    pub anchor: Option<String>,
    /// The beginning of the node.
    pub start_mark: Mark,
    /// The end of the node.
    pub end_mark: Mark,
}

/// Node types.
#[derive(Clone, Default, Debug)]
pub enum NodeData {
    /// An empty node.
    #[default]
    NoNode,
    /// A scalar node.
    Scalar {
        /// The scalar value.
        value: String,
        /// The scalar style.
        style: ScalarStyle,
    },
    /// A sequence node.
    Sequence {
        /// The stack of sequence items.
        items: Vec<NodeItem>,
        /// The sequence style.
        style: SequenceStyle,
    },
    /// A mapping node.
    Mapping {
        /// The stack of mapping pairs (key, value).
        pairs: Vec<NodePair>,
        /// The mapping style.
        style: MappingStyle,
    },
}

/// An element of a sequence node.
pub type NodeItem = i32;

/// An element of a mapping node.
#[derive(Copy, Clone, Default, Debug)]
#[non_exhaustive]
pub struct NodePair {
    /// The key of the element.
    pub key: i32,
    /// The value of the element.
    pub value: i32,
}

impl Document {
    /// Create a YAML document.
    pub fn new(
        version_directive: Option<VersionDirective>,
        tag_directives_in: &[TagDirective],
        start_implicit: bool,
        end_implicit: bool,
    ) -> Document {
        let nodes = Vec::with_capacity(16);
        let tag_directives = tag_directives_in.to_vec();

        Document {
            nodes,
            version_directive,
            tag_directives,
            start_implicit,
            end_implicit,
            start_mark: Mark::default(),
            end_mark: Mark::default(),
        }
    }

    /// Get a node of a YAML document.
    ///
    /// Returns the node object or `None` if `index` is out of range.
    pub fn get_node_mut(&mut self, index: i32) -> Option<&mut Node> {
        self.nodes.get_mut(index as usize - 1)
    }

    /// Get a node of a YAML document.
    ///
    /// Returns the node object or `None` if `index` is out of range.
    pub fn get_node(&self, index: i32) -> Option<&Node> {
        self.nodes.get(index as usize - 1)
    }

    /// Get the root of a YAML document node.
    ///
    /// The root object is the first object added to the document.
    ///
    /// An empty document produced by the parser signifies the end of a YAML stream.
    ///
    /// Returns the node object or `None` if the document is empty.
    pub fn get_root_node(&mut self) -> Option<&mut Node> {
        self.nodes.get_mut(0)
    }

    /// Create a SCALAR node and attach it to the document.
    ///
    /// The `style` argument may be ignored by the emitter.
    ///
    /// Returns the node id or 0 on error.
    #[must_use]
    pub fn add_scalar(&mut self, tag: Option<&str>, value: &str, style: ScalarStyle) -> i32 {
        let mark = Mark {
            index: 0_u64,
            line: 0_u64,
            column: 0_u64,
        };
        let tag = tag.unwrap_or(DEFAULT_SCALAR_TAG);
        let tag_copy = String::from(tag);
        let value_copy = String::from(value);
        let node = Node {
            data: NodeData::Scalar {
                value: value_copy,
                style,
            },
            tag: Some(tag_copy),
            anchor: None,
            start_mark: mark,
            end_mark: mark,
        };
        self.nodes.push(node);
        self.nodes.len() as i32
    }

    /// Create a SEQUENCE node and attach it to the document.
    ///
    /// The `style` argument may be ignored by the emitter.
    ///
    /// Returns the node id, which is a nonzero integer.
    #[must_use]
    pub fn add_sequence(&mut self, tag: Option<&str>, style: SequenceStyle) -> i32 {
        let mark = Mark {
            index: 0_u64,
            line: 0_u64,
            column: 0_u64,
        };

        let items = Vec::with_capacity(16);
        let tag = tag.unwrap_or(DEFAULT_SEQUENCE_TAG);
        let tag_copy = String::from(tag);
        let node = Node {
            data: NodeData::Sequence { items, style },
            tag: Some(tag_copy),
            anchor: None,
            start_mark: mark,
            end_mark: mark,
        };
        self.nodes.push(node);
        self.nodes.len() as i32
    }

    /// Create a MAPPING node and attach it to the document.
    ///
    /// The `style` argument may be ignored by the emitter.
    ///
    /// Returns the node id, which is a nonzero integer.
    #[must_use]
    pub fn add_mapping(&mut self, tag: Option<&str>, style: MappingStyle) -> i32 {
        let mark = Mark {
            index: 0_u64,
            line: 0_u64,
            column: 0_u64,
        };
        let pairs = Vec::with_capacity(16);
        let tag = tag.unwrap_or(DEFAULT_MAPPING_TAG);
        let tag_copy = String::from(tag);

        let node = Node {
            data: NodeData::Mapping { pairs, style },
            tag: Some(tag_copy),
            anchor: None,
            start_mark: mark,
            end_mark: mark,
        };

        self.nodes.push(node);
        self.nodes.len() as i32
    }

    /// Add an item to a SEQUENCE node.
    pub fn append_sequence_item(&mut self, sequence: i32, item: i32) {
        assert!(sequence > 0 && sequence as usize - 1 < self.nodes.len());
        assert!(matches!(
            &self.nodes[sequence as usize - 1].data,
            NodeData::Sequence { .. }
        ));
        assert!(item > 0 && item as usize - 1 < self.nodes.len());
        if let NodeData::Sequence { ref mut items, .. } =
            &mut self.nodes[sequence as usize - 1].data
        {
            items.push(item);
        }
    }

    /// Add a pair of a key and a value to a MAPPING node.
    pub fn yaml_document_append_mapping_pair(&mut self, mapping: i32, key: i32, value: i32) {
        assert!(mapping > 0 && mapping as usize - 1 < self.nodes.len());
        assert!(matches!(
            &self.nodes[mapping as usize - 1].data,
            NodeData::Mapping { .. }
        ));
        assert!(key > 0 && key as usize - 1 < self.nodes.len());
        assert!(value > 0 && value as usize - 1 < self.nodes.len());
        let pair = NodePair { key, value };
        if let NodeData::Mapping { ref mut pairs, .. } = &mut self.nodes[mapping as usize - 1].data
        {
            pairs.push(pair);
        }
    }

    /// Parse the input stream and produce the next YAML document.
    ///
    /// Call this function subsequently to produce a sequence of documents
    /// constituting the input stream.
    ///
    /// If the produced document has no root node, it means that the document end
    /// has been reached.
    ///
    /// An application must not alternate the calls of
    /// [`yaml_parser_load()`](crate::yaml_parser_load) with the calls of
    /// [`yaml_parser_scan()`](crate::yaml_parser_scan) or
    /// [`yaml_parser_parse()`](crate::yaml_parser_parse). Doing this will break the
    /// parser.
    pub fn load(parser: &mut Parser) -> Result<Document, ComposerError> {
        let mut document = Document::new(None, &[], false, false);
        document.nodes.reserve(16);

        if !parser.stream_start_produced {
            match parser.parse() {
                Ok(Event {
                    data: EventData::StreamStart { .. },
                    ..
                }) => (),
                Ok(_) => panic!("expected stream start"),
                Err(err) => {
                    parser.delete_aliases();
                    return Err(err.into());
                }
            }
        }
        if parser.stream_end_produced {
            return Ok(document);
        }
        let err: ComposerError;
        match parser.parse() {
            Ok(event) => {
                if let EventData::StreamEnd = &event.data {
                    return Ok(document);
                }
                parser.aliases.reserve(16);
                match document.load_document(parser, event) {
                    Ok(()) => {
                        parser.delete_aliases();
                        return Ok(document);
                    }
                    Err(e) => err = e,
                }
            }
            Err(e) => err = e.into(),
        }
        parser.delete_aliases();
        Err(err)
    }

    fn load_document(&mut self, parser: &mut Parser, event: Event) -> Result<(), ComposerError> {
        let mut ctx = vec![];
        if let EventData::DocumentStart {
            version_directive,
            tag_directives,
            implicit,
        } = event.data
        {
            self.version_directive = version_directive;
            self.tag_directives = tag_directives;
            self.start_implicit = implicit;
            self.start_mark = event.start_mark;
            ctx.reserve(16);
            if let Err(err) = self.load_nodes(parser, &mut ctx) {
                ctx.clear();
                return Err(err);
            }
            ctx.clear();
            Ok(())
        } else {
            panic!("Expected YAML_DOCUMENT_START_EVENT")
        }
    }

    fn load_nodes(&mut self, parser: &mut Parser, ctx: &mut Vec<i32>) -> Result<(), ComposerError> {
        let end_implicit;
        let end_mark;

        loop {
            let event = parser.parse()?;
            match event.data {
                EventData::StreamStart { .. } => panic!("unexpected stream start event"),
                EventData::StreamEnd => panic!("unexpected stream end event"),
                EventData::DocumentStart { .. } => panic!("unexpected document start event"),
                EventData::DocumentEnd { implicit } => {
                    end_implicit = implicit;
                    end_mark = event.end_mark;
                    break;
                }
                EventData::Alias { .. } => {
                    self.load_alias(parser, event, ctx)?;
                }
                EventData::Scalar { .. } => {
                    self.load_scalar(parser, event, ctx)?;
                }
                EventData::SequenceStart { .. } => {
                    self.load_sequence(parser, event, ctx)?;
                }
                EventData::SequenceEnd => {
                    self.load_sequence_end(parser, event, ctx)?;
                }
                EventData::MappingStart { .. } => {
                    self.load_mapping(parser, event, ctx)?;
                }
                EventData::MappingEnd => {
                    self.load_mapping_end(parser, event, ctx)?;
                }
            }
        }
        self.end_implicit = end_implicit;
        self.end_mark = end_mark;
        Ok(())
    }

    /// Register `anchor` as naming node `index`.
    ///
    /// Redefining an anchor name is allowed (YAML 1.2 "latest wins"): the new
    /// entry is simply appended, and alias lookups scan from the end so they
    /// always resolve to the most recent definition still in scope.
    ///
    /// `collecting` marks whether `index` is a sequence or mapping whose
    /// children have not been loaded yet. Such anchors start in the
    /// "collecting" state (`collecting_depth == 1`) and only become safe to
    /// alias once [`Self::close_collection`] brings their depth back to 0, at
    /// [`Self::load_sequence_end`]/[`Self::load_mapping_end`]. Scalars have no
    /// children, so they register already complete (`collecting_depth == 0`).
    fn register_anchor(
        &mut self,
        parser: &mut Parser,
        index: i32,
        anchor: Option<String>,
        collecting: bool,
    ) -> Result<(), ComposerError> {
        let Some(anchor) = anchor else {
            return Ok(());
        };
        let mark = self.nodes[index as usize - 1].start_mark;
        self.nodes[index as usize - 1].anchor = Some(anchor.clone());
        parser.aliases.push(AliasData {
            anchor,
            index,
            mark,
            collecting_depth: u32::from(collecting),
        });
        Ok(())
    }

    /// Every anchor still being collected gets one level deeper when another
    /// collection opens inside it (or as a sibling still under construction).
    fn open_collection(parser: &mut Parser) {
        for alias_data in &mut parser.aliases {
            if alias_data.collecting_depth > 0 {
                alias_data.collecting_depth += 1;
            }
        }
    }

    /// Mirror of [`Self::open_collection`], called when a sequence or mapping
    /// closes. An anchor reaches `collecting_depth == 0` exactly when the
    /// collection it names has fully closed.
    fn close_collection(parser: &mut Parser) {
        for alias_data in &mut parser.aliases {
            if alias_data.collecting_depth > 0 {
                alias_data.collecting_depth -= 1;
            }
        }
    }

    fn load_node_add(&mut self, ctx: &[i32], index: i32) -> Result<(), ComposerError> {
        if ctx.is_empty() {
            return Ok(());
        }
        let parent_index: i32 = *ctx.last().unwrap();
        let parent = &mut self.nodes[parent_index as usize - 1];
        match parent.data {
            NodeData::Sequence { ref mut items, .. } => {
                items.push(index);
            }
            NodeData::Mapping { ref mut pairs, .. } => {
                let mut pair = NodePair::default();
                let mut do_push = true;
                if !pairs.is_empty() {
                    let p: &mut NodePair = pairs.last_mut().unwrap();
                    if p.key != 0 && p.value == 0 {
                        p.value = index;
                        do_push = false;
                    }
                }
                if do_push {
                    pair.key = index;
                    pair.value = 0;
                    pairs.push(pair);
                }
            }
            _ => {
                panic!("document parent node is not a sequence or a mapping")
            }
        }
        Ok(())
    }

    fn load_alias(
        &mut self,
        parser: &mut Parser,
        event: Event,
        ctx: &[i32],
    ) -> Result<(), ComposerError> {
        let EventData::Alias { anchor } = &event.data else {
            unreachable!()
        };

        for alias_data in parser.aliases.iter().rev() {
            if alias_data.anchor == *anchor {
                if alias_data.collecting_depth > 0 {
                    return Err(ComposerError::RecursiveAlias {
                        anchor: alias_data.anchor.clone(),
                        mark: event.start_mark,
                    });
                }
                return self.load_node_add(ctx, alias_data.index);
            }
        }

        Err(ComposerError::UndefinedAlias {
            mark: event.start_mark,
        })
    }

    fn load_scalar(
        &mut self,
        parser: &mut Parser,
        event: Event,
        ctx: &[i32],
    ) -> Result<(), ComposerError> {
        let EventData::Scalar {
            mut tag,
            value,
            style,
            anchor,
            ..
        } = event.data
        else {
            unreachable!()
        };

        if tag.is_none() || tag.as_deref() == Some("!") {
            tag = Some(String::from(DEFAULT_SCALAR_TAG));
        }
        let node = Node {
            data: NodeData::Scalar { value, style },
            tag,
            anchor: None,
            start_mark: event.start_mark,
            end_mark: event.end_mark,
        };
        self.nodes.push(node);
        let index: i32 = self.nodes.len() as i32;
        self.register_anchor(parser, index, anchor, false)?;
        self.load_node_add(ctx, index)
    }

    fn load_sequence(
        &mut self,
        parser: &mut Parser,
        event: Event,
        ctx: &mut Vec<i32>,
    ) -> Result<(), ComposerError> {
        let EventData::SequenceStart {
            anchor,
            mut tag,
            style,
            ..
        } = event.data
        else {
            unreachable!()
        };

        let mut items = Vec::with_capacity(16);

        if tag.is_none() || tag.as_deref() == Some("!") {
            tag = Some(String::from(DEFAULT_SEQUENCE_TAG));
        }

        let node = Node {
            data: NodeData::Sequence {
                items: core::mem::take(&mut items),
                style,
            },
            tag,
            anchor: None,
            start_mark: event.start_mark,
            end_mark: event.end_mark,
        };

        Self::open_collection(parser);
        self.nodes.push(node);
        let index: i32 = self.nodes.len() as i32;
        self.register_anchor(parser, index, anchor, true)?;
        self.load_node_add(ctx, index)?;
        ctx.push(index);
        Ok(())
    }

    fn load_sequence_end(
        &mut self,
        parser: &mut Parser,
        event: Event,
        ctx: &mut Vec<i32>,
    ) -> Result<(), ComposerError> {
        assert!(!ctx.is_empty());
        let index: i32 = *ctx.last().unwrap();
        assert!(matches!(
            self.nodes[index as usize - 1].data,
            NodeData::Sequence { .. }
        ));
        self.nodes[index as usize - 1].end_mark = event.end_mark;
        Self::close_collection(parser);
        _ = ctx.pop();
        Ok(())
    }

    fn load_mapping(
        &mut self,
        parser: &mut Parser,
        event: Event,
        ctx: &mut Vec<i32>,
    ) -> Result<(), ComposerError> {
        let EventData::MappingStart {
            anchor,
            mut tag,
            style,
            ..
        } = event.data
        else {
            unreachable!()
        };

        let mut pairs = Vec::with_capacity(16);

        if tag.is_none() || tag.as_deref() == Some("!") {
            tag = Some(String::from(DEFAULT_MAPPING_TAG));
        }
        let node = Node {
            data: NodeData::Mapping {
                pairs: core::mem::take(&mut pairs),
                style,
            },
            tag,
            anchor: None,
            start_mark: event.start_mark,
            end_mark: event.end_mark,
        };
        Self::open_collection(parser);
        self.nodes.push(node);
        let index: i32 = self.nodes.len() as i32;
        self.register_anchor(parser, index, anchor, true)?;
        self.load_node_add(ctx, index)?;
        ctx.push(index);
        Ok(())
    }

    fn load_mapping_end(
        &mut self,
        parser: &mut Parser,
        event: Event,
        ctx: &mut Vec<i32>,
    ) -> Result<(), ComposerError> {
        assert!(!ctx.is_empty());
        let index: i32 = *ctx.last().unwrap();
        assert!(matches!(
            self.nodes[index as usize - 1].data,
            NodeData::Mapping { .. }
        ));
        self.expand_merge_keys(index)?;
        self.nodes[index as usize - 1].end_mark = event.end_mark;
        Self::close_collection(parser);
        _ = ctx.pop();
        Ok(())
    }

    /// Resolve `<<` merge keys and enforce that explicit keys are unique.
    ///
    /// Keys contributed by a merge never conflict with each other or with
    /// explicit keys: an explicit key always wins, and among merge sources a
    /// mapping earlier in a merge sequence wins over one that comes later.
    /// Duplicate *explicit* keys are rejected.
    fn expand_merge_keys(&mut self, mapping_index: i32) -> Result<(), ComposerError> {
        let pairs = match &self.nodes[mapping_index as usize - 1].data {
            NodeData::Mapping { pairs, .. } => pairs.clone(),
            _ => unreachable!(),
        };

        let mut explicit: Vec<NodePair> = Vec::with_capacity(pairs.len());
        let mut merged: Vec<NodePair> = Vec::new();
        let mut saw_merge_key = false;

        for pair in &pairs {
            if self.is_merge_key(pair.key) {
                saw_merge_key = true;
                self.collect_merge_values(pair.value, &mut merged)?;
            } else {
                explicit.push(*pair);
            }
        }

        for i in 0..explicit.len() {
            for j in (i + 1)..explicit.len() {
                if self.node_key_eq(explicit[i].key, explicit[j].key) {
                    let first_mark = self.nodes[explicit[i].key as usize - 1].start_mark;
                    let mark = self.nodes[explicit[j].key as usize - 1].start_mark;
                    return Err(ComposerError::DuplicateKey { first_mark, mark });
                }
            }
        }

        if saw_merge_key {
            let mut final_pairs = explicit;
            'merge: for candidate in merged {
                for already in &final_pairs {
                    if self.node_key_eq(already.key, candidate.key) {
                        continue 'merge;
                    }
                }
                final_pairs.push(candidate);
            }
            if let NodeData::Mapping { pairs, .. } =
                &mut self.nodes[mapping_index as usize - 1].data
            {
                *pairs = final_pairs;
            }
        }

        Ok(())
    }

    /// Gather the key/value pairs contributed by the value of a merge key.
    ///
    /// The value must be a mapping, or a sequence of mappings (in which case
    /// earlier mappings in the sequence take precedence over later ones).
    fn collect_merge_values(
        &self,
        value_index: i32,
        out: &mut Vec<NodePair>,
    ) -> Result<(), ComposerError> {
        match &self.nodes[value_index as usize - 1].data {
            NodeData::Mapping { pairs, .. } => {
                for pair in pairs {
                    if !out.iter().any(|seen| self.node_key_eq(seen.key, pair.key)) {
                        out.push(*pair);
                    }
                }
                Ok(())
            }
            NodeData::Sequence { items, .. } => {
                for &item in items {
                    self.collect_merge_values(item, out)?;
                }
                Ok(())
            }
            _ => Err(ComposerError::BadMergeValue {
                mark: self.nodes[value_index as usize - 1].start_mark,
            }),
        }
    }

    /// Is this node the special `<<` merge key?
    fn is_merge_key(&self, key_index: i32) -> bool {
        let node = &self.nodes[key_index as usize - 1];
        if let NodeData::Scalar { value, style } = &node.data {
            *style == ScalarStyle::Plain
                && value == "<<"
                && node.tag.as_deref() == Some(DEFAULT_SCALAR_TAG)
        } else {
            false
        }
    }

    /// Structural equality between two keys, used for merge-key precedence
    /// and duplicate-key detection. Only scalar keys are compared by value;
    /// any other node kind is only equal to itself.
    fn node_key_eq(&self, a: i32, b: i32) -> bool {
        if a == b {
            return true;
        }
        match (&self.nodes[a as usize - 1].data, &self.nodes[b as usize - 1].data) {
            (NodeData::Scalar { value: v1, .. }, NodeData::Scalar { value: v2, .. }) => {
                v1 == v2 && self.nodes[a as usize - 1].tag == self.nodes[b as usize - 1].tag
            }
            _ => false,
        }
    }

    /// Emit this document's node tree through `emitter` as a full event
    /// stream (STREAM-START through STREAM-END).
    ///
    /// Nodes referenced more than once (shared by more than one anchor/alias
    /// pair at parse time, or by `Self::append_sequence_item`/
    /// `Self::yaml_document_append_mapping_pair` calls that reuse a node id)
    /// are given a synthesized anchor the first time they are emitted and an
    /// `ALIAS` event every time after. The document's own recorded anchor
    /// name is reused when the node has one; otherwise an `idNNN` name is
    /// synthesized.
    ///
    /// `emitter.mode` and `emitter.flags` govern block/flow/JSON output and
    /// key sorting/stripping; see [`crate::EmitterMode`] and
    /// [`crate::EmitterFlags`].
    pub fn dump(&self, emitter: &mut Emitter) -> Result<(), EmitterError> {
        emitter.emit(Event::stream_start(crate::Encoding::Utf8))?;

        if self.nodes.is_empty() {
            emitter.emit(Event::stream_end())?;
            return Ok(());
        }

        let json = is_json_mode(emitter.mode);
        let (version_directive, tag_directives) = if json {
            (None, Vec::new())
        } else if emitter.flags.version_dir_on {
            (
                Some(
                    self.version_directive
                        .unwrap_or(VersionDirective { major: 1, minor: 1 }),
                ),
                self.tag_directives.clone(),
            )
        } else {
            (self.version_directive, self.tag_directives.clone())
        };
        let start_implicit = json || self.start_implicit || emitter.flags.doc_start_mark_off;
        emitter.emit(Event::document_start(
            version_directive,
            &tag_directives,
            start_implicit,
        ))?;

        emitter.anchors = vec![AnchorData::default(); self.nodes.len() + 1];
        self.count_references(1, &mut vec![false; self.nodes.len() + 1], emitter);

        self.dump_node(emitter, 1)?;

        emitter.emit(Event::document_end(json || self.end_implicit))?;
        emitter.emit(Event::stream_end())?;
        Ok(())
    }

    /// First pass of [`Self::dump`]: count how many times each node is
    /// reached from `index` down, visiting each node's children only the
    /// first time that node is seen (the composer already rejects cycles,
    /// so the node graph is a DAG and this terminates).
    fn count_references(&self, index: i32, visited: &mut [bool], emitter: &mut Emitter) {
        emitter.anchors[index as usize].references += 1;
        if visited[index as usize] {
            return;
        }
        visited[index as usize] = true;
        match &self.nodes[index as usize - 1].data {
            NodeData::Sequence { items, .. } => {
                for &item in items {
                    self.count_references(item, visited, emitter);
                }
            }
            NodeData::Mapping { pairs, .. } => {
                for pair in pairs {
                    self.count_references(pair.key, visited, emitter);
                    self.count_references(pair.value, visited, emitter);
                }
            }
            NodeData::Scalar { .. } | NodeData::NoNode => {}
        }
    }

    fn dump_node(&self, emitter: &mut Emitter, index: i32) -> Result<(), EmitterError> {
        let json = is_json_mode(emitter.mode);
        let needs_anchor = !json && emitter.anchors[index as usize].references >= 2;

        if emitter.anchors[index as usize].serialized {
            if json {
                return Err(EmitterError::AliasInJsonMode);
            }
            let anchor = self.anchor_name(emitter, index);
            emitter.emit(Event::alias(&anchor))?;
            return Ok(());
        }

        let anchor = if needs_anchor {
            Some(self.anchor_name(emitter, index))
        } else {
            None
        };
        emitter.anchors[index as usize].serialized = true;

        let node = &self.nodes[index as usize - 1];
        let tag = node.tag.as_deref();

        match &node.data {
            NodeData::NoNode => {}
            NodeData::Scalar { value, style } => {
                let plain_implicit = tag.is_none() || tag == Some(DEFAULT_SCALAR_TAG);
                let style = if json { ScalarStyle::DoubleQuoted } else { *style };
                emitter.emit(Event::scalar(
                    anchor.as_deref(),
                    if json { None } else { tag },
                    value,
                    plain_implicit,
                    true,
                    style,
                ))?;
            }
            NodeData::Sequence { items, style } => {
                let implicit = tag.is_none() || tag == Some(DEFAULT_SEQUENCE_TAG);
                let style = resolve_sequence_style(*style, emitter.mode);
                emitter.emit(Event::sequence_start(
                    anchor.as_deref(),
                    if json { None } else { tag },
                    implicit,
                    style,
                ))?;
                for &item in items {
                    self.dump_node(emitter, item)?;
                }
                emitter.emit(Event::sequence_end())?;
            }
            NodeData::Mapping { pairs, style } => {
                let implicit = tag.is_none() || tag == Some(DEFAULT_MAPPING_TAG);
                let style = resolve_mapping_style(*style, emitter.mode);
                let mut pairs = pairs.clone();
                if emitter.flags.strip_empty_kv {
                    pairs.retain(|pair| !self.is_empty_node(pair.value));
                }
                if emitter.flags.sort_keys {
                    pairs.sort_by(|a, b| self.sort_key_of(a.key).cmp(&self.sort_key_of(b.key)));
                }
                emitter.emit(Event::mapping_start(
                    anchor.as_deref(),
                    if json { None } else { tag },
                    implicit,
                    style,
                ))?;
                for pair in &pairs {
                    self.dump_node(emitter, pair.key)?;
                    self.dump_node(emitter, pair.value)?;
                }
                emitter.emit(Event::mapping_end())?;
            }
        }

        Ok(())
    }

    /// The anchor name to use when emitting or aliasing `index`: the name
    /// the node was originally parsed under, if any, else a synthesized
    /// `idNNN` assigned the first time the node needs one.
    fn anchor_name(&self, emitter: &mut Emitter, index: i32) -> String {
        if emitter.anchors[index as usize].anchor == 0 {
            emitter.last_anchor_id += 1;
            emitter.anchors[index as usize].anchor = emitter.last_anchor_id;
        }
        match &self.nodes[index as usize - 1].anchor {
            Some(name) => name.clone(),
            None => format!("id{:03}", emitter.anchors[index as usize].anchor),
        }
    }

    fn is_empty_node(&self, index: i32) -> bool {
        match &self.nodes[index as usize - 1].data {
            NodeData::Scalar { value, .. } => value.is_empty(),
            NodeData::Sequence { items, .. } => items.is_empty(),
            NodeData::Mapping { pairs, .. } => pairs.is_empty(),
            NodeData::NoNode => true,
        }
    }

    /// Best-effort sort key for `SORT_KEYS`: the scalar text for scalar
    /// keys. Non-scalar keys have no natural total order, so they all sort
    /// equal to each other and keep their relative position (the sort is
    /// stable).
    fn sort_key_of(&self, index: i32) -> String {
        match &self.nodes[index as usize - 1].data {
            NodeData::Scalar { value, .. } => value.clone(),
            _ => String::new(),
        }
    }
}

fn is_json_mode(mode: EmitterMode) -> bool {
    matches!(
        mode,
        EmitterMode::Json | EmitterMode::JsonOneline | EmitterMode::JsonTp
    )
}

fn resolve_sequence_style(style: SequenceStyle, mode: EmitterMode) -> SequenceStyle {
    match mode {
        EmitterMode::Original => style,
        EmitterMode::Block => SequenceStyle::Block,
        EmitterMode::Flow
        | EmitterMode::FlowOneline
        | EmitterMode::Json
        | EmitterMode::JsonOneline
        | EmitterMode::JsonTp => SequenceStyle::Flow,
    }
}

fn resolve_mapping_style(style: MappingStyle, mode: EmitterMode) -> MappingStyle {
    match mode {
        EmitterMode::Original => style,
        EmitterMode::Block => MappingStyle::Block,
        EmitterMode::Flow
        | EmitterMode::FlowOneline
        | EmitterMode::Json
        | EmitterMode::JsonOneline
        | EmitterMode::JsonTp => MappingStyle::Flow,
    }
}

#[cfg(test)]
mod dump_tests {
    use super::*;
    use crate::{yaml_parser_new, yaml_parser_set_input_string};

    fn load(input: &str) -> Document {
        let mut parser = yaml_parser_new();
        let mut bytes = input.as_bytes();
        yaml_parser_set_input_string(&mut parser, &mut bytes);
        Document::load(&mut parser).unwrap()
    }

    fn dump_to_string(document: &Document, mode: EmitterMode) -> String {
        let mut emitter = Emitter::new();
        let mut output = Vec::new();
        emitter.set_output_string(&mut output);
        emitter.set_mode(mode);
        document.dump(&mut emitter).unwrap();
        emitter.flush().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn round_trips_a_simple_mapping() {
        let document = load("name: Sammy Sosa\nhr: 63\n");
        let text = dump_to_string(&document, EmitterMode::Block);
        assert_eq!(text, "name: Sammy Sosa\nhr: 63\n");
    }

    #[test]
    fn shared_node_becomes_anchor_and_alias() {
        let document = load("base: &b {a: 1}\nover: *b\n");
        let text = dump_to_string(&document, EmitterMode::Flow);
        assert!(text.contains("&b"));
        assert!(text.contains("*b"));
    }

    #[test]
    fn json_mode_rejects_unresolved_alias() {
        let document = load("base: &b {a: 1}\nover: *b\n");
        let mut emitter = Emitter::new();
        let mut output = Vec::new();
        emitter.set_output_string(&mut output);
        emitter.set_mode(EmitterMode::Json);
        assert!(matches!(
            document.dump(&mut emitter),
            Err(EmitterError::AliasInJsonMode)
        ));
    }

    #[test]
    fn json_mode_double_quotes_plain_scalars() {
        let document = load("a: 1\n");
        let text = dump_to_string(&document, EmitterMode::Json);
        assert_eq!(text, "{\"a\": \"1\"}\n");
    }
}
