//! Addressing a [`Node`] inside a [`Document`] by YAML path, JSON Pointer
//! (RFC 6901), or relative JSON Pointer, without building any auxiliary
//! indexing structure: every lookup walks the node tree directly.

use crate::{Document, NodeData, Parser, PathError};

/// One step of a parsed YAML path.
enum Segment {
    /// A bare or quoted mapping key, compared against scalar keys by value.
    Key(String),
    /// A `[n]` sequence index.
    Index(usize),
    /// A `{ ... }` flow expression, parsed into its own one-node document and
    /// compared against mapping keys structurally. Used for non-scalar keys.
    Node(Document),
}

impl Document {
    /// Resolve a YAML path against this document's root node.
    ///
    /// A path is a sequence of `/`-separated segments. A segment is a bare
    /// key (`foo`), a quoted key (`"foo/bar"`, with `\\`, `\"`, and `\/`
    /// escapes), a sequence index (`[3]`), or a flow expression used as a
    /// non-scalar key (`{a: 1}`). Returns the id of the addressed node, or
    /// [`PathError::NotFound`] if any segment along the way does not exist.
    pub fn resolve_yaml_path(&self, path: &str) -> Result<i32, PathError> {
        Ok(*self.resolve_yaml_path_chain(path)?.last().unwrap())
    }

    /// Like [`Self::resolve_yaml_path`], but returns the full chain of node
    /// ids visited, root first, so that a relative JSON Pointer can later
    /// ascend from the result.
    pub fn resolve_yaml_path_chain(&self, path: &str) -> Result<Vec<i32>, PathError> {
        let segments = parse_yaml_path(path)?;
        let root = self.nodes_nonempty()?;
        let mut chain = vec![root];
        for segment in &segments {
            let next = self.step(*chain.last().unwrap(), segment)?;
            chain.push(next);
        }
        Ok(chain)
    }

    /// Resolve a JSON Pointer (RFC 6901) against this document's root node.
    pub fn resolve_json_pointer(&self, pointer: &str) -> Result<i32, PathError> {
        Ok(*self.resolve_json_pointer_chain(pointer)?.last().unwrap())
    }

    /// Like [`Self::resolve_json_pointer`], but returns the full chain of
    /// node ids visited, root first.
    pub fn resolve_json_pointer_chain(&self, pointer: &str) -> Result<Vec<i32>, PathError> {
        let root = self.nodes_nonempty()?;
        let mut chain = vec![root];
        for token in split_json_pointer(pointer)? {
            let segment = Segment::Key(token.clone());
            let next = match &self.nodes[*chain.last().unwrap() as usize - 1].data {
                NodeData::Sequence { .. } => {
                    let index = token.parse::<usize>().map_err(|_| PathError::InvalidIndex {
                        segment: token.clone(),
                    })?;
                    self.step(*chain.last().unwrap(), &Segment::Index(index))?
                }
                _ => self.step(*chain.last().unwrap(), &segment)?,
            };
            chain.push(next);
        }
        Ok(chain)
    }

    /// Resolve a relative JSON Pointer (`<n>[/<rest>]`) starting from
    /// `chain`, an ancestor chain (root first, target last) as returned by
    /// [`Self::resolve_yaml_path_chain`] or [`Self::resolve_json_pointer_chain`].
    ///
    /// `<n>` ascends `n` parents from the last entry in `chain` before
    /// resolving `<rest>` (a JSON Pointer, or empty) from there.
    pub fn resolve_relative_json_pointer(
        &self,
        chain: &[i32],
        pointer: &str,
    ) -> Result<i32, PathError> {
        let (up_str, rest) = match pointer.find('/') {
            Some(slash) => (&pointer[..slash], &pointer[slash..]),
            None => (pointer, ""),
        };
        let up: usize = up_str.parse().map_err(|_| PathError::InvalidPointer {
            problem: "relative JSON Pointer must start with a decimal integer",
        })?;
        if up >= chain.len() {
            return Err(PathError::NotFound);
        }
        let base_chain = &chain[..chain.len() - up];
        if rest.is_empty() {
            return Ok(*base_chain.last().unwrap());
        }
        let base = *base_chain.last().unwrap();
        let mut cursor = base;
        for token in split_json_pointer(rest)? {
            let segment = Segment::Key(token.clone());
            cursor = match &self.nodes[cursor as usize - 1].data {
                NodeData::Sequence { .. } => {
                    let index = token.parse::<usize>().map_err(|_| PathError::InvalidIndex {
                        segment: token.clone(),
                    })?;
                    self.step(cursor, &Segment::Index(index))?
                }
                _ => self.step(cursor, &segment)?,
            };
        }
        Ok(cursor)
    }

    fn nodes_nonempty(&self) -> Result<i32, PathError> {
        if self.nodes.is_empty() {
            Err(PathError::NotFound)
        } else {
            Ok(1)
        }
    }

    fn step(&self, current: i32, segment: &Segment) -> Result<i32, PathError> {
        match (&self.nodes[current as usize - 1].data, segment) {
            (NodeData::Sequence { items, .. }, Segment::Index(index)) => {
                items.get(*index).copied().ok_or(PathError::NotFound)
            }
            (NodeData::Mapping { pairs, .. }, Segment::Key(key)) => pairs
                .iter()
                .find(|pair| self.scalar_key_eq(pair.key, key))
                .map(|pair| pair.value)
                .ok_or(PathError::NotFound),
            (NodeData::Mapping { pairs, .. }, Segment::Node(key_doc)) => pairs
                .iter()
                .find(|pair| nodes_structurally_eq(self, pair.key, key_doc, 1))
                .map(|pair| pair.value)
                .ok_or(PathError::NotFound),
            _ => Err(PathError::NotFound),
        }
    }

    fn scalar_key_eq(&self, key_index: i32, expected: &str) -> bool {
        matches!(
            &self.nodes[key_index as usize - 1].data,
            NodeData::Scalar { value, .. } if value == expected
        )
    }
}

fn nodes_structurally_eq(a_doc: &Document, a: i32, b_doc: &Document, b: i32) -> bool {
    let a_node = &a_doc.nodes[a as usize - 1];
    let b_node = &b_doc.nodes[b as usize - 1];
    match (&a_node.data, &b_node.data) {
        (NodeData::Scalar { value: v1, .. }, NodeData::Scalar { value: v2, .. }) => v1 == v2,
        (NodeData::Sequence { items: i1, .. }, NodeData::Sequence { items: i2, .. }) => {
            i1.len() == i2.len()
                && i1
                    .iter()
                    .zip(i2)
                    .all(|(x, y)| nodes_structurally_eq(a_doc, *x, b_doc, *y))
        }
        (NodeData::Mapping { pairs: p1, .. }, NodeData::Mapping { pairs: p2, .. }) => {
            p1.len() == p2.len()
                && p1.iter().all(|pa| {
                    p2.iter().any(|pb| {
                        nodes_structurally_eq(a_doc, pa.key, b_doc, pb.key)
                            && nodes_structurally_eq(a_doc, pa.value, b_doc, pb.value)
                    })
                })
        }
        _ => false,
    }
}

fn parse_yaml_path(path: &str) -> Result<Vec<Segment>, PathError> {
    let mut segments = Vec::new();
    let chars: Vec<char> = path.chars().collect();
    let mut i = 0;
    if chars.first() == Some(&'/') {
        i += 1;
    }
    while i < chars.len() {
        match chars[i] {
            '/' => {
                i += 1;
            }
            '[' => {
                let start = i + 1;
                let end = chars[start..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|p| start + p)
                    .ok_or(PathError::InvalidPointer {
                        problem: "unterminated '[' in YAML path",
                    })?;
                let digits: String = chars[start..end].iter().collect();
                let index = digits.parse::<usize>().map_err(|_| PathError::InvalidIndex {
                    segment: digits,
                })?;
                segments.push(Segment::Index(index));
                i = end + 1;
            }
            '"' => {
                let mut value = String::new();
                i += 1;
                loop {
                    let Some(&c) = chars.get(i) else {
                        return Err(PathError::InvalidPointer {
                            problem: "unterminated quoted key in YAML path",
                        });
                    };
                    if c == '"' {
                        i += 1;
                        break;
                    }
                    if c == '\\' {
                        let Some(&escaped) = chars.get(i + 1) else {
                            return Err(PathError::InvalidPointer {
                                problem: "unterminated escape in YAML path",
                            });
                        };
                        value.push(escaped);
                        i += 2;
                    } else {
                        value.push(c);
                        i += 1;
                    }
                }
                segments.push(Segment::Key(value));
            }
            '{' => {
                let mut depth = 0usize;
                let start = i;
                loop {
                    let Some(&c) = chars.get(i) else {
                        return Err(PathError::InvalidPointer {
                            problem: "unterminated '{' in YAML path",
                        });
                    };
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                i += 1;
                                break;
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                segments.push(Segment::Node(parse_flow_key(&text)?));
            }
            _ => {
                let start = i;
                while i < chars.len() && chars[i] != '/' {
                    i += 1;
                }
                let key: String = chars[start..i].iter().collect();
                segments.push(Segment::Key(key));
            }
        }
    }
    Ok(segments)
}

fn parse_flow_key(text: &str) -> Result<Document, PathError> {
    let mut parser = Parser::new();
    let mut input = text.as_bytes();
    parser.set_input_string(&mut input);
    Document::load(&mut parser).map_err(|_| PathError::InvalidPointer {
        problem: "flow expression key is not valid YAML",
    })
}

/// Split a JSON Pointer into its unescaped reference tokens.
///
/// An empty pointer addresses the whole document and yields no tokens. A
/// pointer must either be empty or start with `/`.
fn split_json_pointer(pointer: &str) -> Result<Vec<String>, PathError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !pointer.starts_with('/') {
        return Err(PathError::InvalidPointer {
            problem: "JSON Pointer must be empty or start with '/'",
        });
    }
    Ok(pointer[1..]
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml_parser_new;

    fn load(input: &str) -> Document {
        let mut parser = yaml_parser_new();
        let mut bytes = input.as_bytes();
        crate::yaml_parser_set_input_string(&mut parser, &mut bytes);
        Document::load(&mut parser).unwrap()
    }

    #[test]
    fn json_pointer_into_sequence() {
        let doc = load("foo: [bar, baz]\n");
        let index = doc.resolve_json_pointer("/foo/0").unwrap();
        assert!(matches!(
            &doc.get_node(index).unwrap().data,
            NodeData::Scalar { value, .. } if value == "bar"
        ));
    }

    #[test]
    fn json_pointer_unescapes_tilde_and_slash() {
        let doc = load("\"a/b\": 1\n");
        let index = doc.resolve_json_pointer("/a~1b").unwrap();
        assert!(matches!(
            &doc.get_node(index).unwrap().data,
            NodeData::Scalar { value, .. } if value == "1"
        ));
    }

    #[test]
    fn yaml_path_bracket_index() {
        let doc = load("items:\n  - a\n  - b\n  - c\n");
        let index = doc.resolve_yaml_path("items/[1]").unwrap();
        assert!(matches!(
            &doc.get_node(index).unwrap().data,
            NodeData::Scalar { value, .. } if value == "b"
        ));
    }

    #[test]
    fn missing_path_is_not_found() {
        let doc = load("a: 1\n");
        assert!(matches!(
            doc.resolve_yaml_path("b"),
            Err(PathError::NotFound)
        ));
    }

    #[test]
    fn relative_pointer_ascends() {
        let doc = load("a:\n  b:\n    c: 1\n    d: 2\n");
        let chain = doc.resolve_json_pointer_chain("/a/b/c").unwrap();
        let sibling = doc.resolve_relative_json_pointer(&chain, "0/d").unwrap();
        assert!(matches!(
            &doc.get_node(sibling).unwrap().data,
            NodeData::Scalar { value, .. } if value == "2"
        ));
        let up_one = doc.resolve_relative_json_pointer(&chain, "1").unwrap();
        assert!(matches!(
            &doc.get_node(up_one).unwrap().data,
            NodeData::Mapping { .. }
        ));
    }
}
