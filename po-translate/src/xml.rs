//! A small, lossless XML node tree built on `quick-xml` events.
//!
//! The tree keeps every event it reads (declaration, doctype, comments,
//! whitespace, processing instructions) so that writing it back reproduces
//! the original document, except for the nodes that were edited. Elements are
//! stored in an arena and addressed by [`NodeId`], which stays valid when
//! nodes are inserted elsewhere in the tree.

use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesStart, BytesText, Event},
};

use crate::error::Error;

/// Handle to a node of one [`XmlTree`]. Meaningless for any other tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Leaf(Event<'static>),
}

#[derive(Debug, Clone)]
struct Element {
    start: BytesStart<'static>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    self_closing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct XmlTree {
    nodes: Vec<Node>,
    top: Vec<NodeId>,
}

impl XmlTree {
    /// Parse a whole document, keeping whitespace and non-element events.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut tree = XmlTree::default();
        let mut open: Vec<NodeId> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let id = tree.push_element(e.into_owned(), open.last().copied(), false);
                    open.push(id);
                }
                Event::Empty(e) => {
                    tree.push_element(e.into_owned(), open.last().copied(), true);
                }
                Event::End(_) => {
                    if open.pop().is_none() {
                        return Err(Error::InvalidResource(
                            "closing tag without matching start".to_string(),
                        ));
                    }
                }
                Event::Eof => break,
                other => {
                    tree.attach(Node::Leaf(other.into_owned()), open.last().copied());
                }
            }
            buf.clear();
        }

        if let Some(&id) = open.last() {
            return Err(Error::InvalidResource(format!(
                "unclosed element <{}>",
                tree.qualified_name(id)
            )));
        }
        Ok(tree)
    }

    /// Write the document back out.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(writer);
        for &id in &self.top {
            self.write_node(&mut xml_writer, id)?;
        }
        Ok(())
    }

    fn write_node<W: Write>(&self, xml_writer: &mut Writer<W>, id: NodeId) -> Result<(), Error> {
        match &self.nodes[id.0] {
            Node::Leaf(event) => xml_writer.write_event(event.borrow())?,
            Node::Element(el) if el.self_closing && el.children.is_empty() => {
                xml_writer.write_event(Event::Empty(el.start.borrow()))?
            }
            Node::Element(el) => {
                xml_writer.write_event(Event::Start(el.start.borrow()))?;
                for &child in &el.children {
                    self.write_node(xml_writer, child)?;
                }
                xml_writer.write_event(Event::End(el.start.to_end()))?;
            }
        }
        Ok(())
    }

    fn push_element(
        &mut self,
        start: BytesStart<'static>,
        parent: Option<NodeId>,
        self_closing: bool,
    ) -> NodeId {
        self.attach(
            Node::Element(Element {
                start,
                parent,
                children: Vec::new(),
                self_closing,
            }),
            parent,
        )
    }

    /// Store `node` and append it to `parent`'s children (or the top level).
    fn attach(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = self.detached(node);
        match parent.and_then(|p| self.element_mut(p)) {
            Some(el) => el.children.push(id),
            None => self.top.push(id),
        }
        id
    }

    /// Store `node` without linking it anywhere yet.
    fn detached(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id.0) {
            Some(Node::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// The first top-level element.
    pub fn root_element(&self) -> Option<NodeId> {
        self.top.iter().copied().find(|&id| self.element(id).is_some())
    }

    /// Whether `id` is an element with the given local (unprefixed) name.
    pub fn is_named(&self, id: NodeId, local: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.start.local_name().as_ref() == local.as_bytes())
    }

    /// Full tag name of an element, including any namespace prefix.
    pub fn qualified_name(&self, id: NodeId) -> String {
        self.element(id)
            .map(|el| String::from_utf8_lossy(el.start.name().as_ref()).into_owned())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|el| el.parent)
    }

    /// All elements with local name `local` in document order, searching the
    /// whole document.
    pub fn elements_named(&self, local: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        for &id in &self.top {
            if self.is_named(id, local) {
                found.push(id);
            }
            found.extend(self.descendants_named(id, local));
        }
        found
    }

    /// Elements below `root` (not including it) with local name `local`, in
    /// document order.
    pub fn descendants_named(&self, root: NodeId, local: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = match self.element(root) {
            Some(el) => el.children.iter().rev().copied().collect(),
            None => return found,
        };
        while let Some(id) = stack.pop() {
            if let Some(el) = self.element(id) {
                if el.start.local_name().as_ref() == local.as_bytes() {
                    found.push(id);
                }
                stack.extend(el.children.iter().rev().copied());
            }
        }
        found
    }

    /// Direct child elements of `id` with local name `local`.
    pub fn children_named(&self, id: NodeId, local: &str) -> Vec<NodeId> {
        self.element(id)
            .map(|el| {
                el.children
                    .iter()
                    .copied()
                    .filter(|&child| self.is_named(child, local))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn first_child_named(&self, id: NodeId, local: &str) -> Option<NodeId> {
        self.element(id)?
            .children
            .iter()
            .copied()
            .find(|&child| self.is_named(child, local))
    }

    /// Nearest enclosing element named `local`.
    pub fn ancestor_named(&self, id: NodeId, local: &str) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            if self.is_named(ancestor, local) {
                return Some(ancestor);
            }
            current = self.parent(ancestor);
        }
        None
    }

    /// Unescaped value of attribute `key` (matched on the full attribute name).
    pub fn attribute(&self, id: NodeId, key: &str) -> Result<Option<String>, Error> {
        let Some(el) = self.element(id) else {
            return Ok(None);
        };
        match el.start.try_get_attribute(key)? {
            Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
            None => Ok(None),
        }
    }

    /// Remove attribute `key`, returning whether it was present. The other
    /// attributes keep their order and, unless they contain a `"`, their raw
    /// values.
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) -> Result<bool, Error> {
        let Some(el) = self.element_mut(id) else {
            return Ok(false);
        };
        if el.start.try_get_attribute(key)?.is_none() {
            return Ok(false);
        }

        let name = String::from_utf8_lossy(el.start.name().as_ref()).into_owned();
        let mut rebuilt = BytesStart::new(name);
        for attr in el.start.attributes().with_checks(false) {
            let attr = attr?;
            if attr.key.as_ref() == key.as_bytes() {
                continue;
            }
            if attr.value.contains(&b'"') {
                // The rebuilt tag quotes with `"`, so a single-quoted value
                // holding one has to be escaped again.
                let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr.unescape_value()?.into_owned();
                rebuilt.push_attribute((name.as_str(), value.as_str()));
            } else {
                rebuilt.push_attribute(attr);
            }
        }
        el.start = rebuilt;
        Ok(true)
    }

    /// Concatenated, unescaped text of every text and CDATA node below `id`.
    pub fn text(&self, id: NodeId) -> Result<String, Error> {
        let mut out = String::new();
        self.collect_text(id, &mut out)?;
        Ok(out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> Result<(), Error> {
        match &self.nodes[id.0] {
            Node::Leaf(Event::Text(text)) => out.push_str(&text.unescape()?),
            Node::Leaf(Event::CData(cdata)) => out.push_str(&String::from_utf8_lossy(cdata)),
            Node::Leaf(_) => {}
            Node::Element(el) => {
                for &child in &el.children {
                    self.collect_text(child, out)?;
                }
            }
        }
        Ok(())
    }

    /// Replace everything inside element `id` with a single text node.
    ///
    /// An empty `text` leaves the element without children; a self-closing
    /// element stays self-closing in that case.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            let escaped = BytesText::from_escaped(partial_escape(text)).into_owned();
            vec![self.detached(Node::Leaf(Event::Text(escaped)))]
        };
        if let Some(el) = self.element_mut(id) {
            el.self_closing = el.self_closing && children.is_empty();
            el.children = children;
        }
    }

    /// Insert a new, empty element named `qualified_name` right after
    /// `sibling`, repeating the whitespace that precedes `sibling` so the new
    /// element lines up with it.
    pub fn insert_element_after(
        &mut self,
        sibling: NodeId,
        qualified_name: &str,
    ) -> Result<NodeId, Error> {
        let parent = self.parent(sibling).ok_or_else(|| {
            Error::InvalidResource(format!(
                "cannot insert <{}> next to a top-level element",
                qualified_name
            ))
        })?;
        let indent = self.preceding_whitespace(sibling);

        let new_id = self.detached(Node::Element(Element {
            start: BytesStart::new(qualified_name.to_string()),
            parent: Some(parent),
            children: Vec::new(),
            self_closing: false,
        }));
        let mut inserted = Vec::with_capacity(2);
        if let Some(indent) = indent {
            let leaf = Event::Text(BytesText::from_escaped(indent));
            inserted.push(self.detached(Node::Leaf(leaf)));
        }
        inserted.push(new_id);

        if let Some(parent_el) = self.element_mut(parent) {
            let position = parent_el
                .children
                .iter()
                .position(|&child| child == sibling)
                .map_or(parent_el.children.len(), |index| index + 1);
            parent_el.children.splice(position..position, inserted);
        }
        Ok(new_id)
    }

    /// Whitespace-only text directly before `id` within its parent.
    fn preceding_whitespace(&self, id: NodeId) -> Option<String> {
        let siblings = &self.element(self.parent(id)?)?.children;
        let index = siblings.iter().position(|&child| child == id)?;
        let previous = siblings.get(index.checked_sub(1)?)?;
        match &self.nodes[previous.0] {
            Node::Leaf(Event::Text(text)) => {
                let raw = String::from_utf8_lossy(text).into_owned();
                (!raw.is_empty() && raw.chars().all(char::is_whitespace)).then_some(raw)
            }
            _ => None,
        }
    }
}
