/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod builder;
mod error;
mod iterators;

use std::cell::Cell;
use std::fmt::Debug;
use std::ptr::NonNull;

use crate::Cursor;
use crate::arena::Arena;
use crate::arena::ArenaStats;
use crate::entities::escape_fmt;

pub use builder::TreeBuilder;
pub use builder::TreeEvent;
pub use error::DocumentError;
use error::description;
pub use iterators::Ancestors;
pub use iterators::Attributes;
pub use iterators::Children;

/// Type tag of a tree node.
///
/// Numbers follow the DOM `nodeType` constants so expressions written
/// against browser trees keep working.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
}

impl NodeType {
    pub fn as_number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<NodeType> {
        match number {
            1 => Some(NodeType::Element),
            3 => Some(NodeType::Text),
            8 => Some(NodeType::Comment),
            _ => None,
        }
    }

    /// Compound nodes can have children and have both an opening and
    /// a closing boundary.
    pub fn is_compound(self) -> bool {
        matches!(self, NodeType::Element)
    }
}

type Link = Cell<Option<NonNull<Node>>>;

pub(crate) struct Node {
    node_type: NodeType,
    // Element name, or the text of a leaf node
    content: *const str,
    parent: Link,
    next: Link,
    previous: Link,
    first_child: Link,
    last_child: Link,
    attributes: Cell<Option<NonNull<Attribute>>>,
    last_attribute: Cell<Option<NonNull<Attribute>>>,
}

pub(crate) struct Attribute {
    next: Cell<Option<NonNull<Attribute>>>,
    name: *const str,
    value: *const str,
}

impl Attribute {
    fn name_as_str(&self) -> &str {
        unsafe { &*self.name }
    }

    fn value_as_str(&self) -> &str {
        unsafe { &*self.value }
    }
}

trait ArenaExt {
    fn alloc_node(&self, node_type: NodeType, content: &str) -> Result<NonNull<Node>, DocumentError>;
    fn alloc_attribute(&self, name: &str, value: &str)
    -> Result<NonNull<Attribute>, DocumentError>;
}

impl ArenaExt for Arena {
    fn alloc_node(&self, node_type: NodeType, content: &str) -> Result<NonNull<Node>, DocumentError> {
        let content = self.push_str(content)?;
        Ok(self.alloc_struct(Node {
            node_type,
            content,
            parent: Cell::new(None),
            next: Cell::new(None),
            previous: Cell::new(None),
            first_child: Cell::new(None),
            last_child: Cell::new(None),
            attributes: Cell::new(None),
            last_attribute: Cell::new(None),
        })?)
    }

    fn alloc_attribute(
        &self,
        name: &str,
        value: &str,
    ) -> Result<NonNull<Attribute>, DocumentError> {
        let name = self.push_str(name)?;
        let value = self.push_str(value)?;
        Ok(self.alloc_struct(Attribute {
            next: Cell::new(None),
            name,
            value,
        })?)
    }
}

/// An ordered tree of element, text and comment nodes.
///
/// All nodes live in the document's arena. Handles to them are
/// [`NodeRef`] values which cannot outlive the document.
pub struct Document {
    arena: Arena,
    root_node: NonNull<Node>,
}

impl Document {
    pub fn new(root_name: &str) -> Result<Document, DocumentError> {
        let arena = Arena::new();
        let root_node = arena.alloc_node(NodeType::Element, root_name)?;

        Ok(Document { arena, root_node })
    }

    /// Builds a document from a sequence of tree events.
    pub fn from_events<'s, I>(events: I) -> Result<Document, DocumentError>
    where
        I: IntoIterator<Item = TreeEvent<'s>>,
    {
        let mut builder = TreeBuilder::new();
        for event in events {
            builder.append(event)?;
        }
        builder.into_document()
    }

    pub fn root<'a>(&'a self) -> NodeRef<'a> {
        unsafe { NodeRef::from_raw(self.root_node, &self.arena) }
    }

    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    //
    // Convenience functions to avoid typing .root() all the time
    //

    pub fn insert_element<'a>(&'a self, name: &str) -> Result<NodeRef<'a>, DocumentError> {
        self.root().insert_element(name)
    }

    pub fn insert_text<'a>(&'a self, text: &str) -> Result<NodeRef<'a>, DocumentError> {
        self.root().insert_text(text)
    }

    pub fn find_element<'a>(&'a self, name: &str) -> Option<NodeRef<'a>> {
        self.root().find_element(name)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.root(), f)
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root())
            .field("arena", &self.arena_stats())
            .finish()
    }
}

/// A read-only handle to a node of a [`Document`].
///
/// Handles are cheap to copy and compare equal when they point to the
/// same node. Edit methods link new nodes into the tree, they never
/// move or free existing ones, so every handle stays valid for the
/// lifetime of the document.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    node: &'a Node,
    arena: &'a Arena,
}

impl<'a> NodeRef<'a> {
    /// # Safety
    ///
    /// The pointer must come from the given arena.
    pub(crate) unsafe fn from_raw(node: NonNull<Node>, arena: &'a Arena) -> NodeRef<'a> {
        NodeRef {
            node: unsafe { node.as_ref() },
            arena,
        }
    }

    pub(crate) fn as_raw(&self) -> NonNull<Node> {
        NonNull::from(self.node)
    }

    fn wrap(&self, link: &Link) -> Option<NodeRef<'a>> {
        // SAFETY: links only ever point to nodes of the same arena
        link.get()
            .map(|node| unsafe { NodeRef::from_raw(node, self.arena) })
    }

    fn leaf_guard(&self) -> Result<(), DocumentError> {
        if self.is_element() {
            Ok(())
        } else {
            Err(DocumentError::BadTree(description::LEAF_CHILDREN))
        }
    }

    fn sibling_guard(&self) -> Result<&'a Node, DocumentError> {
        match self.node.parent.get() {
            None => Err(DocumentError::BadTree(description::ROOT_SIBLING)),
            Some(parent) => Ok(unsafe { parent.as_ref() }),
        }
    }

    //
    // Edit methods
    //

    fn link_last_child(&self, new_node: NonNull<Node>) -> NodeRef<'a> {
        let new = unsafe { new_node.as_ref() };
        new.parent.set(Some(self.as_raw()));
        match self.node.last_child.get() {
            None => self.node.first_child.set(Some(new_node)),
            Some(last) => {
                unsafe { last.as_ref() }.next.set(Some(new_node));
                new.previous.set(Some(last));
            }
        }
        self.node.last_child.set(Some(new_node));

        unsafe { NodeRef::from_raw(new_node, self.arena) }
    }

    fn link_after(&self, parent: &'a Node, new_node: NonNull<Node>) -> NodeRef<'a> {
        let new = unsafe { new_node.as_ref() };
        new.parent.set(self.node.parent.get());
        new.previous.set(Some(self.as_raw()));
        new.next.set(self.node.next.get());
        match self.node.next.get() {
            None => parent.last_child.set(Some(new_node)),
            Some(next) => unsafe { next.as_ref() }.previous.set(Some(new_node)),
        }
        self.node.next.set(Some(new_node));

        unsafe { NodeRef::from_raw(new_node, self.arena) }
    }

    fn link_before(&self, parent: &'a Node, new_node: NonNull<Node>) -> NodeRef<'a> {
        let new = unsafe { new_node.as_ref() };
        new.parent.set(self.node.parent.get());
        new.next.set(Some(self.as_raw()));
        new.previous.set(self.node.previous.get());
        match self.node.previous.get() {
            None => parent.first_child.set(Some(new_node)),
            Some(previous) => unsafe { previous.as_ref() }.next.set(Some(new_node)),
        }
        self.node.previous.set(Some(new_node));

        unsafe { NodeRef::from_raw(new_node, self.arena) }
    }

    /// Adds a new element as the last child of this element.
    pub fn insert_element(self, name: &str) -> Result<NodeRef<'a>, DocumentError> {
        self.leaf_guard()?;
        let new_node = self.arena.alloc_node(NodeType::Element, name)?;
        Ok(self.link_last_child(new_node))
    }

    /// Adds a new text node as the last child of this element.
    pub fn insert_text(self, text: &str) -> Result<NodeRef<'a>, DocumentError> {
        self.leaf_guard()?;
        let new_node = self.arena.alloc_node(NodeType::Text, text)?;
        Ok(self.link_last_child(new_node))
    }

    /// Adds a new comment node as the last child of this element.
    pub fn insert_comment(self, comment: &str) -> Result<NodeRef<'a>, DocumentError> {
        self.leaf_guard()?;
        let new_node = self.arena.alloc_node(NodeType::Comment, comment)?;
        Ok(self.link_last_child(new_node))
    }

    /// Adds a new element right after this node.
    pub fn append_element(self, name: &str) -> Result<NodeRef<'a>, DocumentError> {
        let parent = self.sibling_guard()?;
        let new_node = self.arena.alloc_node(NodeType::Element, name)?;
        Ok(self.link_after(parent, new_node))
    }

    /// Adds a new text node right after this node.
    pub fn append_text(self, text: &str) -> Result<NodeRef<'a>, DocumentError> {
        let parent = self.sibling_guard()?;
        let new_node = self.arena.alloc_node(NodeType::Text, text)?;
        Ok(self.link_after(parent, new_node))
    }

    /// Adds a new element right before this node.
    pub fn prepend_element(self, name: &str) -> Result<NodeRef<'a>, DocumentError> {
        let parent = self.sibling_guard()?;
        let new_node = self.arena.alloc_node(NodeType::Element, name)?;
        Ok(self.link_before(parent, new_node))
    }

    /// Adds a new text node right before this node.
    pub fn prepend_text(self, text: &str) -> Result<NodeRef<'a>, DocumentError> {
        let parent = self.sibling_guard()?;
        let new_node = self.arena.alloc_node(NodeType::Text, text)?;
        Ok(self.link_before(parent, new_node))
    }

    /// Adds an attribute to this element.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::BadTree` if the attribute already exists
    /// or the node is not an element.
    pub fn insert_attribute(self, name: &str, value: &str) -> Result<NodeRef<'a>, DocumentError> {
        if !self.is_element() {
            return Err(DocumentError::BadTree(description::LEAF_ATTRIBUTE));
        }
        if self.attribute(name).is_some() {
            return Err(DocumentError::BadTree(description::DUPLICATE_ATTRIBUTE));
        }
        let attribute = self.arena.alloc_attribute(name, value)?;
        match self.node.last_attribute.get() {
            None => self.node.attributes.set(Some(attribute)),
            Some(last) => unsafe { last.as_ref() }.next.set(Some(attribute)),
        }
        self.node.last_attribute.set(Some(attribute));

        Ok(self)
    }

    //
    // Navigation methods
    //

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.wrap(&self.node.parent)
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.wrap(&self.node.next)
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a>> {
        self.wrap(&self.node.previous)
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.wrap(&self.node.first_child)
    }

    pub fn last_child(&self) -> Option<NodeRef<'a>> {
        self.wrap(&self.node.last_child)
    }

    /// Returns the topmost ancestor of this node.
    pub fn root(&self) -> NodeRef<'a> {
        self.ancestors().last().unwrap_or(*self)
    }

    /// Returns the first child element with the given name.
    pub fn find_element(&self, name: &str) -> Option<NodeRef<'a>> {
        self.children()
            .find(|child| child.is_element() && child.name() == name)
    }

    //
    // Iterator methods
    //

    pub fn children(&self) -> Children<'a> {
        Children::new(self.first_child())
    }

    /// Iterates over the parent chain, starting with the parent.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors::new(self.parent())
    }

    pub fn attributes(&self) -> Attributes<'a> {
        Attributes::new(self.node.attributes.get())
    }

    //
    // Node property methods
    //

    pub fn node_type(&self) -> NodeType {
        self.node.node_type
    }

    pub fn is_element(&self) -> bool {
        self.node.node_type == NodeType::Element
    }

    pub fn has_children(&self) -> bool {
        self.node.first_child.get().is_some()
    }

    /// Returns true if this node is the given node or one of its
    /// descendants.
    pub fn is_inside(&self, ancestor: NodeRef<'_>) -> bool {
        *self == ancestor || self.ancestors().any(|node| node == ancestor)
    }

    /// Name of the element, empty for other nodes.
    pub fn name(&self) -> &'a str {
        match self.node.node_type {
            NodeType::Element => unsafe { &*self.node.content },
            NodeType::Text | NodeType::Comment => "",
        }
    }

    /// Character data of text and comment nodes.
    pub fn value(&self) -> Option<&'a str> {
        match self.node.node_type {
            NodeType::Element => None,
            NodeType::Text | NodeType::Comment => Some(unsafe { &*self.node.content }),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        let mut attr = self.node.attributes.get();
        while let Some(ptr) = attr {
            let attribute: &'a Attribute = unsafe { ptr.as_ref() };
            if attribute.name_as_str() == name {
                return Some(attribute.value_as_str());
            }
            attr = attribute.next.get();
        }
        None
    }

    fn fmt_open(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node_type() {
            NodeType::Element => {
                f.write_str("<")?;
                f.write_str(self.name())?;
                for (name, value) in self.attributes() {
                    f.write_str(" ")?;
                    f.write_str(name)?;
                    f.write_str("=\"")?;
                    escape_fmt(value, f)?;
                    f.write_str("\"")?;
                }
                if self.has_children() {
                    f.write_str(">")
                } else {
                    f.write_str("/>")
                }
            }
            NodeType::Text => escape_fmt(self.value().unwrap_or_default(), f),
            NodeType::Comment => {
                f.write_str("<!--")?;
                f.write_str(self.value().unwrap_or_default())?;
                f.write_str("-->")
            }
        }
    }

    fn fmt_close(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_element() && self.has_children() {
            f.write_str("</")?;
            f.write_str(self.name())?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

impl Eq for NodeRef<'_> {}

impl Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node_type() {
            NodeType::Element => write!(f, "NodeRef(<{}>)", self.name()),
            NodeType::Text => write!(f, "NodeRef({:?})", self.value().unwrap_or_default()),
            NodeType::Comment => {
                write!(f, "NodeRef(<!--{}-->)", self.value().unwrap_or_default())
            }
        }
    }
}

impl std::fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_open(f)?;
        if !self.has_children() {
            return Ok(());
        }

        // The node itself is the root, so the walk stays below it and
        // the last closing boundary is written here.
        let mut cursor = Cursor::scoped(*self);
        while let Some(node) = cursor.next() {
            if cursor.at_closing() && node.is_element() {
                node.fmt_close(f)?;
            } else {
                node.fmt_open(f)?;
            }
        }

        self.fmt_close(f)
    }
}

#[cfg(test)]
mod tests;

mod nocompile;
