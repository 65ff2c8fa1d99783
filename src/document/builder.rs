/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::ptr::NonNull;

use super::Document;
use super::Node;
use super::NodeRef;
use super::error::DocumentError;
use super::error::description;

/// One structural event of a document, in document order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TreeEvent<'s> {
    StartElement(&'s str),
    Attribute(&'s str, &'s str),
    Text(&'s str),
    Comment(&'s str),
    EndElement(&'s str),
}

/// Builds a [`Document`] from a stream of [`TreeEvent`] values.
///
/// Whatever produces the events (a markup parser, a converter from
/// another tree) stays outside of this crate.
pub struct TreeBuilder {
    doc: Option<Document>,
    node: Option<NonNull<Node>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            doc: None,
            node: None,
        }
    }

    pub fn append(&mut self, event: TreeEvent<'_>) -> Result<(), DocumentError> {
        let doc = match &self.doc {
            Some(doc) => doc,
            None => return self.start(event),
        };
        let Some(node) = self.node else {
            return Err(DocumentError::BadTree(description::ROOT_CLOSED));
        };
        // SAFETY: the builder only stores nodes of its own document
        let current = unsafe { NodeRef::from_raw(node, &doc.arena) };
        match event {
            TreeEvent::StartElement(name) => {
                self.node = Some(current.insert_element(name)?.as_raw());
            }
            TreeEvent::Attribute(name, value) => {
                current.insert_attribute(name, value)?;
            }
            TreeEvent::Text(text) => {
                current.insert_text(text)?;
            }
            TreeEvent::Comment(comment) => {
                current.insert_comment(comment)?;
            }
            TreeEvent::EndElement(name) => {
                if name != current.name() {
                    return Err(DocumentError::BadTree(description::TAG_MISMATCH));
                }
                self.node = current.parent().map(|parent| parent.as_raw());
            }
        }
        Ok(())
    }

    fn start(&mut self, event: TreeEvent<'_>) -> Result<(), DocumentError> {
        let TreeEvent::StartElement(name) = event else {
            return Err(DocumentError::BadTree(description::NO_ROOT_START));
        };
        let doc = Document::new(name)?;
        self.node = Some(doc.root_node);
        self.doc = Some(doc);
        Ok(())
    }

    pub fn peek(&self) -> Option<&Document> {
        self.doc.as_ref()
    }

    pub fn into_document(self) -> Result<Document, DocumentError> {
        match (self.doc, self.node) {
            (None, _) => Err(DocumentError::BadTree(description::NO_DOCUMENT)),
            (Some(_), Some(_)) => Err(DocumentError::BadTree(description::UNCLOSED_ELEMENT)),
            (Some(doc), None) => Ok(doc),
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
