/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use thiserror::Error;

use crate::NoMemory;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum DocumentError {
    #[error("not enough memory")]
    NoMemory,
    #[error("invalid tree structure: {0}")]
    BadTree(&'static str),
}

impl From<NoMemory> for DocumentError {
    fn from(_: NoMemory) -> Self {
        DocumentError::NoMemory
    }
}

pub(crate) mod description {
    pub(crate) const NO_DOCUMENT: &str = "no root element built yet";
    pub(crate) const NO_ROOT_START: &str = "document must start with the root element";
    pub(crate) const ROOT_CLOSED: &str = "nothing can follow the closed root element";
    pub(crate) const UNCLOSED_ELEMENT: &str = "elements are still open";
    pub(crate) const TAG_MISMATCH: &str = "start and end elements have different names";
    pub(crate) const DUPLICATE_ATTRIBUTE: &str = "attribute name already used in this element";
    pub(crate) const LEAF_ATTRIBUTE: &str = "attributes can only be set on elements";
    pub(crate) const LEAF_CHILDREN: &str = "child nodes can only be added on elements";
    pub(crate) const ROOT_SIBLING: &str = "root element cannot have siblings";
}
