/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! A cursor which walks element trees in document order.
//!
//! Documents are arena allocated trees of element, text and comment
//! nodes. A [`Cursor`] moves through them forward or backward, visiting
//! each element at its opening and closing boundary, with type filters,
//! select and reject expressions, lookahead and subtree confinement.
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ikswalk::{Cursor, Document, TreeEvent::*};
//!
//! let doc = Document::from_events([
//!     StartElement("p"),
//!     Text("hello "),
//!     StartElement("em"),
//!     Text("world"),
//!     EndElement("em"),
//!     EndElement("p"),
//! ])?;
//!
//! let mut cursor = Cursor::new(doc.root());
//! let names: Vec<String> = cursor
//!     .forward()
//!     .map(|(node, boundary)| format!("{}:{boundary:?}", node.name()))
//!     .collect();
//! assert_eq!(names, [":Opening", "em:Opening", ":Opening", "em:Closing", "p:Closing"]);
//! # Ok(())
//! # }
//! ```

mod arena;
mod cursor;
mod document;
mod entities;
mod expression;

pub use arena::Arena;
pub use arena::ArenaStats;
pub use arena::NoMemory;

pub use document::Ancestors;
pub use document::Attributes;
pub use document::Children;
pub use document::Document;
pub use document::DocumentError;
pub use document::NodeRef;
pub use document::NodeType;
pub use document::TreeBuilder;
pub use document::TreeEvent;

pub use cursor::Boundary;
pub use cursor::Cursor;
pub use cursor::Expr;
pub use cursor::InvalidRoot;
pub use cursor::Predicate;
pub use cursor::Walk;

pub use expression::BadExpression;
pub use expression::ExpressionCompiler;
pub use expression::PropertyPath;
pub use expression::PropertyPathCompiler;
pub use expression::Value;
