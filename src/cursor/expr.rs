/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Debug;

use crate::NodeRef;
use crate::NodeType;
use crate::PropertyPath;

/// A compiled node test.
pub type Predicate<'a> = Box<dyn Fn(NodeRef<'a>) -> bool + 'a>;

/// Node test accepted by the cursor methods.
///
/// String expressions are compiled by the cursor's
/// [`ExpressionCompiler`](crate::ExpressionCompiler) when they are
/// given to the cursor.
#[derive(Default)]
pub enum Expr<'a> {
    /// Matches every node.
    #[default]
    Any,
    Type(NodeType),
    /// Matches nodes whose type number is the given one.
    TypeNumber(u8),
    Path(String),
    Predicate(Predicate<'a>),
}

impl<'a> Expr<'a> {
    pub fn predicate<F>(f: F) -> Expr<'a>
    where
        F: Fn(NodeRef<'a>) -> bool + 'a,
    {
        Expr::Predicate(Box::new(f))
    }
}

impl From<NodeType> for Expr<'_> {
    fn from(node_type: NodeType) -> Self {
        Expr::Type(node_type)
    }
}

impl From<u8> for Expr<'_> {
    fn from(number: u8) -> Self {
        Expr::TypeNumber(number)
    }
}

impl From<&str> for Expr<'_> {
    fn from(path: &str) -> Self {
        Expr::Path(path.to_string())
    }
}

impl From<String> for Expr<'_> {
    fn from(path: String) -> Self {
        Expr::Path(path)
    }
}

impl<'a> From<PropertyPath> for Expr<'a> {
    fn from(path: PropertyPath) -> Self {
        Expr::predicate(move |node: NodeRef<'a>| path.matches(node))
    }
}

impl Debug for Expr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Any => write!(f, "Any"),
            Expr::Type(node_type) => write!(f, "Type({node_type:?})"),
            Expr::TypeNumber(number) => write!(f, "TypeNumber({number})"),
            Expr::Path(path) => write!(f, "Path({path:?})"),
            Expr::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}
