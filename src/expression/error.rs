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

/// Syntax error in a property path expression.
///
/// The position is the byte offset in the expression where the
/// problem was noticed.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("expression syntax error at {position}: {description}")]
pub struct BadExpression {
    pub position: usize,
    pub description: &'static str,
}

impl BadExpression {
    pub(super) fn new(position: usize, description: &'static str) -> Self {
        BadExpression {
            position,
            description,
        }
    }
}

pub(crate) mod description {
    pub(crate) const EMPTY: &str = "empty expression";
    pub(crate) const UNEXPECTED_CHARACTER: &str = "unexpected character";
    pub(crate) const UNTERMINATED_STRING: &str = "string literal is not terminated";
    pub(crate) const BAD_NUMBER: &str = "malformed number";
    pub(crate) const BAD_OPERATOR: &str = "incomplete operator";
    pub(crate) const EXPECTED_OPERAND: &str = "operand expected";
    pub(crate) const EXPECTED_PROPERTY: &str = "property name expected";
    pub(crate) const EXPECTED_ATTRIBUTE: &str = "attribute name expected";
    pub(crate) const UNKNOWN_PROPERTY: &str = "unknown property";
    pub(crate) const NOT_A_NODE: &str = "only nodes have properties";
    pub(crate) const UNBALANCED_PARENS: &str = "unbalanced parentheses";
    pub(crate) const TRAILING_INPUT: &str = "unexpected input after the expression";
    pub(crate) const TOO_DEEP: &str = "expression is nested too deeply";
}
