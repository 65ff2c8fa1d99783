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

/// Error returned when a cursor is created with a root node which is
/// not the starting node or one of its ancestors.
///
/// Such a cursor could never reach its own start without leaving the
/// root subtree, so the check is made once at construction and never
/// repeated during traversal.
///
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("root must be the starting node or one of its ancestors")]
pub struct InvalidRoot;
