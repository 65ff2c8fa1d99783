/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::Boundary;
use super::Cursor;
use super::Direction;
use crate::NodeRef;

/// Iterator over the moves of a [`Cursor`] in one direction.
///
/// Each item is the node moved to and the boundary of the visit. The
/// iterator ends where the cursor returns `None`, the cursor stays at
/// the last node yielded.
pub struct Walk<'c, 'a> {
    cursor: &'c mut Cursor<'a>,
    direction: Direction,
}

impl<'c, 'a> Walk<'c, 'a> {
    pub(super) fn new(cursor: &'c mut Cursor<'a>, direction: Direction) -> Self {
        Walk { cursor, direction }
    }
}

impl<'a> Iterator for Walk<'_, 'a> {
    type Item = (NodeRef<'a>, Boundary);

    fn next(&mut self) -> Option<Self::Item> {
        let node = match self.direction {
            Direction::Forward => self.cursor.next(),
            Direction::Backward => self.cursor.previous(),
        }?;
        Some((node, self.cursor.boundary()))
    }
}
