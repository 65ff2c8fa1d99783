/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::collections::TryReserveError;

use thiserror::Error;

/// Error type for memory allocation failures.
///
/// Arena methods return this error when a new chunk cannot be
/// reserved from the global allocator. Best action is to abort
/// building the tree and release it.
///
/// Details about the failed reservation are not kept, chunk sizes
/// only depend on the amount of data put into the tree.
///
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("not enough memory")]
pub struct NoMemory;

impl From<TryReserveError> for NoMemory {
    fn from(_: TryReserveError) -> Self {
        NoMemory
    }
}
