/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;

use std::cell::UnsafeCell;
use std::cmp;
use std::mem::MaybeUninit;
use std::mem::align_of;
use std::mem::needs_drop;
use std::mem::size_of;
use std::ptr::NonNull;

pub use error::NoMemory;

const MIN_STRUCT_WORDS: usize = 64;

const MIN_DATA_BYTES: usize = 256;

type Word = MaybeUninit<usize>;

/// A memory arena for the tree structures and character data.
///
/// Nodes of a document are never freed individually, they all go away
/// together with the arena. This lets the tree link its nodes with plain
/// pointers and hand out cheap handles bound to the arena lifetime.
///
/// Chunks are reserved once with a fixed capacity and never reallocated,
/// so an address returned from the arena stays valid until the arena is
/// dropped.
///
#[derive(Debug)]
pub struct Arena {
    info: UnsafeCell<ArenaInfo>,
}

struct ArenaInfo {
    struct_chunks: Vec<Vec<Word>>,
    data_chunks: Vec<Vec<u8>>,
    nr_structs: usize,
}

/// Memory usage numbers of an [`Arena`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ArenaStats {
    pub nr_allocations: usize,
    pub nr_structs: usize,
    pub allocated_bytes: usize,
    pub used_bytes: usize,
}

fn new_chunk<T>(capacity: usize) -> Result<Vec<T>, NoMemory> {
    let mut chunk = Vec::new();
    chunk.try_reserve_exact(capacity)?;
    Ok(chunk)
}

fn next_chunk_size(last_capacity: usize, minimum: usize, needed: usize) -> usize {
    cmp::max(cmp::max(last_capacity * 2, minimum), needed)
}

impl ArenaInfo {
    fn struct_space(&mut self, nr_words: usize, min_words: usize) -> Result<*mut Word, NoMemory> {
        let last_capacity = match self.struct_chunks.last() {
            Some(chunk) if chunk.capacity() - chunk.len() >= nr_words => None,
            Some(chunk) => Some(chunk.capacity()),
            None => Some(0),
        };
        if let Some(last_capacity) = last_capacity {
            let size = next_chunk_size(last_capacity, min_words, nr_words);
            self.struct_chunks.push(new_chunk(size)?);
        }
        let Some(chunk) = self.struct_chunks.last_mut() else {
            return Err(NoMemory);
        };
        let used = chunk.len();
        // Stays within the reserved capacity, the chunk never moves
        chunk.resize(used + nr_words, MaybeUninit::uninit());
        unsafe { Ok(chunk.as_mut_ptr().add(used)) }
    }

    fn data_space(&mut self, s: &str, min_bytes: usize) -> Result<*const u8, NoMemory> {
        let size = s.len();
        let last_capacity = match self.data_chunks.last() {
            Some(chunk) if chunk.capacity() - chunk.len() >= size => None,
            Some(chunk) => Some(chunk.capacity()),
            None => Some(0),
        };
        if let Some(last_capacity) = last_capacity {
            let chunk_size = next_chunk_size(last_capacity, min_bytes, size);
            self.data_chunks.push(new_chunk(chunk_size)?);
        }
        let Some(chunk) = self.data_chunks.last_mut() else {
            return Err(NoMemory);
        };
        let used = chunk.len();
        chunk.extend_from_slice(s.as_bytes());
        unsafe { Ok(chunk.as_ptr().add(used)) }
    }
}

impl Arena {
    /// Creates a new 'Arena' with the default initial chunk sizes.
    ///
    /// Chunks are reserved lazily on the first allocation.
    pub fn new() -> Arena {
        Arena {
            info: UnsafeCell::new(ArenaInfo {
                struct_chunks: Vec::new(),
                data_chunks: Vec::new(),
                nr_structs: 0,
            }),
        }
    }

    /// Creates an arena whose first chunks hold at least the given number
    /// of structure words and character bytes.
    ///
    /// Sizes below the defaults are ignored.
    ///
    /// # Errors
    ///
    /// Returns `NoMemory` if the chunks cannot be reserved.
    pub fn with_chunk_sizes(
        struct_nr_words: usize,
        data_nr_bytes: usize,
    ) -> Result<Arena, NoMemory> {
        let mut arena = Arena::new();
        let info = arena.info.get_mut();
        if struct_nr_words > MIN_STRUCT_WORDS {
            info.struct_chunks.push(new_chunk(struct_nr_words)?);
        }
        if data_nr_bytes > MIN_DATA_BYTES {
            info.data_chunks.push(new_chunk(data_nr_bytes)?);
        }
        Ok(arena)
    }

    /// Moves a value into the arena and returns its stable address.
    ///
    /// Only types without drop glue and with at most word alignment can
    /// live here, since the arena releases its chunks without running
    /// destructors.
    pub fn alloc_struct<T>(&self, value: T) -> Result<NonNull<T>, NoMemory> {
        const {
            assert!(align_of::<T>() <= align_of::<usize>());
            assert!(!needs_drop::<T>());
        }
        let nr_words = cmp::max(size_of::<T>().div_ceil(size_of::<usize>()), 1);
        unsafe {
            let info = &mut *self.info.get();
            let ptr = info.struct_space(nr_words, MIN_STRUCT_WORDS)? as *mut T;
            ptr.write(value);
            info.nr_structs += 1;

            Ok(NonNull::new_unchecked(ptr))
        }
    }

    /// Copies the string into the arena.
    pub fn push_str<'a>(&'a self, s: &str) -> Result<&'a str, NoMemory> {
        if s.is_empty() {
            return Ok("");
        }
        unsafe {
            let info = &mut *self.info.get();
            let ptr = info.data_space(s, MIN_DATA_BYTES)?;
            let slice = std::slice::from_raw_parts(ptr, s.len());

            Ok(std::str::from_utf8_unchecked(slice))
        }
    }

    pub fn stats(&self) -> ArenaStats {
        let info = unsafe { &*self.info.get() };
        let mut stats = ArenaStats {
            nr_structs: info.nr_structs,
            ..ArenaStats::default()
        };
        for chunk in &info.struct_chunks {
            stats.nr_allocations += 1;
            stats.allocated_bytes += chunk.capacity() * size_of::<usize>();
            stats.used_bytes += chunk.len() * size_of::<usize>();
        }
        for chunk in &info.data_chunks {
            stats.nr_allocations += 1;
            stats.allocated_bytes += chunk.capacity();
            stats.used_bytes += chunk.len();
        }
        stats
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;

/// # Must not compile tests
///
/// Returned &str cannot outlive the arena:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::Arena;
/// let mut s : &str = "";
/// {
///     let arena = Arena::new();
///     s = arena.push_str("will dangle")?;
/// }
/// println!("{}", s);
/// # Ok(())
/// # }
/// ```
#[cfg(doctest)]
struct MustNotCompileTests;
