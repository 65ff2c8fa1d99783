/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::cell::Cell;

use super::*;

const CHARS: &str = "1234567890abcdefghijklmnopqrstuv";

#[derive(Debug)]
struct Pair {
    left: Cell<usize>,
    right: Cell<usize>,
}

#[test]
fn it_works() {
    let arena = Arena::new();
    assert_eq!(arena.stats().nr_allocations, 0);

    let s = arena.push_str("test").unwrap();
    assert_eq!(s, "test");
    assert_eq!(arena.stats().nr_allocations, 1);

    let p = arena
        .alloc_struct(Pair {
            left: Cell::new(1),
            right: Cell::new(2),
        })
        .unwrap();
    let pair = unsafe { p.as_ref() };
    assert_eq!(pair.left.get(), 1);
    assert_eq!(pair.right.get(), 2);

    let stats = arena.stats();
    assert_eq!(stats.nr_allocations, 2);
    assert_eq!(stats.nr_structs, 1);
    assert!(stats.allocated_bytes >= stats.used_bytes);
}

#[test]
fn empty_strings_take_no_space() {
    let arena = Arena::new();
    assert_eq!(arena.push_str("").unwrap(), "");
    assert_eq!(arena.stats().used_bytes, 0);
}

#[test]
fn many_pushes() {
    let arena = Arena::new();
    let mut kept = Vec::new();

    for _ in 0..1000 {
        for j in 0..CHARS.len() {
            kept.push(arena.push_str(&CHARS[..j]).unwrap());
        }
    }
    assert!(arena.stats().nr_allocations > 1);

    // Earlier strings must survive the chunk growth
    for (i, s) in kept.iter().enumerate() {
        assert_eq!(*s, &CHARS[..i % CHARS.len()]);
    }
}

#[test]
fn many_structs_keep_their_address() {
    let arena = Arena::new();
    let mut kept = Vec::new();

    for i in 0..5000 {
        let p = arena
            .alloc_struct(Pair {
                left: Cell::new(i),
                right: Cell::new(i * 2),
            })
            .unwrap();
        kept.push(p);
    }
    for (i, p) in kept.iter().enumerate() {
        let pair = unsafe { p.as_ref() };
        assert_eq!(pair.left.get(), i);
        assert_eq!(pair.right.get(), i * 2);
    }
    assert_eq!(arena.stats().nr_structs, 5000);
}

#[test]
fn large_string_gets_its_own_chunk() {
    let arena = Arena::new();
    let big = "x".repeat(MIN_DATA_BYTES * 5);
    let s = arena.push_str(&big).unwrap();
    assert_eq!(s.len(), big.len());
    assert!(arena.stats().allocated_bytes >= big.len());
}

#[test]
fn chunk_sizes() {
    let arena = Arena::with_chunk_sizes(1000, 4000).unwrap();
    let stats = arena.stats();
    assert_eq!(stats.nr_allocations, 2);
    assert!(stats.allocated_bytes >= 1000 * size_of::<usize>() + 4000);
    assert_eq!(stats.used_bytes, 0);

    arena.push_str(&"y".repeat(3000)).unwrap();
    assert_eq!(arena.stats().nr_allocations, 2);
}

#[test]
fn chunk_sizes_are_reserved_fallibly() {
    assert_eq!(Arena::with_chunk_sizes(usize::MAX, 0).unwrap_err(), NoMemory);
    assert_eq!(Arena::with_chunk_sizes(0, usize::MAX).unwrap_err(), NoMemory);

    let arena = Arena::with_chunk_sizes(10, 10).unwrap();
    assert_eq!(arena.stats().nr_allocations, 0);
}
