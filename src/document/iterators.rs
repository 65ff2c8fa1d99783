/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::marker::PhantomData;
use std::ptr::NonNull;

use super::Attribute;
use super::NodeRef;

pub struct Attributes<'a> {
    current: Option<NonNull<Attribute>>,
    marker: PhantomData<NodeRef<'a>>,
}

impl<'a> Attributes<'a> {
    pub(super) fn new(first: Option<NonNull<Attribute>>) -> Self {
        Attributes {
            current: first,
            marker: PhantomData,
        }
    }
}

impl<'a> Iterator for Attributes<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let attribute: &'a Attribute = unsafe { self.current?.as_ref() };
        self.current = attribute.next.get();
        Some((attribute.name_as_str(), attribute.value_as_str()))
    }
}

pub struct Children<'a> {
    current: Option<NodeRef<'a>>,
}

impl<'a> Children<'a> {
    pub fn new(first: Option<NodeRef<'a>>) -> Self {
        Children { current: first }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;
        self.current = result.next_sibling();
        Some(result)
    }
}

pub struct Ancestors<'a> {
    current: Option<NodeRef<'a>>,
}

impl<'a> Ancestors<'a> {
    pub fn new(first: Option<NodeRef<'a>>) -> Self {
        Ancestors { current: first }
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;
        self.current = result.parent();
        Some(result)
    }
}
