/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use proptest::prelude::*;

use super::*;
use crate::Document;

// 0 opens an element, 1 adds a text, 2 adds a comment, 3 closes
fn build(ops: &[u8]) -> Document {
    let doc = Document::new("root").expect("root element");
    let mut stack = vec![doc.root()];
    for (i, op) in ops.iter().enumerate() {
        let top = *stack.last().expect("stack is never empty");
        match op {
            0 => stack.push(top.insert_element(&format!("e{i}")).expect("element")),
            1 => {
                top.insert_text(&format!("t{i}")).expect("text");
            }
            2 => {
                top.insert_comment(&format!("c{i}")).expect("comment");
            }
            _ if stack.len() > 1 => {
                stack.pop();
            }
            _ => {}
        }
    }
    doc
}

fn all_nodes<'a>(node: NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    for child in node.children() {
        out.push(child);
        all_nodes(child, out);
    }
}

// Leaf nodes have one visit whatever side the cursor comes from
fn visit(node: NodeRef<'_>, boundary: Boundary) -> (NodeRef<'_>, bool) {
    (node, node.is_element() && boundary == Boundary::Closing)
}

proptest! {
    #[test]
    fn backward_mirrors_forward(ops in prop::collection::vec(0u8..4, 0..60)) {
        let doc = build(&ops);
        let root = doc.root();
        let mut cursor = Cursor::new(root);

        let forward: Vec<_> = cursor.forward().map(|(n, b)| visit(n, b)).collect();
        let mut backward: Vec<_> = cursor.backward().map(|(n, b)| visit(n, b)).collect();

        prop_assert_eq!(forward.last(), Some(&(root, true)));
        prop_assert_eq!(backward.pop(), Some((root, false)));
        backward.reverse();
        prop_assert_eq!(&forward[..forward.len() - 1], &backward[..]);
    }

    #[test]
    fn backward_retraces_forward_from_any_node(
        ops in prop::collection::vec(0u8..4, 0..60),
        pick in any::<prop::sample::Index>(),
        types in 0u8..8,
        visit_closing in any::<bool>(),
    ) {
        let doc = build(&ops);
        let mut nodes = vec![doc.root()];
        all_nodes(doc.root(), &mut nodes);
        let start = *pick.get(&nodes);

        let mut cursor = Cursor::new(start);
        cursor.visit_closing(visit_closing);
        if types != 0 {
            let all = [NodeType::Element, NodeType::Text, NodeType::Comment];
            cursor.filter(
                all.into_iter()
                    .enumerate()
                    .filter(|(bit, _)| types & (1 << bit) != 0)
                    .map(|(_, node_type)| node_type),
            );
        }

        let forward: Vec<_> = cursor.forward().map(|(n, b)| visit(n, b)).collect();
        prop_assume!(!forward.is_empty());
        let backward: Vec<_> = cursor.backward().map(|(n, b)| visit(n, b)).collect();

        let mut retraced = forward[..forward.len() - 1].to_vec();
        retraced.reverse();
        prop_assert!(backward.len() >= retraced.len());
        prop_assert_eq!(&backward[..retraced.len()], &retraced[..]);
    }

    #[test]
    fn elements_are_visited_twice(ops in prop::collection::vec(0u8..4, 0..60)) {
        let doc = build(&ops);
        let mut nodes = Vec::new();
        all_nodes(doc.root(), &mut nodes);
        let elements = nodes.iter().filter(|n| n.is_element()).count();
        let leaves = nodes.len() - elements;

        let mut cursor = Cursor::new(doc.root());
        prop_assert_eq!(cursor.forward().count(), 2 * elements + leaves + 1);

        let mut cursor = Cursor::new(doc.root());
        cursor.revisit(false);
        let opened = cursor.forward().filter(|(n, _)| n.is_element()).count();
        prop_assert_eq!(opened, elements);
    }

    #[test]
    fn ends_are_stable(ops in prop::collection::vec(0u8..4, 0..60), extra in 1usize..5) {
        let doc = build(&ops);
        let mut cursor = Cursor::new(doc.root());
        while cursor.next().is_some() {}
        let node = cursor.node();
        let boundary = cursor.boundary();
        for _ in 0..extra {
            prop_assert_eq!(cursor.next(), None);
        }
        prop_assert_eq!(cursor.node(), node);
        prop_assert_eq!(cursor.boundary(), boundary);
        prop_assert!(cursor.previous().is_some());
    }

    #[test]
    fn peeking_does_not_move(ops in prop::collection::vec(0u8..4, 0..60), n in 1isize..30) {
        let doc = build(&ops);
        let mut cursor = Cursor::new(doc.root());
        let expected = cursor.forward().nth((n - 1) as usize).map(|(node, _)| node);

        cursor.reset().opening();
        prop_assert_eq!(cursor.peek(n), expected);
        prop_assert_eq!(cursor.node(), doc.root());
        prop_assert!(cursor.at_opening());
        prop_assert_eq!(cursor.next(), Cursor::new(doc.root()).next());
    }

    #[test]
    fn root_confines_the_walk(ops in prop::collection::vec(0u8..4, 1..60), pick in any::<prop::sample::Index>()) {
        let doc = build(&ops);
        let mut nodes = Vec::new();
        all_nodes(doc.root(), &mut nodes);
        let elements: Vec<_> = nodes.into_iter().filter(|n| n.is_element()).collect();
        prop_assume!(!elements.is_empty());
        let root = *pick.get(&elements);

        let mut cursor = Cursor::with_root(root, root).expect("node is its own root");
        for (node, _) in cursor.forward() {
            prop_assert!(node != root && node.is_inside(root));
        }
        for (node, _) in cursor.backward() {
            prop_assert!(node != root && node.is_inside(root));
        }
    }
}
