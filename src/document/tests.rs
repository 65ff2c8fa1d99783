/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use pretty_assertions::assert_eq;

use super::error::description;
use super::*;

fn check_doc_xml(doc: &Document, expected: &str) {
    assert_eq!(doc.to_string(), expected);
    assert_eq!(format!("{}", doc.root()), expected);
}

#[test]
fn it_works() {
    let doc = Document::new("html").unwrap();
    let blink = doc
        .insert_element("p")
        .unwrap()
        .insert_element("b")
        .unwrap()
        .insert_element("blink")
        .unwrap()
        .insert_text("lala")
        .unwrap();
    assert_eq!(blink.node_type(), NodeType::Text);

    let p2 = doc
        .root()
        .first_child()
        .unwrap()
        .append_text("foo&")
        .unwrap()
        .append_element("p2")
        .unwrap();

    p2.prepend_text("bar").unwrap().prepend_element("p3").unwrap();

    check_doc_xml(
        &doc,
        "<html><p><b><blink>lala</blink></b></p>foo&amp;<p3/>bar<p2/></html>",
    );
}

#[test]
fn attributes() {
    let doc = Document::new("doc").unwrap();
    let a = doc.insert_element("a").unwrap();
    assert!(a.insert_attribute("i", "1").unwrap().is_element());
    assert_eq!(
        a.insert_attribute("i", "1").unwrap_err(),
        DocumentError::BadTree(description::DUPLICATE_ATTRIBUTE)
    );
    assert!(a.insert_attribute("j", "<2>").unwrap().is_element());
    assert_eq!(a.attribute("i"), Some("1"));
    assert_eq!(a.attribute("k"), None);
    assert_eq!(a.attributes().collect::<Vec<_>>(), [("i", "1"), ("j", "<2>")]);

    let text = doc.insert_text("t").unwrap();
    assert_eq!(
        text.insert_attribute("i", "1").unwrap_err(),
        DocumentError::BadTree(description::LEAF_ATTRIBUTE)
    );
    assert_eq!(text.attribute("i"), None);

    check_doc_xml(&doc, "<doc><a i=\"1\" j=\"&lt;2&gt;\"/>t</doc>");
}

#[test]
fn leaf_nodes_have_no_children() {
    let doc = Document::new("doc").unwrap();
    let text = doc.insert_text("x").unwrap();
    let comment = doc.root().insert_comment("y").unwrap();

    assert_eq!(
        text.insert_element("a").unwrap_err(),
        DocumentError::BadTree(description::LEAF_CHILDREN)
    );
    assert_eq!(
        comment.insert_text("a").unwrap_err(),
        DocumentError::BadTree(description::LEAF_CHILDREN)
    );
    assert_eq!(
        doc.root().append_element("a").unwrap_err(),
        DocumentError::BadTree(description::ROOT_SIBLING)
    );
    assert_eq!(
        doc.root().prepend_text("a").unwrap_err(),
        DocumentError::BadTree(description::ROOT_SIBLING)
    );
    check_doc_xml(&doc, "<doc>x<!--y--></doc>");
}

#[test]
fn navigation() {
    let doc = Document::from_events([
        TreeEvent::StartElement("a"),
        TreeEvent::StartElement("b"),
        TreeEvent::Text("x"),
        TreeEvent::EndElement("b"),
        TreeEvent::Comment("c"),
        TreeEvent::StartElement("d"),
        TreeEvent::EndElement("d"),
        TreeEvent::EndElement("a"),
    ])
    .unwrap();
    let a = doc.root();
    let b = doc.find_element("b").unwrap();
    let x = b.first_child().unwrap();
    let d = a.last_child().unwrap();

    assert_eq!(a.parent(), None);
    assert_eq!(a.next_sibling(), None);
    assert_eq!(b.parent(), Some(a));
    assert_eq!(x.parent(), Some(b));
    assert_eq!(b.next_sibling().and_then(|c| c.value()), Some("c"));
    assert_eq!(d.previous_sibling().and_then(|c| c.next_sibling()), Some(d));
    assert_eq!(b.previous_sibling(), None);
    assert_eq!(x.root(), a);
    assert_eq!(a.root(), a);
    assert_eq!(a.find_element("d"), Some(d));
    assert_eq!(a.find_element("x"), None);

    assert_eq!(a.children().count(), 3);
    assert_eq!(x.ancestors().collect::<Vec<_>>(), [b, a]);
    assert!(x.is_inside(a));
    assert!(x.is_inside(x));
    assert!(!a.is_inside(x));
    assert!(!d.is_inside(b));

    assert!(a.has_children());
    assert!(!d.has_children());
    assert_eq!(x.name(), "");
    assert_eq!(b.value(), None);
    assert_eq!(format!("{x:?}"), "NodeRef(\"x\")");
    assert_eq!(format!("{d:?}"), "NodeRef(<d>)");
}

#[test]
fn node_type_numbers() {
    for node_type in [NodeType::Element, NodeType::Text, NodeType::Comment] {
        assert_eq!(NodeType::from_number(node_type.as_number()), Some(node_type));
    }
    assert_eq!(NodeType::Text.as_number(), 3);
    assert_eq!(NodeType::from_number(2), None);
    assert!(NodeType::Element.is_compound());
    assert!(!NodeType::Comment.is_compound());
}

#[test]
fn builder() {
    let mut builder = TreeBuilder::new();
    assert!(builder.peek().is_none());
    builder.append(TreeEvent::StartElement("a")).unwrap();
    builder.append(TreeEvent::Attribute("x", "1")).unwrap();
    builder.append(TreeEvent::Text("&")).unwrap();
    assert_eq!(builder.peek().map(|doc| doc.root().name()), Some("a"));
    assert_eq!(
        builder.append(TreeEvent::EndElement("b")).unwrap_err(),
        DocumentError::BadTree(description::TAG_MISMATCH)
    );
    builder.append(TreeEvent::EndElement("a")).unwrap();
    assert_eq!(
        builder.append(TreeEvent::Text("late")).unwrap_err(),
        DocumentError::BadTree(description::ROOT_CLOSED)
    );
    let doc = builder.into_document().unwrap();
    check_doc_xml(&doc, "<a x=\"1\">&amp;</a>");
}

#[test]
fn builder_starts_with_the_root() {
    let mut builder = TreeBuilder::default();
    assert_eq!(
        builder.append(TreeEvent::Comment("early")).unwrap_err(),
        DocumentError::BadTree(description::NO_ROOT_START)
    );
    assert!(builder.peek().is_none());
    builder.append(TreeEvent::StartElement("r")).unwrap();
    builder.append(TreeEvent::StartElement("s")).unwrap();
    assert_eq!(builder.peek().map(|doc| doc.root().children().count()), Some(1));
    builder.append(TreeEvent::EndElement("s")).unwrap();
    builder.append(TreeEvent::EndElement("r")).unwrap();
    check_doc_xml(&builder.into_document().unwrap(), "<r><s/></r>");
}

#[test]
fn builder_errors() {
    assert_eq!(
        Document::from_events([TreeEvent::Text("a")]).unwrap_err(),
        DocumentError::BadTree(description::NO_ROOT_START)
    );
    let no_events: [TreeEvent; 0] = [];
    assert_eq!(
        Document::from_events(no_events).unwrap_err(),
        DocumentError::BadTree(description::NO_DOCUMENT)
    );
    assert_eq!(
        Document::from_events([TreeEvent::StartElement("a"), TreeEvent::StartElement("b")])
            .unwrap_err(),
        DocumentError::BadTree(description::UNCLOSED_ELEMENT)
    );
    assert_eq!(
        Document::from_events([
            TreeEvent::StartElement("a"),
            TreeEvent::Text("b"),
            TreeEvent::Attribute("x", "1"),
            TreeEvent::Attribute("x", "2"),
        ])
        .unwrap_err(),
        DocumentError::BadTree(description::DUPLICATE_ATTRIBUTE)
    );
    assert_eq!(
        DocumentError::BadTree(description::TAG_MISMATCH).to_string(),
        "invalid tree structure: start and end elements have different names"
    );
}

#[test]
fn serialize_nested() {
    let doc = Document::new("a").unwrap();
    let b = doc.insert_element("b").unwrap();
    b.insert_element("c").unwrap().insert_text("1 < 2").unwrap();
    b.insert_element("d").unwrap();
    doc.insert_text("tail").unwrap();

    check_doc_xml(&doc, "<a><b><c>1 &lt; 2</c><d/></b>tail</a>");
    assert_eq!(b.to_string(), "<b><c>1 &lt; 2</c><d/></b>");
    assert_eq!(Document::new("e").unwrap().to_string(), "<e/>");
}

#[test]
fn arena_usage() {
    let doc = Document::new("a").unwrap();
    let before = doc.arena_stats();
    for i in 0..100 {
        doc.insert_element("child")
            .unwrap()
            .insert_attribute("n", &i.to_string())
            .unwrap();
    }
    let after = doc.arena_stats();
    assert!(after.nr_structs > before.nr_structs);
    assert!(after.used_bytes > before.used_bytes);
    assert!(after.used_bytes <= after.allocated_bytes);
    assert!(format!("{doc:?}").starts_with("Document { root: NodeRef(<a>)"));
}
