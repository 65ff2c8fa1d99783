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
mod expr;
mod iterators;

use std::collections::HashSet;
use std::fmt::Debug;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::NodeRef;
use crate::NodeType;
use crate::expression::ExpressionCompiler;
use crate::expression::PropertyPathCompiler;

pub use error::InvalidRoot;
pub use expr::Expr;
pub use expr::Predicate;
pub use iterators::Walk;

/// Direction of travel in document order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// Which side of a node the cursor is visiting.
///
/// Leaf nodes have a single visit; for them the boundary only records
/// the direction the cursor arrived from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Boundary {
    Opening,
    Closing,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Position<'a> {
    node: NodeRef<'a>,
    closing: bool,
    // Last move was up to the parent
    climbing: bool,
}

enum Step<'a> {
    /// Moved to a position which may be emitted.
    Visit(Position<'a>),
    /// Moved through a position which is never emitted.
    Pass(Position<'a>),
    End,
}

impl<'a> Position<'a> {
    fn at(node: NodeRef<'a>, closing: bool) -> Position<'a> {
        Position {
            node,
            closing,
            climbing: false,
        }
    }

    /// One move of the document order state machine.
    ///
    /// Both directions share the same rules. Moving forward from an
    /// opening boundary and moving backward from a closing boundary
    /// both lead into the children, which is what `forward ^ closing`
    /// expresses. A node entered from either side starts at the
    /// boundary facing the direction of travel.
    fn step(self, direction: Direction, revisit: bool) -> Step<'a> {
        let forward = direction.is_forward();
        let node = self.node;

        if !self.climbing && (forward ^ self.closing) {
            let child = if forward {
                node.first_child()
            } else {
                node.last_child()
            };
            if let Some(child) = child {
                return Step::Visit(Position::at(child, !forward));
            }
            if revisit && node.node_type().is_compound() {
                // Childless element, its other boundary comes right after
                return Step::Visit(Position::at(node, forward));
            }
        }

        let sibling = if forward {
            node.next_sibling()
        } else {
            node.previous_sibling()
        };
        if let Some(sibling) = sibling {
            return Step::Visit(Position::at(sibling, !forward));
        }

        match node.parent() {
            None => Step::End,
            Some(parent) => {
                let position = Position {
                    node: parent,
                    closing: forward,
                    climbing: true,
                };
                if revisit {
                    Step::Visit(position)
                } else {
                    Step::Pass(position)
                }
            }
        }
    }
}

struct Watcher<'a> {
    matches: Predicate<'a>,
    callback: Box<dyn FnMut(NodeRef<'a>) + 'a>,
}

/// A position in a node tree which moves in document order.
///
/// The cursor visits element nodes twice, once at their opening
/// boundary and once at their closing boundary, and leaf nodes once.
/// Moves are made with [`Cursor::next`] and [`Cursor::previous`],
/// lookahead with [`Cursor::peek`]. Running off the tree (or off the
/// subtree of the root node) returns `None` and leaves the cursor where
/// it was, ready to go the other way.
///
/// The cursor only reads the tree. Several cursors can walk the same
/// document at the same time.
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::{Cursor, Document, NodeType};
///
/// let doc = Document::new("body")?;
/// doc.insert_text("hi")?;
/// doc.insert_element("p")?.insert_text("there")?;
///
/// let mut cursor = Cursor::new(doc.root());
/// cursor.filter([NodeType::Text]);
/// assert_eq!(cursor.next().and_then(|n| n.value()), Some("hi"));
/// assert_eq!(cursor.next().and_then(|n| n.value()), Some("there"));
/// assert_eq!(cursor.next(), None);
/// # Ok(())
/// # }
/// ```
pub struct Cursor<'a> {
    current: Position<'a>,
    start: NodeRef<'a>,
    peeked: Position<'a>,
    root: Option<NodeRef<'a>>,
    revisit: bool,
    visit_closing: bool,
    types: Option<HashSet<NodeType>>,
    selects: Vec<Predicate<'a>>,
    rejects: Vec<Predicate<'a>>,
    watchers: Vec<Watcher<'a>>,
    compiler: Box<dyn ExpressionCompiler>,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the opening boundary of the node.
    pub fn new(node: NodeRef<'a>) -> Cursor<'a> {
        debug!(node = ?node, "cursor created");
        let position = Position::at(node, false);
        Cursor {
            current: position,
            start: node,
            peeked: position,
            root: None,
            revisit: true,
            visit_closing: true,
            types: None,
            selects: Vec::new(),
            rejects: Vec::new(),
            watchers: Vec::new(),
            compiler: Box::new(PropertyPathCompiler),
        }
    }

    /// Creates a cursor which never leaves the subtree below `root`.
    ///
    /// The root node itself is a boundary and is not visited.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRoot` if `root` is neither the node nor one of
    /// its ancestors.
    pub fn with_root(node: NodeRef<'a>, root: NodeRef<'a>) -> Result<Cursor<'a>, InvalidRoot> {
        if !node.is_inside(root) {
            return Err(InvalidRoot);
        }
        let mut cursor = Cursor::new(node);
        cursor.root = Some(root);
        Ok(cursor)
    }

    /// Cursor over the descendants of a node.
    pub(crate) fn scoped(node: NodeRef<'a>) -> Cursor<'a> {
        let mut cursor = Cursor::new(node);
        cursor.root = Some(node);
        cursor
    }

    //
    // Configuration
    //

    /// Accepts only nodes of the given types.
    ///
    /// Repeated calls widen the accepted set.
    pub fn filter<I>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = NodeType>,
    {
        self.types.get_or_insert_with(HashSet::new).extend(types);
        self
    }

    /// Accepts nodes matching any of the selected expressions.
    pub fn select(&mut self, expr: impl Into<Expr<'a>>) -> &mut Self {
        let predicate = self.compile(expr.into());
        self.selects.push(predicate);
        self
    }

    /// Skips nodes matching any of the rejected expressions.
    pub fn reject(&mut self, expr: impl Into<Expr<'a>>) -> &mut Self {
        let predicate = self.compile(expr.into());
        self.rejects.push(predicate);
        self
    }

    /// Controls whether elements are visited again at their closing
    /// boundary after their children. Defaults to true.
    pub fn revisit(&mut self, revisit: bool) -> &mut Self {
        self.revisit = revisit;
        self
    }

    /// Controls whether closing boundaries are emitted at all. When
    /// disabled the cursor produces plain pre-order. Defaults to true.
    pub fn visit_closing(&mut self, visit_closing: bool) -> &mut Self {
        self.visit_closing = visit_closing;
        self
    }

    /// Replaces the compiler used for string expressions. Predicates
    /// already compiled are kept.
    pub fn compiler(&mut self, compiler: impl ExpressionCompiler + 'static) -> &mut Self {
        self.compiler = Box::new(compiler);
        self
    }

    /// Calls `callback` with every node the cursor moves to which
    /// matches `expr`. Peeking does not trigger watchers.
    pub fn watch<F>(&mut self, expr: impl Into<Expr<'a>>, callback: F) -> &mut Self
    where
        F: FnMut(NodeRef<'a>) + 'a,
    {
        let matches = self.compile(expr.into());
        self.watchers.push(Watcher {
            matches,
            callback: Box::new(callback),
        });
        self
    }

    /// Runs a reusable configuration function on the cursor.
    pub fn apply(&mut self, configure: impl FnOnce(&mut Self)) -> &mut Self {
        configure(self);
        self
    }

    //
    // Position
    //

    /// Moves to the opening boundary of the current element.
    ///
    /// Does nothing on leaf nodes.
    pub fn opening(&mut self) -> &mut Self {
        if self.current.node.node_type().is_compound() {
            self.current.closing = false;
            self.peeked = self.current;
        }
        self
    }

    /// Moves to the closing boundary of the current element.
    ///
    /// Does nothing on leaf nodes.
    pub fn closing(&mut self) -> &mut Self {
        if self.current.node.node_type().is_compound() {
            self.current.closing = true;
            self.peeked = self.current;
        }
        self
    }

    /// True at the opening boundary of an element, and on leaf nodes
    /// reached going forward.
    pub fn at_opening(&self) -> bool {
        !self.current.closing
    }

    /// True at the closing boundary of an element, and on leaf nodes
    /// reached going backward.
    pub fn at_closing(&self) -> bool {
        self.current.closing
    }

    /// The side of the current node, as a value.
    pub fn boundary(&self) -> Boundary {
        if self.current.closing {
            Boundary::Closing
        } else {
            Boundary::Opening
        }
    }

    /// Moves back to the node the cursor was created with.
    ///
    /// The boundary flag is kept, so a cursor which was put at a closing
    /// boundary returns to the closing boundary of its start node.
    pub fn reset(&mut self) -> &mut Self {
        self.reset_to(self.start)
    }

    /// Moves to the given node. Configuration is not touched.
    pub fn reset_to(&mut self, node: NodeRef<'a>) -> &mut Self {
        self.current.node = node;
        self.current.climbing = false;
        self.peeked = self.current;
        self
    }

    /// The node of the last committed move. Peeks do not change it.
    pub fn node(&self) -> NodeRef<'a> {
        self.current.node
    }

    /// The node [`Cursor::reset`] returns to.
    pub fn start(&self) -> NodeRef<'a> {
        self.start
    }

    /// The node whose subtree confines the walk, if any.
    pub fn root(&self) -> Option<NodeRef<'a>> {
        self.root
    }

    //
    // Traversal
    //

    /// Moves to the next accepted node in document order.
    #[allow(
        clippy::should_implement_trait,
        reason = "the cursor also moves backward and peeks, see forward() for an Iterator"
    )]
    pub fn next(&mut self) -> Option<NodeRef<'a>> {
        self.walk(Direction::Forward, Expr::Any, 1, false)
    }

    /// Moves forward to the `n`th accepted node which also matches
    /// `expr`. A count of zero counts as one.
    pub fn next_matching(&mut self, expr: impl Into<Expr<'a>>, n: usize) -> Option<NodeRef<'a>> {
        self.walk(Direction::Forward, expr.into(), n, false)
    }

    /// Moves to the previous accepted node in document order.
    pub fn previous(&mut self) -> Option<NodeRef<'a>> {
        self.walk(Direction::Backward, Expr::Any, 1, false)
    }

    pub fn previous_matching(
        &mut self,
        expr: impl Into<Expr<'a>>,
        n: usize,
    ) -> Option<NodeRef<'a>> {
        self.walk(Direction::Backward, expr.into(), n, false)
    }

    /// Looks `n` accepted nodes ahead (or behind for negative values)
    /// without moving the cursor.
    ///
    /// Consecutive peeks continue from the last peeked position, so
    /// `peek(1)` twice sees the same node as `peek(2)` once. Moving
    /// the cursor drops the lookahead. `peek(0)` returns the current
    /// node.
    pub fn peek(&mut self, n: isize) -> Option<NodeRef<'a>> {
        self.peek_matching(Expr::Any, n)
    }

    pub fn peek_matching(&mut self, expr: impl Into<Expr<'a>>, n: isize) -> Option<NodeRef<'a>> {
        match n {
            0 => Some(self.current.node),
            n if n > 0 => self.walk(Direction::Forward, expr.into(), n.unsigned_abs(), true),
            n => self.walk(Direction::Backward, expr.into(), n.unsigned_abs(), true),
        }
    }

    /// Iterates forward until the end of the tree.
    pub fn forward(&mut self) -> Walk<'_, 'a> {
        Walk::new(self, Direction::Forward)
    }

    /// Iterates backward until the start of the tree.
    pub fn backward(&mut self) -> Walk<'_, 'a> {
        Walk::new(self, Direction::Backward)
    }

    fn compile(&self, expr: Expr<'a>) -> Predicate<'a> {
        match expr {
            Expr::Any => Box::new(|_: NodeRef<'a>| true),
            Expr::Type(node_type) => Box::new(move |node: NodeRef<'a>| node.node_type() == node_type),
            Expr::TypeNumber(number) => {
                Box::new(move |node: NodeRef<'a>| node.node_type().as_number() == number)
            }
            Expr::Path(path) => match self.compiler.compile(&path) {
                Ok(predicate) => predicate,
                Err(err) => {
                    warn!(expression = %path, error = %err, "bad expression matches every node");
                    Box::new(|_: NodeRef<'a>| true)
                }
            },
            Expr::Predicate(predicate) => predicate,
        }
    }

    fn is_outside(&self, node: NodeRef<'a>) -> bool {
        match self.root {
            None => false,
            Some(root) => !node.ancestors().any(|ancestor| ancestor == root),
        }
    }

    fn accepts(&self, position: &Position<'a>) -> bool {
        let node = position.node;
        if let Some(types) = &self.types
            && !types.contains(&node.node_type())
        {
            return false;
        }
        if !self.visit_closing && position.closing && node.node_type().is_compound() {
            return false;
        }
        let selected = self.selects.is_empty() || self.selects.iter().any(|select| select(node));
        selected && !self.rejects.iter().any(|reject| reject(node))
    }

    fn walk(
        &mut self,
        direction: Direction,
        expr: Expr<'a>,
        n: usize,
        peek: bool,
    ) -> Option<NodeRef<'a>> {
        let matches = self.compile(expr);
        let mut remaining = n.max(1);
        if !peek {
            self.peeked = self.current;
        }
        let mut position = self.peeked;

        loop {
            let (next, pause) = match position.step(direction, self.revisit) {
                Step::Visit(next) => (next, true),
                Step::Pass(next) => (next, false),
                Step::End => {
                    trace!(?direction, "end of the tree");
                    return None;
                }
            };
            if self.is_outside(next.node) {
                trace!(?direction, node = ?next.node, "end of the root subtree");
                return None;
            }
            position = next;
            if !pause || !self.accepts(&position) || !matches(position.node) {
                continue;
            }
            remaining -= 1;
            if remaining == 0 {
                position.climbing = false;
                return Some(self.commit(position, peek));
            }
        }
    }

    fn commit(&mut self, position: Position<'a>, peek: bool) -> NodeRef<'a> {
        let node = position.node;
        self.peeked = position;
        if peek {
            trace!(node = ?node, closing = position.closing, "peeked");
            return node;
        }
        trace!(node = ?node, closing = position.closing, "moved");
        self.current = position;
        for watcher in &mut self.watchers {
            if (watcher.matches)(node) {
                (watcher.callback)(node);
            }
        }
        node
    }
}

impl Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("node", &self.current.node)
            .field("boundary", &self.boundary())
            .field("start", &self.start)
            .field("root", &self.root)
            .field("revisit", &self.revisit)
            .field("visit_closing", &self.visit_closing)
            .field("types", &self.types)
            .field("selects", &self.selects.len())
            .field("rejects", &self.rejects.len())
            .field("watchers", &self.watchers.len())
            .finish()
    }
}


#[cfg(test)]
mod proptests;

mod nocompile;
