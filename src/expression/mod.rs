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
mod value;

use std::fmt::Display;

use crate::NodeRef;
use crate::Predicate;

pub use error::BadExpression;
use error::description;
pub use value::Value;

/// Turns a textual expression into a node predicate.
///
/// A cursor hands every string expression it receives to its compiler.
/// Implement this to plug in another expression language.
pub trait ExpressionCompiler {
    fn compile<'a>(&self, expression: &str) -> Result<Predicate<'a>, BadExpression>;
}

/// The default compiler, which understands [`PropertyPath`] expressions.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyPathCompiler;

impl ExpressionCompiler for PropertyPathCompiler {
    fn compile<'a>(&self, expression: &str) -> Result<Predicate<'a>, BadExpression> {
        let path = PropertyPath::new(expression)?;
        Ok(Box::new(move |node: NodeRef<'a>| path.matches(node)))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Property {
    Type,
    Name,
    Value,
    Parent,
    FirstChild,
    LastChild,
    NextSibling,
    PreviousSibling,
    ChildCount,
}

impl Property {
    fn from_name(name: &str) -> Option<Property> {
        let property = match name {
            "type" | "nodeType" => Property::Type,
            "name" | "nodeName" | "tagName" => Property::Name,
            "value" | "nodeValue" | "data" => Property::Value,
            "parent" | "parentNode" => Property::Parent,
            "first_child" | "firstChild" => Property::FirstChild,
            "last_child" | "lastChild" => Property::LastChild,
            "next_sibling" | "nextSibling" | "next" => Property::NextSibling,
            "previous_sibling" | "previousSibling" | "previous" => Property::PreviousSibling,
            "child_count" | "childCount" => Property::ChildCount,
            _ => return None,
        };
        Some(property)
    }

    fn read<'v>(self, node: NodeRef<'v>) -> Value<'v> {
        let link = |n: Option<NodeRef<'v>>| n.map_or(Value::Null, Value::Node);
        match self {
            Property::Type => Value::Number(f64::from(node.node_type().as_number())),
            Property::Name => Value::Str(node.name()),
            Property::Value => node.value().map_or(Value::Null, Value::Str),
            Property::Parent => link(node.parent()),
            Property::FirstChild => link(node.first_child()),
            Property::LastChild => link(node.last_child()),
            Property::NextSibling => link(node.next_sibling()),
            Property::PreviousSibling => link(node.previous_sibling()),
            Property::ChildCount => Value::Number(node.children().count() as f64),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Segment {
    Property(Property),
    Attribute(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    fn apply(self, left: &Value<'_>, right: &Value<'_>) -> bool {
        match self {
            Operator::Eq => left.loose_eq(right),
            Operator::Ne => !left.loose_eq(right),
            Operator::Lt => left.loose_cmp(right).is_some_and(|o| o.is_lt()),
            Operator::Le => left.loose_cmp(right).is_some_and(|o| o.is_le()),
            Operator::Gt => left.loose_cmp(right).is_some_and(|o| o.is_gt()),
            Operator::Ge => left.loose_cmp(right).is_some_and(|o| o.is_ge()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

#[derive(Clone, Debug, PartialEq)]
enum Ast {
    Literal(Literal),
    Path(Vec<Segment>),
    Not(Box<Ast>),
    // Chains of && and || are kept flat, with two or more terms
    And(Vec<Ast>),
    Or(Vec<Ast>),
    Compare(Operator, Box<Ast>, Box<Ast>),
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(f64),
    Dot,
    At,
    Not,
    And,
    Or,
    Op(Operator),
    LeftParen,
    RightParen,
}

#[derive(Debug)]
struct Lexeme {
    token: Token,
    position: usize,
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_char(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == b'-' || c == b':'
}

fn tokenize(expression: &str) -> Result<Vec<Lexeme>, BadExpression> {
    let bytes = expression.as_bytes();
    let mut lexemes = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos];
        let next = bytes.get(pos + 1).copied();
        pos += 1;

        let token = match c {
            b' ' | b'\t' | b'\r' | b'\n' => continue,
            b'.' => Token::Dot,
            b'@' => Token::At,
            b'(' => Token::LeftParen,
            b')' => Token::RightParen,
            b'!' if next == Some(b'=') => {
                pos += 1;
                if bytes.get(pos) == Some(&b'=') {
                    pos += 1;
                }
                Token::Op(Operator::Ne)
            }
            b'!' => Token::Not,
            b'=' if next == Some(b'=') => {
                pos += 1;
                if bytes.get(pos) == Some(&b'=') {
                    pos += 1;
                }
                Token::Op(Operator::Eq)
            }
            b'<' if next == Some(b'=') => {
                pos += 1;
                Token::Op(Operator::Le)
            }
            b'<' => Token::Op(Operator::Lt),
            b'>' if next == Some(b'=') => {
                pos += 1;
                Token::Op(Operator::Ge)
            }
            b'>' => Token::Op(Operator::Gt),
            b'&' if next == Some(b'&') => {
                pos += 1;
                Token::And
            }
            b'|' if next == Some(b'|') => {
                pos += 1;
                Token::Or
            }
            b'=' | b'&' | b'|' => {
                return Err(BadExpression::new(start, description::BAD_OPERATOR));
            }
            b'\'' | b'"' => {
                let mut value = String::new();
                let mut back = pos;
                loop {
                    match bytes.get(pos) {
                        None => {
                            return Err(BadExpression::new(
                                start,
                                description::UNTERMINATED_STRING,
                            ));
                        }
                        Some(&q) if q == c => {
                            value.push_str(&expression[back..pos]);
                            pos += 1;
                            break;
                        }
                        Some(b'\\') if pos + 1 < bytes.len() && bytes[pos + 1] < 0x80 => {
                            value.push_str(&expression[back..pos]);
                            value.push(bytes[pos + 1] as char);
                            pos += 2;
                            back = pos;
                        }
                        Some(_) => pos += 1,
                    }
                }
                Token::Str(value)
            }
            b'-' | b'0'..=b'9' => {
                if c == b'-' && !next.is_some_and(|d| d.is_ascii_digit()) {
                    return Err(BadExpression::new(start, description::BAD_NUMBER));
                }
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
                if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
                    pos += 1;
                    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
                match expression[start..pos].parse() {
                    Ok(number) => Token::Number(number),
                    Err(_) => return Err(BadExpression::new(start, description::BAD_NUMBER)),
                }
            }
            c if is_ident_start(c) => {
                while pos < bytes.len() && is_ident_char(bytes[pos]) {
                    pos += 1;
                }
                Token::Ident(expression[start..pos].to_string())
            }
            _ => return Err(BadExpression::new(start, description::UNEXPECTED_CHARACTER)),
        };
        lexemes.push(Lexeme {
            token,
            position: start,
        });
    }

    Ok(lexemes)
}

// Nesting of parentheses and `!` operators, and length of comparison chains
const MAX_DEPTH: usize = 64;

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.lexemes.get(self.pos).map(|lexeme| &lexeme.token)
    }

    fn position(&self) -> usize {
        self.lexemes
            .get(self.pos)
            .map_or(self.end, |lexeme| lexeme.position)
    }

    fn error(&self, description: &'static str) -> BadExpression {
        BadExpression::new(self.position(), description)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.lexemes.get(self.pos).map(|lexeme| lexeme.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn enter(&mut self, position: usize) -> Result<(), BadExpression> {
        if self.depth >= MAX_DEPTH {
            return Err(BadExpression::new(position, description::TOO_DEEP));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_or(&mut self) -> Result<Ast, BadExpression> {
        let mut terms = vec![self.parse_and()?];
        while self.eat(&Token::Or) {
            terms.push(self.parse_and()?);
        }
        Ok(join(terms, Ast::Or))
    }

    fn parse_and(&mut self) -> Result<Ast, BadExpression> {
        let mut terms = vec![self.parse_compare()?];
        while self.eat(&Token::And) {
            terms.push(self.parse_compare()?);
        }
        Ok(join(terms, Ast::And))
    }

    fn parse_compare(&mut self) -> Result<Ast, BadExpression> {
        let mut left = self.parse_unary()?;
        let mut chain = 0;
        while let Some(&Token::Op(operator)) = self.peek() {
            chain += 1;
            if chain > MAX_DEPTH {
                return Err(self.error(description::TOO_DEEP));
            }
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Ast::Compare(operator, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Ast, BadExpression> {
        let position = self.position();
        if self.eat(&Token::Not) {
            self.enter(position)?;
            let inner = self.parse_unary()?;
            self.leave();
            return Ok(Ast::Not(Box::new(inner)));
        }
        self.parse_operand()
    }

    fn parse_operand(&mut self) -> Result<Ast, BadExpression> {
        let position = self.position();
        match self.advance() {
            Some(Token::LeftParen) => {
                self.enter(position)?;
                let inner = self.parse_or()?;
                if !self.eat(&Token::RightParen) {
                    return Err(self.error(description::UNBALANCED_PARENS));
                }
                self.leave();
                Ok(inner)
            }
            Some(Token::Str(s)) => Ok(Ast::Literal(Literal::Str(s))),
            Some(Token::Number(n)) => Ok(Ast::Literal(Literal::Number(n))),
            Some(Token::At) => {
                let segment = self.parse_attribute()?;
                self.parse_path(vec![segment])
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Ast::Literal(Literal::Bool(true))),
                "false" => Ok(Ast::Literal(Literal::Bool(false))),
                "null" => Ok(Ast::Literal(Literal::Null)),
                // Expressions written for the node variable itself
                "node" if self.peek() == Some(&Token::Dot) => {
                    self.pos += 1;
                    let segment = self.parse_segment()?;
                    self.parse_path(vec![segment])
                }
                _ => {
                    self.pos -= 1;
                    let segment = self.parse_segment()?;
                    self.parse_path(vec![segment])
                }
            },
            _ => Err(BadExpression::new(position, description::EXPECTED_OPERAND)),
        }
    }

    fn parse_attribute(&mut self) -> Result<Segment, BadExpression> {
        let position = self.position();
        match self.advance() {
            Some(Token::Ident(name)) => Ok(Segment::Attribute(name)),
            _ => Err(BadExpression::new(position, description::EXPECTED_ATTRIBUTE)),
        }
    }

    fn parse_segment(&mut self) -> Result<Segment, BadExpression> {
        let position = self.position();
        match self.advance() {
            Some(Token::At) => self.parse_attribute(),
            Some(Token::Ident(name)) if name == "attributes" || name == "attr" => {
                if !self.eat(&Token::Dot) {
                    return Err(self.error(description::EXPECTED_ATTRIBUTE));
                }
                self.parse_attribute()
            }
            Some(Token::Ident(name)) => Property::from_name(&name)
                .map(Segment::Property)
                .ok_or(BadExpression::new(position, description::UNKNOWN_PROPERTY)),
            _ => Err(BadExpression::new(position, description::EXPECTED_PROPERTY)),
        }
    }

    fn parse_path(&mut self, mut segments: Vec<Segment>) -> Result<Ast, BadExpression> {
        while self.peek() == Some(&Token::Dot) {
            if let Some(Segment::Attribute(_)) = segments.last() {
                return Err(self.error(description::NOT_A_NODE));
            }
            self.pos += 1;
            segments.push(self.parse_segment()?);
        }
        Ok(Ast::Path(segments))
    }
}

fn join(mut terms: Vec<Ast>, chain: fn(Vec<Ast>) -> Ast) -> Ast {
    if terms.len() == 1
        && let Some(term) = terms.pop()
    {
        return term;
    }
    chain(terms)
}

fn follow<'v>(segments: &'v [Segment], node: NodeRef<'v>) -> Value<'v> {
    let mut value = Value::Node(node);
    for segment in segments {
        let Value::Node(current) = value else {
            return Value::Null;
        };
        value = match segment {
            Segment::Property(property) => property.read(current),
            Segment::Attribute(name) => current.attribute(name).map_or(Value::Null, Value::Str),
        };
    }
    value
}

fn evaluate<'v>(ast: &'v Ast, node: NodeRef<'v>) -> Value<'v> {
    match ast {
        Ast::Literal(Literal::Null) => Value::Null,
        Ast::Literal(Literal::Bool(b)) => Value::Bool(*b),
        Ast::Literal(Literal::Number(n)) => Value::Number(*n),
        Ast::Literal(Literal::Str(s)) => Value::Str(s),
        Ast::Path(segments) => follow(segments, node),
        Ast::Not(inner) => Value::Bool(!evaluate(inner, node).is_truthy()),
        // Both return the operand which decided the result
        Ast::And(terms) => {
            let mut value = Value::Bool(true);
            for term in terms {
                value = evaluate(term, node);
                if !value.is_truthy() {
                    break;
                }
            }
            value
        }
        Ast::Or(terms) => {
            let mut value = Value::Bool(false);
            for term in terms {
                value = evaluate(term, node);
                if value.is_truthy() {
                    break;
                }
            }
            value
        }
        Ast::Compare(operator, left, right) => {
            let left = evaluate(left, node);
            let right = evaluate(right, node);
            Value::Bool(operator.apply(&left, &right))
        }
    }
}

/// A compiled boolean expression over node properties.
///
/// Operands are property paths like `name`, `parent.name`,
/// `first_child.value` or `@id` (an attribute), string literals in
/// single or double quotes, numbers, `true`, `false` and `null`.
/// Operators are `!`, `==`, `!=`, `<`, `<=`, `>`, `>=`, `&&`, `||` and
/// parentheses. DOM style names such as `nodeName`, `nodeType` and
/// `parentNode` are accepted as aliases.
///
/// A path which cannot be followed, such as the parent of the root,
/// evaluates to `null`.
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::{Document, PropertyPath};
///
/// let doc = Document::new("a")?;
/// let b = doc.insert_element("b")?.insert_attribute("x", "1")?;
/// let path = PropertyPath::new("parent.name == 'a' && @x == 1")?;
/// assert!(path.matches(b));
/// assert!(!path.matches(doc.root()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PropertyPath {
    source: String,
    ast: Ast,
}

impl PropertyPath {
    pub fn new(expression: &str) -> Result<Self, BadExpression> {
        let lexemes = tokenize(expression)?;
        if lexemes.is_empty() {
            return Err(BadExpression::new(0, description::EMPTY));
        }
        let mut parser = Parser {
            lexemes,
            pos: 0,
            end: expression.len(),
            depth: 0,
        };
        let ast = parser.parse_or()?;
        if parser.peek().is_some() {
            let description = if parser.peek() == Some(&Token::RightParen) {
                description::UNBALANCED_PARENS
            } else {
                description::TRAILING_INPUT
            };
            return Err(parser.error(description));
        }

        Ok(PropertyPath {
            source: expression.to_string(),
            ast,
        })
    }

    pub fn evaluate<'v>(&'v self, node: NodeRef<'v>) -> Value<'v> {
        evaluate(&self.ast, node)
    }

    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        self.evaluate(node).is_truthy()
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
