/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// # Must not compile tests
///
/// Cursor cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::Cursor;
/// use ikswalk::Document;
/// let c: Cursor;
/// {
///     let doc = Document::new("a")?;
///     c = Cursor::new(doc.root());
/// }
/// println!("{:?}", c);
/// # Ok(())
/// # }
/// ```
///
/// Nodes returned by the cursor cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::Cursor;
/// use ikswalk::Document;
/// use ikswalk::NodeRef;
/// let n: Option<NodeRef>;
/// {
///     let doc = Document::new("a")?;
///     doc.insert_element("b")?;
///     n = Cursor::new(doc.root()).next();
/// }
/// println!("{:?}", n);
/// # Ok(())
/// # }
/// ```
///
/// Watchers cannot borrow state which dies before the cursor:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::Cursor;
/// use ikswalk::Document;
/// use ikswalk::Expr;
/// let doc = Document::new("a")?;
/// let mut cursor = Cursor::new(doc.root());
/// {
///     let mut seen = Vec::new();
///     cursor.watch(Expr::Any, |node| seen.push(node));
/// }
/// cursor.next();
/// # Ok(())
/// # }
/// ```
///
#[cfg(doctest)]
struct MustNotCompileTests;
