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
/// Returned NodeRef cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::Document;
/// use ikswalk::NodeRef;
/// let n: NodeRef;
/// {
///     let doc = Document::new("a")?;
///     n = doc.root();
/// }
/// println!("{}", n);
/// # Ok(())
/// # }
/// ```
///
/// Inserted nodes cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::Document;
/// use ikswalk::NodeRef;
/// let n: NodeRef;
/// {
///     let doc = Document::new("a")?;
///     n = doc.insert_element("b")?;
/// }
/// println!("{}", n);
/// # Ok(())
/// # }
/// ```
///
/// Documents cannot be shared between threads:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ikswalk::Document;
/// let doc = Document::new("a")?;
/// std::thread::spawn(move || {
///     println!("{}", doc);
/// });
/// # Ok(())
/// # }
/// ```
///
#[cfg(doctest)]
struct MustNotCompileTests;
