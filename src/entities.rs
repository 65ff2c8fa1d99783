/*
** This file is a part of Ikswalk (document order cursor for Iksemel trees)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Ikswalk is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

pub mod predefined {
    pub const LT: &str = "&lt;";
    pub const GT: &str = "&gt;";
    pub const AMP: &str = "&amp;";
    pub const APOS: &str = "&apos;";
    pub const QUOT: &str = "&quot;";
}

fn entity(c: u8) -> Option<&'static str> {
    match c {
        b'<' => Some(predefined::LT),
        b'>' => Some(predefined::GT),
        b'&' => Some(predefined::AMP),
        b'\'' => Some(predefined::APOS),
        b'"' => Some(predefined::QUOT),
        _ => None,
    }
}

/// Writes the string with the XML special characters replaced.
pub fn escape_fmt(s: &str, f: &mut impl std::fmt::Write) -> std::fmt::Result {
    let mut back = 0;
    for (pos, c) in s.bytes().enumerate() {
        if let Some(replacement) = entity(c) {
            f.write_str(&s[back..pos])?;
            f.write_str(replacement)?;
            back = pos + 1;
        }
    }
    f.write_str(&s[back..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &str) -> String {
        let mut buf = String::new();
        escape_fmt(s, &mut buf).unwrap();
        buf
    }

    #[test]
    fn escapes() {
        const NOESCAPE: &str = "abc$#@!%^*(){}[]=-+/.,;:FDSF3443";
        assert_eq!(escaped(NOESCAPE), NOESCAPE);
        assert_eq!(escaped("abc&def"), "abc&amp;def");
        assert_eq!(escaped("<>&'\""), "&lt;&gt;&amp;&apos;&quot;");
        assert_eq!(escaped("ğüş<ı>"), "ğüş&lt;ı&gt;");
        assert_eq!(escaped(""), "");
    }
}
