use alloc::vec::Vec;
use core::fmt;

use crate::error::{MapError, MapResult};
use crate::info::MAX_TYPE_ARGS;

/// A type name as written in encoded data, e.g. `Map<String, List<Person>>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName<'a> {
    pub ident: &'a str,
    pub args: Vec<TypeName<'a>>,
}

impl<'a> TypeName<'a> {
    /// Parses a type name.
    ///
    /// Fails with [`MapError::UnknownType`] on malformed input or when a type
    /// has more than [`MAX_TYPE_ARGS`] arguments.
    pub fn parse(text: &'a str) -> MapResult<Self> {
        let mut parser = Parser { text, pos: 0 };
        let name = parser.name();
        parser.skip_ws();
        match name {
            Some(name) if parser.pos == text.len() => Ok(name),
            _ => Err(MapError::unknown_type(text)),
        }
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }
}

impl fmt::Display for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ident)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn skip_ws(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.text[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn name(&mut self) -> Option<TypeName<'a>> {
        self.skip_ws();
        let rest = &self.text[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        let ident = &rest[..len];
        self.pos += len;

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.name()?);
                if args.len() > MAX_TYPE_ARGS {
                    return None;
                }
                if self.eat('>') {
                    break;
                }
                if !self.eat(',') {
                    return None;
                }
            }
        }
        Some(TypeName { ident, args })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::TypeName;

    #[test]
    fn nested_arguments() {
        let name = TypeName::parse("Map<String, List<Person>>").unwrap();
        assert_eq!(name.ident, "Map");
        assert_eq!(name.args.len(), 2);
        assert_eq!(name.args[1].ident, "List");
        assert_eq!(name.args[1].args[0].ident, "Person");
        assert_eq!(name.to_string(), "Map<String, List<Person>>");
    }

    #[test]
    fn malformed_names() {
        assert!(TypeName::parse("").is_err());
        assert!(TypeName::parse("List<").is_err());
        assert!(TypeName::parse("List<Person").is_err());
        assert!(TypeName::parse("List<Person>>").is_err());
        assert!(TypeName::parse("A<B,C,D,E,F,G>").is_err());
        assert!(!TypeName::parse(" Person ").unwrap().is_generic());
    }
}
