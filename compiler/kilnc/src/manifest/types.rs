//! Type expressions in manifests.
//!
//! ```text
//! type := "indirect" type | path ("<" type ("," type)* ">")?
//! path := ident ("." ident)*
//! ```

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    Path { path: Vec<String>, args: Vec<TypeExpr> },
    Indirect(Box<TypeExpr>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Path { path, args } => {
                write!(f, "{}", path.join("."))?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeExpr::Indirect(inner) => write!(f, "indirect {inner}"),
        }
    }
}

/// Parse a complete type expression.
pub fn parse_type(text: &str) -> Result<TypeExpr, String> {
    let mut parser = Parser { text, pos: 0 };
    let ty = parser.parse()?;
    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(format!(
            "unexpected `{}` in type `{text}`",
            &text[parser.pos..]
        ));
    }
    Ok(ty)
}

struct Parser<'t> {
    text: &'t str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<String, String> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            self.pos += c.len_utf8();
        }
        if start == self.pos {
            return Err(format!(
                "expected a type name at offset {start} in `{}`",
                self.text
            ));
        }
        Ok(self.text[start..self.pos].to_owned())
    }

    fn parse(&mut self) -> Result<TypeExpr, String> {
        let first = self.ident()?;
        if first == "indirect" {
            return Ok(TypeExpr::Indirect(Box::new(self.parse()?)));
        }

        let mut path = vec![first];
        while self.eat('.') {
            path.push(self.ident()?);
        }

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse()?);
                if self.eat('>') {
                    break;
                }
                if !self.eat(',') {
                    return Err(format!("expected `,` or `>` in `{}`", self.text));
                }
            }
        }
        Ok(TypeExpr::Path { path, args })
    }
}
