//! Type identities
//!
//! Provides [`TypeIdentity`], the structural, hashable token that names a
//! logical type (optionally parameterised) inside the conversion graph.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Structural identity of a logical type
///
/// Two identities are equal iff their names and ordered parameter lists are
/// structurally equal. The descriptor is shared behind an [`Arc`], so cloning an
/// identity never copies the descriptor.
///
/// # Examples
/// - `i64` → name `i64`, no parameters
/// - `Map<String, i64>` → name `Map`, parameters `[String, i64]`
/// - `std::collections::BTreeSet<u8>` → path-qualified name
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeIdentity(Arc<Descriptor>);

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Descriptor {
    name: String,
    params: Vec<TypeIdentity>,
}

impl TypeIdentity {
    /// Create identity from a name and ordered type parameters
    ///
    /// # Errors
    /// Returns [`TypeError::Malformed`] if `name` is empty or contains
    /// characters outside `[A-Za-z0-9_]` and the `::`/`.` separators.
    pub fn new(name: impl Into<String>, params: Vec<TypeIdentity>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self::from_parts(name, params))
    }

    /// Create a non-parametric identity
    ///
    /// # Errors
    /// Same as [`TypeIdentity::new`].
    #[inline]
    pub fn named(name: impl Into<String>) -> Result<Self, TypeError> {
        Self::new(name, Vec::new())
    }

    /// Parse a canonical descriptor such as `Map<String, i64>`
    ///
    /// # Errors
    /// Returns [`TypeError::Malformed`] for incomplete or ambiguous input.
    #[inline]
    pub fn parse(descriptor: &str) -> Result<Self, TypeError> {
        Parser::parse(descriptor)
    }

    pub(crate) fn from_parts(name: String, params: Vec<TypeIdentity>) -> Self {
        Self(Arc::new(Descriptor { name, params }))
    }

    /// Type name without parameters
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Ordered type parameters
    #[inline]
    #[must_use]
    pub fn params(&self) -> &[TypeIdentity] {
        &self.0.params
    }

    /// Number of type parameters
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.params.len()
    }

    /// Whether this identity carries type parameters
    #[inline]
    #[must_use]
    pub fn is_parametric(&self) -> bool {
        !self.0.params.is_empty()
    }

    /// Same name with parameters stripped
    #[must_use]
    pub fn base(&self) -> Self {
        if self.is_parametric() {
            Self::from_parts(self.0.name.clone(), Vec::new())
        } else {
            self.clone()
        }
    }

    /// Same name with a different parameter list
    #[must_use]
    pub fn with_params(&self, params: Vec<TypeIdentity>) -> Self {
        Self::from_parts(self.0.name.clone(), params)
    }
}

impl Display for TypeIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)?;
        if let Some((first, rest)) = self.0.params.split_first() {
            write!(f, "<{first}")?;
            for param in rest {
                write!(f, ", {param}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl Debug for TypeIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({self})")
    }
}

impl FromStr for TypeIdentity {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for TypeIdentity {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for TypeIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Errors related to type identities
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// Descriptor could not be turned into an identity
    #[error("malformed type '{descriptor}': {reason}")]
    Malformed {
        /// Offending descriptor text
        descriptor: String,
        /// What was wrong with it
        reason: String,
    },
}

impl TypeError {
    /// Create malformed-type error
    #[inline]
    pub fn malformed(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }
}

fn validate_name(name: &str) -> Result<(), TypeError> {
    let mut parser = Parser::new(name);
    parser.name()?;
    if parser.pos != parser.bytes.len() {
        return Err(parser.error(format!(
            "illegal character '{}' at offset {}",
            name[parser.pos..].chars().next().unwrap_or(' '),
            parser.pos
        )));
    }
    Ok(())
}

/// Deepest parameter nesting accepted by the parser
pub const MAX_DEPTH: usize = 128;

#[inline]
fn is_ident(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Recursive-descent parser for `name ('<' descriptor (',' descriptor)* '>')?`
struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn parse(input: &'a str) -> Result<TypeIdentity, TypeError> {
        let mut parser = Self::new(input);
        let identity = parser.descriptor()?;
        parser.skip_ws();
        if parser.pos != parser.bytes.len() {
            return Err(parser.error(format!("unexpected trailing input at offset {}", parser.pos)));
        }
        Ok(identity)
    }

    fn descriptor(&mut self) -> Result<TypeIdentity, TypeError> {
        self.skip_ws();
        let name = self.name()?;
        self.skip_ws();

        let mut params = Vec::new();
        if self.eat(b'<') {
            if self.depth == MAX_DEPTH {
                return Err(self.error(format!(
                    "type nesting deeper than {MAX_DEPTH} at offset {}",
                    self.pos
                )));
            }
            self.depth += 1;
            loop {
                params.push(self.descriptor()?);
                self.skip_ws();
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    self.depth -= 1;
                    break;
                }
                return Err(self.error(format!("expected ',' or '>' at offset {}", self.pos)));
            }
        }

        Ok(TypeIdentity::from_parts(name, params))
    }

    fn name(&mut self) -> Result<String, TypeError> {
        let start = self.pos;
        loop {
            let segment_start = self.pos;
            while self.pos < self.bytes.len() && is_ident(self.bytes[self.pos]) {
                self.pos += 1;
            }
            if self.pos == segment_start {
                let reason = if segment_start == start {
                    format!("expected type name at offset {segment_start}")
                } else {
                    format!("empty name segment at offset {segment_start}")
                };
                return Err(self.error(reason));
            }

            if self.bytes[self.pos..].starts_with(b"::") {
                self.pos += 2;
            } else if self.bytes.get(self.pos) == Some(&b'.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, reason: String) -> TypeError {
        TypeError::malformed(self.input, reason)
    }
}
