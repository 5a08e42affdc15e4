//! JSON Pointer paths (RFC 6901).
//!
//! A path is a list of unescaped reference tokens. Whether a token names an
//! object key or an array index is decided by the container it is resolved
//! against, so `"/0"` addresses index 0 of an array and key `"0"` of an
//! object.

use crate::errors::DeltaViewError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPath {
    tokens: Vec<String>,
}

impl JsonPath {
    /// The document root (`""`)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn child_key(&self, key: &str) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(key.to_string());
        Self { tokens }
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(index.to_string());
        Self { tokens }
    }

    /// Split into the parent's tokens and the last token; `None` at the root.
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.tokens
            .split_last()
            .map(|(last, parent)| (parent, last.as_str()))
    }

    /// The containing path; the root is its own parent.
    pub fn parent(&self) -> Self {
        match self.tokens.split_last() {
            Some((_, parent)) => Self {
                tokens: parent.to_vec(),
            },
            None => Self::root(),
        }
    }

    /// Parse an RFC 6901 pointer.
    ///
    /// # Errors
    ///
    /// `InvalidPointer` if a non-empty pointer does not start with `/` or
    /// contains a `~` not followed by `0` or `1`.
    pub fn parse(pointer: &str) -> Result<Self, DeltaViewError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let rest = pointer
            .strip_prefix('/')
            .ok_or_else(|| DeltaViewError::InvalidPointer {
                pointer: pointer.to_string(),
                reason: "must be empty or start with '/'".to_string(),
            })?;
        let tokens = rest
            .split('/')
            .map(|raw| unescape_token(raw, pointer))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }

    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            out.push('/');
            out.push_str(&token.replace('~', "~0").replace('/', "~1"));
        }
        out
    }
}

fn unescape_token(raw: &str, pointer: &str) -> Result<String, DeltaViewError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(DeltaViewError::InvalidPointer {
                    pointer: pointer.to_string(),
                    reason: "'~' must be followed by '0' or '1'".to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Parse an array index token: decimal digits, no leading zeros.
pub fn parse_index(token: &str) -> Option<usize> {
    let well_formed = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if well_formed {
        token.parse().ok()
    } else {
        None
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl FromStr for JsonPath {
    type Err = DeltaViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for JsonPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_pointer())
    }
}

impl<'de> Deserialize<'de> for JsonPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pointer = String::deserialize(deserializer)?;
        Self::parse(&pointer).map_err(serde::de::Error::custom)
    }
}
