//! Ordered, name-indexed collection of color tokens.
//!
//! Tokens live in a `Vec` in insertion order with a name→position index on
//! the side. Links between tokens are plain names, never references, so a
//! set may hold cycles without any ownership trouble. The set only keeps
//! the link metadata of both ends in agreement; it never copies colors along
//! a link.

use crate::error::ThemeError;
use crate::token::ColorToken;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Insertion-ordered map from token name to [`ColorToken`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSet {
    tokens: Vec<ColorToken>,
    index: HashMap<String, usize>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token, or replaces the token of the same name in place.
    ///
    /// Returns the replaced token, if any. Position is kept on replacement.
    /// The set owns every `linked_from`: the incoming token's own back-links
    /// are discarded and recomputed, and a changed `linked_to` moves the
    /// back-reference from the old target to the new one.
    pub fn insert(&mut self, mut token: ColorToken) -> Option<ColorToken> {
        let name = token.name().to_string();
        let previous = match self.index.get(&name) {
            Some(&i) => {
                token.linked_from_mut().clone_from(self.tokens[i].linked_from());
                Some(std::mem::replace(&mut self.tokens[i], token))
            }
            None => {
                *token.linked_from_mut() = self
                    .tokens
                    .iter()
                    .filter(|t| t.linked_to() == Some(name.as_str()))
                    .map(|t| t.name().to_string())
                    .collect();
                self.index.insert(name.clone(), self.tokens.len());
                self.tokens.push(token);
                None
            }
        };
        let old_target = previous
            .as_ref()
            .and_then(ColorToken::linked_to)
            .map(String::from);
        self.retarget(&name, old_target.as_deref());
        previous
    }

    pub fn get(&self, name: &str) -> Option<&ColorToken> {
        self.index.get(name).map(|&i| &self.tokens[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColorToken> {
        self.tokens.iter()
    }

    /// Token names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(ColorToken::name)
    }

    /// Replaces the named token with the result of `update`.
    ///
    /// The replacement always keeps the original name and position, and goes
    /// through [`TokenSet::insert`], so a replacement that drops or changes
    /// its `linked_to` updates the other end as well. Returns `Ok(false)` if
    /// no token has that name; an error from `update` leaves the set
    /// unchanged.
    pub fn replace_with<F>(&mut self, name: &str, update: F) -> Result<bool, ThemeError>
    where
        F: FnOnce(&ColorToken) -> Result<ColorToken, ThemeError>,
    {
        let Some(current) = self.get(name) else {
            return Ok(false);
        };
        let mut next = update(current)?;
        next.set_name(name);
        self.insert(next);
        Ok(true)
    }

    /// Makes `from` follow `to`, dropping any earlier link of `from`.
    ///
    /// Refuses (returns `false`) when either name is missing or both are the same.
    pub fn link(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let (Some(&src), Some(&dst)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        self.unlink(from);
        self.tokens[src].set_linked_to(Some(to.to_string()));
        self.tokens[dst].linked_from_mut().insert(from.to_string());
        true
    }

    /// Removes the outgoing link of `from`. Returns `false` if there was none.
    pub fn unlink(&mut self, from: &str) -> bool {
        let Some(&src) = self.index.get(from) else {
            return false;
        };
        let Some(target) = self.tokens[src].linked_to().map(String::from) else {
            return false;
        };
        self.tokens[src].set_linked_to(None);
        if let Some(&dst) = self.index.get(&target) {
            self.tokens[dst].linked_from_mut().remove(from);
        }
        true
    }

    /// Names of the tokens that follow `name`.
    pub fn dependents(&self, name: &str) -> impl Iterator<Item = &str> {
        self.get(name)
            .into_iter()
            .flat_map(|token| token.linked_from().iter().map(String::as_str))
    }

    /// Moves the back-reference of `from` off `old_target` and onto its
    /// current `linked_to`.
    ///
    /// Links to names outside the set stay on the source without a
    /// counterpart; they resolve once a token of that name is inserted.
    fn retarget(&mut self, from: &str, old_target: Option<&str>) {
        let new_target = self
            .get(from)
            .and_then(ColorToken::linked_to)
            .map(String::from);
        if new_target.as_deref() == old_target {
            return;
        }
        if let Some(&dst) = old_target.and_then(|t| self.index.get(t)) {
            self.tokens[dst].linked_from_mut().remove(from);
        }
        let Some(target) = new_target.filter(|t| t != from) else {
            return;
        };
        if let Some(&dst) = self.index.get(&target) {
            self.tokens[dst].linked_from_mut().insert(from.to_string());
        }
    }
}

impl FromIterator<ColorToken> for TokenSet {
    fn from_iter<I: IntoIterator<Item = ColorToken>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'a ColorToken;
    type IntoIter = std::slice::Iter<'a, ColorToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl Serialize for TokenSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tokens.len()))?;
        for token in &self.tokens {
            map.serialize_entry(token.name(), token)?;
        }
        map.end()
    }
}

/// A token document entry: either a bare color string or a full token record.
#[derive(Deserialize)]
#[serde(untagged)]
enum TokenEntry {
    Text(String),
    Token(ColorToken),
}

struct TokenSetVisitor;

impl<'de> Visitor<'de> for TokenSetVisitor {
    type Value = TokenSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from token name to a color string or token record")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TokenSet, A::Error> {
        let mut set = TokenSet::new();
        while let Some((name, entry)) = access.next_entry::<String, TokenEntry>()? {
            let token = match entry {
                TokenEntry::Text(text) => {
                    ColorToken::parse(&name, &text, None).map_err(de::Error::custom)?
                }
                TokenEntry::Token(mut token) => {
                    token.set_name(&name);
                    token
                }
            };
            set.insert(token);
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for TokenSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TokenSetVisitor)
    }
}
