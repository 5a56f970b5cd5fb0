//! In-memory document store.
//!
//! A [`Wiki`] maps titles to [`Tiddler`]s and records every mutation into a pending
//! [`ChangeSet`]. The pending set is the unit of change notification: whoever drives the
//! store (usually [`crate::caretaker::Caretaker::dispatch`]) calls [`Wiki::take_changes`] to
//! close the transaction and broadcast it.

use serde::{Deserialize, Serialize};
use std::{
    collections::{btree_map, BTreeMap},
    fmt::{Display, Formatter},
};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_TEXT: &str = "text";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_CAPTION: &str = "caption";

/// A named record with string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tiddler {
    pub title: String,
    pub fields: BTreeMap<String, String>,
}

impl Tiddler {
    pub fn new<T: Into<String>>(title: T) -> Tiddler {
        Tiddler {
            title: title.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Tiddler {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_text<V: Into<String>>(self, text: V) -> Tiddler {
        self.with_field(FIELD_TEXT, text)
    }

    pub fn with_tags<S: AsRef<str>>(self, tags: &[S]) -> Tiddler {
        let list = stringify_list(tags.iter().map(|t| t.as_ref()));
        self.with_field(FIELD_TAGS, list)
    }

    /// Field lookup. `title` is answered from the record key.
    pub fn field(&self, key: &str) -> Option<&str> {
        if key == FIELD_TITLE {
            return Some(self.title.as_str());
        }
        self.fields.get(key).map(|v| v.as_str())
    }

    pub fn has_field(&self, key: &str) -> bool {
        key == FIELD_TITLE || self.fields.contains_key(key)
    }

    pub fn text(&self) -> &str {
        self.field(FIELD_TEXT).unwrap_or_default()
    }

    pub fn tags(&self) -> Vec<String> {
        self.field(FIELD_TAGS)
            .map(parse_string_array)
            .unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }
}

pub fn is_system_title(title: &str) -> bool {
    title.starts_with("$:/")
}

/// Parse a title list such as `a [[b c]] d` into its items.
pub fn parse_string_array(list: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut rest = list.trim_start();
    while !rest.is_empty() {
        if let Some(bracketed) = rest.strip_prefix("[[") {
            match bracketed.find("]]") {
                Some(end) => {
                    items.push(bracketed[..end].to_string());
                    rest = &bracketed[end + 2..];
                }
                None => {
                    items.push(bracketed.to_string());
                    rest = "";
                }
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            items.push(rest[..end].to_string());
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }
    items
}

pub fn stringify_list<'a, I: IntoIterator<Item = &'a str>>(items: I) -> String {
    items
        .into_iter()
        .map(|item| {
            if item.contains(char::is_whitespace) {
                format!("[[{item}]]")
            } else {
                item.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeInfo {
    Modified,
    Deleted,
}

/// Titles touched within one store transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet(BTreeMap<String, ChangeInfo>);

impl ChangeSet {
    pub fn new() -> ChangeSet {
        ChangeSet::default()
    }

    pub fn insert<T: Into<String>>(&mut self, title: T, info: ChangeInfo) {
        self.0.insert(title.into(), info);
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.contains_key(title)
    }

    pub fn get(&self, title: &str) -> Option<ChangeInfo> {
        self.0.get(title).copied()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ChangeInfo> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn extend(&mut self, other: ChangeSet) {
        self.0.extend(other.0);
    }
}

impl<T: Into<String>> FromIterator<(T, ChangeInfo)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (T, ChangeInfo)>>(iter: I) -> Self {
        ChangeSet(iter.into_iter().map(|(t, i)| (t.into(), i)).collect())
    }
}

impl Display for ChangeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let titles = self.titles().collect::<Vec<_>>();
        write!(f, "[{}]", titles.join(", "))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Wiki {
    tiddlers: BTreeMap<String, Tiddler>,
    pending: ChangeSet,
}

impl Wiki {
    pub fn new() -> Wiki {
        Wiki::default()
    }

    pub fn get(&self, title: &str) -> Option<&Tiddler> {
        self.tiddlers.get(title)
    }

    pub fn exists(&self, title: &str) -> bool {
        self.tiddlers.contains_key(title)
    }

    pub fn text(&self, title: &str) -> Option<&str> {
        self.get(title).map(|t| t.text())
    }

    pub fn put(&mut self, tiddler: Tiddler) {
        self.pending
            .insert(tiddler.title.clone(), ChangeInfo::Modified);
        self.tiddlers.insert(tiddler.title.clone(), tiddler);
    }

    pub fn put_text<T: Into<String>, V: Into<String>>(&mut self, title: T, text: V) {
        self.put(Tiddler::new(title).with_text(text));
    }

    pub fn delete(&mut self, title: &str) -> Option<Tiddler> {
        let removed = self.tiddlers.remove(title);
        if removed.is_some() {
            self.pending.insert(title, ChangeInfo::Deleted);
        }
        removed
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.tiddlers.keys().map(|k| k.as_str())
    }

    pub fn tiddlers(&self) -> impl Iterator<Item = &Tiddler> {
        self.tiddlers.values()
    }

    /// Titles starting with `prefix`, in title order.
    pub fn titles_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.tiddlers
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .map(|(k, _)| k.as_str())
            .take_while(move |k| k.starts_with(prefix))
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Close the current transaction and return the titles it touched.
    pub fn take_changes(&mut self) -> ChangeSet {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.tiddlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiddlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_parse_string_array() {
        assert_eq!(
            parse_string_array("a [[b c]]  d"),
            vec!["a".to_string(), "b c".to_string(), "d".to_string()]
        );
        assert!(parse_string_array("   ").is_empty());
        assert_eq!(stringify_list(["x", "y z"]), "x [[y z]]");
    }

    #[test]
    fn test_changes_are_recorded_per_transaction() {
        let mut wiki = Wiki::new();
        wiki.put(Tiddler::new("A").with_tags(&["project", "big deal"]));
        wiki.put_text("B", "hello");
        let changes = wiki.take_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes.get("A"), Some(ChangeInfo::Modified));
        assert!(wiki.get("A").unwrap().has_tag("big deal"));

        assert!(wiki.delete("B").is_some());
        assert!(wiki.delete("missing").is_none());
        let changes = wiki.take_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get("B"), Some(ChangeInfo::Deleted));
        assert!(!wiki.has_pending_changes());
    }

    #[test]
    fn test_titles_with_prefix() {
        let mut wiki = Wiki::new();
        for title in ["$:/a/1", "$:/a/2", "$:/ab", "$:/b"] {
            wiki.put_text(title, "");
        }
        let titles = wiki.titles_with_prefix("$:/a/").collect::<Vec<_>>();
        assert_eq!(titles, vec!["$:/a/1", "$:/a/2"]);
    }
}
