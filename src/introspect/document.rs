//! Response document model.
//!
//! A [`Document`] is the ordered key/value structure assembled per request
//! before it is serialized. It mirrors a JSON object whose key order is the
//! order entries were inserted in.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A facet value that may be either a single string or several.
///
/// Query parameters and headers collapse to a bare string when a name
/// appears once and become a list when it repeats. Consumers of the JSON
/// output have to accept both shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiValue {
    Scalar(String),
    Sequence(Vec<String>),
}

impl MultiValue {
    /// Append another value under the same name, promoting to a sequence.
    pub fn push(&mut self, value: String) {
        match self {
            MultiValue::Scalar(first) => {
                let first = std::mem::take(first);
                *self = MultiValue::Sequence(vec![first, value]);
            }
            MultiValue::Sequence(values) => values.push(value),
        }
    }
}

impl From<MultiValue> for Value {
    fn from(value: MultiValue) -> Self {
        match value {
            MultiValue::Scalar(s) => Value::Text(s),
            MultiValue::Sequence(list) => Value::List(list),
        }
    }
}

/// A single value stored in a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Text(String),
    List(Vec<String>),
    Map(Document),
    /// Parsed JSON request body, echoed verbatim.
    Json(serde_json::Value),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Map(doc)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(doc) => doc.serialize(serializer),
            Value::Json(json) => json.serialize(serializer),
        }
    }
}

/// Insertion-ordered mapping with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append a string under `key`, promoting repeated keys to a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                let mut multi = match std::mem::replace(existing, Value::Null) {
                    Value::Text(s) => MultiValue::Scalar(s),
                    Value::List(list) => MultiValue::Sequence(list),
                    other => {
                        *existing = other;
                        return;
                    }
                };
                multi.push(value);
                *existing = multi.into();
            }
            None => self.entries.push((key, Value::Text(value))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as pretty JSON followed by a newline.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = serde_json::to_vec_pretty(self)?;
        out.push(b'\n');
        Ok(out)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut doc = Document::new();
        doc.insert("b", "1");
        doc.insert("a", "2");
        doc.insert("b", "3");

        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(doc.get("b"), Some(&Value::Text("3".into())));
    }

    #[test]
    fn test_append_promotes_to_list() {
        let mut doc = Document::new();
        doc.append("tag", "x");
        assert_eq!(doc.get("tag"), Some(&Value::Text("x".into())));

        doc.append("tag", "y");
        doc.append("tag", "z");
        assert_eq!(
            doc.get("tag"),
            Some(&Value::List(vec!["x".into(), "y".into(), "z".into()]))
        );
    }

    #[test]
    fn test_serialization_preserves_order() {
        let mut inner = Document::new();
        inner.insert("z", "last");
        inner.insert("a", "first");

        let mut doc = Document::new();
        doc.insert("zeta", Value::Null);
        doc.insert("alpha", true);
        doc.insert("nested", inner);
        doc.insert("list", Value::List(vec!["1".into(), "2".into()]));

        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"{"zeta":null,"alpha":true,"nested":{"z":"last","a":"first"},"list":["1","2"]}"#
        );
    }

    #[test]
    fn test_to_json_is_deterministic() {
        let doc: Document = [("origin", "203.0.113.5")].into_iter().collect();
        let first = doc.to_json().unwrap();
        let second = doc.to_json().unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with(b"\n"));

        let parsed: serde_json::Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(parsed, serde_json::json!({"origin": "203.0.113.5"}));
    }
}
