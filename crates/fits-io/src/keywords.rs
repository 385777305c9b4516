//! Keyword table carried with an observation map.

/// A keyword value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Logical(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            // Some pipelines quote numeric values
            Value::Text(s) => s.trim().parse().ok(),
            Value::Logical(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

/// Keywords in insertion order. Names are stored upper-case and looked up
/// case-insensitively.
///
/// Processing stages edit this table in place, so it doubles as the
/// mutable metadata of a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    entries: Vec<(String, Value)>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword))
            .map(|(_, v)| v)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn get_f64(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(Value::as_f64)
    }

    pub fn get_i64(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(Value::as_i64)
    }

    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(Value::as_str)
    }

    pub fn get_bool(&self, keyword: &str) -> Option<bool> {
        self.get(keyword).and_then(Value::as_bool)
    }

    /// Replace the value of a keyword or append it.
    pub fn set(&mut self, keyword: &str, value: Value) {
        let keyword = keyword.to_ascii_uppercase();
        match self.entries.iter_mut().find(|(k, _)| *k == keyword) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((keyword, value)),
        }
    }

    pub fn remove(&mut self, keyword: &str) -> Option<Value> {
        let index = self
            .entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(keyword))?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut header = Header::new();
        header.set("instrume", Value::Text("AIA_3".into()));
        assert_eq!(header.get_str("INSTRUME"), Some("AIA_3"));
        assert_eq!(header.iter().next().map(|(k, _)| k), Some("INSTRUME"));
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(Value::Integer(171).as_f64(), Some(171.0));
        assert_eq!(Value::Float(-32768.0).as_i64(), Some(-32768));
        assert_eq!(Value::Float(0.5).as_i64(), None);
        assert_eq!(Value::Text(" 961.07 ".into()).as_f64(), Some(961.07));
        assert_eq!(Value::Logical(true).as_f64(), None);
    }

    #[test]
    fn test_set_and_remove() {
        let mut header = Header::new();
        header.set("dispmin", Value::Float(0.0));
        header.set("DISPMIN", Value::Float(1.5));
        assert_eq!(header.len(), 1);
        assert_eq!(header.get_f64("DISPMIN"), Some(1.5));
        assert_eq!(header.remove("DispMin"), Some(Value::Float(1.5)));
        assert!(header.is_empty());
        assert_eq!(header.remove("DISPMIN"), None);
    }
}
