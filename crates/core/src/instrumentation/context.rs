//! Extra key/value context attached to an event

use std::fmt;

/// Ordered key/value pairs rendered into the log line of an event.
///
/// Renders as `{}` when empty and `{key=value, other=value}` otherwise.
/// Insertion order is kept; inserting an existing key replaces its value in
/// place.
///
/// ```
/// use opscope_core::EventContext;
///
/// let context = EventContext::new().with("order_id", 42).with("retry", false);
/// assert_eq!(context.to_string(), "{order_id=42, retry=false}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    fields: Vec<(String, String)>,
}

impl EventContext {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`EventContext::insert`]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` to the rendered `value`
    pub fn insert(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        let key = key.into();
        let value = value.to_string();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Rendered value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(existing, _)| existing == key).map(|(_, value)| value.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl fmt::Display for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

impl<K, V> FromIterator<(K, V)> for EventContext
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}
