//! Submitted form fields.

/// Submitted input fields, in the order they were received.
///
/// Lookups return the first field with a matching name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    fields: Vec<(String, String)>,
}

impl FormInput {
    /// Input with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Input built from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Parse an `application/x-www-form-urlencoded` body.
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        let fields = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)?;
        Ok(Self { fields })
    }

    /// Parse a JSON body.
    ///
    /// Only string members of a top-level object become fields; other
    /// members and non-object bodies are ignored.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let json = serde_json::from_slice::<serde_json::Value>(body)?;

        let fields = match json {
            serde_json::Value::Object(map) => map
                .into_iter()
                .filter_map(|(name, value)| match value {
                    serde_json::Value::String(value) => Some((name, value)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self { fields })
    }

    /// Parse a request body of unknown type: JSON first, then form data.
    ///
    /// A body that is neither yields no fields.
    pub fn from_body(body: &[u8]) -> Self {
        if let Ok(input) = Self::from_json(body) {
            return input;
        }
        Self::from_urlencoded(body).unwrap_or_default()
    }

    /// Add a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Value of the first field named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
