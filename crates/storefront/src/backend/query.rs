//! Query-string builder for store API requests.

use url::Url;

/// Ordered query parameters for a backend request.
///
/// Blank values are dropped on insertion so degenerate filters such as
/// `collection_id[]=` never reach the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar parameter. Blank values are skipped.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    /// Add a parameter only when present.
    #[must_use]
    pub fn opt_param(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Add an array parameter as repeated `key[]=value` pairs.
    ///
    /// Blank entries are stripped; an array with no remaining entries adds nothing.
    #[must_use]
    pub fn array<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let array_key = format!("{key}[]");
        for value in values {
            let value = value.as_ref().trim();
            if !value.is_empty() {
                self.pairs.push((array_key.clone(), value.to_string()));
            }
        }
        self
    }

    /// Append every pair to `url`'s query string.
    pub fn apply(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
    }

    /// The collected key/value pairs, in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Value of the first pair with this key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
