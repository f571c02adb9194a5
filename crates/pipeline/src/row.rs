use std::collections::HashMap;

/// One output record keyed by column header.
///
/// Column order is decided by the header list at write time, never by the
/// order cells were set in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(header.into(), value.into());
    }

    /// Cell value, empty for unknown headers.
    pub fn get(&self, header: &str) -> &str {
        self.cells.get(header).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, header: &str) -> bool {
        self.cells.contains_key(header)
    }

    /// Values in `headers` order.
    pub fn values_for<'a>(&'a self, headers: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        headers.iter().map(|header| self.get(header))
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
