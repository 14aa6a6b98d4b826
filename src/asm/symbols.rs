//! Label table built by the first assembler pass.

use std::collections::HashMap;

/// Mapping from label name to byte address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: HashMap<String, u64>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `label` to `address`, returning the previous binding if the
    /// label was already defined.
    pub fn define(&mut self, label: &str, address: u64) -> Option<u64> {
        self.entries.insert(label.to_string(), address)
    }

    /// Looks up a label.
    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries.get(label).copied()
    }

    /// Number of defined labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no labels are defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates labels in address order.
    pub fn iter_sorted(&self) -> Vec<(&str, u64)> {
        let mut all: Vec<_> = self.entries.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        all.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
        all
    }
}

/// Splits a leading `label:` (or `label :`) off a source line.
///
/// # Returns
///
/// The label, if any, and the remaining text.
pub(crate) fn split_label(line: &str) -> (Option<&str>, &str) {
    let line = line.trim();
    if let Some(colon) = line.find(':') {
        let label = line[..colon].trim();
        let valid = !label.is_empty()
            && !label.contains(char::is_whitespace)
            && !label.contains('"')
            && !label.starts_with('.');
        if valid {
            return (Some(label), line[colon + 1..].trim());
        }
    }
    (None, line)
}

/// Removes a trailing `#` comment outside of string literals.
pub(crate) fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}
