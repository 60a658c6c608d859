//! Dream symbol dictionary: built-in meanings plus a `symbol|meaning` store

use std::path::PathBuf;

use super::clean_field;
use super::errors::ToolResult;
use crate::store::{Record, RecordLayout, RecordStore};

pub const SYMBOL_FIELDS: usize = 2;

/// Built-in symbols, sorted by name
pub const BUILTIN_SYMBOLS: [(&str, &str); 14] = [
    ("animal", "Instincts, natural desires, untamed aspects"),
    ("baby", "New beginnings, innocence, vulnerability"),
    ("car", "Direction in life, control, progress"),
    ("chase", "Avoidance, running from problems"),
    ("death", "Change, ending, new beginnings"),
    ("falling", "Loss of control, insecurity, fear"),
    ("family", "Relationships, support, roots"),
    ("fire", "Passion, destruction, transformation"),
    ("flying", "Freedom, ambition, escape from limitations"),
    ("house", "The self, different aspects of personality"),
    ("money", "Self-worth, power, opportunities"),
    ("snake", "Transformation, fear, hidden threats"),
    ("teeth", "Anxiety, loss, appearance concerns"),
    ("water", "Emotions, unconscious mind, purification"),
];

/// Lower-case, then capitalize the first letter: `"sNAKE"` becomes `"Snake"`.
pub fn normalize_symbol(symbol: &str) -> String {
    let lower = symbol.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct SymbolBook {
    store: RecordStore,
}

impl SymbolBook {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            store: RecordStore::new(path, RecordLayout::new(SYMBOL_FIELDS).with_delimiter(delimiter)),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Store a custom symbol; returns the normalized `(symbol, meaning)`.
    pub fn add(&self, symbol: &str, meaning: &str) -> ToolResult<(String, String)> {
        let delimiter = self.store.layout().delimiter();
        let symbol = normalize_symbol(&clean_field(symbol, "Symbol", delimiter)?);
        let meaning = clean_field(meaning, "Meaning", delimiter)?;

        self.store
            .append(&Record::from([symbol.as_str(), meaning.as_str()]))?;
        Ok((symbol, meaning))
    }

    /// Custom symbols in insertion order
    pub fn custom(&self) -> ToolResult<Vec<(String, String)>> {
        Ok(self
            .store
            .records()?
            .into_iter()
            .filter_map(|r| {
                let mut fields = r.into_fields().into_iter();
                Some((fields.next()?, fields.next()?))
            })
            .collect())
    }
}
