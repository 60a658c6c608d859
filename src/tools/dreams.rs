//! Dream journal: `owner|date|title|description|mood|type|intensity|symbols`
//!
//! Every operation is scoped to the operator logged into the [`Session`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use super::errors::{ToolError, ToolResult};
use super::symbols::normalize_symbol;
use super::Deletion;
use crate::session::Session;
use crate::store::{Record, RecordLayout, RecordStore};
use crate::validation::{
    parse_int_in_range, reject_char, validate_letters_only, validate_text, ValidationError,
};

pub const DREAM_FIELDS: usize = 8;

const OWNER: usize = 0;
const DATE: usize = 1;
const TITLE: usize = 2;
const DESCRIPTION: usize = 3;
const MOOD: usize = 4;
const KIND: usize = 5;
const INTENSITY: usize = 6;
const SYMBOLS: usize = 7;

const MIN_INTENSITY: i64 = 1;
const MAX_INTENSITY: i64 = 10;
const TOP_SYMBOLS: usize = 10;

pub const RECALL_PROMPTS: [&str; 10] = [
    "Were there any people in your dream?",
    "What colors do you remember seeing?",
    "How did you feel when you woke up?",
    "Were you indoors or outdoors?",
    "Did you recognize the location?",
    "What sounds or music did you hear?",
    "Were there any animals present?",
    "What was the weather like?",
    "Did you feel any strong emotions?",
    "What time of day was it in the dream?",
];

/// `count` distinct recall prompts in random order
pub fn recall_prompts<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<&'static str> {
    RECALL_PROMPTS.choose_multiple(rng, count).copied().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dream {
    pub owner: String,
    pub date: String,
    pub title: String,
    pub description: String,
    pub mood: String,
    pub kind: String,
    pub intensity: String,
    pub symbols: String,
}

impl Dream {
    pub fn to_record(&self) -> Record {
        Record::from([
            self.owner.as_str(),
            self.date.as_str(),
            self.title.as_str(),
            self.description.as_str(),
            self.mood.as_str(),
            self.kind.as_str(),
            self.intensity.as_str(),
            self.symbols.as_str(),
        ])
    }

    pub fn from_record(record: &Record) -> Option<Self> {
        if record.arity() != DREAM_FIELDS {
            return None;
        }
        Some(Self {
            owner: record.field(OWNER)?.to_string(),
            date: record.field(DATE)?.to_string(),
            title: record.field(TITLE)?.to_string(),
            description: record.field(DESCRIPTION)?.to_string(),
            mood: record.field(MOOD)?.to_string(),
            kind: record.field(KIND)?.to_string(),
            intensity: record.field(INTENSITY)?.to_string(),
            symbols: record.field(SYMBOLS)?.to_string(),
        })
    }

    /// `None` for a hand-edited, non-numeric intensity
    pub fn intensity_value(&self) -> Option<u8> {
        self.intensity.trim().parse().ok()
    }

    pub fn symbol_list(&self) -> Vec<&str> {
        self.symbols
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Case-insensitive match over everything but the owner
    pub fn mentions(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        [
            &self.date,
            &self.title,
            &self.description,
            &self.mood,
            &self.kind,
            &self.intensity,
            &self.symbols,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&keyword))
    }
}

/// A new entry as typed by the operator
#[derive(Debug, Clone)]
pub struct DreamEntry {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub mood: String,
    pub kind: String,
    pub intensity: u8,
    pub symbols: String,
}

impl DreamEntry {
    fn into_dream(self, owner: &str, delimiter: char) -> ToolResult<Dream> {
        let title = validate_text(&self.title, "Title")?.to_string();
        let description = validate_text(&self.description, "Description")?.to_string();
        let mood = validate_letters_only(&self.mood, "Mood")?.to_string();
        let kind = validate_letters_only(&self.kind, "Dream type")?.to_string();
        let intensity =
            parse_int_in_range(&self.intensity.to_string(), MIN_INTENSITY, MAX_INTENSITY, "Intensity")?;
        let symbols = self.symbols.trim().to_string();

        for (value, field) in [
            (&title, "Title"),
            (&description, "Description"),
            (&mood, "Mood"),
            (&kind, "Dream type"),
            (&symbols, "Symbols"),
        ] {
            reject_char(value, delimiter, field)?;
        }

        Ok(Dream {
            owner: owner.to_string(),
            date: self.date.format("%Y-%m-%d").to_string(),
            title,
            description,
            mood,
            kind,
            intensity: intensity.to_string(),
            symbols,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityStats {
    pub average: f64,
    pub highest: u8,
    pub lowest: u8,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternReport {
    pub total: usize,
    pub moods: Vec<(String, usize)>,
    pub kinds: Vec<(String, usize)>,
    /// At most ten, most frequent first
    pub symbols: Vec<(String, usize)>,
    pub intensity: Option<IntensityStats>,
}

/// Count descending, then name ascending
fn ranked(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

pub fn analyze(dreams: &[Dream]) -> PatternReport {
    let mut moods = BTreeMap::new();
    let mut kinds = BTreeMap::new();
    let mut symbols = BTreeMap::new();
    let mut intensities = Vec::new();

    for dream in dreams {
        *moods.entry(dream.mood.trim().to_string()).or_insert(0) += 1;
        *kinds.entry(dream.kind.trim().to_string()).or_insert(0) += 1;
        for symbol in dream.symbol_list() {
            *symbols.entry(normalize_symbol(symbol)).or_insert(0) += 1;
        }
        if let Some(value) = dream.intensity_value() {
            intensities.push(value);
        }
    }

    let intensity = match (intensities.iter().max(), intensities.iter().min()) {
        (Some(&highest), Some(&lowest)) => Some(IntensityStats {
            average: intensities.iter().map(|&v| f64::from(v)).sum::<f64>() / intensities.len() as f64,
            highest,
            lowest,
        }),
        _ => None,
    };

    let mut symbols = ranked(symbols);
    symbols.truncate(TOP_SYMBOLS);

    PatternReport {
        total: dreams.len(),
        moods: ranked(moods),
        kinds: ranked(kinds),
        symbols,
        intensity,
    }
}

pub struct DreamJournal {
    store: RecordStore,
}

impl DreamJournal {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            store: RecordStore::new(path, RecordLayout::new(DREAM_FIELDS).with_delimiter(delimiter)),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn add(&self, session: &Session, entry: DreamEntry) -> ToolResult<Dream> {
        let owner = session.require_operator()?;
        let dream = entry.into_dream(owner, self.store.layout().delimiter())?;
        self.store.append(&dream.to_record())?;
        Ok(dream)
    }

    /// The operator's dreams in file order
    pub fn dreams(&self, session: &Session) -> ToolResult<Vec<Dream>> {
        let owner = session.require_operator()?;
        Ok(self
            .store
            .find_all(|r| r.field(OWNER) == Some(owner))?
            .iter()
            .filter_map(Dream::from_record)
            .collect())
    }

    /// Matches paired with their 1-based number in [`DreamJournal::dreams`]
    pub fn search(&self, session: &Session, keyword: &str) -> ToolResult<Vec<(usize, Dream)>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ValidationError::Empty {
                field: "Search keyword".to_string(),
            }
            .into());
        }

        Ok(self
            .dreams(session)?
            .into_iter()
            .enumerate()
            .filter(|(_, dream)| dream.mentions(keyword))
            .map(|(index, dream)| (index + 1, dream))
            .collect())
    }

    pub fn analyze(&self, session: &Session) -> ToolResult<PatternReport> {
        Ok(analyze(&self.dreams(session)?))
    }

    /// Delete the operator's dream number `number` (1-based) if `confirm` approves.
    pub fn delete_nth<C, E>(&self, session: &Session, number: usize, mut confirm: C) -> Result<Deletion, E>
    where
        C: FnMut(&Dream) -> Result<bool, E>,
        E: From<ToolError>,
    {
        let owner = session.require_operator().map_err(ToolError::from)?;
        let mut txn = self.store.begin().map_err(ToolError::from)?;

        let target = number.checked_sub(1).and_then(|n| {
            txn.records()
                .enumerate()
                .filter(|(_, r)| r.field(OWNER) == Some(owner))
                .nth(n)
                .and_then(|(index, r)| Some((index, Dream::from_record(r)?)))
        });
        let Some((index, dream)) = target else {
            return Ok(Deletion::NotFound);
        };

        if !confirm(&dream)? {
            return Ok(Deletion::Declined);
        }

        txn.remove_at(index);
        txn.commit().map_err(ToolError::from)?;
        Ok(Deletion::Deleted)
    }
}
