//! In-memory verse table loaded from the Quran CSV at startup.
//!
//! The table is built once and never mutated, so it is shared behind an
//! `Arc` without locking.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerseStoreError {
    #[error("failed to open dataset '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
}

/// Verse reference ("chapter:verse") to canonical text.
#[derive(Debug, Default)]
pub struct VerseStore {
    verses: HashMap<String, String>,
}

impl VerseStore {
    /// Load the dataset at `path`, keeping only the reference and text columns.
    pub fn load(
        path: &Path,
        key_column: &str,
        text_column: &str,
    ) -> Result<Self, VerseStoreError> {
        let file = File::open(path).map_err(|source| VerseStoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(file, key_column, text_column)
    }

    /// Parse CSV with a header row. Extra columns are ignored; a later row
    /// with an already-seen reference replaces the earlier text.
    pub fn from_reader<R: Read>(
        reader: R,
        key_column: &str,
        text_column: &str,
    ) -> Result<Self, VerseStoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let key_idx = column_index(&headers, key_column)?;
        let text_idx = column_index(&headers, text_column)?;

        let mut verses = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let key = record.get(key_idx).unwrap_or_default();
            let text = record.get(text_idx).unwrap_or_default();
            verses.insert(key.to_string(), text.to_string());
        }

        Ok(Self { verses })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            verses: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Number of distinct references loaded.
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn lookup(&self, reference: &str) -> Option<&str> {
        self.verses.get(reference).map(String::as_str)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, VerseStoreError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| VerseStoreError::MissingColumn(name.to_string()))
}
