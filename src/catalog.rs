//! Immutable nutrient catalog, loaded once at startup from CSV.
//!
//! Column headers are trimmed and lowercased on load; all seven columns are
//! required. Rows are never mutated afterwards — requests only read them.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.csv";
pub const ENV_CATALOG_PATH: &str = "CATALOG_PATH";

/// One recommendable nutrient/food row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub food_sources: String,
    pub symptom_keywords: String,
    pub cause_tags: String,
    pub citation: String,
}

impl CatalogEntry {
    /// Corpus text for the semantic space.
    pub fn semantic_text(&self) -> String {
        format!(
            "{} {} {}",
            self.symptom_keywords, self.cause_tags, self.description
        )
    }

    /// Corpus text for the intent space (keywords and causes only).
    pub fn intent_text(&self) -> String {
        format!("{} {}", self.symptom_keywords, self.cause_tags)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading catalog from {}", path.display()))?;
        Self::from_csv_str(&content)
            .with_context(|| format!("parsing catalog at {}", path.display()))
    }

    /// Parse catalog rows from CSV text. Header lookup is case- and
    /// whitespace-insensitive; missing cells become empty strings.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers().context("reading catalog header")?.clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("catalog is missing required column `{name}`"))
        };

        let name_col = column("name")?;
        let kind_col = column("type")?;
        let description_col = column("description")?;
        let food_sources_col = column("food_sources")?;
        let symptom_keywords_col = column("symptom_keywords")?;
        let cause_tags_col = column("cause_tags")?;
        let citation_col = column("citation")?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record.context("reading catalog row")?;
            let cell = |i: usize| record.get(i).unwrap_or("").to_string();
            entries.push(CatalogEntry {
                name: cell(name_col),
                kind: cell(kind_col),
                description: cell(description_col),
                food_sources: cell(food_sources_col),
                symptom_keywords: cell(symptom_keywords_col),
                cause_tags: cell(cause_tags_col),
                citation: cell(citation_col),
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn semantic_texts(&self) -> Vec<String> {
        self.entries.iter().map(CatalogEntry::semantic_text).collect()
    }

    pub fn intent_texts(&self) -> Vec<String> {
        self.entries.iter().map(CatalogEntry::intent_text).collect()
    }
}
