//! Passage catalog loaded from a CSV source.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::seq::IndexedRandom;
use serde::Deserialize;

use trainer_core::model::{Difficulty, Passage, PassageId};

use crate::error::CatalogError;

//
// ─── CATALOG ────────────────────────────────────────────────────────────────
//

/// Row shape of the catalog CSV.
#[derive(Debug, Deserialize)]
struct PassageRow {
    id: String,
    title: String,
    difficulty: String,
    #[serde(default)]
    full_text: String,
}

/// In-memory catalog of passages grouped by difficulty tier.
#[derive(Debug, Clone)]
pub struct CatalogService {
    passages: Vec<Passage>,
}

impl CatalogService {
    /// Loads a catalog from a CSV file on disk.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, a row is malformed, or a row
    /// carries an unknown difficulty label.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path.as_ref()).map_err(csv::Error::from)?;
        Self::from_reader(file)
    }

    /// Loads a catalog from any CSV reader with a header row.
    ///
    /// # Errors
    ///
    /// Fails when a row is malformed or carries an unknown difficulty label.
    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut passages = Vec::new();
        for row in csv_reader.deserialize::<PassageRow>() {
            let row = row?;
            let difficulty: Difficulty =
                row.difficulty
                    .parse()
                    .map_err(|source| CatalogError::InvalidDifficulty {
                        id: row.id.clone(),
                        source,
                    })?;
            passages.push(Passage::new(
                PassageId::new(row.id),
                row.title,
                difficulty,
                row.full_text,
            ));
        }
        Ok(Self { passages })
    }

    #[must_use]
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Picks a uniformly random passage from the requested tier.
    ///
    /// Returns `None` when the tier has no passages.
    #[must_use]
    pub fn pick_random(&self, difficulty: Difficulty) -> Option<&Passage> {
        let tier: Vec<&Passage> = self
            .passages
            .iter()
            .filter(|p| p.difficulty == difficulty)
            .collect();
        tier.choose(&mut rand::rng()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
id,title,difficulty,full_text
rivers-1,River Deltas,Easy,\"Deltas form at river mouths.\n\nSediment builds new land.\"
glaciers-1,Glacial Valleys,Medium,Glaciers carve valleys.
storms-1,Storm Cells,Medium,Updrafts feed storm cells.
";

    #[test]
    fn loads_rows_and_parses_tiers() {
        let catalog = CatalogService::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(catalog.passages().len(), 3);
        assert_eq!(catalog.passages()[0].difficulty, Difficulty::Easy);
        assert_eq!(catalog.passages()[0].id.as_str(), "rivers-1");
        assert!(catalog.passages()[0].full_text.contains("\n\n"));
    }

    #[test]
    fn unknown_difficulty_names_the_row() {
        let csv = "id,title,difficulty,full_text\nbad-1,Broken,Impossible,text\n";
        let err = CatalogService::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            CatalogError::InvalidDifficulty { id, .. } => assert_eq!(id, "bad-1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pick_random_stays_within_the_tier() {
        let catalog = CatalogService::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        for _ in 0..20 {
            let picked = catalog.pick_random(Difficulty::Medium).unwrap();
            assert_eq!(picked.difficulty, Difficulty::Medium);
        }
    }

    #[test]
    fn pick_random_on_an_empty_tier_is_none() {
        let catalog = CatalogService::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert!(catalog.pick_random(Difficulty::Hard).is_none());
    }
}
