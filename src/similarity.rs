// src/similarity.rs

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{debug, info, instrument};

use crate::rows::Row;

/// How many neighbours each title keeps.
pub const DEFAULT_LIMIT: usize = 10;

const TITLE: &str = "Series_Title";
const GENRE: &str = "Genre";
const DIRECTOR: &str = "Director";
const RATING: &str = "IMDB_Rating";
const STARS: [&str; 4] = ["Star1", "Star2", "Star3", "Star4"];

const GENRE_WEIGHT: f64 = 1.0;
const DIRECTOR_WEIGHT: f64 = 0.5;
const SHARED_STAR_WEIGHT: f64 = 0.2;
const RATING_PIVOT: f64 = 7.0;
const RATING_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Similar {
    pub title: String,
    pub score: f64,
}

/// Title → its most similar other titles, best first.
///
/// Titles keep first-seen order; re-inserting a title replaces its list in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMap {
    entries: Vec<(String, Vec<Similar>)>,
    index: HashMap<String, usize>,
}

impl SimilarityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous list when `title` was already present.
    pub fn insert(&mut self, title: String, similar: Vec<Similar>) -> Option<Vec<Similar>> {
        match self.index.get(&title).copied() {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, similar)),
            None => {
                self.index.insert(title.clone(), self.entries.len());
                self.entries.push((title, similar));
                None
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&[Similar]> {
        self.index
            .get(title)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Similar])> {
        self.entries
            .iter()
            .map(|(t, s)| (t.as_str(), s.as_slice()))
    }
}

impl Serialize for SimilarityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (title, similar) in &self.entries {
            map.serialize_entry(title, similar)?;
        }
        map.end()
    }
}

/// Missing cells read as empty strings.
fn cell<'a>(row: &'a Row, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

fn stars(row: &Row) -> HashSet<&str> {
    STARS.iter().map(|k| cell(row, k)).collect()
}

/// Score `candidate` as a recommendation for `movie`.
///
/// Empty star slots count as a shared value when both sides have one.
pub fn score(movie: &Row, candidate: &Row) -> f64 {
    let mut score = 0.0;

    if cell(movie, GENRE) == cell(candidate, GENRE) {
        score += GENRE_WEIGHT;
    }
    if cell(movie, DIRECTOR) == cell(candidate, DIRECTOR) {
        score += DIRECTOR_WEIGHT;
    }

    let shared = stars(movie).intersection(&stars(candidate)).count();
    score += shared as f64 * SHARED_STAR_WEIGHT;

    if let Ok(rating) = cell(candidate, RATING).trim().parse::<f64>() {
        score += (rating - RATING_PIVOT) * RATING_WEIGHT;
    }

    score
}

fn rank(movie: &Row, rows: &[Row], limit: usize) -> Vec<Similar> {
    let title = cell(movie, TITLE);
    let mut scored: Vec<Similar> = rows
        .iter()
        .filter(|c| cell(c, TITLE) != title)
        .map(|c| Similar {
            title: cell(c, TITLE).to_string(),
            score: score(movie, c),
        })
        .collect();

    // stable: equal scores stay in document order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Top `limit` similar titles for every row. Rows sharing a title: last one wins.
#[instrument(level = "info", skip(rows), fields(count = rows.len()))]
pub fn similar_titles(rows: &[Row], limit: usize) -> SimilarityMap {
    let ranked: Vec<(String, Vec<Similar>)> = rows
        .par_iter()
        .map(|movie| (cell(movie, TITLE).to_string(), rank(movie, rows, limit)))
        .collect();

    let mut out = SimilarityMap::new();
    for (title, similar) in ranked {
        if out.insert(title.clone(), similar).is_some() {
            debug!(%title, "duplicate title, keeping later row");
        }
    }
    info!(titles = out.len(), "similarity computed");
    out
}

/// Write the map as pretty-printed JSON.
pub fn write_similarity<P: AsRef<Path>>(path: P, map: &SimilarityMap) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, map)
        .with_context(|| format!("serializing similarity to {}", path.display()))?;
    w.flush()?;
    Ok(())
}
