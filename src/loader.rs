// src/loader.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::error::LoadError;
use crate::fetch::{Fetch, RequestOptions, TextBody};
use crate::rows::{parse_rows, Row};

/// Where the bundled CSV lives, relative to the deployment's base path.
pub const DEFAULT_ASSET: &str = "/imdb.csv";

/// Route parameters handed over by the page router. Not consulted here.
pub type RouteParams = BTreeMap<String, String>;

/// Asset suffix appended to the base path. Swappable so fixtures can live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPath(String);

impl AssetPath {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self(suffix.into())
    }

    /// Plain concatenation, no normalisation: `""` + `/imdb.csv` is `/imdb.csv`.
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base, self.0)
    }
}

impl Default for AssetPath {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET)
    }
}

/// Everything the host passes to a page load.
pub struct LoadInput<'a, F> {
    pub fetch: &'a F,
    pub base: &'a str,
    pub params: &'a RouteParams,
}

/// What the page receives: the parsed rows under `imdbCSV`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    #[serde(rename = "imdbCSV")]
    pub imdb_csv: Vec<Row>,
}

/// Fetch `<base>/imdb.csv`, read it as text and parse it into rows.
pub async fn load<F: Fetch>(input: LoadInput<'_, F>) -> Result<LoadResult, LoadError> {
    load_asset(input, &AssetPath::default()).await
}

/// `load` against an arbitrary asset suffix.
///
/// Failures from the fetch, the body read or the parse are returned untouched.
#[instrument(level = "info", skip_all, fields(base = %input.base))]
pub async fn load_asset<F: Fetch>(
    input: LoadInput<'_, F>,
    asset: &AssetPath,
) -> Result<LoadResult, LoadError> {
    let LoadInput { fetch, base, .. } = input;
    let url = asset.url(base);

    let response = fetch.fetch(&url, &RequestOptions::csv()).await?;
    let text = response.text().await?;
    let imdb_csv = parse_rows(&text)?;

    debug!(%url, rows = imdb_csv.len(), "loaded");
    Ok(LoadResult { imdb_csv })
}
