use anyhow::{Context, Result};
use imdbcsv::{
    logging,
    rows::parse_rows,
    similarity::{similar_titles, write_similarity, DEFAULT_LIMIT},
};
use std::{env, fs};
use tracing::info;

const INPUT_CSV: &str = "static/imdb.csv";
const OUTPUT_JSON: &str = "similarity.json";

fn main() -> Result<()> {
    logging::init("info");

    let mut args = env::args().skip(1);
    let input = args.next().unwrap_or_else(|| INPUT_CSV.to_string());
    let output = args.next().unwrap_or_else(|| OUTPUT_JSON.to_string());

    let text = fs::read_to_string(&input).with_context(|| format!("reading {}", input))?;
    let rows = parse_rows(&text).with_context(|| format!("parsing {}", input))?;
    info!(rows = rows.len(), input = %input, "loaded");

    let map = similar_titles(&rows, DEFAULT_LIMIT);
    write_similarity(&output, &map)?;

    info!(output = %output, "similarity JSON saved");
    Ok(())
}
