use anyhow::{Context, Result};
use imdbcsv::{
    fetch::{HttpFetch, StaticDirFetch},
    load, logging, LoadInput, LoadResult, RouteParams,
};
use reqwest::Client;
use std::{env, io::Write};
use tracing::info;
use url::Url;

const DEFAULT_STATIC_DIR: &str = "static";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init("info");

    // ─── 2) args: [STATIC_DIR | ORIGIN_URL] [BASE] ───────────────────
    let mut args = env::args().skip(1);
    let source = args.next().unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());
    let base = args.next().unwrap_or_default();
    let params = RouteParams::new();

    // ─── 3) run one page load ────────────────────────────────────────
    let result: LoadResult = match Url::parse(&source) {
        Ok(origin) if matches!(origin.scheme(), "http" | "https") => {
            info!(%origin, base = %base, "loading over HTTP");
            let fetch = HttpFetch::new(Client::new(), origin);
            load(LoadInput {
                fetch: &fetch,
                base: &base,
                params: &params,
            })
            .await
        }
        _ => {
            info!(dir = %source, base = %base, "loading from static dir");
            let fetch = StaticDirFetch::new(&source);
            load(LoadInput {
                fetch: &fetch,
                base: &base,
                params: &params,
            })
            .await
        }
    }
    .with_context(|| format!("loading imdb.csv from {}", source))?;

    info!(rows = result.imdb_csv.len(), "done");

    // ─── 4) hand the page data over on stdout ────────────────────────
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &result).context("writing load result")?;
    writeln!(out)?;
    Ok(())
}
