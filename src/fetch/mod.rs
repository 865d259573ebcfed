// src/fetch/mod.rs

use std::future::Future;

use crate::error::LoadError;

pub mod http;
pub mod static_dir;

pub use http::HttpFetch;
pub use static_dir::StaticDirFetch;

/// Extra request metadata passed along with a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options for pulling a CSV asset: just the `Content-Type: text/csv` hint.
    pub fn csv() -> Self {
        Self {
            headers: vec![("Content-Type".into(), "text/csv".into())],
        }
    }
}

/// A response whose body can be read once, as text.
pub trait TextBody {
    fn text(self) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// The fetch capability a page load is handed by its host.
///
/// Providers decide what "failure" means (status codes, missing files);
/// the loader just propagates whatever they return.
pub trait Fetch {
    type Response: TextBody + Send;

    fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = Result<Self::Response, LoadError>> + Send;
}
