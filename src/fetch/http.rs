// src/fetch/http.rs

use reqwest::Client;
use tracing::{debug, trace};
use url::Url;

use super::{Fetch, RequestOptions, TextBody};
use crate::error::LoadError;

/// Fetches assets over HTTP, resolving page-relative URLs against `origin`.
#[derive(Debug, Clone)]
pub struct HttpFetch {
    client: Client,
    origin: Url,
}

impl HttpFetch {
    pub fn new(client: Client, origin: Url) -> Self {
        Self { client, origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn resolve(&self, url: &str) -> Result<Url, LoadError> {
        self.origin
            .join(url)
            .map_err(|e| LoadError::transport(url, e))
    }
}

pub struct HttpResponse {
    url: Url,
    inner: reqwest::Response,
}

impl Fetch for HttpFetch {
    type Response = HttpResponse;

    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse, LoadError> {
        let target = self.resolve(url)?;
        debug!(%target, "GET");

        let mut req = self.client.get(target.clone());
        for (name, value) in &options.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| LoadError::transport(target.as_str(), e))?
            .error_for_status()
            .map_err(|e| match e.status() {
                Some(status) => LoadError::Status {
                    url: target.to_string(),
                    status: status.as_u16(),
                },
                None => LoadError::transport(target.as_str(), e),
            })?;
        trace!(%target, status = %resp.status(), "response");

        Ok(HttpResponse {
            url: target,
            inner: resp,
        })
    }
}

impl TextBody for HttpResponse {
    async fn text(self) -> Result<String, LoadError> {
        let url = self.url;
        self.inner.text().await.map_err(|e| LoadError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    /// Accept one connection, answer with `response`, hand back the raw request head.
    async fn serve_once(response: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            sock.write_all(response.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });
        let origin = Url::parse(&format!("http://{}/", addr)).unwrap();
        (origin, handle)
    }

    #[tokio::test]
    async fn fetches_text_and_sends_csv_hint() {
        let (origin, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 8\r\nConnection: close\r\n\r\na,b\n1,2\n",
        )
        .await;
        let fetch = HttpFetch::new(Client::new(), origin);

        let resp = fetch
            .fetch("/app/imdb.csv", &RequestOptions::csv())
            .await
            .unwrap();
        let body = resp.text().await.unwrap();
        assert_eq!(body, "a,b\n1,2\n");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /app/imdb.csv http/1.1"));
        assert!(request.contains("content-type: text/csv"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (origin, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let fetch = HttpFetch::new(Client::new(), origin);

        let err = fetch
            .fetch("/imdb.csv", &RequestOptions::csv())
            .await
            .err()
            .expect("404 must fail");
        match err {
            LoadError::Status { url, status } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/imdb.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let origin = Url::parse(&format!("http://{}/", addr)).unwrap();
        let fetch = HttpFetch::new(Client::new(), origin);
        let err = fetch
            .fetch("/imdb.csv", &RequestOptions::default())
            .await
            .err()
            .expect("nothing is listening");
        assert!(matches!(err, LoadError::Transport { .. }));
    }
}
