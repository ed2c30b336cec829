use std::future::Future;
use std::pin::Pin;

use city_replay_dataset::{DataFetcher, DatasetError, Result};

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads local files.
pub struct FileFetcher;

impl DataFetcher for FileFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            tokio::fs::read(url)
                .await
                .map_err(|e| DatasetError::Fetch(format!("{url}: {e}")))
        })
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| DatasetError::Fetch(format!("{url}: {e}")))?;

            if !resp.status().is_success() {
                return Err(DatasetError::Fetch(format!("{url}: HTTP {}", resp.status())));
            }

            let bytes = resp
                .bytes()
                .await
                .map_err(|e| DatasetError::Fetch(format!("{url}: {e}")))?;
            Ok(bytes.to_vec())
        })
    }
}

/// Routes `http(s)://` sources to [`HttpFetcher`] and everything else to [`FileFetcher`].
pub struct SourceFetcher {
    file: FileFetcher,
    http: HttpFetcher,
}

impl SourceFetcher {
    pub fn new() -> Self {
        Self {
            file: FileFetcher,
            http: HttpFetcher::new(),
        }
    }
}

impl Default for SourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFetcher for SourceFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        if is_remote(url) {
            self.http.fetch(url)
        } else {
            self.file.fetch(url)
        }
    }
}
