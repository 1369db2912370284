//! Byte loading for the station, trip and bike-lane sources.
//!
//! A source is either an `http(s)://` URL fetched through an [`HttpClient`]
//! or a local path. Sources ending in `.gz` are gunzipped after loading.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, anyhow};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

/// Fetches `url` and returns the response body.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the request fails, or the server
/// answers with a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("GET {} returned status {}", url, status));
    }

    Ok(resp.bytes().await?.to_vec())
}

/// Loads a source from a URL or a local file path.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("failed to fetch {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");

    if source.ends_with(".gz") {
        return gunzip(&bytes).with_context(|| format!("failed to decompress {source}"));
    }
    Ok(bytes)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/trips.csv"));
        assert!(is_remote("http://example.com/trips.csv"));
        assert!(!is_remote("data/trips.csv"));
        assert!(!is_remote("/tmp/httpdata.csv"));
    }

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = temp_path("bike_traffic_test_plain.csv");
        fs::write(&path, b"a,b\n1,2\n").unwrap();

        let client = BasicClient::new().unwrap();
        let bytes = load_source(&client, &path).await.unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_gunzips() {
        let path = temp_path("bike_traffic_test_gzip.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello trips").unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        let client = BasicClient::new().unwrap();
        let bytes = load_source(&client, &path).await.unwrap();
        assert_eq!(bytes, b"hello trips");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_missing_file_errors() {
        let client = BasicClient::new().unwrap();
        let result = load_source(&client, "/nonexistent/bike_traffic/stations.json").await;
        assert!(result.is_err());
    }
}
