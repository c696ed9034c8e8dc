//! Source file retrieval.
//!
//! Fetches the dated forecast file over HTTP in a single attempt; there is
//! no retry — the batch job is simply re-run on failure. When the dated
//! file is not published yet, the newest file in the source index is used
//! instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use rain_common::{RainError, RainResult};

/// HTTP client for the forecast file source.
pub struct SourceClient {
    client: Client,
    base_url: String,
}

impl SourceClient {
    pub fn new(base_url: impl Into<String>) -> RainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RainError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Source file name for a forecast date and cycle.
    pub fn source_filename(date: NaiveDate, cycle: &str) -> String {
        format!("ECMWF.0125.{}{}00.PREC.nc", date.format("%Y%m%d"), cycle)
    }

    /// Fetch the forecast file for a date, falling back to the newest
    /// available file when the dated one is absent.
    ///
    /// Returns `Ok(None)` when the source has nothing to offer; transport
    /// failures surface as [`RainError::UpstreamUnavailable`].
    pub async fn fetch_for_date(
        &self,
        date: NaiveDate,
        cycle: &str,
        dest_dir: &Path,
    ) -> RainResult<Option<PathBuf>> {
        tokio::fs::create_dir_all(dest_dir).await?;

        let filename = Self::source_filename(date, cycle);
        if let Some(path) = self.fetch_file(&filename, dest_dir).await? {
            return Ok(Some(path));
        }

        warn!(
            filename = %filename,
            "Dated source file not available, falling back to newest"
        );
        self.fetch_latest(dest_dir).await
    }

    /// Download one file by name. Already-downloaded files are reused.
    async fn fetch_file(&self, filename: &str, dest_dir: &Path) -> RainResult<Option<PathBuf>> {
        let final_path = dest_dir.join(filename);
        if final_path.exists() {
            info!(path = %final_path.display(), "File already downloaded, reusing");
            return Ok(Some(final_path));
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), filename);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RainError::UpstreamUnavailable(format!("GET {}: {}", url, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RainError::UpstreamUnavailable(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RainError::UpstreamUnavailable(format!("GET {}: {}", url, e)))?;

        // Write to a partial file first so an interrupted download never
        // masquerades as a complete one.
        let temp_path = dest_dir.join(format!("{}.partial", filename));
        tokio::fs::write(&temp_path, &body).await?;
        tokio::fs::rename(&temp_path, &final_path).await?;

        info!(
            path = %final_path.display(),
            bytes = body.len(),
            "Downloaded source file"
        );
        Ok(Some(final_path))
    }

    /// Fetch the newest forecast file named in the source index.
    async fn fetch_latest(&self, dest_dir: &Path) -> RainResult<Option<PathBuf>> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| RainError::UpstreamUnavailable(format!("index listing: {}", e)))?;

        if !response.status().is_success() {
            return Err(RainError::UpstreamUnavailable(format!(
                "index listing returned {}",
                response.status()
            )));
        }

        let index = response
            .text()
            .await
            .map_err(|e| RainError::UpstreamUnavailable(format!("index listing: {}", e)))?;

        match latest_source_file(&index) {
            Some(filename) => self.fetch_file(&filename, dest_dir).await,
            None => Ok(None),
        }
    }
}

/// Pick the newest forecast file named in an index listing.
///
/// Source file names embed date and cycle in fixed-width fields, so the
/// lexicographically greatest name is the newest.
fn latest_source_file(index: &str) -> Option<String> {
    let mut best: Option<&str> = None;

    for (pos, _) in index.match_indices("ECMWF.") {
        let rest = &index[pos..];
        let Some(end) = rest.find(".PREC.nc") else {
            continue;
        };
        let name = &rest[..end + ".PREC.nc".len()];
        if name.contains(|c: char| c == '"' || c == '<' || c == '>' || c.is_whitespace()) {
            continue;
        }
        if best.map_or(true, |b| name > b) {
            best = Some(name);
        }
    }

    best.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            SourceClient::source_filename(date, "12"),
            "ECMWF.0125.202401151200.PREC.nc"
        );
    }

    #[test]
    fn test_latest_source_file_from_listing() {
        let index = r#"
            <a href="ECMWF.0125.202401141200.PREC.nc">ECMWF.0125.202401141200.PREC.nc</a>
            <a href="ECMWF.0125.202401151200.PREC.nc">ECMWF.0125.202401151200.PREC.nc</a>
            <a href="ECMWF.0125.202401150000.PREC.nc">ECMWF.0125.202401150000.PREC.nc</a>
        "#;

        assert_eq!(
            latest_source_file(index).unwrap(),
            "ECMWF.0125.202401151200.PREC.nc"
        );
    }

    #[test]
    fn test_latest_source_file_empty_listing() {
        assert!(latest_source_file("<html>nothing here</html>").is_none());
    }
}
