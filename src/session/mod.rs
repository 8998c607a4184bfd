//! Session bootstrap.
//!
//! Credentials live in `<auth_dir>/creds.json`. When they are missing or
//! unusable, they are fetched from the paste host by archive id. A fatal
//! disconnect cleans the directory so the next start downloads fresh
//! credentials.

use std::path::Path;

use anyhow::{bail, Context};
use tracing::{info, warn};

use crate::config::Config;

/// Marker prefix session ids are distributed with.
const SESSION_MARKER: &str = "WARDEN_";

/// Paste host API endpoint.
const PASTE_API: &str = "https://api.github.com/gists";

/// Make sure usable credentials exist under the auth directory,
/// downloading them when needed.
pub async fn ensure(config: &Config) -> anyhow::Result<()> {
    if creds_usable(&config.auth_dir).await {
        info!("existing session is valid");
        return Ok(());
    }

    let Some(raw_id) = config.session_id.as_deref() else {
        bail!("no usable session and SESSION_ID is not configured");
    };
    let id = extract_archive_id(raw_id)
        .with_context(|| format!("invalid session id: {raw_id}"))?;

    download(&id, config.paste_token.as_deref(), &config.auth_dir).await
}

/// Whether `creds.json` exists, parses, and carries an identity entry.
async fn creds_usable(auth_dir: &Path) -> bool {
    let Ok(raw) = tokio::fs::read(auth_dir.join("creds.json")).await else {
        return false;
    };
    match serde_json::from_slice::<serde_json::Value>(&raw) {
        Ok(value) => value.get("me").is_some(),
        Err(e) => {
            warn!("existing creds.json is not valid JSON: {e}");
            false
        }
    }
}

/// Extract the archive id from its distributed forms: a bare id, a
/// marker-prefixed id, or a URL ending in either.
fn extract_archive_id(raw: &str) -> Option<String> {
    let tail = raw.rsplit('/').next().unwrap_or(raw);
    let tail = tail.strip_prefix(SESSION_MARKER).unwrap_or(tail);
    let id: String = tail.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if id.len() < 5 {
        return None;
    }
    Some(id)
}

/// Download the credentials file from the paste host.
async fn download(id: &str, token: Option<&str>, auth_dir: &Path) -> anyhow::Result<()> {
    info!("downloading session archive {id}");

    tokio::fs::create_dir_all(auth_dir)
        .await
        .with_context(|| format!("creating {}", auth_dir.display()))?;

    let client = reqwest::Client::new();
    let mut request = client
        .get(format!("{PASTE_API}/{id}"))
        .header("User-Agent", "warden")
        .header("Accept", "application/vnd.github.v3+json");
    if let Some(token) = token {
        request = request.header("Authorization", format!("token {token}"));
    }

    let response = request
        .send()
        .await
        .context("session archive request failed")?
        .error_for_status()
        .context("session archive request rejected")?;
    let body: serde_json::Value = response
        .json()
        .await
        .context("session archive response was not JSON")?;

    let files = body
        .get("files")
        .and_then(|f| f.as_object())
        .context("session archive carries no files")?;

    // Prefer a file named after the credentials, then any JSON file,
    // then whatever comes first.
    let content = files
        .iter()
        .find(|(name, _)| name.contains("creds"))
        .or_else(|| files.iter().find(|(name, _)| name.ends_with(".json")))
        .or_else(|| files.iter().next())
        .and_then(|(_, file)| file.get("content").and_then(|c| c.as_str()))
        .context("session archive has no usable content")?;

    serde_json::from_str::<serde_json::Value>(content)
        .context("downloaded credentials are not valid JSON")?;

    tokio::fs::write(auth_dir.join("creds.json"), content)
        .await
        .context("writing creds.json")?;

    info!("session downloaded");
    Ok(())
}

/// Remove the local session state. Used on fatal disconnects.
pub async fn clean(auth_dir: &Path) {
    match tokio::fs::remove_dir_all(auth_dir).await {
        Ok(()) => info!("session directory removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove session directory: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_archive_id_forms() {
        assert_eq!(extract_archive_id("abc123def").as_deref(), Some("abc123def"));
        assert_eq!(
            extract_archive_id("WARDEN_abc123def").as_deref(),
            Some("abc123def")
        );
        assert_eq!(
            extract_archive_id("https://example.com/user/WARDEN_abc123def").as_deref(),
            Some("abc123def")
        );
        assert_eq!(extract_archive_id("ab").as_deref(), None);
    }

    #[tokio::test]
    async fn test_creds_usable_requires_identity() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!creds_usable(dir.path()).await);

        tokio::fs::write(dir.path().join("creds.json"), r#"{"noise":1}"#)
            .await
            .unwrap();
        assert!(!creds_usable(dir.path()).await);

        tokio::fs::write(dir.path().join("creds.json"), r#"{"me":{"id":"42"}}"#)
            .await
            .unwrap();
        assert!(creds_usable(dir.path()).await);
    }
}
