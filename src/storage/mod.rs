// Storage client: contains a small blocking HTTP client that puts one file
// into an S3-compatible bucket. Requests are path-style
// (`{endpoint}/{bucket}/{key}`) and signed with SigV4 against the synthetic
// `auto` region, so the same code talks to R2, MinIO, Spaces or AWS itself.

pub mod progress;
pub mod sigv4;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use percent_encoding::utf8_percent_encode;
use reqwest::blocking::{Body, Client};
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use crate::config::Credentials;
use crate::error::{Result, TransportError, UplError};
use progress::{ProgressCallback, ProgressReader};
use sigv4::{Signer, REGION, URI_ENCODE_SET};

/// Opt-in switch for endpoints with self-signed certificates.
pub const INSECURE_TLS_ENV: &str = "UPL_INSECURE_TLS";

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadOptions {
    /// Skip certificate validation. Never enabled unless asked for.
    pub insecure_tls: bool,
}

impl UploadOptions {
    /// Reads `UPL_INSECURE_TLS` (`1` or `true` enables it).
    pub fn from_env() -> Self {
        let insecure_tls = std::env::var(INSECURE_TLS_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);
        Self { insecure_tls }
    }

    /// Environment settings with the command-line switch applied on top.
    /// Call before raw mode is entered; it may log a warning.
    pub fn resolve(insecure_flag: bool) -> Self {
        let mut options = Self::from_env();
        options.insecure_tls |= insecure_flag;
        if options.insecure_tls {
            warn!("TLS certificate validation is disabled");
        }
        options
    }
}

/// Single-shot uploader bound to one credentials record.
#[derive(Debug, Clone)]
pub struct Uploader {
    creds: Credentials,
    options: UploadOptions,
}

impl Uploader {
    pub fn new(creds: Credentials, options: UploadOptions) -> Self {
        Self { creds, options }
    }

    /// Upload `path` as `{bucket}/{basename}` and return its public URL.
    ///
    /// With `on_progress` set, the callback receives the cumulative byte count
    /// on every read of the file. Without it, a progress bar is drawn on
    /// stderr for the duration of the call. There is no retry: any failure
    /// ends the upload.
    pub fn upload(&self, path: &Path, on_progress: Option<ProgressCallback>) -> Result<String> {
        let file_access = |source| UplError::FileAccess {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(file_access)?;
        let size = file.metadata().map_err(file_access)?.len();
        let key = object_key(path).ok_or_else(|| {
            file_access(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path has no file name",
            ))
        })?;

        let (on_progress, bar) = match on_progress {
            Some(cb) => (cb, None),
            None => {
                let bar = progress_bar(size);
                let handle = bar.clone();
                let cb: ProgressCallback = Box::new(move |n| handle.set_position(n));
                (cb, Some(bar))
            }
        };

        let body = Body::sized(ProgressReader::new(file, on_progress), size);
        let result = self.put(&key, body, size);

        if let Some(bar) = bar {
            if result.is_ok() {
                bar.finish();
            } else {
                bar.abandon();
            }
        }

        result.map_err(|source| UplError::Transfer {
            file: key.clone(),
            bucket: self.creds.bucket.clone(),
            source,
        })?;

        let url = public_url(&self.creds.public_url, &key);
        info!("uploaded {} ({size} bytes) to {url}", path.display());
        Ok(url)
    }

    /// `{endpoint}/{bucket}/{encoded key}`
    pub fn object_url(&self, key: &str) -> Result<Url, TransportError> {
        let invalid = || TransportError::Endpoint(self.creds.endpoint.clone());
        let endpoint = normalize_endpoint(&self.creds.endpoint).ok_or_else(invalid)?;
        match Url::parse(&endpoint) {
            Ok(base) if base.host_str().is_some() => {}
            _ => return Err(invalid()),
        }
        let raw = format!(
            "{endpoint}/{}/{}",
            self.creds.bucket,
            utf8_percent_encode(key, URI_ENCODE_SET)
        );
        Url::parse(&raw).map_err(|_| invalid())
    }

    fn http_client(&self) -> Result<Client, TransportError> {
        // No timeout: a stalled endpoint blocks the transfer until the process exits.
        let mut builder = Client::builder().timeout(None::<Duration>);
        if self.options.insecure_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(builder.build()?)
    }

    fn put(&self, key: &str, body: Body, size: u64) -> Result<(), TransportError> {
        let target = self.object_url(key)?;
        let host = host_header(&target)
            .ok_or_else(|| TransportError::Endpoint(self.creds.endpoint.clone()))?;
        let signed = Signer {
            access_key_id: &self.creds.access_key_id,
            secret_access_key: &self.creds.secret_access_key,
            region: REGION,
        }
        .sign("PUT", &host, target.path(), Utc::now());

        debug!("PUT {target} ({size} bytes)");
        let res = self
            .http_client()?
            .put(target.clone())
            .header(AUTHORIZATION, signed.authorization)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", signed.content_sha256)
            .body(body)
            .send()?;

        let status = res.status();
        debug!("PUT {target} -> {status}");
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(TransportError::Status {
                status,
                body: body.trim().to_string(),
            });
        }
        Ok(())
    }
}

/// The object key: the file's base name.
pub fn object_key(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Public URL template with one trailing slash removed, joined with the key.
pub fn public_url(template: &str, key: &str) -> String {
    let base = template.strip_suffix('/').unwrap_or(template);
    format!("{base}/{key}")
}

/// Trim trailing slashes and assume https when no scheme was given.
fn normalize_endpoint(endpoint: &str) -> Option<String> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        None
    } else if endpoint.contains("://") {
        Some(endpoint.to_string())
    } else {
        Some(format!("https://{endpoint}"))
    }
}

fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn progress_bar(size: u64) -> ProgressBar {
    let bar = ProgressBar::new(size);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner} [{bar:40}] {bytes}/{total_bytes} {bytes_per_sec} ETA {eta}",
    ) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
