use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use ring::{digest, hmac};
use std::time::Duration;

use super::{ObjectStore, ObjectStoreError, StoredObject};

/// SHA-256 of an empty body, sent with every GET.
const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

#[derive(Debug, Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// S3-compatible object store addressed path-style (`{endpoint}/{bucket}/{key}`).
///
/// Requests are signed with AWS Signature Version 4 when credentials are set,
/// and sent anonymously otherwise.
pub struct S3Store {
    client: Client,
    endpoint: Url,
    bucket: String,
    region: String,
    credentials: Option<S3Credentials>,
}

impl S3Store {
    pub fn new(
        endpoint: &str,
        bucket: &str,
        region: &str,
        credentials: Option<S3Credentials>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let endpoint = Url::parse(endpoint)?;
        if endpoint.host_str().is_none() {
            anyhow::bail!("S3 endpoint has no host: {endpoint}");
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            bucket: bucket.to_string(),
            region: region.to_string(),
            credentials,
        })
    }

    fn canonical_uri(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.path().trim_end_matches('/'),
            uri_encode(&self.bucket, false),
            uri_encode(key, true)
        )
    }

    /// Host header value exactly as reqwest will send it.
    fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, key: &str) -> Result<StoredObject, ObjectStoreError> {
        let canonical_uri = self.canonical_uri(key);
        let host = self.host();
        let url = format!("{}://{host}{canonical_uri}", self.endpoint.scheme());

        let mut request = self.client.get(&url);
        if let Some(ref credentials) = self.credentials {
            for (name, value) in
                signature_headers(credentials, &self.region, &host, &canonical_uri, Utc::now())
            {
                request = request.header(name, value);
            }
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ObjectStoreError::NotFound(key.to_string()));
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ObjectStoreError::Backend(format!(
                "S3 download failed ({status}): {body}"
            )));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let data = resp
            .bytes()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;

        Ok(StoredObject { data, content_type })
    }
}

/// Headers that authenticate a bodiless GET of `canonical_uri` on `host`.
fn signature_headers(
    credentials: &S3Credentials,
    region: &str,
    host: &str,
    canonical_uri: &str,
    now: DateTime<Utc>,
) -> [(&'static str, String); 3] {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let scope = format!("{date}/{region}/s3/aws4_request");

    let canonical_request = format!(
        "GET\n{canonical_uri}\n\nhost:{host}\nx-amz-content-sha256:{EMPTY_PAYLOAD_SHA256}\nx-amz-date:{amz_date}\n\n{SIGNED_HEADERS}\n{EMPTY_PAYLOAD_SHA256}"
    );
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
        hex::encode(digest::digest(&digest::SHA256, canonical_request.as_bytes()))
    );

    let key = signing_key(&credentials.secret_access_key, &date, region, "s3");
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.access_key_id
    );

    [
        ("x-amz-content-sha256", EMPTY_PAYLOAD_SHA256.to_string()),
        ("x-amz-date", amz_date),
        ("authorization", authorization),
    ]
}

fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

/// Percent-encode everything outside the SigV4 unreserved set.
fn uri_encode(input: &str, keep_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b'/' if keep_slash => out.push('/'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
