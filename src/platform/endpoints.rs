//! API endpoint resolution for github.com and GitHub Enterprise

use crate::error::{Error, Result};
use url::Url;

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com/";
/// Public GitHub upload API
pub const DEFAULT_UPLOAD_URL: &str = "https://uploads.github.com/";

/// Resolve the REST and upload base URLs.
///
/// - both given: used as-is
/// - neither given: public GitHub
/// - only the API URL: enterprise installs usually serve uploads from the
///   same base, so it is reused
/// - only the upload URL: error
pub fn resolve_endpoints(api_url: Option<&str>, upload_url: Option<&str>) -> Result<(Url, Url)> {
    let (api, upload) = match (non_empty(api_url), non_empty(upload_url)) {
        (Some(api), Some(upload)) => (api, upload),
        (None, None) => (DEFAULT_API_URL, DEFAULT_UPLOAD_URL),
        (None, Some(_)) => {
            return Err(Error::Config(
                "an API URL must be specified if an upload URL is specified".to_string(),
            ));
        }
        (Some(api), None) => (api, api),
    };

    Ok((parse_base(api)?, parse_base(upload)?))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a base URL, forcing a trailing slash so `join` appends path segments.
fn parse_base(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&with_slash)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!("unsupported URL scheme in '{raw}'")));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_urls_provided() {
        let (api, upload) = resolve_endpoints(
            Some("https://github.example.com/api/v3"),
            Some("https://github.example.com/api/uploads"),
        )
        .unwrap();
        assert_eq!(api.as_str(), "https://github.example.com/api/v3/");
        assert_eq!(upload.as_str(), "https://github.example.com/api/uploads/");
    }

    #[test]
    fn test_both_urls_empty() {
        let (api, upload) = resolve_endpoints(None, Some("")).unwrap();
        assert_eq!(api.as_str(), DEFAULT_API_URL);
        assert_eq!(upload.as_str(), DEFAULT_UPLOAD_URL);
    }

    #[test]
    fn test_upload_without_api_is_error() {
        let err = resolve_endpoints(None, Some("https://github.example.com/api/uploads"))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }

    #[test]
    fn test_api_without_upload_reuses_api() {
        let (api, upload) =
            resolve_endpoints(Some("https://github.example.com/api/v3"), None).unwrap();
        assert_eq!(api, upload);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(resolve_endpoints(Some("ftp://example.com"), None).is_err());
    }
}
