//! Absolute URLs against the configured RomM server.
//!
//! Segments are always joined with a single `/`: leading, trailing and repeated separators
//! in the inputs are collapsed, so the only `//` in a result is the one after the scheme.

use tracing::debug;
use url::Url;

use crate::error::UrlError;

/// Server directory that artwork paths from `ss_metadata` are relative to.
pub const ASSET_RESOURCE_PREFIX: &str = "assets/romm/resources";

/// Endpoint listing the saves stored for a ROM.
pub const SAVES_ENDPOINT: &str = "api/saves";

/// Build the download URL of a server-relative asset path.
///
/// A path with or without leading slashes produces the same URL. An empty path yields the
/// resource directory itself, ending in `/`.
pub fn build_asset_url(host: &str, relative_path: &str) -> Result<String, UrlError> {
    let base = normalise_host(host)?;
    let url = format!(
        "{base}/{ASSET_RESOURCE_PREFIX}/{}",
        join_segments(relative_path)
    );
    debug!(%url, "built asset url");
    Ok(url)
}

/// Build the URL of an API endpoint.
pub fn build_api_url(host: &str, endpoint: &str) -> Result<String, UrlError> {
    let base = normalise_host(host)?;
    Ok(format!("{base}/{}", join_segments(endpoint)))
}

/// URL listing the saves the server holds for a ROM.
pub fn saves_url(host: &str, rom_id: u64) -> Result<String, UrlError> {
    Ok(format!("{}?rom_id={rom_id}", build_api_url(host, SAVES_ENDPOINT)?))
}

/// Validate the host and return it as `scheme://authority[/path]` without a trailing slash.
fn normalise_host(host: &str) -> Result<String, UrlError> {
    let trimmed = host.trim();
    if trimmed.is_empty() {
        return Err(UrlError::EmptyHost);
    }

    let invalid = |reason: String| UrlError::InvalidHost {
        host: host.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !parsed.has_host() {
        return Err(invalid("missing host".into()));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".into()));
    }

    let (scheme, rest) = trimmed
        .split_once("://")
        .ok_or_else(|| invalid("missing `://` after the scheme".into()))?;

    Ok(format!("{scheme}://{}", join_segments(rest)))
}

/// Join the non-empty segments of a path, accepting `\` as a separator.
fn join_segments(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "http://localhost:8080";
    const EXPECTED: &str =
        "http://localhost:8080/assets/romm/resources/roms/1/4/miximage/miximage.png";

    fn has_double_slash(url: &str) -> bool {
        url.replacen("://", "", 1).contains("//")
    }

    #[test]
    fn builds_url_for_relative_path() {
        let url = build_asset_url(HOST, "roms/1/4/miximage/miximage.png").expect("valid host");
        assert_eq!(url, EXPECTED);
    }

    #[test]
    fn leading_slashes_do_not_change_the_url() {
        for path in [
            "/roms/1/4/miximage/miximage.png",
            "//roms/1/4/miximage/miximage.png",
            "roms/1/4/miximage/miximage.png",
        ] {
            let url = build_asset_url(HOST, path).expect("valid host");
            assert_eq!(url, EXPECTED);
            assert!(!has_double_slash(&url));
        }
    }

    #[test]
    fn trailing_slashes_on_host_collapse() {
        for host in ["http://localhost:8080/", "http://localhost:8080//", " http://localhost:8080 "] {
            let url = build_asset_url(host, "/roms/1/4/miximage/miximage.png").expect("valid host");
            assert_eq!(url, EXPECTED);
        }
    }

    #[test]
    fn keeps_host_path_prefix() {
        let url = build_asset_url("https://example.com/romm/", "roms//2/box3d.png")
            .expect("valid host");
        assert_eq!(
            url,
            "https://example.com/romm/assets/romm/resources/roms/2/box3d.png"
        );
        assert!(!has_double_slash(&url));
    }

    #[test]
    fn normalises_backslashes() {
        let url = build_asset_url(HOST, "roms\\1\\4\\box3d\\box3d.png").expect("valid host");
        assert_eq!(
            url,
            "http://localhost:8080/assets/romm/resources/roms/1/4/box3d/box3d.png"
        );
    }

    #[test]
    fn empty_path_points_at_resource_directory() {
        for path in ["", "/", "///"] {
            assert_eq!(
                build_asset_url(HOST, path),
                Ok("http://localhost:8080/assets/romm/resources/".to_string())
            );
        }
    }

    #[test]
    fn rejects_empty_host() {
        assert_eq!(build_asset_url("", "roms/1.png"), Err(UrlError::EmptyHost));
        assert_eq!(build_asset_url("   ", "roms/1.png"), Err(UrlError::EmptyHost));
    }

    #[test]
    fn rejects_malformed_hosts() {
        for host in [
            "localhost:8080",
            "localhost",
            "/assets",
            "mailto:user@example.com",
            "http://localhost:8080/?token=x",
            "http://localhost:8080#frag",
            "http://h:8080/?a=1",
            "http://h#x",
        ] {
            assert!(
                matches!(
                    build_asset_url(host, "roms/1.png"),
                    Err(UrlError::InvalidHost { .. })
                ),
                "{host} should be rejected"
            );
        }
    }

    #[test]
    fn builds_saves_endpoint() {
        assert_eq!(
            saves_url("http://localhost:8080/", 4),
            Ok("http://localhost:8080/api/saves?rom_id=4".to_string())
        );
        assert_eq!(
            build_api_url(HOST, "/api/roms/"),
            Ok("http://localhost:8080/api/roms".to_string())
        );
    }
}
