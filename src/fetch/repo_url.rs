// src/fetch/repo_url.rs
// =============================================================================
// Repository references.
//
// A RepositoryUrl is checked once, up front, so a malformed locator fails
// before we spawn git or touch the workspace.
//
// Supported formats:
//   - https://github.com/owner/repo(.git)
//   - http://host/path
//   - ssh://git@host/path
//   - git://host/path
//   - file:///absolute/path (handy for local fixtures)
// =============================================================================

use std::fmt;

use url::Url;

use crate::error::{Error, Result};

const SUPPORTED_SCHEMES: &[&str] = &["https", "http", "ssh", "git", "file"];

/// A validated, immutable remote repository locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrl {
    url: Url,
}

impl RepositoryUrl {
    /// Parses and validates a repository URL
    ///
    /// Example:
    ///   "https://github.com/rust-lang/rust" -> Ok
    ///   "github.com/rust-lang/rust"         -> Err (no scheme)
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = |reason: String| Error::InvalidUrl {
            url: trimmed.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("empty URL".to_string()));
        }

        let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        // Everything except file:// has to name a remote host
        let has_host = url.host_str().map(|h| !h.is_empty()).unwrap_or(false);
        if url.scheme() != "file" && !has_host {
            return Err(invalid("missing host".to_string()));
        }

        if url.path().trim_matches('/').is_empty() {
            return Err(invalid("missing repository path".to_string()));
        }

        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Extracts (owner, repo) from a GitHub URL, if this is one
    ///
    /// Example:
    ///   "https://github.com/user/repo.git" -> Some(("user", "repo"))
    pub fn github_slug(&self) -> Option<(String, String)> {
        let host = self.url.host_str()?;
        if host != "github.com" && host != "www.github.com" {
            return None;
        }

        let mut parts = self.url.path_segments()?.filter(|s| !s.is_empty());
        let owner = parts.next()?.to_string();
        let repo = parts.next()?.trim_end_matches(".git").to_string();

        if repo.is_empty() {
            return None;
        }
        Some((owner, repo))
    }

    /// A short, filesystem-safe name for this repository
    ///
    /// GitHub URLs give "owner-repo"; anything else falls back to the last
    /// path segment.
    pub fn label(&self) -> String {
        let raw = match self.github_slug() {
            Some((owner, repo)) => format!("{}-{}", owner, repo),
            None => self
                .url
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(|s| s.trim_end_matches(".git").to_string())
                .unwrap_or_default(),
        };

        let cleaned: String = raw
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();

        if cleaned.is_empty() {
            "repository".to_string()
        } else {
            cleaned
        }
    }
}

impl fmt::Display for RepositoryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_url() {
        let url = RepositoryUrl::parse("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(
            url.github_slug(),
            Some(("rust-lang".to_string(), "rust".to_string()))
        );
    }

    #[test]
    fn test_parse_github_url_with_git() {
        let url = RepositoryUrl::parse("https://github.com/user/repo.git").unwrap();
        assert_eq!(url.github_slug(), Some(("user".to_string(), "repo".to_string())));
        assert_eq!(url.label(), "user-repo");
    }

    #[test]
    fn test_non_github_has_no_slug() {
        let url = RepositoryUrl::parse("https://gitlab.com/user/repo").unwrap();
        assert!(url.github_slug().is_none());
        assert_eq!(url.label(), "repo");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let url = RepositoryUrl::parse("  https://github.com/a/b \n").unwrap();
        assert_eq!(url.as_str(), "https://github.com/a/b");
    }

    #[test]
    fn test_missing_scheme_is_rejected() {
        let result = RepositoryUrl::parse("github.com/user/repo");
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_unsupported_scheme_is_rejected() {
        let result = RepositoryUrl::parse("ftp://example.com/repo");
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_empty_and_pathless_urls_are_rejected() {
        assert!(RepositoryUrl::parse("").is_err());
        assert!(RepositoryUrl::parse("https://github.com/").is_err());
    }

    #[test]
    fn test_file_urls_are_allowed() {
        let url = RepositoryUrl::parse("file:///tmp/fixture-repo").unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(url.label(), "fixture-repo");
    }
}
