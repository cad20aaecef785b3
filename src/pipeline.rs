// src/pipeline.rs
// =============================================================================
// Wires the pieces together:
//
//   URL -> Workspace::prepare -> fetch -> locate README -> parse -> consumer
//                                                              -> cleanup
//
// The pipeline owns the workspace for the whole run. The consumer (a metric
// analyzer, the CLI report, a test) sees a borrowed RepositorySnapshot and
// returns whatever it computed; the workspace is removed before run()
// returns, whether it succeeded or not.
//
// Only URL, workspace and fetch problems are errors. A missing README comes
// through as `readme: None`.
// =============================================================================

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::fetch::{fetch, RepositoryUrl};
use crate::readme::{parse, Document, DocumentStats, Readme, ReadmeLocator};
use crate::workspace::Workspace;

/// What downstream analyzers get to look at
#[derive(Debug)]
pub struct RepositorySnapshot<'a> {
    pub url: &'a RepositoryUrl,
    /// Root of the checked-out working tree
    pub root: &'a Path,
    /// None when no README candidate exists (or none could be read)
    pub readme: Option<Readme>,
    /// Parsed README; present exactly when `readme` is
    pub document: Option<Document>,
}

impl RepositorySnapshot<'_> {
    pub fn readme_text(&self) -> Option<&str> {
        self.readme.as_ref().map(|readme| readme.text.as_str())
    }

    pub fn stats(&self) -> Option<DocumentStats> {
        self.document.as_ref().map(DocumentStats::from_document)
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    locator: ReadmeLocator,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let locator = ReadmeLocator::with_candidates(config.readme_names.iter().cloned());
        Self { config, locator }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // Runs the whole pipeline with `workspace_path` as the clone target
    //
    // Parameters:
    //   url: repository URL
    //   workspace_path: directory to clone into; cleared first, removed after
    //   consume: called with the snapshot once the README has been parsed
    //
    // Returns: whatever `consume` returned, or the error that stopped the run
    pub async fn run<T, F>(
        &self,
        url: &str,
        workspace_path: impl Into<PathBuf>,
        consume: F,
    ) -> Result<T>
    where
        F: FnOnce(&RepositorySnapshot<'_>) -> T,
    {
        let url = RepositoryUrl::parse(url)?;
        let workspace = Workspace::prepare(workspace_path)?;
        self.run_in(&url, workspace, consume).await
    }

    // Same as run(), with a fresh directory under the system temp dir
    pub async fn run_in_temp<T, F>(&self, url: &str, consume: F) -> Result<T>
    where
        F: FnOnce(&RepositorySnapshot<'_>) -> T,
    {
        let url = RepositoryUrl::parse(url)?;
        let workspace = Workspace::temporary(&url.label())?;
        self.run_in(&url, workspace, consume).await
    }

    async fn run_in<T, F>(
        &self,
        url: &RepositoryUrl,
        workspace: Workspace,
        consume: F,
    ) -> Result<T>
    where
        F: FnOnce(&RepositorySnapshot<'_>) -> T,
    {
        // On failure `workspace` is dropped here, which removes the directory
        fetch(url, workspace.path(), &self.config.fetch).await?;

        let output = {
            let snapshot = self.inspect(url, workspace.path());
            consume(&snapshot)
        };

        if let Err(e) = workspace.cleanup() {
            warn!(error = %e, "failed to clean up workspace");
        }
        Ok(output)
    }

    // Locates and parses the README of an already checked-out tree
    pub fn inspect<'a>(
        &self,
        url: &'a RepositoryUrl,
        root: &'a Path,
    ) -> RepositorySnapshot<'a> {
        let readme = self.locator.locate(root);
        let document = readme.as_ref().map(|readme| parse(&readme.text));

        match (&readme, &document) {
            (Some(readme), Some(document)) => info!(
                file = %readme.file_name,
                top_level_nodes = document.len(),
                "parsed README"
            ),
            _ => info!(url = %url, "repository has no README"),
        }

        RepositorySnapshot {
            url,
            root,
            readme,
            document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchOptions;
    use crate::error::Error;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_config_is_kept() {
        let config = PipelineConfig {
            fetch: FetchOptions::default().with_timeout(Duration::from_secs(7)),
            readme_names: vec!["DOCS.md".to_string()],
        };

        let pipeline = Pipeline::new(config);
        assert_eq!(pipeline.config().fetch.timeout, Duration::from_secs(7));
        assert_eq!(pipeline.config().readme_names, vec!["DOCS.md".to_string()]);
        assert_eq!(
            Pipeline::default().config().readme_names.len(),
            crate::config::DEFAULT_README_NAMES.len()
        );
    }

    #[test]
    fn test_inspect_with_readme() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "# Title\n\nBody text.").unwrap();
        let url = RepositoryUrl::parse("https://github.com/user/repo").unwrap();

        let snapshot = Pipeline::default().inspect(&url, dir.path());
        assert_eq!(snapshot.readme_text(), Some("# Title\n\nBody text."));
        assert_eq!(snapshot.document.as_ref().map(Document::len), Some(2));
        assert_eq!(snapshot.stats().map(|s| s.sections), Some(1));
    }

    #[test]
    fn test_inspect_without_readme() {
        let dir = tempdir().unwrap();
        let url = RepositoryUrl::parse("https://github.com/user/repo").unwrap();

        let snapshot = Pipeline::default().inspect(&url, dir.path());
        assert!(snapshot.readme.is_none());
        assert!(snapshot.document.is_none());
        assert!(snapshot.stats().is_none());
    }

    #[test]
    fn test_custom_readme_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "default").unwrap();
        fs::write(dir.path().join("DOCS.md"), "custom").unwrap();
        let url = RepositoryUrl::parse("https://github.com/user/repo").unwrap();

        let config = PipelineConfig {
            readme_names: vec!["DOCS.md".to_string()],
            ..PipelineConfig::default()
        };
        let snapshot = Pipeline::new(config).inspect(&url, dir.path());
        assert_eq!(snapshot.readme_text(), Some("custom"));
    }

    #[tokio::test]
    async fn test_invalid_url_touches_nothing() {
        let root = tempdir().unwrap();
        let path = root.path().join("ws");

        let result = Pipeline::default().run("not a url", &path, |_| ()).await;
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_fetch_removes_workspace() {
        let root = tempdir().unwrap();
        let path = root.path().join("ws");
        let mut config = PipelineConfig::default();
        config.fetch.git_program = PathBuf::from("/definitely/not/a/real/git");

        let result = Pipeline::new(config)
            .run("https://github.com/user/repo", &path, |_| ())
            .await;
        assert!(matches!(result, Err(Error::GitUnavailable { .. })));
        assert!(!path.exists());
    }
}
