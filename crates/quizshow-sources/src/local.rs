//! Question banks in a local folder.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use quizshow_core::parser::decode;
use quizshow_core::traits::{BankEntry, BankSource};

use crate::error::{check_bank_name, SourceError};

/// A folder of `.txt` bank files.
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BankSource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn list(&self) -> anyhow::Result<Vec<BankEntry>> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("failed to read directory: {}", self.root.display()))?;

        let mut banks = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let metadata = entry.metadata().await?;
            if metadata.is_file() && name.ends_with(".txt") {
                banks.push(BankEntry {
                    name,
                    size: Some(metadata.len()),
                });
            }
        }
        banks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(banks)
    }

    async fn fetch(&self, name: &str) -> anyhow::Result<String> {
        check_bank_name(name)?;
        let path = self.root.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(path.display().to_string()).into());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to read bank: {}", path.display())));
            }
        };
        Ok(decode(&bytes)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_sorted_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "x").unwrap();
        std::fs::write(dir.path().join("a.txt"), "xyz").unwrap();
        std::fs::write(dir.path().join("c.md"), "x").unwrap();
        std::fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let banks = LocalSource::new(dir.path()).list().await.unwrap();
        assert_eq!(
            banks,
            vec![
                BankEntry {
                    name: "a.txt".into(),
                    size: Some(3)
                },
                BankEntry {
                    name: "b.txt".into(),
                    size: Some(1)
                },
            ]
        );
    }

    #[tokio::test]
    async fn fetch_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quiz.txt"), "1. Q").unwrap();
        let src = LocalSource::new(dir.path());
        assert_eq!(src.fetch("quiz.txt").await.unwrap(), "1. Q");
    }

    #[tokio::test]
    async fn fetch_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let src = LocalSource::new(dir.path());

        let err = src.fetch("missing.txt").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::NotFound(_))
        ));

        let err = src.fetch("../etc/passwd").await.unwrap_err();
        assert!(err.to_string().contains("invalid bank name"));
    }

    #[tokio::test]
    async fn fetch_rejects_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("latin1.txt"), b"1. Caf\xe9").unwrap();
        let err = LocalSource::new(dir.path())
            .fetch("latin1.txt")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[tokio::test]
    async fn list_missing_directory_fails() {
        let src = LocalSource::new("/no/such/quizshow/dir");
        assert!(src.list().await.is_err());
    }
}
