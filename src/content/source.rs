//! Disk access behind a trait so the fetcher can be exercised without a
//! filesystem.

use std::io;

use async_trait::async_trait;

#[async_trait]
pub trait TextSource: Send + Sync {
    /// Reads a UTF-8 text.
    async fn read_text(&self, path: &str) -> io::Result<String>;

    /// Names of the entries of `dir`.
    async fn list_dir(&self, dir: &str) -> io::Result<Vec<String>>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

#[async_trait]
impl TextSource for FsSource {
    async fn read_text(&self, path: &str) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn list_dir(&self, dir: &str) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_source_reads_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "# b").unwrap();
        std::fs::write(dir.path().join("a.md"), "# a").unwrap();

        let source = FsSource;
        let root = dir.path().to_str().unwrap();
        assert_eq!(
            source.list_dir(root).await.unwrap(),
            vec!["a.md".to_string(), "b.md".to_string()]
        );
        let text = source
            .read_text(dir.path().join("a.md").to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(text, "# a");
    }

    #[tokio::test]
    async fn test_fs_source_missing_file() {
        let err = FsSource.read_text("/definitely/not/here.md").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
