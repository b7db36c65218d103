//! Writes fetched files into place.

use crate::fetcher::FetchedFile;
use crate::utils::errors::UpdateError;
use crate::Result;

/// Write every fetched file to its destination, creating parent
/// directories as needed.
///
/// Writes are per-file, not transactional; callers must only pass a
/// batch in which every required fetch succeeded.
pub async fn install(files: &[FetchedFile]) -> Result<()> {
    for file in files {
        if let Some(parent) = file.destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| UpdateError::Write {
                    path: parent.display().to_string(),
                    err,
                })?;
        }
        tokio::fs::write(&file.destination, &file.data)
            .await
            .map_err(|err| UpdateError::Write {
                path: file.destination.display().to_string(),
                err,
            })?;
        tracing::debug!(
            "Installed {} ({} bytes)",
            file.destination.display(),
            file.data.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_files_and_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let files = vec![
            FetchedFile {
                destination: tmp.path().join("a.txt"),
                data: b"hello".to_vec(),
            },
            FetchedFile {
                destination: tmp.path().join("nested/deep/b.txt"),
                data: b"world".to_vec(),
            },
        ];

        install(&files).await.unwrap();

        assert_eq!(std::fs::read(tmp.path().join("a.txt")).unwrap(), b"hello");
        assert_eq!(
            std::fs::read(tmp.path().join("nested/deep/b.txt")).unwrap(),
            b"world"
        );
    }

    #[tokio::test]
    async fn write_failure_is_reported_with_path() {
        let tmp = TempDir::new().unwrap();
        // Destination parent is a regular file, so create_dir_all fails.
        std::fs::write(tmp.path().join("blocker"), b"x").unwrap();
        let files = vec![FetchedFile {
            destination: tmp.path().join("blocker/c.txt"),
            data: b"data".to_vec(),
        }];

        let err = install(&files).await.unwrap_err();
        assert!(matches!(err, UpdateError::Write { .. }));
    }
}
