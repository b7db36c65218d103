//! Bounded-parallel retrieval, verification, and rewriting.
//!
//! Each task owns its buffer exclusively until it is handed to the
//! installer; there is no shared mutable state across fetches.

use crate::checksum;
use crate::planner::{FetchTask, TaskKind};
use crate::rewrite::{self, PathRewriter};
use crate::transport::Transport;
use crate::utils::errors::UpdateError;
use crate::Result;
use futures_util::{stream, StreamExt};
use std::path::PathBuf;
use url::Url;

/// Cap on simultaneous in-flight requests.
pub const MAX_IN_FLIGHT: usize = 5;

/// A fully retrieved, verified, rewritten file, ready to install.
#[derive(Debug)]
pub struct FetchedFile {
    pub destination: PathBuf,
    pub data: Vec<u8>,
}

/// Fetch every task with at most [`MAX_IN_FLIGHT`] requests in flight.
///
/// The first failing task fails the whole batch and cancels what is
/// still pending; nothing is returned for installation unless every
/// required file succeeded.
pub async fn fetch_all<T: Transport>(
    transport: &T,
    base_url: &Url,
    rewriter: &PathRewriter,
    tasks: Vec<FetchTask>,
) -> Result<Vec<FetchedFile>> {
    let count = tasks.len();
    let mut in_flight = stream::iter(tasks)
        .map(|task| fetch_one(transport, base_url, rewriter, task))
        .buffer_unordered(MAX_IN_FLIGHT);

    let mut files = Vec::with_capacity(count);
    while let Some(result) = in_flight.next().await {
        files.push(result?);
    }
    Ok(files)
}

async fn fetch_one<T: Transport>(
    transport: &T,
    base_url: &Url,
    rewriter: &PathRewriter,
    task: FetchTask,
) -> Result<FetchedFile> {
    // Asset tasks carry an absolute URL; bundle tasks resolve against
    // the manifest's base URL.
    let url = match task.kind {
        TaskKind::Asset => task.source.clone(),
        TaskKind::Bundle => base_url.join(&task.source)?.to_string(),
    };

    tracing::debug!("Fetching {}", url);
    let response = transport.get(&url).await?;
    if !response.is_success() {
        return Err(UpdateError::FileFetch {
            url,
            status: response.status,
        });
    }

    let mut data = response.body.to_vec();

    if let Some(expected) = &task.checksum {
        let actual = checksum::md5_hex(&data);
        if actual != expected.to_ascii_lowercase() {
            return Err(UpdateError::Integrity {
                file: task.source.clone(),
                expected: expected.clone(),
                actual,
            });
        }
    }

    if rewrite::is_rewritable(&task.source) {
        let text =
            String::from_utf8(data).map_err(|_| UpdateError::InvalidText(task.source.clone()))?;
        data = rewriter.rewrite(&text).into_bytes();
    }

    Ok(FetchedFile {
        destination: task.destination,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::StaticTransport;
    use std::path::Path;

    fn base() -> Url {
        Url::parse("https://ota.test/").unwrap()
    }

    fn bundle_task(source: &str, checksum: Option<&str>) -> FetchTask {
        FetchTask {
            source: source.to_string(),
            destination: Path::new("/tmp/www").join(source.trim_start_matches('/')),
            checksum: checksum.map(str::to_string),
            kind: TaskKind::Bundle,
        }
    }

    #[tokio::test]
    async fn fetches_and_verifies_bundle_file() {
        let transport = StaticTransport::new().serve("https://ota.test/a.txt", "hello");
        let rewriter = PathRewriter::new(&[]);
        let tasks = vec![bundle_task("/a.txt", Some("5d41402abc4b2a76b9719d911017c592"))];

        let files = fetch_all(&transport, &base(), &rewriter, tasks).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].data, b"hello");
    }

    #[tokio::test]
    async fn checksum_mismatch_reports_both_digests() {
        let transport = StaticTransport::new().serve("https://ota.test/a.txt", "goodbye");
        let rewriter = PathRewriter::new(&[]);
        let expected = "5d41402abc4b2a76b9719d911017c592";
        let tasks = vec![bundle_task("/a.txt", Some(expected))];

        let err = fetch_all(&transport, &base(), &rewriter, tasks)
            .await
            .unwrap_err();
        match err {
            UpdateError::Integrity {
                file,
                expected: e,
                actual,
            } => {
                assert_eq!(file, "/a.txt");
                assert_eq!(e, expected);
                assert_eq!(actual, checksum::md5_hex(b"goodbye"));
            }
            other => panic!("expected Integrity error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_success_status_fails_the_batch() {
        let transport = StaticTransport::new()
            .serve("https://ota.test/a.txt", "hello")
            .serve_status("https://ota.test/missing.txt", 404);
        let rewriter = PathRewriter::new(&[]);
        let tasks = vec![
            bundle_task("/a.txt", Some("5d41402abc4b2a76b9719d911017c592")),
            bundle_task("/missing.txt", None),
        ];

        let err = fetch_all(&transport, &base(), &rewriter, tasks)
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateError::FileFetch { status: 404, .. }));
    }

    #[tokio::test]
    async fn rewrites_textual_sources_after_verification() {
        let body = "load('/js/a');";
        let transport = StaticTransport::new().serve("https://ota.test/app.js", body);
        let rewriter = PathRewriter::new(&["js".to_string()]);
        let tasks = vec![bundle_task(
            "/app.js",
            Some(&checksum::md5_hex(body.as_bytes())),
        )];

        let files = fetch_all(&transport, &base(), &rewriter, tasks).await.unwrap();
        assert_eq!(files[0].data, b"load('js/a');");
    }

    #[tokio::test]
    async fn binary_content_passes_through_untouched() {
        let body: Vec<u8> = vec![0xff, 0x00, 0xfe, 0x42];
        let transport = StaticTransport::new().serve("https://ota.test/logo.png", body.clone());
        let rewriter = PathRewriter::new(&["js".to_string()]);
        let tasks = vec![bundle_task("/logo.png", Some(&checksum::md5_hex(&body)))];

        let files = fetch_all(&transport, &base(), &rewriter, tasks).await.unwrap();
        assert_eq!(files[0].data, body);
    }

    #[tokio::test]
    async fn asset_tasks_use_their_url_verbatim() {
        let transport =
            StaticTransport::new().serve("https://cdn.example.com/logo.png", "pixels");
        let rewriter = PathRewriter::new(&[]);
        let tasks = vec![FetchTask {
            source: "https://cdn.example.com/logo.png".to_string(),
            destination: "/tmp/cache/ABC.persist".into(),
            checksum: None,
            kind: TaskKind::Asset,
        }];

        let files = fetch_all(&transport, &base(), &rewriter, tasks).await.unwrap();
        assert_eq!(files[0].data, b"pixels");
    }

    #[tokio::test]
    async fn at_most_five_requests_in_flight() {
        let mut transport = StaticTransport::new();
        let mut tasks = Vec::new();
        for i in 0..12 {
            let name = format!("f{}.bin", i);
            transport = transport.serve(&format!("https://ota.test/{}", name), "x");
            tasks.push(bundle_task(&format!("/{}", name), None));
        }
        let rewriter = PathRewriter::new(&[]);

        let files = fetch_all(&transport, &base(), &rewriter, tasks).await.unwrap();
        assert_eq!(files.len(), 12);
        assert_eq!(transport.peak_concurrency(), MAX_IN_FLIGHT);
    }
}
