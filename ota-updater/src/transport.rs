//! HTTP transport boundary.
//!
//! The fetch pipeline only needs "the bytes at this URL"; keeping
//! reqwest behind a trait lets tests substitute an in-memory double.

use crate::Result;
use bytes::Bytes;
use std::future::Future;

/// Response from a remote fetch: status code plus fully buffered body.
///
/// Whole-file buffering is deliberate; memory is bounded by the fetch
/// concurrency limit times the largest file.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    fn get(&self, url: &str) -> impl Future<Output = Result<RemoteResponse>> + Send;
}

/// reqwest-backed transport used by the real updater.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RemoteResponse> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        Ok(RemoteResponse { status, body })
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory transport double for pipeline and fetcher tests.

    use super::{RemoteResponse, Transport};
    use crate::Result;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Serves canned responses by exact URL and records the peak
    /// number of concurrently in-flight requests.
    pub struct StaticTransport {
        responses: HashMap<String, (u16, Vec<u8>)>,
        in_flight: Arc<AtomicUsize>,
        pub max_in_flight: Arc<AtomicUsize>,
    }

    impl StaticTransport {
        pub fn new() -> Self {
            Self {
                responses: HashMap::new(),
                in_flight: Arc::new(AtomicUsize::new(0)),
                max_in_flight: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn serve(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), (200, body.into()));
            self
        }

        pub fn serve_status(mut self, url: &str, status: u16) -> Self {
            self.responses.insert(url.to_string(), (status, Vec::new()));
            self
        }

        pub fn peak_concurrency(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    impl Transport for StaticTransport {
        async fn get(&self, url: &str) -> Result<RemoteResponse> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            // Keep the request in flight long enough for the peak
            // counter to observe overlapping fetches.
            tokio::time::sleep(Duration::from_millis(10)).await;

            let response = match self.responses.get(url) {
                Some((status, body)) => RemoteResponse {
                    status: *status,
                    body: Bytes::from(body.clone()),
                },
                None => RemoteResponse {
                    status: 404,
                    body: Bytes::new(),
                },
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(response)
        }
    }
}
