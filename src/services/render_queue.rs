//! Background render worker with latest-wins coalescing.
//!
//! Parameter changes are submitted without blocking. The worker waits for a
//! quiet period (the debounce restarts on every submission), then renders the
//! newest parameters on the blocking pool. Submissions that arrive while a
//! render runs collapse into one pending request. A running render is never
//! cancelled; callers compare [`RenderOutcome::id`] against
//! [`RenderQueue::latest_id`] to recognize stale results.

use crate::error::AppError;
use dstretch_core::{Enhancer, ParameterSet, PixelBuffer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// A parameter set tagged with its submission number
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub id: u64,
    pub params: ParameterSet,
}

/// Result of one render
#[derive(Debug)]
pub struct RenderOutcome {
    /// Submission number this render belongs to
    pub id: u64,
    pub params: ParameterSet,
    pub result: Result<PixelBuffer, AppError>,
    /// Wall time spent in the enhancement pipeline
    pub elapsed: Duration,
}

/// Handle to the render worker
pub struct RenderQueue {
    requests: watch::Sender<Option<RenderRequest>>,
    next_id: AtomicU64,
    worker: JoinHandle<()>,
}

impl RenderQueue {
    /// Start a worker rendering `source`. Must be called inside a tokio runtime.
    pub fn spawn(
        source: Arc<PixelBuffer>,
        debounce: Duration,
    ) -> (Self, mpsc::Receiver<RenderOutcome>) {
        let (requests, rx) = watch::channel(None);
        let (outcomes, outcome_rx) = mpsc::channel(4);
        let worker = tokio::spawn(run(rx, source, debounce, outcomes));

        tracing::debug!(debounce_ms = debounce.as_millis() as u64, "Render worker started");
        (
            Self {
                requests,
                next_id: AtomicU64::new(0),
                worker,
            },
            outcome_rx,
        )
    }

    /// Queue a render of `params`, replacing any request not yet started.
    ///
    /// Returns the submission number.
    pub fn submit(&self, params: ParameterSet) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.requests.send_replace(Some(RenderRequest { id, params }));
        tracing::trace!(id, "Render requested");
        id
    }

    /// Number of the most recent submission (0 before the first).
    pub fn latest_id(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Stop accepting requests and wait for the worker to finish.
    ///
    /// A request still pending is rendered (without waiting out the debounce)
    /// before the worker exits and the outcome channel closes.
    pub async fn shutdown(self) {
        let Self {
            requests, worker, ..
        } = self;
        drop(requests);
        if let Err(e) = worker.await {
            tracing::error!(error = %e, "Render worker panicked");
        }
    }
}

async fn run(
    mut requests: watch::Receiver<Option<RenderRequest>>,
    source: Arc<PixelBuffer>,
    debounce: Duration,
    outcomes: mpsc::Sender<RenderOutcome>,
) {
    // changed() still yields a value sent before the sender closed
    while requests.changed().await.is_ok() {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(debounce) => break,
                changed = requests.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let request = requests.borrow_and_update().clone();
        let Some(request) = request else { continue };

        let outcome = render(source.clone(), request).await;
        match &outcome.result {
            Ok(_) => tracing::debug!(
                id = outcome.id,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "Render finished"
            ),
            Err(e) => tracing::warn!(id = outcome.id, error = %e, "Render failed"),
        }
        if outcomes.send(outcome).await.is_err() {
            tracing::debug!("Outcome receiver dropped, stopping render worker");
            break;
        }
    }
}

async fn render(source: Arc<PixelBuffer>, request: RenderRequest) -> RenderOutcome {
    let RenderRequest { id, params } = request;
    let enhancer = Enhancer::new(params.clone());
    let started = Instant::now();

    let result = tokio::task::spawn_blocking(move || enhancer.process(&source))
        .await
        .map_err(|e| AppError::Worker(format!("Render task failed: {e}")))
        .and_then(|r| r.map_err(AppError::from));

    RenderOutcome {
        id,
        params,
        result,
        elapsed: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Arc<PixelBuffer> {
        let pixels: Vec<[u8; 4]> = (0..16u8)
            .map(|i| [i * 12, 200 - i * 9, 60 + i * 5, 255])
            .collect();
        Arc::new(PixelBuffer::from_pixels(4, 4, &pixels).unwrap())
    }

    async fn next(rx: &mut mpsc::Receiver<RenderOutcome>) -> Option<RenderOutcome> {
        tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("timed out waiting for render outcome")
    }

    #[tokio::test]
    async fn test_burst_coalesces_to_latest() {
        let (queue, mut rx) = RenderQueue::spawn(source(), Duration::from_millis(30));
        for contrast in [10.0, 20.0, 30.0, 40.0] {
            queue.submit(ParameterSet::new().contrast(contrast));
        }
        assert_eq!(queue.latest_id(), 4);

        let outcome = next(&mut rx).await.unwrap();
        assert_eq!(outcome.id, 4);
        assert_eq!(outcome.params.contrast, 40.0);
        assert!(outcome.result.is_ok());

        queue.shutdown().await;
        assert!(next(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn test_separate_submissions_each_render() {
        let (queue, mut rx) = RenderQueue::spawn(source(), Duration::from_millis(5));

        let first = queue.submit(ParameterSet::new().brightness(10.0));
        assert_eq!(next(&mut rx).await.unwrap().id, first);

        let second = queue.submit(ParameterSet::new().brightness(-10.0));
        assert_eq!(next(&mut rx).await.unwrap().id, second);

        queue.shutdown().await;
    }

    #[tokio::test]
    async fn test_pending_request_rendered_on_shutdown() {
        let (queue, mut rx) = RenderQueue::spawn(source(), Duration::from_secs(3600));
        let id = queue.submit(ParameterSet::new().dstretch(true));
        queue.shutdown().await;

        let outcome = next(&mut rx).await.unwrap();
        assert_eq!(outcome.id, id);
        assert!(next(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn test_default_params_render_identity() {
        let image = source();
        let (queue, mut rx) = RenderQueue::spawn(image.clone(), Duration::ZERO);
        queue.submit(ParameterSet::default());
        let outcome = next(&mut rx).await.unwrap();
        assert_eq!(outcome.result.unwrap(), *image);
        queue.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_without_requests() {
        let (queue, mut rx) = RenderQueue::spawn(source(), Duration::from_millis(5));
        queue.shutdown().await;
        assert!(next(&mut rx).await.is_none());
    }
}
