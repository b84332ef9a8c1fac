// ── Dataset subscriptions ──
//
// Presentation code follows the synchronizer through a `DatasetStream`:
// a point-in-time snapshot plus change notification, convertible to a
// `Stream`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::sync::Dataset;

/// A subscription to the synchronizer's dataset.
pub struct DatasetStream {
    current: Arc<Dataset>,
    receiver: watch::Receiver<Arc<Dataset>>,
}

impl DatasetStream {
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<Dataset>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<Dataset> {
        &self.current
    }

    /// The latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> Arc<Dataset> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the synchronizer is gone.
    pub async fn changed(&mut self) -> Option<Arc<Dataset>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` yielding the current snapshot first, then
    /// one item per change.
    pub fn into_stream(self) -> DatasetWatchStream {
        DatasetWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct DatasetWatchStream {
    inner: WatchStream<Arc<Dataset>>,
}

impl Stream for DatasetWatchStream {
    type Item = Arc<Dataset>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
