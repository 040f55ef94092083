//! # Notification Subscriber
//!
//! A subscription reads the bus broadcast channel and hands over the
//! notifications its filter accepts, optionally skipping repeats.

use crate::dedup::DeliveryDeduplicator;
use crate::events::{EventFilter, Notification};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was closed.
    #[error("Event bus closed")]
    Closed,
}

/// Receiving end of the bus for one subscriber.
pub struct Subscription {
    receiver: broadcast::Receiver<Notification>,
    filter: EventFilter,
    dedup: Option<DeliveryDeduplicator>,
}

fn accept(
    filter: &EventFilter,
    dedup: Option<&mut DeliveryDeduplicator>,
    notification: &Notification,
) -> bool {
    if !filter.matches(notification) {
        return false;
    }
    let Some(dedup) = dedup else {
        return true;
    };
    match dedup.check_and_record(notification) {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Duplicate delivery skipped");
            false
        }
    }
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<Notification>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            dedup: None,
        }
    }

    /// Skip notifications already delivered to this subscription.
    #[must_use]
    pub fn deduplicated(mut self, capacity: usize) -> Self {
        self.dedup = Some(DeliveryDeduplicator::with_capacity(capacity));
        self
    }

    /// Next accepted notification, or `None` once the bus is dropped.
    ///
    /// A lagging subscriber loses the overwritten notifications and resumes
    /// with the oldest one still buffered.
    pub async fn recv(&mut self) -> Option<Notification> {
        loop {
            let notification = match self.receiver.recv().await {
                Ok(n) => n,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged");
                    continue;
                }
            };
            if accept(&self.filter, self.dedup.as_mut(), &notification) {
                return Some(notification);
            }
        }
    }

    /// Next accepted notification if one is already buffered.
    ///
    /// # Errors
    ///
    /// - `SubscriptionError::Closed` - the bus was dropped
    pub fn try_recv(&mut self) -> Result<Option<Notification>, SubscriptionError> {
        loop {
            let notification = match self.receiver.try_recv() {
                Ok(n) => n,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };
            if accept(&self.filter, self.dedup.as_mut(), &notification) {
                return Ok(Some(notification));
            }
        }
    }

    /// Filter of this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Turn the subscription into a stream of accepted notifications.
    ///
    /// The stream ends when the bus is dropped.
    pub fn into_stream(self) -> impl Stream<Item = Notification> + Send + Unpin {
        let Self {
            receiver,
            filter,
            mut dedup,
        } = self;
        BroadcastStream::new(receiver).filter_map(move |item| match item {
            Ok(n) => accept(&filter, dedup.as_mut(), &n).then_some(n),
            Err(e) => {
                debug!(error = %e, "Stream lagged");
                None
            }
        })
    }
}
