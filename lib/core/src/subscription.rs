//! Cancellable handles for live, push-based updates.
//!
//! A backend hands out a [`Subscription`] and keeps the paired
//! [`Publisher`]. Delivery stops as soon as the subscription is closed or
//! dropped; the publisher notices on its next send and can be pruned.
//! Subscriptions are not restartable: a fresh one must be requested after
//! teardown.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Creates a connected publisher/subscription pair.
#[must_use]
pub fn channel<T>() -> (Publisher<T>, Subscription<T>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        Publisher { sender },
        Subscription {
            receiver,
            closed: false,
        },
    )
}

/// Producer side of a subscription.
#[derive(Debug)]
pub struct Publisher<T> {
    sender: mpsc::UnboundedSender<T>,
}

impl<T> Publisher<T> {
    /// Delivers an update.
    ///
    /// Returns false if the subscriber has gone away; the publisher should
    /// then be discarded.
    pub fn publish(&self, update: T) -> bool {
        self.sender.send(update).is_ok()
    }

    /// Returns true if the subscriber has closed or dropped its handle.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Consumer side of a live query or event feed.
///
/// Yields updates as a [`Stream`] until closed. The stream never ends on its
/// own while the producer is alive.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
    closed: bool,
}

impl<T> Subscription<T> {
    /// Stops delivery. Updates already buffered are discarded.
    pub fn close(&mut self) {
        if !self.closed {
            self.receiver.close();
            self.closed = true;
        }
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Waits for the next update.
    ///
    /// Returns `None` once closed or once the producer has gone away.
    pub async fn next_update(&mut self) -> Option<T> {
        if self.closed {
            return None;
        }
        self.receiver.recv().await
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        if this.closed {
            return Poll::Ready(None);
        }
        this.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn delivers_in_publish_order() {
        let (publisher, mut subscription) = channel();
        assert!(publisher.publish(1));
        assert!(publisher.publish(2));

        assert_eq!(subscription.next().await, Some(1));
        assert_eq!(subscription.next_update().await, Some(2));
    }

    #[tokio::test]
    async fn close_stops_delivery_and_discards_buffer() {
        let (publisher, mut subscription) = channel();
        publisher.publish("queued");

        subscription.close();

        assert!(subscription.is_closed());
        assert!(publisher.is_closed());
        assert!(!publisher.publish("late"));
        assert_eq!(subscription.next().await, None);
    }

    #[test]
    fn drop_is_observed_by_publisher() {
        let (publisher, subscription) = channel::<u8>();
        drop(subscription);
        assert!(publisher.is_closed());
        assert!(!publisher.publish(7));
    }

    #[tokio::test]
    async fn ends_when_publisher_is_gone() {
        let (publisher, mut subscription) = channel::<u8>();
        drop(publisher);
        assert_eq!(subscription.next_update().await, None);
    }
}
