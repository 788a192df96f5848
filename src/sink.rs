// sink.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Output sink with bounded subscriber queues
use crate::error::{Error, Result};
use std::io::{self, Write};
use tokio::sync::{broadcast, mpsc};

/// Behavior when a subscriber queue is full
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backpressure {
    /// Flushing blocks until the subscriber has room
    #[default]
    Block,
    /// The oldest queued chunk is discarded
    DropOldest,
}

/// Sending half of a subscriber queue
enum Sender {
    Block(mpsc::Sender<Vec<u8>>),
    DropOldest(broadcast::Sender<Vec<u8>>),
}

/// Receiving half of a subscriber queue
enum Receiver {
    Block(mpsc::Receiver<Vec<u8>>),
    DropOldest(broadcast::Receiver<Vec<u8>>),
}

/// Subscription to a [Sink]'s output.
///
/// Each item is one flushed chunk, in output order.  Iteration blocks until
/// a chunk is available, and ends after the sink is closed.  Do not iterate
/// from within an async runtime.
///
/// [Sink]: struct.Sink.html
pub struct Subscription {
    rx: Receiver,
}

/// Append-only byte sink
///
/// Bytes accumulate until [flush] hands them to every registered
/// subscriber.  Without subscribers, they remain available through
/// [as_bytes].
///
/// [flush]: struct.Sink.html#method.flush
/// [as_bytes]: struct.Sink.html#method.as_bytes
#[derive(Default)]
pub struct Sink {
    /// Bytes not yet flushed
    pending: Vec<u8>,
    /// Subscriber queues
    subscribers: Vec<Sender>,
    /// End of stream signaled
    closed: bool,
}

impl Sender {
    /// Send a chunk, returning `false` if the subscription was dropped
    fn send(&self, chunk: Vec<u8>) -> bool {
        match self {
            Sender::Block(tx) => tx.blocking_send(chunk).is_ok(),
            Sender::DropOldest(tx) => tx.send(chunk).is_ok(),
        }
    }

    /// Check whether the subscription was dropped
    fn is_closed(&self) -> bool {
        match self {
            Sender::Block(tx) => tx.is_closed(),
            Sender::DropOldest(tx) => tx.receiver_count() == 0,
        }
    }
}

impl Iterator for Subscription {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.rx {
            Receiver::Block(rx) => rx.blocking_recv().map(Ok),
            Receiver::DropOldest(rx) => match rx.blocking_recv() {
                Ok(chunk) => Some(Ok(chunk)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("subscriber lagged: {} chunk(s) dropped", n);
                    Some(Err(Error::SubscriberLagged(n)))
                }
                Err(broadcast::error::RecvError::Closed) => None,
            },
        }
    }
}

impl Subscription {
    /// Get the next chunk without blocking.
    ///
    /// Returns `None` when no chunk is ready (or the stream has ended).
    pub fn try_next(&mut self) -> Option<Result<Vec<u8>>> {
        match &mut self.rx {
            Receiver::Block(rx) => rx.try_recv().ok().map(Ok),
            Receiver::DropOldest(rx) => match rx.try_recv() {
                Ok(chunk) => Some(Ok(chunk)),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    Some(Err(Error::SubscriberLagged(n)))
                }
                Err(_) => None,
            },
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Sink::flush(self);
        Ok(())
    }
}

impl Sink {
    /// Create a new sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber with a queue of `capacity` chunks.
    ///
    /// Only bytes flushed after this call are received.
    pub fn subscribe(
        &mut self,
        capacity: usize,
        backpressure: Backpressure,
    ) -> Subscription {
        let capacity = capacity.max(1);
        let (tx, rx) = match backpressure {
            Backpressure::Block => {
                let (tx, rx) = mpsc::channel(capacity);
                (Sender::Block(tx), Receiver::Block(rx))
            }
            Backpressure::DropOldest => {
                let (tx, rx) = broadcast::channel(capacity);
                (Sender::DropOldest(tx), Receiver::DropOldest(rx))
            }
        };
        if !self.closed {
            self.subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Get the number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Get the bytes not yet flushed
    pub fn as_bytes(&self) -> &[u8] {
        &self.pending
    }

    /// Consume the sink, returning the bytes not yet flushed
    pub fn into_bytes(self) -> Vec<u8> {
        self.pending
    }

    /// Check whether end of stream was signaled
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Hand pending bytes to all subscribers.
    ///
    /// Subscribers whose subscription was dropped are removed.  Does
    /// nothing if no subscribers remain or no bytes are pending; bytes
    /// which no subscriber received stay pending.
    pub fn flush(&mut self) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| !tx.is_closed());
        if self.subscribers.is_empty() || self.pending.is_empty() {
            self.log_dropped(before);
            return;
        }
        let chunk = std::mem::take(&mut self.pending);
        self.subscribers.retain(|tx| tx.send(chunk.clone()));
        self.log_dropped(before);
        if self.subscribers.is_empty() {
            self.pending = chunk;
            return;
        }
        debug!(
            "flushed {} bytes to {} subscriber(s)",
            chunk.len(),
            self.subscribers.len()
        );
    }

    /// Log subscribers removed since there were `before`
    fn log_dropped(&self, before: usize) {
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            warn!("removed {} dropped subscriber(s)", dropped);
        }
    }

    /// Flush, then signal end of stream to all subscribers
    pub fn close(&mut self) {
        self.flush();
        self.subscribers.clear();
        self.closed = true;
    }
}
