//! Change notification and the write bracket
//!
//! Writes are grouped with [`ChangeNotifier::begin_trans`] /
//! [`ChangeNotifier::end_trans`]. Brackets nest; only closing the outermost
//! one emits a [`ChangeEvent`], so any number of grouped writes produce a
//! single notification. The bracket does not touch the engine's own
//! transactions: every statement still commits on its own.
//!
//! Subscribers are either callbacks or channel receivers. The event carries
//! a sequence number and a flag that flips on every emission, so an observer
//! polling only the flag still sees "something changed".

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Emitted when the outermost write bracket closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Number of notifications emitted by this store so far, starting at 1
    pub sequence: u64,
    /// Current value of the toggled change flag
    pub flag: bool,
}

/// Callback invoked on every change notification
pub type ChangeCallback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
enum Subscriber {
    Callback(ChangeCallback),
    Channel(Sender<ChangeEvent>),
}

#[derive(Default)]
pub struct ChangeNotifier {
    depth: AtomicUsize,
    sequence: AtomicU64,
    flag: AtomicBool,
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Subscriber)>> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn register(&self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.subscribers().push((id, subscriber));
        id
    }

    pub fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId {
        self.register(Subscriber::Callback(callback))
    }

    /// Subscribe through a channel; the receiver sees one event per notification
    pub fn subscribe_channel(&self) -> (SubscriptionId, Receiver<ChangeEvent>) {
        let (tx, rx) = mpsc::channel();
        (self.register(Subscriber::Channel(tx)), rx)
    }

    /// Returns `false` when the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    /// Open a write bracket
    pub fn begin_trans(&self) {
        self.depth.fetch_add(1, Ordering::SeqCst);
    }

    /// Close a write bracket, notifying subscribers if it was the outermost
    pub fn end_trans(&self) {
        let closed = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));

        match closed {
            Ok(1) => self.emit(),
            Ok(_) => {}
            Err(_) => warn!("end_trans called without a matching begin_trans"),
        }
    }

    /// Current bracket nesting depth
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Number of notifications emitted so far
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Current value of the toggled change flag
    pub fn flag(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn emit(&self) {
        let flag = !self.flag.fetch_xor(true, Ordering::SeqCst);
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let event = ChangeEvent { sequence, flag };
        debug!("change notification #{} (flag={})", sequence, flag);

        // callbacks run outside the lock so they may (un)subscribe
        let snapshot: Vec<(SubscriptionId, Subscriber)> = self.subscribers().clone();
        let mut closed = Vec::new();

        for (id, subscriber) in snapshot {
            match subscriber {
                Subscriber::Callback(callback) => callback(&event),
                Subscriber::Channel(tx) => {
                    if tx.send(event).is_err() {
                        warn!("change subscriber {:?} dropped its receiver, removing", id);
                        closed.push(id);
                    }
                }
            }
        }

        if !closed.is_empty() {
            self.subscribers().retain(|(id, _)| !closed.contains(id));
        }
    }
}

/// RAII write bracket: opened on creation, closed on drop
pub struct ChangeBatch<'a> {
    notifier: &'a ChangeNotifier,
}

impl<'a> ChangeBatch<'a> {
    pub fn new(notifier: &'a ChangeNotifier) -> Self {
        notifier.begin_trans();
        Self { notifier }
    }
}

impl Drop for ChangeBatch<'_> {
    fn drop(&mut self) {
        self.notifier.end_trans();
    }
}
