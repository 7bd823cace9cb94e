//! Layout trigger channel.
//!
//! For hosts that drive layout from an async task: anything that changes
//! the table sends a trigger, and the layout task waits for the next batch.

use std::collections::BTreeSet;

use tokio::sync::mpsc;

use super::LayoutTrigger;

/// Sender half. Clone-able, can be sent to async tasks.
#[derive(Debug, Clone)]
pub struct LayoutHandle {
    tx: mpsc::Sender<LayoutTrigger>,
}

impl LayoutHandle {
    /// Non-blocking. A full buffer already guarantees a pass, and a dropped
    /// receiver means the grid is gone, so send errors are ignored.
    pub fn notify(&self, trigger: LayoutTrigger) {
        let _ = self.tx.try_send(trigger);
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct LayoutReceiver {
    rx: mpsc::Receiver<LayoutTrigger>,
}

impl LayoutReceiver {
    pub async fn recv(&mut self) -> Option<LayoutTrigger> {
        self.rx.recv().await
    }

    /// Wait for a trigger, then drain everything already queued behind it.
    /// Returns `None` once every handle is dropped.
    pub async fn next_batch(&mut self) -> Option<BTreeSet<LayoutTrigger>> {
        let first = self.rx.recv().await?;
        let mut batch = BTreeSet::from([first]);
        while let Ok(trigger) = self.rx.try_recv() {
            batch.insert(trigger);
        }
        Some(batch)
    }
}

pub fn channel() -> (LayoutHandle, LayoutReceiver) {
    // Small buffer, triggers coalesce anyway
    let (tx, rx) = mpsc::channel(16);
    (LayoutHandle { tx }, LayoutReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_next_batch_coalesces() {
        let (handle, mut receiver) = channel();
        handle.notify(LayoutTrigger::Resize);
        handle.notify(LayoutTrigger::Resize);
        handle.notify(LayoutTrigger::RowsChanged);

        let batch = receiver.next_batch().await.unwrap();
        assert_eq!(
            batch.into_iter().collect::<Vec<_>>(),
            vec![LayoutTrigger::RowsChanged, LayoutTrigger::Resize]
        );
    }

    #[tokio::test]
    async fn test_closed_after_handles_drop() {
        let (handle, mut receiver) = channel();
        let clone = handle.clone();
        clone.notify(LayoutTrigger::Mount);
        drop(handle);
        drop(clone);

        assert_eq!(receiver.recv().await, Some(LayoutTrigger::Mount));
        assert!(receiver.next_batch().await.is_none());
    }

    #[tokio::test]
    async fn test_full_buffer_does_not_block() {
        let (handle, mut receiver) = channel();
        for _ in 0..100 {
            handle.notify(LayoutTrigger::Resize);
        }
        assert_eq!(receiver.next_batch().await.map(|b| b.len()), Some(1));
    }
}
