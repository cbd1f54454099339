//! Single-threaded command dispatch.
//!
//! All commands reach the chart through one queue and are applied one at a
//! time, to completion. Device uploads are the only asynchronous work: each is
//! a single-shot task on a local executor whose completion posts a
//! `SetImage` command to the same queue. There is no ordering between an
//! in-flight upload and other edits to the same cell beyond "last write wins".

use std::future::Future;

use log::debug;
use smol::channel::{unbounded, Receiver, Sender};
use smol::LocalExecutor;

use crate::chart::{Chart, Command, Confirm, Outcome};
use crate::store::KvStore;

pub struct Dispatcher<S> {
    chart: Chart<S>,
    executor: LocalExecutor<'static>,
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl<S: KvStore> Dispatcher<S> {
    pub fn new(chart: Chart<S>) -> Self {
        let (tx, rx) = unbounded();
        Self { chart, executor: LocalExecutor::new(), tx, rx }
    }

    pub fn chart(&self) -> &Chart<S> {
        &self.chart
    }

    /// Queue a command behind whatever is already pending.
    pub fn post(&self, command: Command) {
        // The receiver lives as long as `self`, so the queue cannot be closed here.
        let _ = self.tx.try_send(command);
    }

    /// Start reading an image for cell `(row, col)`.
    ///
    /// Returns immediately. When `read` resolves to `Some(reference)` a
    /// `SetImage` command is queued; `None` (no file picked, unreadable file)
    /// aborts without touching the store.
    pub fn spawn_upload<F>(&self, row: usize, col: usize, read: F)
    where
        F: Future<Output = Option<String>> + 'static,
    {
        let tx = self.tx.clone();
        self.executor
            .spawn(async move {
                match read.await {
                    Some(reference) => {
                        let _ = tx.send(Command::SetImage { row, col, reference }).await;
                    }
                    None => debug!("Upload for cell ({}, {}) aborted", row, col),
                }
            })
            .detach();
    }

    pub fn has_pending_uploads(&self) -> bool {
        !self.executor.is_empty()
    }

    /// Apply queued commands and wait for in-flight uploads until both are done.
    pub fn run(&mut self, confirm: &mut dyn Confirm) -> Result<Vec<Outcome>, String> {
        let mut outcomes = Vec::new();
        loop {
            while self.executor.try_tick() {}
            while let Ok(command) = self.rx.try_recv() {
                outcomes.push(self.chart.apply(command, confirm)?);
            }
            if self.executor.is_empty() {
                break;
            }
            smol::block_on(self.executor.tick());
        }
        Ok(outcomes)
    }
}
