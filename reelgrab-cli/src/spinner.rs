//! Spinner pool for concurrent progress display.
//!
//! Manages a fixed number of progress bar "slots" that are claimed and
//! released by workers identified by a `usize` key (the entry index).

use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Key for the single listing/enrichment spinner, outside the entry range.
pub(crate) const PHASE_KEY: usize = usize::MAX;

const TICK: Duration = Duration::from_millis(100);

pub(crate) struct SpinnerPool {
    mp: MultiProgress,
    spinners: Vec<ProgressBar>,
    slot_assignments: HashMap<usize, usize>,
    free_slots: Vec<usize>,
}

impl SpinnerPool {
    /// Create a pool with `n` slots. When `quiet` is true, nothing is drawn.
    pub(crate) fn new(n: usize, quiet: bool) -> Self {
        let mp = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };

        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|");

        let spinners = (0..n.max(1))
            .map(|_| {
                let pb = mp.add(ProgressBar::new_spinner());
                pb.set_style(style.clone());
                pb
            })
            .collect::<Vec<_>>();
        let free_slots = (0..spinners.len()).rev().collect();

        Self {
            mp,
            spinners,
            slot_assignments: HashMap::new(),
            free_slots,
        }
    }

    /// Claim a slot for `key`, or just update its message if it has one.
    pub(crate) fn claim(&mut self, key: usize, msg: String) {
        if self.slot_assignments.contains_key(&key) {
            self.update(key, msg);
            return;
        }
        if let Some(slot) = self.free_slots.pop() {
            self.spinners[slot].reset();
            self.spinners[slot].enable_steady_tick(TICK);
            self.spinners[slot].set_message(msg);
            self.slot_assignments.insert(key, slot);
        }
    }

    /// Update the message for a claimed slot. No-op if the key has no slot.
    pub(crate) fn update(&self, key: usize, msg: String) {
        if let Some(&slot) = self.slot_assignments.get(&key) {
            self.spinners[slot].set_message(msg);
        }
    }

    /// Stop ticking, clear the line, return the slot to the pool.
    pub(crate) fn release(&mut self, key: usize) {
        if let Some(slot) = self.slot_assignments.remove(&key) {
            self.spinners[slot].disable_steady_tick();
            self.spinners[slot].set_message("");
            self.spinners[slot].finish_and_clear();
            self.free_slots.push(slot);
        }
    }

    /// Print a line above the spinners without tearing them.
    pub(crate) fn println(&self, line: impl AsRef<str>) {
        if log::log_enabled!(log::Level::Info) {
            self.mp.suspend(|| log::info!("{}", line.as_ref()));
        }
    }

    pub(crate) fn clear_all(&mut self) {
        for spinner in &self.spinners {
            spinner.disable_steady_tick();
            spinner.set_message("");
            spinner.finish_and_clear();
        }
        self.slot_assignments.clear();
        self.free_slots = (0..self.spinners.len()).rev().collect();
    }
}
