//! Layout pass scheduling.
//!
//! Triggers are collected between frames and folded into one pass when the
//! host reports a frame is ready. A pass in progress ignores new triggers so
//! that the style writes of a pass cannot schedule another one.

mod signal;

use std::collections::BTreeSet;

pub use signal::{LayoutHandle, LayoutReceiver, channel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    #[default]
    Idle,
    Measuring,
    ComputingOffsets,
    ApplyingStyles,
}

/// Why a layout pass was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutTrigger {
    Mount,
    ColumnsChanged,
    RowsChanged,
    GroupsToggled,
    Resize,
}

#[derive(Debug, Default)]
pub struct LayoutScheduler {
    phase: LayoutPhase,
    pending: BTreeSet<LayoutTrigger>,
    mounted: bool,
    passes: u64,
    ignored: u64,
}

impl LayoutScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn in_progress(&self) -> bool {
        self.phase != LayoutPhase::Idle
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &BTreeSet<LayoutTrigger> {
        &self.pending
    }

    /// Completed passes since creation.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Triggers dropped because a pass was running.
    pub fn ignored(&self) -> u64 {
        self.ignored
    }

    pub fn mount(&mut self) {
        self.mounted = true;
        self.request(LayoutTrigger::Mount);
    }

    /// Drop pending work and stop accepting triggers.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending.clear();
        self.phase = LayoutPhase::Idle;
    }

    /// Queue a pass. Returns false if the trigger was dropped.
    pub fn request(&mut self, trigger: LayoutTrigger) -> bool {
        if !self.mounted {
            log::trace!("[layout] {trigger:?} before mount, ignored");
            return false;
        }
        if self.in_progress() {
            log::trace!("[layout] {trigger:?} during {:?}, ignored", self.phase);
            self.ignored += 1;
            return false;
        }
        self.pending.insert(trigger);
        true
    }

    /// Start a pass if one is pending, taking every queued trigger.
    pub fn begin(&mut self) -> Option<BTreeSet<LayoutTrigger>> {
        if !self.mounted || self.in_progress() || self.pending.is_empty() {
            return None;
        }
        let triggers = std::mem::take(&mut self.pending);
        log::debug!("[layout] pass {} for {:?}", self.passes + 1, triggers);
        self.phase = LayoutPhase::Measuring;
        Some(triggers)
    }

    pub fn enter(&mut self, phase: LayoutPhase) {
        log::trace!("[layout] {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    pub fn finish(&mut self) {
        self.phase = LayoutPhase::Idle;
        self.passes += 1;
    }
}
