//! Scheduled choreography steps.
//!
//! Every multi-step sequence in the engine - the opening deal, the success
//! and mismatch flows, the wildcard reshuffle, the hint reveals - is a
//! chain of [`Step`]s scheduled at absolute times on the session's logical
//! clock. The queue owns every pending handle, so a retry or teardown
//! cancels the lot in one call and nothing can mutate a discarded deck.
//!
//! Due steps drain in due-time order, ties broken by scheduling order.

use smallvec::SmallVec;

/// One delayed choreography step.
///
/// Steps carry only position data fixed at scheduling time; anything
/// decided mid-flow (the wildcard's relocated slot) lives on the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Hide the opening deal and enable input.
    FinishDeal,
    /// Permute the deck around the wildcard's slot.
    WildcardShuffle,
    /// Mark the relocated wildcard slot `Removing`.
    WildcardRemove,
    /// Regenerate the relocated wildcard slot.
    WildcardRegenerate,
    /// Hide the deck and end the wildcard flow.
    WildcardFinish,
    /// Write the merge value into the second card, start removing the first.
    MergeWrite {
        first: usize,
        second: usize,
        value: u32,
    },
    /// Regenerate the merged-away first slot.
    RegenerateFirst { first: usize },
    /// Hide both merged cards and end the success flow.
    SuccessFinish { first: usize, second: usize },
    /// Hide the mismatched pair and unlock.
    MismatchHide,
    /// Reveal the deck after a loss.
    LoseReveal,
    /// End a show-one reveal window.
    HideShownCard { index: usize },
    /// End a show-all reveal window.
    HideAfterShowAll,
    /// Clear a transient notice.
    DismissNotice,
    /// Resume play after a continue.
    ResumePlay,
}

/// Handle to a scheduled step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TaskId(u64);

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    id: TaskId,
    due_ms: u64,
    step: Step,
}

/// Owned queue of pending steps.
#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    // A session has a handful of steps in flight at most.
    pending: SmallVec<[Scheduled; 8]>,
    next_id: u64,
}

impl TaskQueue {
    /// Schedule `step` to fire at the absolute time `due_ms`.
    pub(crate) fn schedule(&mut self, due_ms: u64, step: Step) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled { id, due_ms, step });
        id
    }

    /// Drop every pending step.
    pub(crate) fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Number of steps still pending.
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return the earliest step due at or before `now_ms`.
    ///
    /// Ties resolve in scheduling order, so a chain scheduled
    /// front-to-back always fires front-to-back.
    pub(crate) fn pop_due(&mut self, now_ms: u64) -> Option<(TaskId, Step)> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now_ms)
            .min_by_key(|(_, s)| (s.due_ms, s.id.0))
            .map(|(position, _)| position)?;

        let scheduled = self.pending.remove(position);
        Some((scheduled.id, scheduled.step))
    }
}
