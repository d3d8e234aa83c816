//! Delayed actions keyed to the state they were scheduled against.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::state::GamePhase;

/// Decision point a pending action belongs to. A task whose tag no longer
/// matches the game's current tag is stale and must be dropped unapplied.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StateTag {
    pub version: u64,
    pub phase: GamePhase,
    pub active: PlayerId,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskKind {
    /// An AI seat decides after its thinking delay.
    AiTurn,
    /// A human seat ran out of time and is auto-resolved.
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub due: Duration,
    pub player: PlayerId,
    pub kind: TaskKind,
    pub tag: StateTag,
}

impl ScheduledTask {
    pub fn is_current(&self, tag: &StateTag) -> bool {
        self.tag == *tag
    }
}

/// Pending tasks ordered by due time; equal due times keep insertion order.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn schedule(&mut self, task: ScheduledTask) {
        let at = self.pending.partition_point(|queued| queued.due <= task.due);
        self.pending.insert(at, task);
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledTask> {
        match self.pending.first() {
            Some(task) if task.due <= now => Some(self.pending.remove(0)),
            _ => None,
        }
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|task| task.due)
    }

    /// Drops every task not issued against `tag`, returning how many were dropped.
    pub fn discard_stale(&mut self, tag: &StateTag) -> usize {
        let before = self.pending.len();
        self.pending.retain(|task| task.is_current(tag));
        before - self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(version: u64) -> StateTag {
        StateTag {
            version,
            phase: GamePhase::Playing,
            active: 0,
        }
    }

    fn task(due_ms: u64, version: u64) -> ScheduledTask {
        ScheduledTask {
            due: Duration::from_millis(due_ms),
            player: 0,
            kind: TaskKind::AiTurn,
            tag: tag(version),
        }
    }

    #[test]
    fn pops_in_due_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(task(300, 1));
        scheduler.schedule(task(100, 2));
        scheduler.schedule(task(200, 3));
        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(100)));
        assert_eq!(scheduler.pop_due(Duration::from_millis(50)), None);
        let first = scheduler.pop_due(Duration::from_millis(250)).expect("due");
        assert_eq!(first.tag.version, 2);
        let second = scheduler.pop_due(Duration::from_millis(250)).expect("due");
        assert_eq!(second.tag.version, 3);
        assert_eq!(scheduler.pop_due(Duration::from_millis(250)), None);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn equal_due_times_keep_insertion_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(task(100, 1));
        scheduler.schedule(task(100, 2));
        let now = Duration::from_millis(100);
        assert_eq!(scheduler.pop_due(now).map(|t| t.tag.version), Some(1));
        assert_eq!(scheduler.pop_due(now).map(|t| t.tag.version), Some(2));
    }

    #[test]
    fn discards_tasks_from_older_states() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(task(100, 1));
        scheduler.schedule(task(200, 2));
        assert_eq!(scheduler.discard_stale(&tag(2)), 1);
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.pop_due(Duration::from_secs(1)).expect("due").is_current(&tag(2)));
    }
}
