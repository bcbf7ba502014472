//! The three tasks and the descriptors the scheduler spawns them from.
//!
//! ```text
//!   spawn ──► Ready ──► Running ◄──► Blocked
//!                          │
//!                          └── body returns ──► Deleted (terminal)
//! ```
//!
//! Only the self-test ever reaches `Deleted`. The other two loop forever.

use core::sync::atomic::{AtomicU8, Ordering};

pub mod heartbeat;
pub mod monitor;

/// Scheduling tier. A ready task of a higher tier preempts any lower one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskSpec {
    pub name: &'static str,
    pub priority: TaskPriority,
    /// Upper bound on the task's static future, in bytes. Diagnostic only.
    pub stack_budget: usize,
}

pub const SELF_TEST: TaskSpec = TaskSpec {
    name: "self-test",
    priority: TaskPriority::High,
    stack_budget: 2048,
};

pub const MONITOR: TaskSpec = TaskSpec {
    name: "joystick-monitor",
    priority: TaskPriority::Medium,
    stack_budget: 2048,
};

pub const HEARTBEAT: TaskSpec = TaskSpec {
    name: "heartbeat",
    priority: TaskPriority::Low,
    stack_budget: 1024,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TaskState {
    /// Not spawned yet.
    Pending,
    Ready,
    Running,
    /// Parked in a timed delay.
    Blocked,
    /// The body returned. Never left once entered.
    Deleted,
}

impl TaskState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => TaskState::Ready,
            2 => TaskState::Running,
            3 => TaskState::Blocked,
            4 => TaskState::Deleted,
            _ => TaskState::Pending,
        }
    }
}

/// Descriptor plus observable lifecycle state of one task.
pub struct TaskSlot {
    spec: TaskSpec,
    state: AtomicU8,
}

impl TaskSlot {
    pub const fn new(spec: TaskSpec) -> Self {
        Self {
            spec,
            state: AtomicU8::new(TaskState::Pending as u8),
        }
    }

    pub const fn spec(&self) -> &TaskSpec {
        &self.spec
    }

    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn mark_ready(&self) {
        self.transition(TaskState::Ready);
    }

    pub fn mark_running(&self) {
        self.transition(TaskState::Running);
    }

    pub fn mark_blocked(&self) {
        self.transition(TaskState::Blocked);
    }

    /// Returns `false` if the task was already deleted.
    pub fn mark_deleted(&self) -> bool {
        let previous = self.state.swap(TaskState::Deleted as u8, Ordering::AcqRel);
        previous != TaskState::Deleted as u8
    }

    fn transition(&self, next: TaskState) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != TaskState::Deleted as u8).then_some(next as u8)
            });
    }
}

pub static SELF_TEST_SLOT: TaskSlot = TaskSlot::new(SELF_TEST);
pub static MONITOR_SLOT: TaskSlot = TaskSlot::new(MONITOR);
pub static HEARTBEAT_SLOT: TaskSlot = TaskSlot::new(HEARTBEAT);
