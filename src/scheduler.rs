//! Preemptive priority tiers on top of embassy executors.
//!
//! | Tier   | Executor                      | NVIC priority |
//! |--------|-------------------------------|---------------|
//! | High   | `InterruptExecutor` on USART3 | P6            |
//! | Medium | `InterruptExecutor` on SPI2   | P7            |
//! | Low    | thread-mode `Executor`        | -             |
//!
//! A task on a higher tier preempts every lower tier as soon as it is woken.
//! Tasks within a tier are polled in wake order. Both interrupts are otherwise
//! unused on this board.
//!
//! A task delays through its [`Clock`](crate::clock::Clock), and it deletes
//! itself by returning from its body.

use defmt::{info, unwrap};
use embassy_executor::{Executor, InterruptExecutor, SendSpawner, SpawnToken, Spawner};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use static_cell::StaticCell;

use crate::task::{TaskPriority, TaskSlot};

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MEDIUM: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn USART3() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[interrupt]
unsafe fn SPI2() {
    unsafe { EXECUTOR_MEDIUM.on_interrupt() }
}

pub struct Scheduler {
    high: SendSpawner,
    medium: SendSpawner,
    low: Spawner,
}

impl Scheduler {
    /// Spawns `token` on the tier named by the slot's descriptor.
    ///
    /// Running out of task storage here is a boot failure: the board halts.
    pub fn create_task<S: Send>(&self, slot: &'static TaskSlot, token: SpawnToken<S>) {
        let spec = slot.spec();
        info!(
            "creating task {=str}: priority {}, stack budget {} bytes",
            spec.name, spec.priority, spec.stack_budget
        );

        // A high tier task starts running inside `spawn`, so it must already be Ready.
        slot.mark_ready();
        let spawned = match spec.priority {
            TaskPriority::High => self.high.spawn(token),
            TaskPriority::Medium => self.medium.spawn(token),
            TaskPriority::Low => self.low.spawn(token),
        };
        unwrap!(spawned);
    }
}

/// Brings up the interrupt executors, lets `create_tasks` spawn onto them, then
/// hands the CPU to the thread-mode executor for good.
pub fn start(create_tasks: impl FnOnce(&Scheduler)) -> ! {
    interrupt::USART3.set_priority(Priority::P6);
    let high = EXECUTOR_HIGH.start(interrupt::USART3);

    interrupt::SPI2.set_priority(Priority::P7);
    let medium = EXECUTOR_MEDIUM.start(interrupt::SPI2);

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|low| create_tasks(&Scheduler { high, medium, low }))
}
