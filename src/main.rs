#![no_main]
#![no_std]

use board_selftest_fw::{
    self as _, // global logger + panicking-behavior + memory layout
    board::{self, Board},
    scheduler,
    task::{
        HEARTBEAT_SLOT, MONITOR_SLOT, SELF_TEST_SLOT, heartbeat::heartbeat_task,
        monitor::joystick_monitor_task, self_test::self_test_task,
    },
};
use cortex_m_rt::entry;
use defmt::info;

#[entry]
fn main() -> ! {
    let p = embassy_stm32::init(board::clock_config());
    info!(
        "{} {} running",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let board = Board::new(p);

    scheduler::start(move |scheduler| {
        // The self-test goes first so it owns the buzzer before the monitor samples.
        scheduler.create_task(&SELF_TEST_SLOT, self_test_task(board.self_test));
        scheduler.create_task(&MONITOR_SLOT, joystick_monitor_task(board.monitor));
        scheduler.create_task(&HEARTBEAT_SLOT, heartbeat_task(board.heartbeat));
    })
}
