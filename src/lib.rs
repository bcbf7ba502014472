//! Bring-up firmware for the self-test board.
//!
//! Three tasks share one Cortex-M3 core:
//!
//! - [`task::self_test`] runs the one-shot hardware check list and then ends.
//! - [`task::monitor`] samples the joystick every 50 ms and sounds the buzzer
//!   while the stick is pushed past 3.00 V.
//! - [`task::heartbeat`] toggles the heartbeat LED so a stalled scheduler is
//!   visible from across the bench.
//!
//! Status lines from all three go through the [`console::OutputChannel`].
//! The buzzer is guarded by the [`buzzer::SharedBuzzer`] owner token.
//!
//! Everything outside [`board`] and [`scheduler`] is generic over
//! `embedded-hal` traits and runs in host tests. Build for the board with:
//!
//! ```bash
//! cargo run --release --target thumbv7m-none-eabi --features hardware
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

pub mod analog;
pub mod buzzer;
pub mod clock;
pub mod config;
pub mod console;
pub mod task;

#[cfg(feature = "hardware")]
pub mod board;
#[cfg(feature = "hardware")]
pub mod scheduler;

#[cfg(feature = "hardware")]
use {defmt_rtt as _, panic_probe as _};
