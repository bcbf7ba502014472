use embedded_hal::digital::OutputPin;

use crate::{clock::Clock, config::HeartbeatConfig};

/// Liveness blinker. If it stops toggling, the scheduler has stopped.
pub struct Heartbeat<L, C> {
    led: L,
    clock: C,
    config: HeartbeatConfig,
}

impl<L: OutputPin, C: Clock> Heartbeat<L, C> {
    pub fn new(led: L, clock: C, config: HeartbeatConfig) -> Self {
        Self { led, clock, config }
    }

    /// One on/off period.
    pub async fn blink_once(&mut self) {
        if self.led.set_high().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("heartbeat LED write failed");
        }
        self.clock.delay(self.config.on).await;
        if self.led.set_low().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("heartbeat LED write failed");
        }
        self.clock.delay(self.config.off).await;
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.blink_once().await;
        }
    }
}

#[cfg(feature = "hardware")]
#[embassy_executor::task]
pub async fn heartbeat_task(heartbeat: crate::board::BoardHeartbeat) -> ! {
    super::HEARTBEAT_SLOT.mark_running();
    heartbeat.run().await
}
