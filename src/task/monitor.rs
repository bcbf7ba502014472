use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::pwm::SetDutyCycle;

use crate::{
    analog::{AnalogChannel, AnalogInput, Voltage},
    buzzer::{BuzzerOwner, SharedBuzzer},
    clock::Clock,
    config::{ALARM_THRESHOLD, MonitorConfig},
    console::{LineSink, OutputChannel, format_line},
};

/// `true` when either axis is strictly above [`ALARM_THRESHOLD`].
pub fn alarm_condition(x: Voltage, y: Voltage) -> bool {
    alarm_condition_at(x, y, ALARM_THRESHOLD)
}

pub fn alarm_condition_at(x: Voltage, y: Voltage, threshold: Voltage) -> bool {
    x.exceeds(threshold) || y.exceeds(threshold)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    #[default]
    Idle,
    Alarming,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerCommand {
    Energize,
    Silence,
}

impl AlarmState {
    /// Edge-triggered transition: a command is produced only when the
    /// condition disagrees with the current state.
    pub fn next(self, alarm_condition: bool) -> (AlarmState, Option<BuzzerCommand>) {
        match (self, alarm_condition) {
            (AlarmState::Idle, true) => (AlarmState::Alarming, Some(BuzzerCommand::Energize)),
            (AlarmState::Alarming, false) => (AlarmState::Idle, Some(BuzzerCommand::Silence)),
            (state, _) => (state, None),
        }
    }
}

/// What one sampling cycle saw and did.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorCycle {
    pub x: Voltage,
    pub y: Voltage,
    pub state: AlarmState,
    /// The buzzer write issued this cycle, if the arbiter accepted one.
    pub buzzer_write: Option<BuzzerCommand>,
}

pub struct JoystickMonitor<'a, M: RawMutex, A, P, W, C> {
    analog: A,
    buzzer: &'a SharedBuzzer<M, P>,
    console: &'a OutputChannel<M, W>,
    clock: C,
    config: MonitorConfig,
    state: AlarmState,
}

impl<'a, M, A, P, W, C> JoystickMonitor<'a, M, A, P, W, C>
where
    M: RawMutex,
    A: AnalogInput,
    P: SetDutyCycle,
    W: LineSink,
    C: Clock,
{
    pub fn new(
        analog: A,
        buzzer: &'a SharedBuzzer<M, P>,
        console: &'a OutputChannel<M, W>,
        clock: C,
        config: MonitorConfig,
    ) -> Self {
        Self {
            analog,
            buzzer,
            console,
            clock,
            config,
            state: AlarmState::Idle,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// Sample, update the alarm, report, then wait out the period.
    pub async fn cycle(&mut self) -> MonitorCycle {
        let y = Voltage::from_raw(self.analog.read_raw(AnalogChannel::JoystickY).await);
        let x = Voltage::from_raw(self.analog.read_raw(AnalogChannel::JoystickX).await);

        let condition = alarm_condition_at(x, y, self.config.threshold);
        let (next, command) = self.state.next(condition);

        let mut buzzer_write = None;
        if let Some(command) = command {
            let energize = command == BuzzerCommand::Energize;
            match self.buzzer.set_energized(BuzzerOwner::Monitor, energize) {
                Ok(()) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("joystick alarm {} (x={}, y={})", next, x, y);
                    self.state = next;
                    buzzer_write = Some(command);
                }
                // State is left alone so the transition is retried next cycle.
                Err(_busy) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("buzzer held by {}, alarm change deferred", _busy.holder);
                }
            }
        }

        let line = format_line(format_args!("Joystick - X: {}, Y: {}", x, y));
        self.console
            .try_write(&line, self.config.console_timeout)
            .await;

        self.clock.delay(self.config.period).await;

        MonitorCycle {
            x,
            y,
            state: self.state,
            buzzer_write,
        }
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.cycle().await;
        }
    }
}

#[cfg(feature = "hardware")]
#[embassy_executor::task]
pub async fn joystick_monitor_task(monitor: crate::board::BoardMonitor) -> ! {
    super::MONITOR_SLOT.mark_running();
    monitor.run().await
}
