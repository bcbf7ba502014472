//! Timing, threshold and scaling constants.
//!
//! Nothing here is adjustable at runtime. The per-task config structs exist so
//! tests can hand the tasks shortened durations; firmware always uses the
//! `DEFAULT` values.

use embassy_time::Duration;

use crate::analog::Voltage;

/// ADC reference voltage (VDDA on the board).
pub const REFERENCE_VOLTAGE: f32 = 3.3;

/// Number of codes of the 12-bit converter.
pub const ADC_FULL_SCALE: u16 = 4096;

/// Joystick deflection past which the alarm sounds. Comparison is strict.
pub const ALARM_THRESHOLD: Voltage = Voltage::from_volts(3.00);

/// Buzzer PWM carrier frequency.
pub const BUZZER_PWM_HZ: u32 = 1_000;

/// How long a writer waits for the output channel before dropping its line.
pub const CONSOLE_TIMEOUT: Duration = Duration::from_millis(100);

/// Capacity of one formatted status line. Longer lines are truncated.
pub const LINE_CAPACITY: usize = 96;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelfTestConfig {
    /// Time each indicator LED is held on.
    pub led_on: Duration,
    /// Pause after the LED check.
    pub led_settle: Duration,
    /// Length of the test beep.
    pub beep: Duration,
    /// Pause after the buzzer check.
    pub buzzer_settle: Duration,
    /// Observation window for the button and joystick switch checks.
    pub input_window: Duration,
    /// Interval between input polls inside a window.
    pub poll_interval: Duration,
    /// Fixed delay after a reported press.
    pub debounce: Duration,
    /// Number of analog sampling rounds.
    pub analog_rounds: u8,
    /// Delay after each analog round.
    pub analog_interval: Duration,
    pub console_timeout: Duration,
}

impl SelfTestConfig {
    pub const DEFAULT: Self = Self {
        led_on: Duration::from_millis(500),
        led_settle: Duration::from_millis(500),
        beep: Duration::from_millis(200),
        buzzer_settle: Duration::from_millis(500),
        input_window: Duration::from_millis(3_000),
        poll_interval: Duration::from_millis(50),
        debounce: Duration::from_millis(200),
        analog_rounds: 5,
        analog_interval: Duration::from_millis(500),
        console_timeout: CONSOLE_TIMEOUT,
    };
}

impl Default for SelfTestConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Sampling period of the joystick axes.
    pub period: Duration,
    pub threshold: Voltage,
    pub console_timeout: Duration,
}

impl MonitorConfig {
    pub const DEFAULT: Self = Self {
        period: Duration::from_millis(50),
        threshold: ALARM_THRESHOLD,
        console_timeout: CONSOLE_TIMEOUT,
    };
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeartbeatConfig {
    pub on: Duration,
    pub off: Duration,
}

impl HeartbeatConfig {
    pub const DEFAULT: Self = Self {
        on: Duration::from_millis(500),
        off: Duration::from_millis(500),
    };
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
