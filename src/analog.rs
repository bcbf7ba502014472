//! Analog front end: channel ids, raw-to-volt conversion and the sampling trait.

use core::fmt;

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};

use crate::config::{ADC_FULL_SCALE, REFERENCE_VOLTAGE};

/// Analog inputs wired on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    JoystickY,
    JoystickX,
    Microphone,
}

impl AnalogChannel {
    /// ADC input number the channel is wired to.
    pub const fn index(self) -> u8 {
        match self {
            AnalogChannel::JoystickY => 0,
            AnalogChannel::JoystickX => 1,
            AnalogChannel::Microphone => 2,
        }
    }
}

/// One-shot sampling of a single analog channel.
///
/// Selecting the channel and converting is a single call, so an implementation
/// shared between tasks never leaves a channel selection dangling between two
/// callers.
pub trait AnalogInput {
    /// Returns the raw conversion result, `0..ADC_FULL_SCALE`.
    async fn read_raw(&mut self, channel: AnalogChannel) -> u16;
}

/// The converter behind an async mutex, locked for exactly one conversion.
impl<M: RawMutex, A: AnalogInput> AnalogInput for &Mutex<M, A> {
    async fn read_raw(&mut self, channel: AnalogChannel) -> u16 {
        let mut adc = self.lock().await;
        adc.read_raw(channel).await
    }
}

/// A voltage measured against [`REFERENCE_VOLTAGE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Voltage(f32);

impl Voltage {
    pub const ZERO: Voltage = Voltage(0.0);

    pub const fn from_volts(volts: f32) -> Self {
        Voltage(volts)
    }

    /// `raw * reference / full_scale`, so 4095 reads as ~3.2992 V.
    pub fn from_raw(raw: u16) -> Self {
        Voltage(f32::from(raw) * REFERENCE_VOLTAGE / f32::from(ADC_FULL_SCALE))
    }

    pub const fn volts(self) -> f32 {
        self.0
    }

    /// Strictly above `threshold`.
    pub fn exceeds(self, threshold: Voltage) -> bool {
        self.0 > threshold.0
    }
}

impl fmt::Display for Voltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}V", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Voltage {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=f32}V", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_reading_is_just_below_reference() {
        let v = Voltage::from_raw(4095);
        assert!((v.volts() - 3.2992).abs() < 1e-3);
        assert!(v.exceeds(Voltage::from_volts(3.00)));
    }

    #[test]
    fn zero_reading_is_zero_volts() {
        assert_eq!(Voltage::from_raw(0), Voltage::ZERO);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let threshold = Voltage::from_volts(3.00);
        assert!(!Voltage::from_volts(3.00).exceeds(threshold));
        assert!(Voltage::from_volts(3.01).exceeds(threshold));
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Voltage::from_raw(2048).to_string(), "1.65V");
        assert_eq!(Voltage::ZERO.to_string(), "0.00V");
    }

    #[test]
    fn channel_indices_match_adc_inputs() {
        assert_eq!(AnalogChannel::JoystickY.index(), 0);
        assert_eq!(AnalogChannel::JoystickX.index(), 1);
        assert_eq!(AnalogChannel::Microphone.index(), 2);
    }
}
