//! Host fakes for the collaborator traits.
//!
//! All fakes share one [`FakeClock`] so pin edges, ADC reads and console lines
//! can be checked against the same simulated timeline.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    convert::Infallible,
    ops::Range,
    rc::Rc,
};

use board_selftest_fw::{
    analog::{AnalogChannel, AnalogInput},
    clock::Clock,
    console::LineSink,
};
use embassy_futures::yield_now;
use embassy_time::{Duration, Instant};
use embedded_hal::{digital, pwm};

/// Time only moves when a task delays. Each delay yields once, so joined
/// futures interleave the way they would on the executor.
#[derive(Clone, Default)]
pub struct FakeClock {
    now_ms: Rc<Cell<u64>>,
}

impl FakeClock {
    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.now_ms.get())
    }

    async fn delay(&mut self, duration: Duration) {
        self.now_ms.set(self.now_ms.get() + duration.as_millis());
        yield_now().await;
    }
}

/// Output pin that logs `(time_ms, level)` for every write.
#[derive(Clone)]
pub struct RecordingPin {
    clock: FakeClock,
    events: Rc<RefCell<Vec<(u64, bool)>>>,
}

impl RecordingPin {
    pub fn new(clock: &FakeClock) -> Self {
        Self {
            clock: clock.clone(),
            events: Rc::default(),
        }
    }

    pub fn events(&self) -> Vec<(u64, bool)> {
        self.events.borrow().clone()
    }
}

impl digital::ErrorType for RecordingPin {
    type Error = Infallible;
}

impl digital::OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push((self.clock.now_ms(), false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push((self.clock.now_ms(), true));
        Ok(())
    }
}

/// Active-low input held low during the scripted time ranges (ms).
#[derive(Clone)]
pub struct ScriptedButton {
    clock: FakeClock,
    pressed: Vec<Range<u64>>,
}

impl ScriptedButton {
    pub fn new(clock: &FakeClock, pressed: Vec<Range<u64>>) -> Self {
        Self {
            clock: clock.clone(),
            pressed,
        }
    }

    pub fn released(clock: &FakeClock) -> Self {
        Self::new(clock, Vec::new())
    }
}

impl digital::ErrorType for ScriptedButton {
    type Error = Infallible;
}

impl digital::InputPin for ScriptedButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let now = self.clock.now_ms();
        Ok(self.pressed.iter().any(|range| range.contains(&now)))
    }
}

/// ADC returning scripted readings per channel. Once a channel's script is
/// used up, its last reading repeats.
#[derive(Clone, Default)]
pub struct ScriptedAdc {
    scripts: Rc<RefCell<[VecDeque<u16>; 3]>>,
    reads: Rc<RefCell<Vec<AnalogChannel>>>,
}

impl ScriptedAdc {
    pub fn with(self, channel: AnalogChannel, readings: &[u16]) -> Self {
        self.scripts.borrow_mut()[usize::from(channel.index())] = readings.iter().copied().collect();
        self
    }

    pub fn reads(&self) -> Vec<AnalogChannel> {
        self.reads.borrow().clone()
    }
}

impl AnalogInput for ScriptedAdc {
    async fn read_raw(&mut self, channel: AnalogChannel) -> u16 {
        self.reads.borrow_mut().push(channel);
        let mut scripts = self.scripts.borrow_mut();
        let script = &mut scripts[usize::from(channel.index())];
        match script.len() {
            0 => 0,
            1 => script[0],
            _ => script.pop_front().unwrap_or(0),
        }
    }
}

/// PWM channel logging every duty written. Full scale is 1000, so 50 % is 500.
#[derive(Clone, Default)]
pub struct RecordingPwm {
    duties: Rc<RefCell<Vec<u16>>>,
}

impl RecordingPwm {
    pub fn duties(&self) -> Vec<u16> {
        self.duties.borrow().clone()
    }
}

impl pwm::ErrorType for RecordingPwm {
    type Error = Infallible;
}

impl pwm::SetDutyCycle for RecordingPwm {
    fn max_duty_cycle(&self) -> u16 {
        1000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duties.borrow_mut().push(duty);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl LineSink for RecordingSink {
    fn write_line(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_owned());
    }
}
