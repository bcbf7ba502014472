//! Buzzer output with an explicit single-owner token.
//!
//! The self-test and the joystick monitor both drive the buzzer. Whoever holds
//! the token is the only one allowed to write. Without a holder, any task may
//! write. The self-test takes the token for its whole run, so a joystick pushed
//! during the check list cannot fight the test beep.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};
use embedded_hal::pwm::SetDutyCycle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerOwner {
    SelfTest,
    Monitor,
}

/// The buzzer token is held by another task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuzzerBusy {
    pub holder: BuzzerOwner,
}

struct Slot<P> {
    pwm: P,
    owner: Option<BuzzerOwner>,
}

pub struct SharedBuzzer<M: RawMutex, P> {
    slot: Mutex<M, RefCell<Slot<P>>>,
}

impl<M: RawMutex, P: SetDutyCycle> SharedBuzzer<M, P> {
    /// Takes a PWM channel that is already configured and silent.
    pub fn new(pwm: P) -> Self {
        Self {
            slot: Mutex::new(RefCell::new(Slot { pwm, owner: None })),
        }
    }

    /// Claims the token. Claiming it again as the same owner is a no-op.
    pub fn acquire(&self, who: BuzzerOwner) -> Result<(), BuzzerBusy> {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            match slot.owner {
                Some(holder) if holder != who => Err(BuzzerBusy { holder }),
                _ => {
                    slot.owner = Some(who);
                    Ok(())
                }
            }
        })
    }

    /// Gives the token back. Does nothing unless `who` holds it.
    pub fn release(&self, who: BuzzerOwner) {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.owner == Some(who) {
                slot.owner = None;
            }
        })
    }

    pub fn holder(&self) -> Option<BuzzerOwner> {
        self.slot.lock(|slot| slot.borrow().owner)
    }

    /// Drives the buzzer at 50 % duty, or silences it.
    ///
    /// Refused, without touching the hardware, while someone else holds the token.
    pub fn set_energized(&self, who: BuzzerOwner, energized: bool) -> Result<(), BuzzerBusy> {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(holder) = slot.owner.filter(|holder| *holder != who) {
                return Err(BuzzerBusy { holder });
            }

            let written = if energized {
                slot.pwm.set_duty_cycle_fraction(1, 2)
            } else {
                slot.pwm.set_duty_cycle_fully_off()
            };
            if written.is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("buzzer PWM write failed");
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::pwm::ErrorType;

    use super::*;

    #[derive(Default)]
    struct RecordingPwm {
        duties: Vec<u16>,
    }

    impl ErrorType for RecordingPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for RecordingPwm {
        fn max_duty_cycle(&self) -> u16 {
            1000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duties.push(duty);
            Ok(())
        }
    }

    fn duties(buzzer: &SharedBuzzer<NoopRawMutex, RecordingPwm>) -> Vec<u16> {
        buzzer.slot.lock(|slot| slot.borrow().pwm.duties.clone())
    }

    #[test]
    fn unowned_buzzer_accepts_any_writer() {
        let buzzer = SharedBuzzer::<NoopRawMutex, _>::new(RecordingPwm::default());
        assert_eq!(buzzer.set_energized(BuzzerOwner::Monitor, true), Ok(()));
        assert_eq!(buzzer.set_energized(BuzzerOwner::SelfTest, false), Ok(()));
        assert_eq!(duties(&buzzer), [500, 0]);
    }

    #[test]
    fn holder_blocks_other_writers() {
        let buzzer = SharedBuzzer::<NoopRawMutex, _>::new(RecordingPwm::default());
        buzzer.acquire(BuzzerOwner::SelfTest).unwrap();

        assert_eq!(
            buzzer.set_energized(BuzzerOwner::Monitor, true),
            Err(BuzzerBusy {
                holder: BuzzerOwner::SelfTest
            })
        );
        assert_eq!(buzzer.set_energized(BuzzerOwner::SelfTest, true), Ok(()));
        assert_eq!(duties(&buzzer), [500]);
    }

    #[test]
    fn token_is_exclusive_until_released() {
        let buzzer = SharedBuzzer::<NoopRawMutex, _>::new(RecordingPwm::default());
        assert!(buzzer.acquire(BuzzerOwner::SelfTest).is_ok());
        assert!(buzzer.acquire(BuzzerOwner::SelfTest).is_ok());
        assert!(buzzer.acquire(BuzzerOwner::Monitor).is_err());

        buzzer.release(BuzzerOwner::Monitor);
        assert_eq!(buzzer.holder(), Some(BuzzerOwner::SelfTest));

        buzzer.release(BuzzerOwner::SelfTest);
        assert_eq!(buzzer.holder(), None);
        assert!(buzzer.set_energized(BuzzerOwner::Monitor, true).is_ok());
    }
}
