//! Pin map, clock tree and peripheral construction for the STM32F103C8 board.
//!
//! | Function         | Pin  | Peripheral |
//! |------------------|------|------------|
//! | Heartbeat LED    | PB12 | GPIO out   |
//! | Green LED        | PB13 | GPIO out   |
//! | Blue LED         | PB14 | GPIO out   |
//! | Buzzer           | PA6  | TIM3 CH1   |
//! | Button A         | PB6  | GPIO in, pull-up |
//! | Button B         | PB7  | GPIO in, pull-up |
//! | Joystick switch  | PB8  | GPIO in, pull-up |
//! | Joystick Y       | PA0  | ADC1 IN0   |
//! | Joystick X       | PA1  | ADC1 IN1   |
//! | Microphone       | PA2  | ADC1 IN2   |

use embassy_stm32::{
    Config, Peri,
    adc::{self, Adc},
    bind_interrupts,
    gpio::{Input, Level, Output, OutputType, Pull, Speed},
    peripherals::{ADC1, PA0, PA1, PA2, TIM3},
    rcc::{ADCPrescaler, APBPrescaler, Pll, PllMul, PllPreDiv, PllSource, Sysclk},
    time::hz,
    timer::{
        low_level::CountingMode,
        simple_pwm::{PwmPin, SimplePwm, SimplePwmChannel, SimplePwmChannels},
    },
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use static_cell::StaticCell;

use crate::{
    analog::{AnalogChannel, AnalogInput},
    buzzer::SharedBuzzer,
    clock::{SystemClock, TrackedClock},
    config::{BUZZER_PWM_HZ, HeartbeatConfig, MonitorConfig, SelfTestConfig},
    console::{DefmtSink, OutputChannel},
    task::{
        HEARTBEAT_SLOT, MONITOR_SLOT, SELF_TEST_SLOT,
        heartbeat::Heartbeat,
        monitor::JoystickMonitor,
        self_test::{SelfTest, SelfTestIo},
    },
};

/// Raw mutex for everything shared across executor priority levels.
pub type BoardMutex = CriticalSectionRawMutex;
pub type BuzzerPwm = SimplePwmChannel<'static, TIM3>;
pub type BoardBuzzer = SharedBuzzer<BoardMutex, BuzzerPwm>;
pub type BoardConsole = OutputChannel<BoardMutex, DefmtSink>;
pub type SharedAdc = Mutex<BoardMutex, BoardAdc>;
pub type BoardClock = TrackedClock<'static, SystemClock>;

pub type BoardSelfTest = SelfTest<
    'static,
    BoardMutex,
    Output<'static>,
    Input<'static>,
    &'static SharedAdc,
    BuzzerPwm,
    DefmtSink,
    BoardClock,
>;
pub type BoardMonitor =
    JoystickMonitor<'static, BoardMutex, &'static SharedAdc, BuzzerPwm, DefmtSink, BoardClock>;
pub type BoardHeartbeat = Heartbeat<Output<'static>, BoardClock>;

// `Adc::new` unmasks ADC1_2 and every conversion raises end-of-conversion on it.
bind_interrupts!(struct Irqs {
    ADC1_2 => adc::InterruptHandler<ADC1>;
});

pub static CONSOLE: BoardConsole = OutputChannel::new(DefmtSink);
static BUZZER: StaticCell<BoardBuzzer> = StaticCell::new();
static ADC: StaticCell<SharedAdc> = StaticCell::new();

/// HSI through the PLL to 64 MHz, ADC clock at 8 MHz.
pub fn clock_config() -> Config {
    let mut config = Config::default();

    // HSI = 8 MHz
    config.rcc.hsi = true;
    config.rcc.hse = None;

    // 8 MHz / 2 (fixed) * 16 = 64 MHz
    config.rcc.pll = Some(Pll {
        src: PllSource::HSI,
        prediv: PllPreDiv::DIV2,
        mul: PllMul::MUL16,
    });
    config.rcc.sys = Sysclk::PLL1_P;

    // APB1 at 32 MHz (36 MHz max), APB2 at 64 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV1;

    // 64 MHz / 8 = 8 MHz, well below the 14 MHz ADC limit
    config.rcc.adc_pre = ADCPrescaler::DIV8;

    config
}

/// ADC1 with the three analog inputs it samples.
pub struct BoardAdc {
    adc: Adc<'static, ADC1>,
    joystick_y: Peri<'static, PA0>,
    joystick_x: Peri<'static, PA1>,
    microphone: Peri<'static, PA2>,
}

impl AnalogInput for BoardAdc {
    async fn read_raw(&mut self, channel: AnalogChannel) -> u16 {
        let raw = match channel {
            AnalogChannel::JoystickY => self.adc.read(&mut self.joystick_y).await,
            AnalogChannel::JoystickX => self.adc.read(&mut self.joystick_x).await,
            AnalogChannel::Microphone => self.adc.read(&mut self.microphone).await,
        };
        defmt::trace!("ADC IN{} = {}", channel.index(), raw);
        raw
    }
}

/// The three task bodies, wired to real peripherals.
pub struct Board {
    pub self_test: BoardSelfTest,
    pub monitor: BoardMonitor,
    pub heartbeat: BoardHeartbeat,
}

impl Board {
    /// Call once, right after `embassy_stm32::init`.
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        let mut adc = Adc::new(p.ADC1);
        // The joystick pots and the microphone bias network are high impedance,
        // so sample for the longest window the converter offers at 8 MHz.
        adc.set_sample_time(adc.sample_time_for_us(18));
        let adc: &'static SharedAdc = ADC.init(Mutex::new(BoardAdc {
            adc,
            joystick_y: p.PA0,
            joystick_x: p.PA1,
            microphone: p.PA2,
        }));

        let buzzer_pin = PwmPin::new(p.PA6, OutputType::PushPull);
        let tim3_pwm = SimplePwm::new(
            p.TIM3,
            Some(buzzer_pin),
            None,
            None,
            None,
            hz(BUZZER_PWM_HZ),
            CountingMode::default(),
        );
        let SimplePwmChannels {
            ch1: mut buzzer_pwm,
            ch2: _,
            ch3: _,
            ch4: _,
        } = tim3_pwm.split();
        buzzer_pwm.set_duty_cycle_fully_off();
        buzzer_pwm.enable();
        let buzzer: &'static BoardBuzzer = BUZZER.init(SharedBuzzer::new(buzzer_pwm));

        let self_test = SelfTest::new(
            SelfTestIo {
                green_led: Output::new(p.PB13, Level::Low, Speed::Low),
                blue_led: Output::new(p.PB14, Level::Low, Speed::Low),
                button_a: Input::new(p.PB6, Pull::Up),
                button_b: Input::new(p.PB7, Pull::Up),
                joystick_switch: Input::new(p.PB8, Pull::Up),
                analog: adc,
            },
            buzzer,
            &CONSOLE,
            TrackedClock::new(SystemClock, &SELF_TEST_SLOT),
            SelfTestConfig::DEFAULT,
        );

        let monitor = JoystickMonitor::new(
            adc,
            buzzer,
            &CONSOLE,
            TrackedClock::new(SystemClock, &MONITOR_SLOT),
            MonitorConfig::DEFAULT,
        );

        let heartbeat = Heartbeat::new(
            Output::new(p.PB12, Level::Low, Speed::Low),
            TrackedClock::new(SystemClock, &HEARTBEAT_SLOT),
            HeartbeatConfig::DEFAULT,
        );

        Self {
            self_test,
            monitor,
            heartbeat,
        }
    }
}
