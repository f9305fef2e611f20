#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

// The firmware below only exists for the ARM target; host builds get a stub
// entry point so the library test suite runs with a plain `cargo test`.

#[cfg(target_arch = "arm")]
mod io;

#[cfg(target_arch = "arm")]
use {
    core::fmt::Write as _,
    embassy_executor::Spawner,
    embassy_futures::yield_now,
    embassy_stm32::gpio::{Input, Level, Output, Pull, Speed},
    embassy_stm32::mode::Async,
    embassy_stm32::usart::{self, Uart},
    embassy_stm32::{bind_interrupts, peripherals},
    embassy_time::Instant,
    heapless::String,
    panic_halt as _,
    rc_light_control::lightcontrol::{Config, LightController, Mode},
};

#[cfg(target_arch = "arm")]
bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<peripherals::USART1>;
});

#[cfg(target_arch = "arm")]
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());

    let mut usart = Uart::new(
        peripherals.USART1,
        peripherals.PA10,
        peripherals.PA9,
        Irqs,
        peripherals.DMA1_CH4,
        peripherals.DMA1_CH5,
        usart::Config::default(), // 115200 baud
    )
    .unwrap();

    #[cfg(feature = "three-channel")]
    let garland = Some(Input::new(peripherals.PA2, Pull::Down));
    #[cfg(not(feature = "three-channel"))]
    let garland: Option<Input<'static>> = None;

    let mut receiver = io::ReceiverPins::new(
        Input::new(peripherals.PA0, Pull::Down),
        Input::new(peripherals.PA1, Pull::Down),
        garland,
    );

    let mut lamps = io::LampPins::new(
        Output::new(peripherals.PE1, Level::Low, Speed::Low), // reverse
        Output::new(peripherals.PB9, Level::Low, Speed::Low), // stop
        Output::new(peripherals.PB7, Level::Low, Speed::Low), // left running
        Output::new(peripherals.PB6, Level::Low, Speed::Low), // right running
        Output::new(peripherals.PB8, Level::Low, Speed::Low), // headlight
        Output::new(peripherals.PE0, Level::Low, Speed::Low), // garland
    );

    #[cfg(feature = "three-channel")]
    let config = Config::three_channel();
    #[cfg(not(feature = "three-channel"))]
    let config = Config::two_channel();

    let mut controller = LightController::new(config);

    usart.write(b"rc light control: waiting for signal\n").await.unwrap();

    let mut calibration_reported = false;
    loop {
        controller.poll(&mut receiver, &mut lamps, Instant::now().as_millis());

        if !calibration_reported && controller.mode() == Mode::Running {
            report_calibration(&mut usart, &controller).await;
            calibration_reported = true;
        }

        yield_now().await;
    }
}

#[cfg(target_arch = "arm")]
async fn report_calibration(usart: &mut Uart<'static, Async>, controller: &LightController) {
    let Some(calibration) = controller.calibration() else {
        return;
    };

    let mut line: String<96> = String::new();
    let _ = write!(
        line,
        "calibrated: throttle {}..{} switch {}..{}",
        calibration.throttle.low,
        calibration.throttle.high,
        calibration.switch.low,
        calibration.switch.high,
    );
    if let Some(garland) = calibration.garland {
        let _ = write!(line, " garland {}..{}", garland.low, garland.high);
    }
    let _ = line.push('\n');

    usart.write(line.as_bytes()).await.unwrap();
}

#[cfg(not(target_arch = "arm"))]
fn main() {}
