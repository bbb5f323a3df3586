#![no_std]
#![no_main]

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use core::sync::atomic::{AtomicU8, Ordering};
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    interrupt::{self, InterruptExt, Priority},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Duration, Ticker, Timer};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use nrf_softdevice::Softdevice;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use pinetime_orrery::{
    peripherals::{
        backlight::Backlight,
        battery::Battery,
        display::Display,
        vibrator::{PulseLength, Vibrator},
    },
    system::{
        bluetooth::{self, Server},
        config::{FaceConfig, SystemConfig, UTC_OFFSET_SECS},
        time::{secs_until_next_minute, TimeManager, TimeReference},
    },
    ui::{
        compositor::Compositor,
        host::{DeviceStatus, Haptics, WallClock},
        OrreryFace, WatchFace,
    },
};

// Others
use chrono::NaiveDateTime;

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

/// Backlight level while the face is shown
const BRIGHTNESS: u8 = 2;

// Communication channels
static BATTERY: Signal<ThreadModeRawMutex, u8> = Signal::new();
static LINK: Signal<ThreadModeRawMutex, bool> = Signal::new();
static MINUTE: Signal<ThreadModeRawMutex, ()> = Signal::new();
static NOTIFY: Signal<ThreadModeRawMutex, PulseLength> = Signal::new();

/// Last battery reading, for the Bluetooth battery service
static BATTERY_PERCENT: AtomicU8 = AtomicU8::new(0);

/// The watch as seen by the face
struct Watch {
    clock: TimeManager,
    config: FaceConfig,
    battery_percent: u8,
    linked: bool,
}

impl WallClock for Watch {
    fn now(&self) -> NaiveDateTime {
        self.clock.get_time()
    }

    fn is_24h_style(&self) -> bool {
        self.config.clock_24h
    }
}

impl Haptics for Watch {
    fn short_pulse(&mut self) {
        NOTIFY.signal(PulseLength::SHORT);
    }
}

impl DeviceStatus for Watch {
    fn battery_percent(&self) -> u8 {
        self.battery_percent
    }

    fn is_linked(&self) -> bool {
        self.linked
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise and report the link state
#[embassy_executor::task(pool_size = 1)]
async fn bluetooth_task(sd: &'static Softdevice, server: Server) {
    bluetooth::serve(
        sd,
        &server,
        || BATTERY_PERCENT.load(Ordering::Relaxed),
        |connected| LINK.signal(connected),
    )
    .await
}

/// Buzz whenever the face asks for it
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut vibrator: Vibrator) {
    loop {
        let length = NOTIFY.wait().await;
        vibrator.pulse(length, None).await;
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery) {
    let mut last = BATTERY_PERCENT.load(Ordering::Relaxed);
    loop {
        match battery.get_percent().await {
            Ok(percent) if percent != last => {
                defmt::info!(
                    "Battery status: {}% ({})",
                    percent,
                    if battery.is_charging() {
                        "charging"
                    } else {
                        "discharging"
                    }
                );
                last = percent;
                BATTERY_PERCENT.store(percent, Ordering::Relaxed);
                BATTERY.signal(percent);
            }
            Ok(_) => {}
            Err(err) => defmt::warn!("Battery measurement failed: {:?}", err),
        }

        // Re-schedule the timer interrupt in 10s
        Timer::after(Duration::from_secs(10)).await;
    }
}

/// Raise a minute tick whenever the wall clock rolls over
#[embassy_executor::task(pool_size = 1)]
async fn minute_tick(clock: TimeManager) {
    loop {
        let wait = secs_until_next_minute(&clock.get_time());
        Timer::after(Duration::from_secs(wait)).await;
        MINUTE.signal(());
    }
}

/// Own the face and feed it the device events
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(mut display: Display<SPI2>, mut watch: Watch) {
    let mut surface = Compositor::new();
    let mut face = OrreryFace::new(watch.config);
    unwrap!(face.load(&mut surface, &mut watch));

    let mut tick = Ticker::every(Duration::from_millis(100));
    loop {
        if LINK.signaled() {
            let connected = LINK.wait().await;
            watch.linked = connected;
            if let Err(err) = face.on_link(&mut surface, &mut watch, connected) {
                defmt::warn!("Link update failed: {:?}", err);
            }
        }

        if BATTERY.signaled() {
            let percent = BATTERY.wait().await;
            watch.battery_percent = percent;
            if let Err(err) = face.on_battery(&mut surface, percent) {
                defmt::warn!("Battery update failed: {:?}", err);
            }
        }

        if MINUTE.signaled() {
            MINUTE.wait().await;
            if let Err(err) = face.on_minute_tick(&mut surface, &watch) {
                defmt::warn!("Time update failed: {:?}", err);
            }
        }

        if surface.needs_render() {
            if let Err(err) = display.draw_face(&mut surface) {
                defmt::warn!("Drawing failed: {:?}", err);
            }
        }

        // Re-schedule the timer interrupt in 100ms
        tick.next().await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Priorities 0, 1 and 4 belong to the SoftDevice
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);

    // Start the wall clock from the build time
    let clock = TimeManager::init(TimeReference::from_timestamp(UTC_TIME, UTC_OFFSET_SECS));
    let config = FaceConfig::default();

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initalize Battery
    let mut battery = Battery::init(saadc, Input::new(p.P0_12, Pull::None));
    let battery_percent = match battery.get_percent().await {
        Ok(percent) => percent,
        Err(err) => {
            defmt::warn!("Initial battery measurement failed: {:?}", err);
            0
        }
    };
    BATTERY_PERCENT.store(battery_percent, Ordering::Relaxed);

    // Initialize Backlight
    let mut backlight = Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );

    // Initialize vibration motor
    let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let mut display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));
    unwrap!(display.clear(Rgb565::BLACK));
    unwrap!(backlight.set(BRIGHTNESS));
    defmt::info!("Backlight at level {}", backlight.brightness());

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::generate_config());
    let server = unwrap!(Server::new(sd));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    defmt::info!("Initialization finished");

    let watch = Watch {
        clock,
        config,
        battery_percent,
        linked: false,
    };

    // Schedule tasks
    unwrap!(spawner.spawn(update_lcd(display, watch)));
    unwrap!(spawner.spawn(update_battery_status(battery)));
    unwrap!(spawner.spawn(minute_tick(clock)));
    unwrap!(spawner.spawn(notify(vibrator)));
    unwrap!(spawner.spawn(bluetooth_task(sd, server)));
}
