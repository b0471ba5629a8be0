//! Serial CW keyer firmware entry point.
//!
//! 1. Bring up the service console UART and every keyer peripheral
//! 2. Start the RX pump and console/log tasks on core 1
//! 3. Announce on the keyer serial line and run the keyer loop on the
//!    main task forever
//!
//! On a host build this binary is empty; the logic lives in the library
//! and is exercised by the tests.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(not(target_os = "espidf"))]
fn main() {}

#[cfg(target_os = "espidf")]
mod firmware {
    use core::ffi::c_void;

    use esp_idf_svc::hal::delay::{Delay, TickType};
    use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
    use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{config::Config, UartDriver, UartRxDriver, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::{self as esp_idf_sys, EspError};

    use serial_cw_keyer::config::CONFIG;
    use serial_cw_keyer::console::Console;
    use serial_cw_keyer::element::ElementKeyer;
    use serial_cw_keyer::globals::{BG_LOG, KEYER_LOG, RX_QUEUE, STATS};
    use serial_cw_keyer::hal::esp::{sidetone_timer_config, LedcSidetone};
    use serial_cw_keyer::keyer::{Keyer, KeyerShared};
    use serial_cw_keyer::paddle::Paddles;
    use serial_cw_keyer::rx_queue::{BacklogWatch, RxFull};
    use serial_cw_keyer::uart_logger::{drain_logs, CrlfWriter, UartLoggerConfig};
    use serial_cw_keyer::{rt_error, rt_info, rt_warn};

    /// Keyer serial line speed.
    const KEYER_BAUD: u32 = 9600;

    /// Keyer UART driver RX ring, in bytes.
    const KEYER_RX_RING: usize = 1024;

    /// Backlog counted as full: one hardware FIFO short of the ring.
    const KEYER_RX_LIMIT: usize = KEYER_RX_RING - 128;

    /// Delays at or above this use the scheduler instead of spinning.
    const DELAY_SPIN_LIMIT_US: u32 = 1000;

    /// Core for the RX pump and console tasks. The keyer owns core 0.
    const SERVICE_CORE: i32 = 1;

    fn timestamp_us() -> i64 {
        unsafe { esp_idf_sys::esp_timer_get_time() }
    }

    /// Drivers handed to the console/log task.
    struct ConsoleIo {
        tx: UartTxDriver<'static>,
        rx: UartRxDriver<'static>,
    }

    #[no_mangle]
    fn main() {
        esp_idf_sys::link_patches();

        if let Err(e) = start() {
            rt_error!(BG_LOG, timestamp_us(), "startup failed: {}", e);
            unsafe {
                esp_idf_sys::vTaskDelay(1000);
                esp_idf_sys::esp_restart();
            }
        }
    }

    /// Only returns on a startup error. The task contexts live in this
    /// frame, so nothing fallible may follow the task spawns.
    fn start() -> Result<(), EspError> {
        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        // Service console + log output (UART1)
        let log_cfg = UartLoggerConfig::default();
        let console_uart = UartDriver::new(
            peripherals.uart1,
            pins.gpio6,
            pins.gpio7,
            Option::<AnyIOPin>::None, // CTS
            Option::<AnyIOPin>::None, // RTS
            &Config::default().baudrate(Hertz(log_cfg.baud_rate)),
        )?;
        let (tx, rx) = console_uart.into_split();
        let mut console_io = ConsoleIo { tx, rx };

        // Keyer serial line (UART0)
        let keyer_uart = UartDriver::new(
            peripherals.uart0,
            pins.gpio43,
            pins.gpio44,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &Config::default().baudrate(Hertz(KEYER_BAUD)).rx_fifo_size(KEYER_RX_RING),
        )?;
        let (keyer_tx, mut keyer_rx) = keyer_uart.into_split();

        // Paddles, active low with pull-ups
        let mut dit = PinDriver::input(pins.gpio4)?;
        dit.set_pull(Pull::Up)?;
        let mut dah = PinDriver::input(pins.gpio5)?;
        dah.set_pull(Pull::Up)?;

        let mut key = PinDriver::output(pins.gpio15)?;
        key.set_low()?;

        let tone_timer = LedcTimerDriver::new(peripherals.ledc.timer0, &sidetone_timer_config())?;
        let tone = LedcSidetone::new(LedcDriver::new(peripherals.ledc.channel0, tone_timer, pins.gpio16)?)?;

        let output = ElementKeyer::new(key, tone, Delay::new(DELAY_SPIN_LIMIT_US), CONFIG.timing());
        let mut keyer = Keyer::new(Paddles::new(dit, dah), output, keyer_tx, KeyerShared::global());

        // All hardware is up. No `?` past this point.
        spawn(c"console", console_task, &mut console_io as *mut ConsoleIo as *mut c_void, 6144, 3);
        spawn(c"rx_pump", rx_pump_task, &mut keyer_rx as *mut UartRxDriver<'static> as *mut c_void, 4096, 4);

        rt_info!(BG_LOG, timestamp_us(), "{} started", serial_cw_keyer::console::console::VERSION);
        if let Err(e) = keyer.announce() {
            rt_error!(KEYER_LOG, 0, "announce: {}", e);
        }

        keyer.run()
    }

    fn spawn(
        name: &core::ffi::CStr,
        task: unsafe extern "C" fn(*mut c_void),
        arg: *mut c_void,
        stack: u32,
        priority: u32,
    ) {
        let created = unsafe {
            esp_idf_sys::xTaskCreatePinnedToCore(
                Some(task),
                name.as_ptr(),
                stack,
                arg,
                priority,
                core::ptr::null_mut(),
                SERVICE_CORE,
            )
        };
        if created != 1 {
            rt_error!(BG_LOG, timestamp_us(), "task {:?} not created", name);
        }
    }

    /// Bytes waiting in the keyer UART driver ring.
    fn keyer_rx_backlog() -> usize {
        let mut len = 0usize;
        // UART0 carries the keyer line
        let err = unsafe { esp_idf_sys::uart_get_buffered_data_len(0, &mut len) };
        match EspError::convert(err) {
            Ok(()) => len,
            Err(_) => 0,
        }
    }

    /// Moves inbound keyer serial bytes into the RX queue.
    ///
    /// Reads only as many bytes as the queue has room for. While the queue
    /// is full, text backs up in the UART driver ring. The line has no flow
    /// control, so once that ring fills the driver drops bytes; each time
    /// the backlog reaches [`KEYER_RX_LIMIT`] it is counted and logged.
    unsafe extern "C" fn rx_pump_task(arg: *mut c_void) {
        // SAFETY: points into main's frame, which never returns after spawning.
        let uart = unsafe { &mut *(arg as *mut UartRxDriver<'static>) };
        let mut buf = [0u8; 16];
        let mut backlog = BacklogWatch::new(KEYER_RX_LIMIT);

        loop {
            let pending = keyer_rx_backlog();
            if backlog.observe(pending) {
                STATS.record_rx_uart_full();
                rt_warn!(BG_LOG, timestamp_us(), "keyer uart backlog {} bytes, input may be lost", pending);
            }

            let room = RX_QUEUE.available().min(buf.len());
            if room == 0 {
                unsafe { esp_idf_sys::vTaskDelay(1) };
                continue;
            }

            match uart.read(&mut buf[..room], TickType::new_millis(20).ticks()) {
                Ok(n) => {
                    for &b in &buf[..n] {
                        if let Err(RxFull(b)) = RX_QUEUE.push(b) {
                            rt_warn!(BG_LOG, timestamp_us(), "rx queue refused 0x{:02X}", b);
                        }
                    }
                }
                Err(e) => {
                    rt_error!(BG_LOG, timestamp_us(), "keyer uart read: {}", e);
                    unsafe { esp_idf_sys::vTaskDelay(10) };
                }
            }
        }
    }

    /// Service console input and log output on UART1.
    unsafe extern "C" fn console_task(arg: *mut c_void) {
        // SAFETY: points into main's frame, which never returns after spawning.
        let io = unsafe { &mut *(arg as *mut ConsoleIo) };
        let mut console = Console::new();
        console.print_banner(&mut CrlfWriter(&mut io.tx));

        let mut byte = [0u8; 1];
        loop {
            drain_logs(&mut CrlfWriter(&mut io.tx), &[("keyer", &KEYER_LOG), ("bg", &BG_LOG)]);

            if let Ok(1) = io.rx.read(&mut byte, TickType::new_millis(10).ticks()) {
                console.process_byte(byte[0], &mut CrlfWriter(&mut io.tx));
            }
        }
    }
}
