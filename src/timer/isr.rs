use crate::driver::OokDriver;
use crate::radio::{TransmissionBuffer, Transmitter};
use core::cell::RefCell;
use core::convert::Infallible;
use core::fmt;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

/// A transmitter that can be used from several places without overlapping sends.
///
/// The radio has one active frequency and modulation at a time, so two requests
/// must never be interleaved. `SharedTransmitter` keeps the transmitter inside a
/// `critical_section::Mutex`; every [`Transmitter::transmit`] call through a
/// `&SharedTransmitter` runs to completion inside a critical section.
///
/// The owner decides where it lives. It can be a local passed by reference, or a
/// `static` when an interrupt handler also needs it.
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::delay::NoopDelay;
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State, Transaction};
/// use ook_remote::controller::RemoteController;
/// use ook_remote::consts::MATTRESS_FREQUENCY_HZ;
/// use ook_remote::timer::{PinTransmitter, SharedTransmitter};
///
/// # let pin = Pin::new(&[Transaction::set(State::Low)]);
/// let radio = PinTransmitter::new(pin, NoopDelay::new(), MATTRESS_FREQUENCY_HZ).unwrap();
/// let shared = SharedTransmitter::new(radio);
/// let bedroom = RemoteController::new(&shared, None);
/// let schedule = RemoteController::new(&shared, None);
/// # drop(bedroom); drop(schedule);
/// # let (mut pin, _) = shared.into_inner().release();
/// # pin.done();
/// ```
pub struct SharedTransmitter<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> fmt::Debug for SharedTransmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTransmitter").finish_non_exhaustive()
    }
}

impl<T> SharedTransmitter<T> {
    /// Wraps `transmitter`.
    pub const fn new(transmitter: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(transmitter)),
        }
    }

    /// Runs `f` with exclusive access to the transmitter.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|cs| {
            let mut transmitter = self.inner.borrow_ref_mut(cs);
            f(&mut *transmitter)
        })
    }

    /// Returns the transmitter.
    pub fn into_inner(self) -> T {
        self.inner.into_inner().into_inner()
    }
}

impl<T: Transmitter> Transmitter for &SharedTransmitter<T> {
    type Error = T::Error;

    fn transmit(&mut self, buffer: &TransmissionBuffer) -> Result<(), Self::Error> {
        self.with(|transmitter| transmitter.transmit(buffer))
    }
}

/// Slot holding an interrupt-driven [`OokDriver`].
pub type DriverSlot<TX> = Mutex<RefCell<Option<OokDriver<TX>>>>;

/// Used to initialize an empty [`DriverSlot`], for instance in a `static`.
///
/// # Example
/// ```rust,ignore
/// use ook_remote::timer::{DriverSlot, driver_slot};
/// use some_hal::PD1;
///
/// static RADIO: DriverSlot<PD1> = driver_slot::<PD1>();
/// ```
pub const fn driver_slot<TX: OutputPin>() -> DriverSlot<TX> {
    Mutex::new(RefCell::new(None))
}

/// Places a new driver in `slot`, replacing any previous one.
///
/// # Arguments
/// * The slot
/// * The tx pin
/// * The number of timer ticks per symbol, see [`ticks_per_symbol`](crate::timer::ticks_per_symbol)
pub fn driver_setup<TX: OutputPin>(slot: &DriverSlot<TX>, tx: TX, ticks_per_symbol: u8) {
    critical_section::with(|cs| {
        let _ = slot
            .borrow(cs)
            .replace(Some(OokDriver::new(tx, ticks_per_symbol)));
    });
}

/// Loads `buffer` into the driver in `slot`.
///
/// # Returns
/// - `Err(nb::Error::WouldBlock)` while the driver is busy or the slot is empty
pub fn driver_start<TX: OutputPin>(
    slot: &DriverSlot<TX>,
    buffer: &TransmissionBuffer,
) -> nb::Result<(), Infallible> {
    critical_section::with(|cs| match slot.borrow_ref_mut(cs).as_mut() {
        Some(driver) => driver.start(buffer),
        None => Err(nb::Error::WouldBlock),
    })
}

/// Runs the tick at each interrupt
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     driver_tick(&RADIO);
/// }
/// ```
pub fn driver_tick<TX: OutputPin>(slot: &DriverSlot<TX>) {
    critical_section::with(|cs| {
        if let Some(driver) = slot.borrow_ref_mut(cs).as_mut() {
            driver.tick();
        }
    });
}

/// Returns `Ok` once the driver in `slot` is idle (or the slot is empty).
pub fn driver_wait_sent<TX: OutputPin>(slot: &DriverSlot<TX>) -> nb::Result<(), Infallible> {
    critical_section::with(|cs| match slot.borrow_ref(cs).as_ref() {
        Some(driver) => driver.wait_sent(),
        None => Ok(()),
    })
}
