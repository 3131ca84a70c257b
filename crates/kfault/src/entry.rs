//! Bare-metal glue between the assembly trampoline and [`report`](crate::report::report).
//!
//! Each exception stub pushes a dummy error code if the CPU didn't, pushes
//! its vector number, then jumps to the common stub, which saves
//! `pushad` and the data segments and calls:
//!
//! ```text
//! exception_handler(vector, error_code, eip, esp_after_saves)
//! ```
//!
//! The fourth argument points at a [`RegisterSnapshot`](crate::RegisterSnapshot).

/// Brings up what the fault path writes to besides the screen: COM1 and
/// the `log` backend. Call once during early boot, before the IDT is live.
pub fn init() {
    klog::init();
    klog::debug!("fault reporter ready");
}

/// Entry point for every CPU exception.
///
/// # Safety
///
/// Only the common exception stub may call this, with interrupts disabled
/// and `registers` pointing at the frame it just pushed.
#[cfg(feature = "hw-entry")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn exception_handler(
    vector: u32,
    error_code: u32,
    eip: u32,
    registers: *const crate::RegisterSnapshot,
) -> ! {
    use khal::vga;

    use crate::frame::{FaultContext, RegisterSnapshot};
    use crate::machine::X86Machine;
    use crate::report::report;

    static EMPTY_SNAPSHOT: RegisterSnapshot = RegisterSnapshot::filled(0);

    // Interrupt gates already cleared IF; trap gates didn't.
    khal::cpu::disable_interrupts();

    let mut machine = X86Machine;
    // SAFETY: the stub passes its own stack frame, valid until we halt.
    let registers = unsafe { registers.as_ref() }.unwrap_or(&EMPTY_SNAPSHOT);
    let context = FaultContext::new(vector, error_code, eip, registers);

    // SAFETY: low memory is identity mapped, and from here on this is the
    // only code running.
    let mut screen = vga::Writer::new(unsafe { vga::text_buffer() });

    #[cfg(feature = "serial-mirror")]
    {
        let mut sink = crate::sink::Tee::new(&mut screen, crate::sink::SerialSink);
        report(context, &mut sink, &mut machine)
    }

    #[cfg(not(feature = "serial-mirror"))]
    report(context, &mut screen, &mut machine)
}
