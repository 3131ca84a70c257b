//! CPU capabilities the reporter needs beyond the saved state.

/// Access to the processor on the fault path.
pub trait Machine {
    /// Linear address of the last page fault (CR2 on x86).
    ///
    /// The next page fault overwrites it, so call this before anything
    /// that could fault, and only once per report.
    fn read_fault_address(&mut self) -> u32;

    /// Stops the processor for good: interrupts off, then halt forever.
    fn halt(&mut self) -> !;
}

/// The real processor.
#[cfg(target_arch = "x86")]
pub struct X86Machine;

#[cfg(target_arch = "x86")]
impl Machine for X86Machine {
    fn read_fault_address(&mut self) -> u32 {
        // `usize` is 32 bits on this target.
        khal::cpu::read_cr2() as u32
    }

    fn halt(&mut self) -> ! {
        khal::cpu::halt_forever()
    }
}
