// =============================================================================
// CPU Utilities (x86)
// =============================================================================
//
// Thin wrappers around the privileged instructions the fault path needs.
// They have no logic beyond executing the instruction.
//
// =============================================================================

/// Disables maskable interrupts on the current CPU.
#[inline(always)]
pub fn disable_interrupts() {
    // SAFETY: CLI only clears IF. In ring 0 it cannot fault.
    unsafe {
        core::arch::asm!("cli", options(nomem, nostack));
    }
}

/// Halts the CPU in an unrecoverable state.
///
/// Disables interrupts and then halts. An NMI can still wake the core, so
/// the halt sits in a loop. Used for CPU exceptions and panics where we
/// can't continue.
#[inline(always)]
pub fn halt_forever() -> ! {
    loop {
        // SAFETY: CLI + HLT in a loop ensures the CPU stays stopped.
        unsafe {
            core::arch::asm!(
                "cli",
                "hlt",
                options(nomem, nostack)
            );
        }
    }
}

/// Reads the current value of the CR2 register.
///
/// CR2 contains the linear address that caused the most recent page fault.
/// Only meaningful inside the page fault handler (vector 14), and only
/// until the next page fault overwrites it, so read it before doing
/// anything that could fault.
#[inline]
pub fn read_cr2() -> usize {
    let value: usize;
    // SAFETY: Reading CR2 is a privileged operation but has no side effects.
    unsafe {
        core::arch::asm!(
            "mov {}, cr2",
            out(reg) value,
            options(nomem, nostack, preserves_flags)
        );
    }
    value
}
