//! Names and classification of the 32 architecturally reserved vectors.

/// Shown for vectors the architecture reserves but doesn't define.
pub const RESERVED: &str = "(Reserved)";

/// Shown for vectors past the exception range.
pub const UNKNOWN: &str = "Unknown";

/// Number of exception vectors (0-31).
pub const EXCEPTION_COUNT: usize = 32;

/// Exception names, indexed by vector.
pub const EXCEPTION_NAMES: [&str; EXCEPTION_COUNT] = [
    "Divide by Zero",
    "Debug",
    "Non-Maskable Interrupt",
    "Breakpoint",
    "Overflow",
    "Bound Range Exceeded",
    "Invalid Opcode",
    "Device Not Available",
    "Double Fault",
    "Coprocessor Segment Overrun",
    "Invalid TSS",
    "Segment Not Present",
    "Stack-Segment Fault",
    "General Protection Fault",
    "Page Fault",
    RESERVED,
    "x87 FPU Error",
    "Alignment Check",
    "Machine Check",
    "SIMD Floating-Point Exception",
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
];

/// A CPU interrupt vector as delivered by the trap entry stub.
///
/// Any `u32` is accepted; only 0-31 are exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Vector(pub u32);

impl Vector {
    pub const DOUBLE_FAULT: Vector = Vector(8);
    pub const INVALID_TSS: Vector = Vector(10);
    pub const SEGMENT_NOT_PRESENT: Vector = Vector(11);
    pub const STACK_SEGMENT_FAULT: Vector = Vector(12);
    pub const GENERAL_PROTECTION: Vector = Vector(13);
    pub const PAGE_FAULT: Vector = Vector(14);
    pub const ALIGNMENT_CHECK: Vector = Vector(17);
    pub const MACHINE_CHECK: Vector = Vector(18);
    pub const CONTROL_PROTECTION: Vector = Vector(21);
    pub const VMM_COMMUNICATION: Vector = Vector(29);
    pub const SECURITY: Vector = Vector(30);

    /// Display name. Never indexes past the table.
    pub fn name(self) -> &'static str {
        EXCEPTION_NAMES
            .get(self.0 as usize)
            .copied()
            .unwrap_or(UNKNOWN)
    }

    pub fn is_exception(self) -> bool {
        (self.0 as usize) < EXCEPTION_COUNT
    }

    /// Whether the vector is in the exception range but has no defined meaning.
    pub fn is_reserved(self) -> bool {
        self.is_exception() && self.name() == RESERVED
    }

    /// Whether the CPU pushes an error code for this vector. For the others
    /// the trap entry stub pushes a dummy zero.
    pub fn pushes_error_code(self) -> bool {
        matches!(
            self,
            Vector::DOUBLE_FAULT
                | Vector::INVALID_TSS
                | Vector::SEGMENT_NOT_PRESENT
                | Vector::STACK_SEGMENT_FAULT
                | Vector::GENERAL_PROTECTION
                | Vector::PAGE_FAULT
                | Vector::ALIGNMENT_CHECK
                | Vector::CONTROL_PROTECTION
                | Vector::VMM_COMMUNICATION
                | Vector::SECURITY
        )
    }

    /// Aborts leave no reliable state behind; even the saved EIP may be junk.
    pub fn is_abort(self) -> bool {
        matches!(self, Vector::DOUBLE_FAULT | Vector::MACHINE_CHECK)
    }
}

impl From<u32> for Vector {
    fn from(raw: u32) -> Self {
        Vector(raw)
    }
}
