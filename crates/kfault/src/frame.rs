//! The machine state handed over by the trap entry stub.
//!
//! The stub does `pushad; push ds; push es; push fs; push gs` (after the
//! vector and error code), then passes the final stack pointer. Reading
//! upward from that pointer the words are gs, fs, es, ds, then pushad's
//! edi..eax. [`RegisterSnapshot`] mirrors that layout exactly; if the stub
//! changes its push order, the layout assertions below must change with it.

use core::mem::{offset_of, size_of};

use crate::catalog::Vector;

/// Saved segment selectors and general-purpose registers, in stack order.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub gs: u32,
    pub fs: u32,
    pub es: u32,
    pub ds: u32,
    pub edi: u32,
    pub esi: u32,
    pub ebp: u32,
    /// ESP as pushad saw it, i.e. pointing into the trap frame.
    pub esp: u32,
    pub ebx: u32,
    pub edx: u32,
    pub ecx: u32,
    pub eax: u32,
}

// Layout contract with the trap entry stub.
const _: () = {
    assert!(size_of::<RegisterSnapshot>() == 12 * 4);
    assert!(offset_of!(RegisterSnapshot, gs) == 0);
    assert!(offset_of!(RegisterSnapshot, fs) == 4);
    assert!(offset_of!(RegisterSnapshot, es) == 8);
    assert!(offset_of!(RegisterSnapshot, ds) == 12);
    assert!(offset_of!(RegisterSnapshot, edi) == 16);
    assert!(offset_of!(RegisterSnapshot, esi) == 20);
    assert!(offset_of!(RegisterSnapshot, ebp) == 24);
    assert!(offset_of!(RegisterSnapshot, esp) == 28);
    assert!(offset_of!(RegisterSnapshot, ebx) == 32);
    assert!(offset_of!(RegisterSnapshot, edx) == 36);
    assert!(offset_of!(RegisterSnapshot, ecx) == 40);
    assert!(offset_of!(RegisterSnapshot, eax) == 44);
};

impl RegisterSnapshot {
    /// Every register and selector set to `value`.
    pub const fn filled(value: u32) -> Self {
        Self {
            gs: value,
            fs: value,
            es: value,
            ds: value,
            edi: value,
            esi: value,
            ebp: value,
            esp: value,
            ebx: value,
            edx: value,
            ecx: value,
            eax: value,
        }
    }

    /// General-purpose registers in report order.
    pub fn general_purpose(&self) -> [(&'static str, u32); 8] {
        [
            ("EAX", self.eax),
            ("EBX", self.ebx),
            ("ECX", self.ecx),
            ("EDX", self.edx),
            ("ESI", self.esi),
            ("EDI", self.edi),
            ("EBP", self.ebp),
            ("ESP", self.esp),
        ]
    }

    /// Data segment selectors in report order.
    pub fn data_segments(&self) -> [(&'static str, u32); 4] {
        [
            ("DS", self.ds),
            ("ES", self.es),
            ("FS", self.fs),
            ("GS", self.gs),
        ]
    }
}

/// Everything known about one exception. Built by the entry stub, consumed
/// once by [`report`](crate::report).
#[derive(Debug, Clone, Copy)]
pub struct FaultContext<'a> {
    pub vector: Vector,
    /// CPU-pushed error code, or the stub's dummy zero.
    pub error_code: u32,
    pub eip: u32,
    pub registers: &'a RegisterSnapshot,
}

impl<'a> FaultContext<'a> {
    pub fn new(vector: u32, error_code: u32, eip: u32, registers: &'a RegisterSnapshot) -> Self {
        Self {
            vector: Vector(vector),
            error_code,
            eip,
            registers,
        }
    }

    /// The CS value shown in the report.
    ///
    /// Historically taken from the upper 16 bits of the EIP stack slot
    /// rather than from the CPU-pushed CS word. Downstream dump parsers
    /// expect this value, so it is kept as is; it does not equal the real
    /// code segment selector.
    pub fn reported_code_segment(&self) -> u32 {
        self.eip >> 16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a snapshot from words laid out as the entry stub pushes them.
    fn from_stack_words(words: [u32; 12]) -> RegisterSnapshot {
        // SAFETY: `RegisterSnapshot` is `repr(C)`, twelve `u32`s, no padding.
        unsafe { core::mem::transmute(words) }
    }

    #[test]
    fn fields_follow_push_order() {
        let snapshot = from_stack_words([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(snapshot.gs, 1);
        assert_eq!(snapshot.fs, 2);
        assert_eq!(snapshot.es, 3);
        assert_eq!(snapshot.ds, 4);
        assert_eq!(snapshot.edi, 5);
        assert_eq!(snapshot.esi, 6);
        assert_eq!(snapshot.ebp, 7);
        assert_eq!(snapshot.esp, 8);
        assert_eq!(snapshot.ebx, 9);
        assert_eq!(snapshot.edx, 10);
        assert_eq!(snapshot.ecx, 11);
        assert_eq!(snapshot.eax, 12);
    }

    #[test]
    fn report_order_reads_by_name() {
        let snapshot = from_stack_words([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        let values: Vec<u32> = snapshot.general_purpose().iter().map(|&(_, v)| v).collect();
        assert_eq!(values, [12, 9, 11, 10, 6, 5, 7, 8]);

        let names: Vec<&str> = snapshot.data_segments().iter().map(|&(n, _)| n).collect();
        assert_eq!(names, ["DS", "ES", "FS", "GS"]);
        let segments: Vec<u32> = snapshot.data_segments().iter().map(|&(_, v)| v).collect();
        assert_eq!(segments, [4, 3, 2, 1]);
    }

    #[test]
    fn code_segment_comes_from_the_upper_half_of_eip() {
        let registers = RegisterSnapshot::default();
        let context = FaultContext::new(13, 0, 0x0008_1234, &registers);
        assert_eq!(context.reported_code_segment(), 0x0008);

        let context = FaultContext::new(0, 0, 0x0010_0234, &registers);
        assert_eq!(context.reported_code_segment(), 0x0010);
    }
}
