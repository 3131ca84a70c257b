//! The fault report.
//!
//! Field order and label spacing are fixed: people and scripts read these
//! dumps by position. Change nothing here without updating every consumer.

use crate::catalog::Vector;
use crate::frame::FaultContext;
use crate::machine::Machine;
use crate::page_fault::PageFaultDetail;
use crate::sink::{OutputSink, ALERT_STYLE};

use core::fmt;

/// Keeps the whole report within the 25 rows of a VGA text screen.
const REGISTERS_PER_ROW: usize = 4;

/// Renders the report for `context` to `sink`, then halts `machine`.
///
/// Runs with interrupts off and the rest of the kernel in an unknown state:
/// no allocation, no locks, no recursion. The only hardware access besides
/// the sink is a single fault-address read for page faults.
pub fn report<S, M>(context: FaultContext<'_>, sink: &mut S, machine: &mut M) -> !
where
    S: OutputSink + ?Sized,
    M: Machine + ?Sized,
{
    sink.set_style(ALERT_STYLE.raw());
    sink.write("\n*** KERNEL PANIC ***\n");

    let name = context.vector.name();
    sink.write("Exception: ");
    sink.write(name);
    sink.write("\n\n");

    field(sink, "Exception Number: 0x", context.vector.0);
    field(sink, "Error Code:       0x", context.error_code);
    field(sink, "EIP:              0x", context.eip);

    let page_fault = if context.vector == Vector::PAGE_FAULT {
        let detail = PageFaultDetail::new(context.error_code, machine.read_fault_address());
        field(sink, "CR2 (fault addr): 0x", detail.fault_address);

        let [presence, access, privilege] = detail.labels();
        sink.write("Page fault: ");
        sink.write(presence);
        sink.write(" ");
        sink.write(access);
        sink.write(" ");
        sink.write(privilege);
        sink.write("\n");
        Some(detail)
    } else {
        None
    };

    sink.write("\nRegisters:\n");
    for row in context.registers.general_purpose().chunks(REGISTERS_PER_ROW) {
        for &(register, value) in row {
            sink.write("  ");
            sink.write(register);
            sink.write("=0x");
            sink.write_hex(value);
        }
        sink.write("\n");
    }

    sink.write("\nSegments:\n");
    field(sink, "  CS:  0x", context.reported_code_segment());
    for (segment, value) in context.registers.data_segments() {
        sink.write("  ");
        sink.write(segment);
        sink.write(":  0x");
        sink.write_hex(value);
        sink.write("\n");
    }

    sink.write("\nSystem halted.\n");

    log::error!("{}", Summary(&context));
    if let Some(detail) = page_fault {
        log::error!("page fault at {:#010x}: {} {:?}", detail.fault_address, detail, detail.code);
    }

    machine.halt()
}

fn field<S: OutputSink + ?Sized>(sink: &mut S, label: &str, value: u32) {
    sink.write(label);
    sink.write_hex(value);
    sink.write("\n");
}

/// One-line log description of a fault, with what the report leaves to the
/// reader: whether the error code is real and what kind of vector it was.
pub struct Summary<'a, 'b>(pub &'a FaultContext<'b>);

impl fmt::Display for Summary<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = self.0;
        let vector = context.vector;
        write!(f, "{} (vector {}", vector.name(), vector.0)?;
        if vector.is_abort() {
            f.write_str(", abort")?;
        } else if vector.is_reserved() {
            f.write_str(", reserved")?;
        } else if !vector.is_exception() {
            f.write_str(", not an exception")?;
        }
        if vector.pushes_error_code() {
            write!(f, "), error code {:#010x}", context.error_code)?;
        } else {
            write!(f, "), no error code (stub pushed {:#x})", context.error_code)?;
        }
        write!(f, ", eip {:#010x}", context.eip)
    }
}
