// =============================================================================
// ProbablyFineOS — CPU Exception Reporter
// =============================================================================
//
// The last line of defense. When the CPU raises one of the exceptions 0-31
// the trap entry stub saves the registers and hands them here. We:
//   1. Switch the console to white-on-red
//   2. Print the exception name, number, error code and EIP
//   3. For page faults, print CR2 and decode the error code
//   4. Dump the general-purpose registers and segment selectors
//   5. Halt the CPU. Nothing is resumed, retried or recovered.
//
// The code runs with the rest of the kernel in an unknown state, so it
// allocates nothing, takes no blocking locks, and touches hardware only
// through the `OutputSink` and `Machine` traits. That also makes the whole
// report testable on the host with fakes.
//
// =============================================================================

#![cfg_attr(not(test), no_std)]

pub mod catalog;
pub mod frame;
pub mod machine;
pub mod page_fault;
pub mod report;
pub mod sink;

#[cfg(all(target_arch = "x86", target_os = "none"))]
pub mod entry;

pub use catalog::Vector;
pub use frame::{FaultContext, RegisterSnapshot};
pub use machine::Machine;
pub use page_fault::PageFaultDetail;
pub use report::report;
pub use sink::{OutputSink, Tee};
