//! Hardware Abstraction Layer.
#![cfg_attr(not(test), no_std)]

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod cpu;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod port;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod serial;
pub mod vga;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use serial::Serial;
pub use vga::{Color, ColorCode, Writer};
