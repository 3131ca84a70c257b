//! Page fault (vector 14) error code decoding.

use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Error code pushed by the CPU for a page fault.
    ///
    /// Only the low three bits are shown in the report; the rest are
    /// decoded so log records can mention them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PageFaultErrorCode: u32 {
        /// Set: protection violation on a present page. Clear: page not present.
        const PRESENT = 1 << 0;
        /// Set: the access was a write. Clear: a read.
        const WRITE = 1 << 1;
        /// Set: the access came from ring 3.
        const USER = 1 << 2;
        /// A reserved bit was set in some paging-structure entry.
        const RESERVED_WRITE = 1 << 3;
        /// The access was an instruction fetch (needs NX).
        const INSTRUCTION_FETCH = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    NotPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Write,
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    User,
    Kernel,
}

impl Presence {
    pub fn label(self) -> &'static str {
        match self {
            Presence::Present => "Present",
            Presence::NotPresent => "Not-present",
        }
    }
}

impl Access {
    pub fn label(self) -> &'static str {
        match self {
            Access::Write => "Write",
            Access::Read => "Read",
        }
    }
}

impl Privilege {
    pub fn label(self) -> &'static str {
        match self {
            Privilege::User => "User-mode",
            Privilege::Kernel => "Kernel-mode",
        }
    }
}

/// What the report says about a page fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFaultDetail {
    /// Linear address from CR2.
    pub fault_address: u32,
    pub code: PageFaultErrorCode,
}

impl PageFaultDetail {
    pub fn new(error_code: u32, fault_address: u32) -> Self {
        Self {
            fault_address,
            code: PageFaultErrorCode::from_bits_retain(error_code),
        }
    }

    pub fn presence(&self) -> Presence {
        if self.code.contains(PageFaultErrorCode::PRESENT) {
            Presence::Present
        } else {
            Presence::NotPresent
        }
    }

    pub fn access(&self) -> Access {
        if self.code.contains(PageFaultErrorCode::WRITE) {
            Access::Write
        } else {
            Access::Read
        }
    }

    pub fn privilege(&self) -> Privilege {
        if self.code.contains(PageFaultErrorCode::USER) {
            Privilege::User
        } else {
            Privilege::Kernel
        }
    }

    /// The three reported facets, in report order.
    pub fn labels(&self) -> [&'static str; 3] {
        [
            self.presence().label(),
            self.access().label(),
            self.privilege().label(),
        ]
    }
}

/// Renders the facets the way the report line does: `Present Write User-mode`.
impl fmt::Display for PageFaultDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [presence, access, privilege] = self.labels();
        write!(f, "{presence} {access} {privilege}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_eight_low_bit_patterns_decode_independently() {
        let expected = [
            "Not-present Read Kernel-mode",
            "Present Read Kernel-mode",
            "Not-present Write Kernel-mode",
            "Present Write Kernel-mode",
            "Not-present Read User-mode",
            "Present Read User-mode",
            "Not-present Write User-mode",
            "Present Write User-mode",
        ];
        for (code, line) in expected.iter().enumerate() {
            let detail = PageFaultDetail::new(code as u32, 0);
            assert_eq!(detail.to_string(), *line, "error code {code:#05b}");
        }
    }

    #[test]
    fn upper_bits_do_not_disturb_the_facets() {
        let detail = PageFaultDetail::new(0xFFFF_FFF8 | 0b101, 0x1000);
        assert_eq!(detail.presence(), Presence::Present);
        assert_eq!(detail.access(), Access::Read);
        assert_eq!(detail.privilege(), Privilege::User);
        assert!(detail.code.contains(PageFaultErrorCode::INSTRUCTION_FETCH));
        assert!(detail.code.contains(PageFaultErrorCode::RESERVED_WRITE));
    }

    #[test]
    fn fault_address_is_kept_verbatim() {
        assert_eq!(PageFaultDetail::new(7, 0xDEAD_BEEF).fault_address, 0xDEAD_BEEF);
    }
}
