// CLASSIFICATION: COMMUNITY
// Filename: flags.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

//! Guest `open()` flags and the bit pattern the ISS expects in `SYS_OPEN`.

use bitflags::bitflags;

bitflags! {
    /// Guest-side `open()` flags (NuttX `fcntl.h` encoding).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        const RDONLY = 1 << 0;
        const WRONLY = 1 << 1;
        const RDWR = Self::RDONLY.bits() | Self::WRONLY.bits();
        const ACCMODE = Self::RDWR.bits();
        const CREAT = 1 << 2;
        const EXCL = 1 << 3;
        const APPEND = 1 << 4;
        const TRUNC = 1 << 5;
        const NONBLOCK = 1 << 6;
        const SYNC = 1 << 7;
        const BINARY = 1 << 8;

        // Unknown bits are carried and ignored by translation.
        const _ = !0;
    }
}

bitflags! {
    /// Simulator-side open flags understood by `SYS_OPEN`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SimcallFlags: u32 {
        const RDONLY = 0;
        const WRONLY = 1;
        const RDWR = 2;
        const APPEND = 0x0008;
        const CREAT = 0x0200;
        const TRUNC = 0x0400;
        const EXCL = 0x0800;
    }
}

/// Access mode selected by the `O_ACCMODE` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    /// Decode the access-mode field. `None` when the field holds no mode.
    pub fn from_flags(flags: OpenFlags) -> Option<Self> {
        let mode = flags & OpenFlags::ACCMODE;
        if mode == OpenFlags::RDONLY {
            Some(AccessMode::ReadOnly)
        } else if mode == OpenFlags::WRONLY {
            Some(AccessMode::WriteOnly)
        } else if mode == OpenFlags::RDWR {
            Some(AccessMode::ReadWrite)
        } else {
            None
        }
    }

    pub fn simcall_bits(self) -> SimcallFlags {
        match self {
            AccessMode::ReadOnly => SimcallFlags::RDONLY,
            AccessMode::WriteOnly => SimcallFlags::WRONLY,
            AccessMode::ReadWrite => SimcallFlags::RDWR,
        }
    }
}

const MODIFIERS: [(OpenFlags, SimcallFlags); 4] = [
    (OpenFlags::APPEND, SimcallFlags::APPEND),
    (OpenFlags::TRUNC, SimcallFlags::TRUNC),
    (OpenFlags::CREAT, SimcallFlags::CREAT),
    (OpenFlags::EXCL, SimcallFlags::EXCL),
];

/// Translate guest `open()` flags into the simulator encoding.
///
/// An access-mode field holding no mode leaves the translated mode at zero;
/// the host reports any resulting failure when the trap runs.
pub fn translate_open_flags(flags: OpenFlags) -> SimcallFlags {
    let mut out = AccessMode::from_flags(flags)
        .map(AccessMode::simcall_bits)
        .unwrap_or_else(SimcallFlags::empty);
    for (guest, host) in MODIFIERS {
        if flags.contains(guest) {
            out |= host;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_modes_map_one_to_one() {
        assert_eq!(translate_open_flags(OpenFlags::RDONLY).bits(), 0);
        assert_eq!(translate_open_flags(OpenFlags::WRONLY).bits(), 1);
        assert_eq!(translate_open_flags(OpenFlags::RDWR).bits(), 2);
    }

    #[test]
    fn empty_access_field_translates_to_zero() {
        assert_eq!(AccessMode::from_flags(OpenFlags::empty()), None);
        assert!(translate_open_flags(OpenFlags::empty()).is_empty());
        assert!(translate_open_flags(OpenFlags::NONBLOCK | OpenFlags::SYNC).is_empty());
    }

    #[test]
    fn modifiers_compose_independently() {
        let modes = [OpenFlags::RDONLY, OpenFlags::WRONLY, OpenFlags::RDWR, OpenFlags::empty()];
        for mode in modes {
            let base = translate_open_flags(mode);
            for bits in 0u32..16 {
                let mut guest = mode;
                let mut expect = base;
                for (i, (g, h)) in MODIFIERS.iter().enumerate() {
                    if bits & (1 << i) != 0 {
                        guest |= *g;
                        expect |= *h;
                    }
                }
                assert_eq!(translate_open_flags(guest), expect, "flags {guest:?}");
            }
        }
    }

    #[test]
    fn typical_create_for_write() {
        let guest = OpenFlags::WRONLY | OpenFlags::CREAT | OpenFlags::TRUNC;
        assert_eq!(translate_open_flags(guest).bits(), 0x0601);
    }

    #[test]
    fn raw_bits_survive_conversion() {
        let guest = OpenFlags::from_bits_retain(0x8000_0002);
        assert_eq!(translate_open_flags(guest), SimcallFlags::WRONLY);
    }
}
