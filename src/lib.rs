// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.1
// Date Modified: 2026-10-14
// Author: Lukas Bower

//! Host filesystem bridge for Cohesix guests running under the Xtensa ISS.
//!
//! Guest file requests are translated into the simulator's `simcall` trap
//! convention: one opcode, three word parameters and an errno side channel.
//! Only open/close/read/write/lseek reach the host; the remaining operations
//! are fixed responses because the simulator has no directory support.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(target_arch = "xtensa", feature(asm_experimental_arch))]

/// Guest errno values and the crate error type.
pub mod errno;

/// Guest `open()` flags and their simulator encoding.
pub mod flags;

/// Trap dispatch and simulator backends.
pub mod simcall;

/// Guest-facing host filesystem operations.
pub mod hostfs;

/// Process-wide loopback settings.
#[cfg(feature = "std")]
pub mod config;

/// C entry points linked by the OS VFS layer.
#[cfg(feature = "ffi")]
pub mod ffi;

pub use errno::{Errno, HostfsError};
pub use flags::{translate_open_flags, AccessMode, OpenFlags, SimcallFlags};
pub use hostfs::{HostDir, HostDirent, HostFd, HostFs, HostStat, HostStatfs};
pub use simcall::{host_call, Simcall, SimcallNr, TrapResult};
