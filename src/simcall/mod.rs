// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

//! Simulator trap convention and the dispatcher built on it.

use log::trace;

#[cfg(feature = "std")]
pub mod loopback;
#[cfg(target_arch = "xtensa")]
pub mod xtensa;

#[cfg(feature = "std")]
pub use loopback::Loopback;
#[cfg(target_arch = "xtensa")]
pub use xtensa::XtensaIss;

/// Host operations reachable through `simcall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum SimcallNr {
    Read = 3,
    Write = 4,
    Open = 5,
    Close = 6,
    Lseek = 19,
}

impl SimcallNr {
    pub const fn raw(self) -> usize {
        self as usize
    }
}

/// Raw outcome of one trap. `errno` is meaningful only when `ret` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapResult {
    pub ret: isize,
    pub errno: i32,
}

impl TrapResult {
    pub const fn ok(ret: isize) -> Self {
        Self { ret, errno: 0 }
    }

    pub const fn err(errno: i32) -> Self {
        Self { ret: -1, errno }
    }
}

/// A backend able to service the simulator trap convention.
pub trait Simcall {
    /// Perform one synchronous trap with three word parameters.
    fn simcall(&self, nr: SimcallNr, a1: usize, a2: usize, a3: usize) -> TrapResult;
}

impl<S: Simcall + ?Sized> Simcall for &S {
    fn simcall(&self, nr: SimcallNr, a1: usize, a2: usize, a3: usize) -> TrapResult {
        (**self).simcall(nr, a1, a2, a3)
    }
}

/// Issue one trap and fold its errno side channel into the return value.
///
/// A negative raw result becomes the negated errno; anything else passes
/// through unchanged. There is no retry.
pub fn host_call<S: Simcall + ?Sized>(
    sim: &S,
    nr: SimcallNr,
    a1: usize,
    a2: usize,
    a3: usize,
) -> isize {
    let TrapResult { ret, errno } = sim.simcall(nr, a1, a2, a3);
    trace!("simcall {nr:?}({a1:#x}, {a2:#x}, {a3:#x}) -> {ret} errno={errno}");
    if ret < 0 {
        -(errno as isize)
    } else {
        ret
    }
}
