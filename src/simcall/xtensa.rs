// CLASSIFICATION: COMMUNITY
// Filename: xtensa.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

use super::{Simcall, SimcallNr, TrapResult};

/// Trap backend issuing the Xtensa ISS `simcall` instruction.
///
/// The opcode travels in `a2` with parameters in `a3..a5`; the ISS leaves
/// the result in `a2` and the host errno in `a3`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XtensaIss;

impl Simcall for XtensaIss {
    fn simcall(&self, nr: SimcallNr, a1: usize, a2: usize, a3: usize) -> TrapResult {
        let mut ret = nr.raw();
        let mut errno = a1;
        unsafe {
            core::arch::asm!(
                "simcall",
                inout("a2") ret,
                inout("a3") errno,
                in("a4") a2,
                in("a5") a3,
                options(nostack)
            );
        }
        TrapResult {
            ret: ret as isize,
            errno: errno as i32,
        }
    }
}
