// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

//! Guest-facing host filesystem operations.
//!
//! Only open, close, read, write and lseek reach the simulator. Everything
//! else answers with a fixed value because the ISS exposes no directory,
//! metadata or namespace services.

use core::ffi::CStr;

use log::debug;

use crate::errno::{check, HostfsError};
use crate::flags::{translate_open_flags, OpenFlags};
use crate::simcall::{host_call, Simcall, SimcallNr};

mod types;

pub use types::{HostDir, HostDirent, HostStat, HostStatfs, NAME_MAX, S_IFDIR, S_IFMT, S_IFREG};

pub const SEEK_SET: i32 = 0;
pub const SEEK_CUR: i32 = 1;
pub const SEEK_END: i32 = 2;

/// Host descriptor returned by `SYS_OPEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostFd(pub i32);

impl HostFd {
    pub const fn raw(self) -> i32 {
        self.0
    }

    fn word(self) -> usize {
        self.0 as isize as usize
    }
}

fn unsupported<T>(op: &str) -> Result<T, HostfsError> {
    debug!("hostfs {op}: not supported");
    Err(HostfsError::Unsupported)
}

/// Filesystem operations issued through a [`Simcall`] backend.
#[derive(Debug, Default, Clone)]
pub struct HostFs<S> {
    sim: S,
}

impl<S: Simcall> HostFs<S> {
    pub const fn new(sim: S) -> Self {
        Self { sim }
    }

    pub fn backend(&self) -> &S {
        &self.sim
    }

    pub fn into_backend(self) -> S {
        self.sim
    }

    fn call(&self, nr: SimcallNr, a1: usize, a2: usize, a3: usize) -> Result<usize, HostfsError> {
        check(host_call(&self.sim, nr, a1, a2, a3))
    }

    pub fn open(&self, path: &CStr, flags: OpenFlags, mode: u32) -> Result<HostFd, HostfsError> {
        self.open_raw(path.as_ptr() as usize, flags, mode)
    }

    /// `open` with the path passed as a guest address; null reaches the host.
    pub(crate) fn open_raw(
        &self,
        path: usize,
        flags: OpenFlags,
        mode: u32,
    ) -> Result<HostFd, HostfsError> {
        let host_flags = translate_open_flags(flags);
        let fd = self.call(SimcallNr::Open, path, host_flags.bits() as usize, mode as usize)?;
        Ok(HostFd(fd as i32))
    }

    pub fn close(&self, fd: HostFd) -> Result<(), HostfsError> {
        self.call(SimcallNr::Close, fd.word(), 0, 0).map(drop)
    }

    pub fn read(&self, fd: HostFd, buf: &mut [u8]) -> Result<usize, HostfsError> {
        self.read_raw(fd, buf.as_mut_ptr() as usize, buf.len())
    }

    pub fn write(&self, fd: HostFd, buf: &[u8]) -> Result<usize, HostfsError> {
        self.write_raw(fd, buf.as_ptr() as usize, buf.len())
    }

    pub(crate) fn read_raw(
        &self,
        fd: HostFd,
        buf: usize,
        len: usize,
    ) -> Result<usize, HostfsError> {
        self.call(SimcallNr::Read, fd.word(), buf, len)
    }

    pub(crate) fn write_raw(
        &self,
        fd: HostFd,
        buf: usize,
        len: usize,
    ) -> Result<usize, HostfsError> {
        self.call(SimcallNr::Write, fd.word(), buf, len)
    }

    /// Reposition the host offset; `whence` is forwarded untranslated.
    pub fn lseek(&self, fd: HostFd, offset: isize, whence: i32) -> Result<usize, HostfsError> {
        self.call(
            SimcallNr::Lseek,
            fd.word(),
            offset as usize,
            whence as isize as usize,
        )
    }

    pub fn ioctl(&self, _fd: HostFd, _request: i32, _arg: usize) -> Result<i32, HostfsError> {
        unsupported("ioctl")
    }

    pub fn sync(&self, _fd: HostFd) {}

    pub fn dup(&self, _fd: HostFd) -> Result<HostFd, HostfsError> {
        unsupported("dup")
    }

    /// Always a regular file with mode 0777 and zero size.
    pub fn fstat(&self, _fd: HostFd) -> Result<HostStat, HostfsError> {
        Ok(HostStat::with_mode(S_IFREG | 0o777))
    }

    pub fn ftruncate(&self, _fd: HostFd, _length: isize) -> Result<(), HostfsError> {
        unsupported("ftruncate")
    }

    pub fn opendir(&self, _path: &CStr) -> Option<HostDir> {
        debug!("hostfs opendir: not supported");
        None
    }

    pub fn readdir(&self, _dir: &mut HostDir, _entry: &mut HostDirent) -> Result<(), HostfsError> {
        unsupported("readdir")
    }

    pub fn rewinddir(&self, _dir: &mut HostDir) {}

    pub fn closedir(&self, _dir: HostDir) -> Result<(), HostfsError> {
        unsupported("closedir")
    }

    pub fn statfs(&self, _path: &CStr) -> Result<HostStatfs, HostfsError> {
        Ok(HostStatfs::default())
    }

    pub fn unlink(&self, _path: &CStr) -> Result<(), HostfsError> {
        unsupported("unlink")
    }

    pub fn mkdir(&self, _path: &CStr, _mode: u32) -> Result<(), HostfsError> {
        unsupported("mkdir")
    }

    pub fn rmdir(&self, path: &CStr) -> Result<(), HostfsError> {
        self.unlink(path)
    }

    pub fn rename(&self, _old: &CStr, _new: &CStr) -> Result<(), HostfsError> {
        unsupported("rename")
    }

    /// Stat a path by opening it. Never fails.
    ///
    /// Any failure along open, fstat or close yields a directory with mode
    /// 0777, since the simulator cannot open directories.
    pub fn stat(&self, path: &CStr) -> HostStat {
        self.stat_raw(path.as_ptr() as usize)
    }

    pub(crate) fn stat_raw(&self, path: usize) -> HostStat {
        let res = self.open_raw(path, OpenFlags::RDONLY, 0).and_then(|fd| {
            let st = self.fstat(fd);
            let _ = self.close(fd);
            st
        });
        match res {
            Ok(st) => st,
            Err(err) => {
                debug!("hostfs stat {path:#x}: {err}, assuming directory");
                HostStat::with_mode(S_IFDIR | 0o777)
            }
        }
    }
}
