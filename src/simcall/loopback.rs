// CLASSIFICATION: COMMUNITY
// Filename: loopback.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

//! Host-side servicing of the simcall convention on top of `std::fs`.
//!
//! Pointer parameters are addresses in the calling process, the same way the
//! ISS reads guest memory directly. Descriptors start at 3 so the guest's
//! standard streams never collide with a loopback file.

use std::collections::BTreeMap;
use std::ffi::{c_char, CStr};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};

use super::{Simcall, SimcallNr, TrapResult};
use crate::config::{self, ConfigError, HostfsConfig};
use crate::errno::Errno;
use crate::flags::SimcallFlags;

const FIRST_FD: i32 = 3;

/// In-process stand-in for the ISS file services.
pub struct Loopback {
    root: PathBuf,
    max_open: usize,
    files: Mutex<BTreeMap<i32, File>>,
}

impl Loopback {
    pub fn new(cfg: HostfsConfig) -> Self {
        debug!("loopback rooted at {}", cfg.root.display());
        Self {
            root: cfg.root,
            max_open: cfg.max_open,
            files: Mutex::new(BTreeMap::new()),
        }
    }

    /// Build from the process-wide configuration.
    pub fn from_config() -> Result<Self, ConfigError> {
        Ok(Self::new(config::get_config()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of descriptors currently open.
    pub fn open_count(&self) -> Result<usize, Errno> {
        self.with_files(|files| Ok(files.len()))
    }

    fn resolve(&self, guest: &str) -> Result<PathBuf, Errno> {
        let mut host = self.root.clone();
        for comp in Path::new(guest).components() {
            match comp {
                Component::Normal(part) => host.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => return Err(Errno::EACCES),
            }
        }
        Ok(host)
    }

    fn with_files<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<i32, File>) -> Result<T, Errno>,
    ) -> Result<T, Errno> {
        let mut files = self.files.lock().map_err(|_| Errno::EIO)?;
        f(&mut files)
    }

    fn with_file<T>(
        &self,
        fd: usize,
        f: impl FnOnce(&mut File) -> io::Result<T>,
    ) -> Result<T, Errno> {
        self.with_files(|files| {
            let file = files.get_mut(&(fd as i32)).ok_or(Errno::EBADF)?;
            f(file).map_err(host_errno)
        })
    }

    fn open(&self, path: usize, flags: usize, mode: usize) -> Result<isize, Errno> {
        if path == 0 {
            return Err(Errno::EFAULT);
        }
        // SAFETY: the caller passed a NUL-terminated string by address.
        let guest = unsafe { CStr::from_ptr(path as *const c_char) };
        let guest = guest.to_str().map_err(|_| Errno::EINVAL)?;
        let host = self.resolve(guest)?;
        let flags = SimcallFlags::from_bits_retain(flags as u32);

        self.with_files(|files| {
            if files.len() >= self.max_open {
                return Err(Errno::EMFILE);
            }
            let file = open_file(&host, flags, mode as u32)?;
            let fd = (FIRST_FD..)
                .find(|fd| !files.contains_key(fd))
                .ok_or(Errno::EMFILE)?;
            files.insert(fd, file);
            debug!("loopback open {} -> fd {fd}", host.display());
            Ok(fd as isize)
        })
    }

    fn close(&self, fd: usize) -> Result<isize, Errno> {
        self.with_files(|files| {
            files.remove(&(fd as i32)).ok_or(Errno::EBADF)?;
            Ok(0)
        })
    }

    fn read(&self, fd: usize, buf: usize, len: usize) -> Result<isize, Errno> {
        if len == 0 {
            return self.with_file(fd, |_| Ok(0));
        }
        if buf == 0 {
            return Err(Errno::EFAULT);
        }
        // SAFETY: the caller lent `len` writable bytes at `buf` for this call.
        let dst = unsafe { std::slice::from_raw_parts_mut(buf as *mut u8, len) };
        self.with_file(fd, |file| file.read(dst)).map(|n| n as isize)
    }

    fn write(&self, fd: usize, buf: usize, len: usize) -> Result<isize, Errno> {
        if len == 0 {
            return self.with_file(fd, |_| Ok(0));
        }
        if buf == 0 {
            return Err(Errno::EFAULT);
        }
        // SAFETY: the caller lent `len` readable bytes at `buf` for this call.
        let src = unsafe { std::slice::from_raw_parts(buf as *const u8, len) };
        self.with_file(fd, |file| file.write(src)).map(|n| n as isize)
    }

    fn lseek(&self, fd: usize, offset: usize, whence: usize) -> Result<isize, Errno> {
        let offset = offset as isize as i64;
        let pos = match whence {
            0 => SeekFrom::Start(u64::try_from(offset).map_err(|_| Errno::EINVAL)?),
            1 => SeekFrom::Current(offset),
            2 => SeekFrom::End(offset),
            _ => return Err(Errno::EINVAL),
        };
        let at = self.with_file(fd, |file| file.seek(pos))?;
        isize::try_from(at).map_err(|_| Errno::EINVAL)
    }
}

impl Simcall for Loopback {
    fn simcall(&self, nr: SimcallNr, a1: usize, a2: usize, a3: usize) -> TrapResult {
        let res = match nr {
            SimcallNr::Open => self.open(a1, a2, a3),
            SimcallNr::Close => self.close(a1),
            SimcallNr::Read => self.read(a1, a2, a3),
            SimcallNr::Write => self.write(a1, a2, a3),
            SimcallNr::Lseek => self.lseek(a1, a2, a3),
        };
        match res {
            Ok(ret) => TrapResult::ok(ret),
            Err(errno) => {
                warn!("loopback {nr:?} failed: {errno}");
                TrapResult::err(errno.code())
            }
        }
    }
}

/// Open `path` with POSIX semantics for the simulator flag set.
///
/// `OpenOptions` refuses create or truncate without write access and truncate
/// combined with append. Those side effects run first on a separate
/// write-only handle; the returned handle carries only the requested access.
fn open_file(path: &Path, flags: SimcallFlags, mode: u32) -> Result<File, Errno> {
    let (read, write) = match flags.bits() & 0x3 {
        0 => (true, false),
        1 => (false, true),
        2 => (true, true),
        _ => return Err(Errno::EINVAL),
    };
    let append = flags.contains(SimcallFlags::APPEND);
    let create = flags.contains(SimcallFlags::CREAT);
    let trunc = flags.contains(SimcallFlags::TRUNC);

    let mut opts = OpenOptions::new();
    opts.read(read).write(write).append(append && write);
    if (create || trunc) && (!write || append) {
        let mut prep = OpenOptions::new();
        prep.write(true).truncate(trunc);
        set_create(&mut prep, flags, mode);
        drop(prep.open(path).map_err(host_errno)?);
    } else {
        opts.truncate(trunc);
        set_create(&mut opts, flags, mode);
    }
    opts.open(path).map_err(host_errno)
}

fn set_create(opts: &mut OpenOptions, flags: SimcallFlags, mode: u32) {
    if !flags.contains(SimcallFlags::CREAT) {
        return;
    }
    if flags.contains(SimcallFlags::EXCL) {
        opts.create_new(true);
    } else {
        opts.create(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if mode != 0 {
            opts.mode(mode);
        }
    }
    #[cfg(not(unix))]
    let _ = mode;
}

fn host_errno(err: io::Error) -> Errno {
    match err.raw_os_error() {
        Some(code) if code > 0 => Errno(code),
        _ => match err.kind() {
            io::ErrorKind::NotFound => Errno::ENOENT,
            io::ErrorKind::PermissionDenied => Errno::EACCES,
            io::ErrorKind::AlreadyExists => Errno::EEXIST,
            io::ErrorKind::InvalidInput => Errno::EINVAL,
            _ => Errno::EIO,
        },
    }
}
