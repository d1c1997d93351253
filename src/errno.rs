// CLASSIFICATION: COMMUNITY
// Filename: errno.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

use core::fmt;
use thiserror::Error;

/// Guest errno value as carried across the trap boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(pub i32);

impl Errno {
    pub const ENOENT: Errno = Errno(2);
    pub const EIO: Errno = Errno(5);
    pub const EBADF: Errno = Errno(9);
    pub const EACCES: Errno = Errno(13);
    pub const EFAULT: Errno = Errno(14);
    pub const EEXIST: Errno = Errno(17);
    pub const ENOTDIR: Errno = Errno(20);
    pub const EISDIR: Errno = Errno(21);
    pub const EINVAL: Errno = Errno(22);
    pub const EMFILE: Errno = Errno(24);
    pub const ENOSYS: Errno = Errno(38);

    /// Raw positive code.
    pub const fn code(self) -> i32 {
        self.0
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Errno::ENOENT => "ENOENT",
            Errno::EIO => "EIO",
            Errno::EBADF => "EBADF",
            Errno::EACCES => "EACCES",
            Errno::EFAULT => "EFAULT",
            Errno::EEXIST => "EEXIST",
            Errno::ENOTDIR => "ENOTDIR",
            Errno::EISDIR => "EISDIR",
            Errno::EINVAL => "EINVAL",
            Errno::EMFILE => "EMFILE",
            Errno::ENOSYS => "ENOSYS",
            _ => return None,
        })
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "errno {}", self.0),
        }
    }
}

/// Failure of a host filesystem operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostfsError {
    #[error("host reported {0}")]
    Host(Errno),
    #[error("operation not supported by the simulator")]
    Unsupported,
}

impl HostfsError {
    /// Decode a negative-errno return from the host. Non-negative values are
    /// not errors. `Unsupported` never comes from here; only local stubs
    /// produce it.
    pub fn from_return(ret: isize) -> Option<Self> {
        if ret >= 0 {
            return None;
        }
        Some(HostfsError::Host(Errno(ret.unsigned_abs() as i32)))
    }

    pub fn errno(self) -> Errno {
        match self {
            HostfsError::Host(e) => e,
            HostfsError::Unsupported => Errno::ENOSYS,
        }
    }

    /// Negated errno, the C ABI failure value.
    pub fn as_return(self) -> i32 {
        -self.errno().0
    }
}

/// Split a dispatcher return into payload or error.
pub fn check(ret: isize) -> Result<usize, HostfsError> {
    match HostfsError::from_return(ret) {
        Some(err) => Err(err),
        None => Ok(ret as usize),
    }
}
