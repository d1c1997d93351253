// CLASSIFICATION: COMMUNITY
// Filename: ffi.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

//! C entry points for the OS hostfs driver.
//!
//! The marshalling helpers are generic over the trap backend; the exported
//! `host_*` symbols bind them to [`XtensaIss`](crate::simcall::XtensaIss) and
//! only exist on Xtensa targets. Failures are returned as negative errno.

use core::ffi::{c_char, c_int, c_ulong, c_void};

use crate::errno::HostfsError;
use crate::flags::OpenFlags;
use crate::hostfs::{HostDirent, HostFd, HostFs, HostStat, HostStatfs};
use crate::simcall::Simcall;

fn status<T>(res: Result<T, HostfsError>) -> c_int {
    match res {
        Ok(_) => 0,
        Err(err) => err.as_return(),
    }
}

fn count_or_errno(res: Result<usize, HostfsError>) -> isize {
    match res {
        Ok(n) => n as isize,
        Err(err) => err.as_return() as isize,
    }
}

/// # Safety
/// `dst` must be null or valid for writing one `T`.
unsafe fn store<T>(dst: *mut T, value: T) {
    if !dst.is_null() {
        dst.write(value);
    }
}

/// A null `pathname` is forwarded; the host reports the fault.
///
/// # Safety
/// `pathname` must be null or a valid NUL-terminated string.
pub unsafe fn open<S: Simcall>(
    fs: &HostFs<S>,
    pathname: *const c_char,
    flags: c_int,
    mode: c_int,
) -> c_int {
    let flags = OpenFlags::from_bits_retain(flags as u32);
    match fs.open_raw(pathname as usize, flags, mode as u32) {
        Ok(fd) => fd.raw(),
        Err(err) => err.as_return(),
    }
}

pub fn close<S: Simcall>(fs: &HostFs<S>, fd: c_int) -> c_int {
    status(fs.close(HostFd(fd)))
}

/// The buffer address goes to the host untouched, null or not.
///
/// # Safety
/// `buf` must be null or valid for `count` writable bytes.
pub unsafe fn read<S: Simcall>(
    fs: &HostFs<S>,
    fd: c_int,
    buf: *mut c_void,
    count: usize,
) -> isize {
    count_or_errno(fs.read_raw(HostFd(fd), buf as usize, count))
}

/// # Safety
/// `buf` must be null or valid for `count` readable bytes.
pub unsafe fn write<S: Simcall>(
    fs: &HostFs<S>,
    fd: c_int,
    buf: *const c_void,
    count: usize,
) -> isize {
    count_or_errno(fs.write_raw(HostFd(fd), buf as usize, count))
}

pub fn lseek<S: Simcall>(fs: &HostFs<S>, fd: c_int, offset: isize, whence: c_int) -> isize {
    count_or_errno(fs.lseek(HostFd(fd), offset, whence))
}

pub fn ioctl<S: Simcall>(fs: &HostFs<S>, fd: c_int, request: c_int, arg: c_ulong) -> c_int {
    match fs.ioctl(HostFd(fd), request, arg as usize) {
        Ok(ret) => ret,
        Err(err) => err.as_return(),
    }
}

pub fn sync<S: Simcall>(fs: &HostFs<S>, fd: c_int) {
    fs.sync(HostFd(fd));
}

pub fn dup<S: Simcall>(fs: &HostFs<S>, fd: c_int) -> c_int {
    match fs.dup(HostFd(fd)) {
        Ok(fd) => fd.raw(),
        Err(err) => err.as_return(),
    }
}

/// Always 0. The record is written only when `buf` is non-null.
///
/// # Safety
/// `buf` must be null or valid for writing one [`HostStat`].
pub unsafe fn fstat<S: Simcall>(fs: &HostFs<S>, fd: c_int, buf: *mut HostStat) -> c_int {
    match fs.fstat(HostFd(fd)) {
        Ok(st) => {
            store(buf, st);
            0
        }
        Err(err) => err.as_return(),
    }
}

pub fn ftruncate<S: Simcall>(fs: &HostFs<S>, fd: c_int, length: isize) -> c_int {
    status(fs.ftruncate(HostFd(fd), length))
}

/// Always null: the simulator cannot enumerate directories.
pub fn opendir<S: Simcall>(_fs: &HostFs<S>, _name: *const c_char) -> *mut c_void {
    core::ptr::null_mut()
}

pub fn readdir<S: Simcall>(
    _fs: &HostFs<S>,
    _dirp: *mut c_void,
    _entry: *mut HostDirent,
) -> c_int {
    HostfsError::Unsupported.as_return()
}

pub fn rewinddir<S: Simcall>(_fs: &HostFs<S>, _dirp: *mut c_void) {}

pub fn closedir<S: Simcall>(_fs: &HostFs<S>, _dirp: *mut c_void) -> c_int {
    HostfsError::Unsupported.as_return()
}

/// Always 0. A default record is written only when `buf` is non-null.
///
/// # Safety
/// `buf` must be null or valid for writing one [`HostStatfs`].
pub unsafe fn statfs<S: Simcall>(
    _fs: &HostFs<S>,
    _path: *const c_char,
    buf: *mut HostStatfs,
) -> c_int {
    store(buf, HostStatfs::default());
    0
}

pub fn unlink<S: Simcall>(_fs: &HostFs<S>, _pathname: *const c_char) -> c_int {
    HostfsError::Unsupported.as_return()
}

pub fn mkdir<S: Simcall>(_fs: &HostFs<S>, _pathname: *const c_char, _mode: u32) -> c_int {
    HostfsError::Unsupported.as_return()
}

pub fn rmdir<S: Simcall>(fs: &HostFs<S>, pathname: *const c_char) -> c_int {
    unlink(fs, pathname)
}

pub fn rename<S: Simcall>(
    _fs: &HostFs<S>,
    _oldpath: *const c_char,
    _newpath: *const c_char,
) -> c_int {
    HostfsError::Unsupported.as_return()
}

/// Always 0. A null `path` is forwarded to the host open and falls back to
/// the directory record like any other failure.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string; `buf` must be null
/// or valid for writing one [`HostStat`].
pub unsafe fn stat<S: Simcall>(fs: &HostFs<S>, path: *const c_char, buf: *mut HostStat) -> c_int {
    store(buf, fs.stat_raw(path as usize));
    0
}

#[cfg(target_arch = "xtensa")]
mod exports {
    use super::*;
    use crate::simcall::XtensaIss;

    static HOSTFS: HostFs<XtensaIss> = HostFs::new(XtensaIss);

    #[no_mangle]
    pub unsafe extern "C" fn host_open(
        pathname: *const c_char,
        flags: c_int,
        mode: c_int,
    ) -> c_int {
        open(&HOSTFS, pathname, flags, mode)
    }

    #[no_mangle]
    pub extern "C" fn host_close(fd: c_int) -> c_int {
        close(&HOSTFS, fd)
    }

    #[no_mangle]
    pub unsafe extern "C" fn host_read(fd: c_int, buf: *mut c_void, count: usize) -> isize {
        read(&HOSTFS, fd, buf, count)
    }

    #[no_mangle]
    pub unsafe extern "C" fn host_write(fd: c_int, buf: *const c_void, count: usize) -> isize {
        write(&HOSTFS, fd, buf, count)
    }

    #[no_mangle]
    pub extern "C" fn host_lseek(fd: c_int, offset: isize, whence: c_int) -> isize {
        lseek(&HOSTFS, fd, offset, whence)
    }

    #[no_mangle]
    pub extern "C" fn host_ioctl(fd: c_int, request: c_int, arg: c_ulong) -> c_int {
        ioctl(&HOSTFS, fd, request, arg)
    }

    #[no_mangle]
    pub extern "C" fn host_sync(fd: c_int) {
        sync(&HOSTFS, fd)
    }

    #[no_mangle]
    pub extern "C" fn host_dup(fd: c_int) -> c_int {
        dup(&HOSTFS, fd)
    }

    #[no_mangle]
    pub unsafe extern "C" fn host_fstat(fd: c_int, buf: *mut HostStat) -> c_int {
        fstat(&HOSTFS, fd, buf)
    }

    #[no_mangle]
    pub extern "C" fn host_ftruncate(fd: c_int, length: isize) -> c_int {
        ftruncate(&HOSTFS, fd, length)
    }

    #[no_mangle]
    pub extern "C" fn host_opendir(name: *const c_char) -> *mut c_void {
        opendir(&HOSTFS, name)
    }

    #[no_mangle]
    pub extern "C" fn host_readdir(dirp: *mut c_void, entry: *mut HostDirent) -> c_int {
        readdir(&HOSTFS, dirp, entry)
    }

    #[no_mangle]
    pub extern "C" fn host_rewinddir(dirp: *mut c_void) {
        rewinddir(&HOSTFS, dirp)
    }

    #[no_mangle]
    pub extern "C" fn host_closedir(dirp: *mut c_void) -> c_int {
        closedir(&HOSTFS, dirp)
    }

    #[no_mangle]
    pub unsafe extern "C" fn host_statfs(path: *const c_char, buf: *mut HostStatfs) -> c_int {
        statfs(&HOSTFS, path, buf)
    }

    #[no_mangle]
    pub extern "C" fn host_unlink(pathname: *const c_char) -> c_int {
        unlink(&HOSTFS, pathname)
    }

    #[no_mangle]
    pub extern "C" fn host_mkdir(pathname: *const c_char, mode: u32) -> c_int {
        mkdir(&HOSTFS, pathname, mode)
    }

    #[no_mangle]
    pub extern "C" fn host_rmdir(pathname: *const c_char) -> c_int {
        rmdir(&HOSTFS, pathname)
    }

    #[no_mangle]
    pub extern "C" fn host_rename(oldpath: *const c_char, newpath: *const c_char) -> c_int {
        rename(&HOSTFS, oldpath, newpath)
    }

    #[no_mangle]
    pub unsafe extern "C" fn host_stat(path: *const c_char, buf: *mut HostStat) -> c_int {
        stat(&HOSTFS, path, buf)
    }
}

#[cfg(test)]
mod tests {
    use core::ptr;

    use super::*;
    use crate::hostfs::{S_IFDIR, S_IFREG};
    use crate::simcall::testing::Scripted;
    use crate::simcall::{SimcallNr, TrapResult};

    #[test]
    fn open_returns_descriptor_or_negative_errno() {
        let fs = HostFs::new(Scripted::new(&[
            TrapResult::ok(3),
            TrapResult::err(13),
            TrapResult::err(14),
        ]));
        let path = c"/data";
        unsafe {
            assert_eq!(open(&fs, path.as_ptr(), 0b11, 0), 3);
            assert_eq!(open(&fs, path.as_ptr(), 0b01, 0), -13);
            assert_eq!(open(&fs, ptr::null(), 0b01, 0), -14);
        }
        let calls = fs.backend().calls.borrow();
        assert_eq!(calls[0].2, 2);
        assert_eq!(calls[2], (SimcallNr::Open, 0, 0, 0));
    }

    #[test]
    fn stubs_report_enosys() {
        let fs = HostFs::new(Scripted::new(&[]));
        let path = c"/x";
        assert_eq!(ioctl(&fs, 3, 1, 0), -38);
        assert_eq!(dup(&fs, 3), -38);
        assert_eq!(ftruncate(&fs, 3, 10), -38);
        assert_eq!(readdir(&fs, ptr::null_mut(), ptr::null_mut()), -38);
        assert_eq!(closedir(&fs, ptr::null_mut()), -38);
        assert!(opendir(&fs, path.as_ptr()).is_null());
        assert_eq!(unlink(&fs, path.as_ptr()), -38);
        assert_eq!(mkdir(&fs, path.as_ptr(), 0o755), -38);
        assert_eq!(rmdir(&fs, path.as_ptr()), -38);
        assert_eq!(rename(&fs, path.as_ptr(), path.as_ptr()), -38);
        assert!(fs.backend().calls.borrow().is_empty());
    }

    #[test]
    fn stubs_ignore_null_and_out_of_range_arguments() {
        let fs = HostFs::new(Scripted::new(&[]));
        let null = ptr::null::<c_char>();
        let mut sfs = HostStatfs {
            f_blocks: 9,
            ..HostStatfs::default()
        };

        assert_eq!(ioctl(&fs, -1, c_int::MIN, c_ulong::MAX), -38);
        assert_eq!(dup(&fs, -5), -38);
        assert_eq!(ftruncate(&fs, -1, -1), -38);
        assert_eq!(readdir(&fs, ptr::null_mut(), ptr::null_mut()), -38);
        assert_eq!(closedir(&fs, ptr::null_mut()), -38);
        assert_eq!(unlink(&fs, null), -38);
        assert_eq!(mkdir(&fs, null, u32::MAX), -38);
        assert_eq!(rmdir(&fs, null), -38);
        assert_eq!(rename(&fs, null, null), -38);
        assert!(opendir(&fs, null).is_null());
        sync(&fs, -1);
        rewinddir(&fs, ptr::null_mut());
        unsafe {
            assert_eq!(statfs(&fs, null, ptr::null_mut()), 0);
            assert_eq!(statfs(&fs, null, &mut sfs), 0);
            assert_eq!(fstat(&fs, -1, ptr::null_mut()), 0);
        }
        assert_eq!(sfs, HostStatfs::default());
        assert!(fs.backend().calls.borrow().is_empty());
    }

    #[test]
    fn stat_writes_directory_on_failure() {
        let fs = HostFs::new(Scripted::new(&[TrapResult::err(2)]));
        let mut st = HostStat::with_mode(0xffff);
        st.st_size = 42;
        let ret = unsafe { stat(&fs, c"/nowhere".as_ptr(), &mut st) };
        assert_eq!(ret, 0);
        assert_eq!(st, HostStat::with_mode(S_IFDIR | 0o777));
    }

    #[test]
    fn stat_forwards_null_path_and_tolerates_null_buffer() {
        let fs = HostFs::new(Scripted::new(&[TrapResult::err(14), TrapResult::err(14)]));
        let mut st = HostStat::default();
        unsafe {
            assert_eq!(stat(&fs, ptr::null(), &mut st), 0);
            assert_eq!(stat(&fs, ptr::null(), ptr::null_mut()), 0);
        }
        assert_eq!(st.st_mode, S_IFDIR | 0o777);
        assert_eq!(fs.backend().opcodes(), vec![SimcallNr::Open, SimcallNr::Open]);
        assert_eq!(fs.backend().calls.borrow()[0].1, 0);
    }

    #[test]
    fn fstat_and_statfs_fill_buffers() {
        let fs = HostFs::new(Scripted::new(&[]));
        let mut st = HostStat::default();
        let mut sfs = HostStatfs {
            f_bsize: 7,
            ..HostStatfs::default()
        };
        unsafe {
            assert_eq!(fstat(&fs, 5, &mut st), 0);
            assert_eq!(statfs(&fs, c"/".as_ptr(), &mut sfs), 0);
            assert_eq!(fstat(&fs, 5, ptr::null_mut()), 0);
        }
        assert_eq!(st.st_mode, S_IFREG | 0o777);
        assert_eq!(sfs, HostStatfs::default());
    }

    #[test]
    fn read_write_report_byte_counts() {
        let fs = HostFs::new(Scripted::new(&[TrapResult::ok(3), TrapResult::err(9)]));
        let mut buf = [0u8; 8];
        unsafe {
            assert_eq!(read(&fs, 4, buf.as_mut_ptr().cast(), buf.len()), 3);
            assert_eq!(write(&fs, 4, buf.as_ptr().cast(), 8), -9);
        }
        assert_eq!(lseek(&fs, 4, 0, 0), -38);
    }

    #[test]
    fn null_and_empty_buffers_still_trap() {
        let fs = HostFs::new(Scripted::new(&[
            TrapResult::ok(0),
            TrapResult::err(14),
            TrapResult::ok(0),
        ]));
        unsafe {
            assert_eq!(read(&fs, 4, ptr::null_mut(), 0), 0);
            assert_eq!(read(&fs, 4, ptr::null_mut(), 16), -14);
            assert_eq!(write(&fs, 4, ptr::null(), 0), 0);
        }
        let calls = fs.backend().calls.borrow();
        assert_eq!(
            *calls,
            vec![
                (SimcallNr::Read, 4, 0, 0),
                (SimcallNr::Read, 4, 0, 16),
                (SimcallNr::Write, 4, 0, 0),
            ]
        );
    }
}
