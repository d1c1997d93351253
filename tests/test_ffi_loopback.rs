// CLASSIFICATION: COMMUNITY
// Filename: test_ffi_loopback.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

#![cfg(feature = "ffi")]

use std::ffi::CString;
use std::ptr;

use cohesix_hostfs::config::HostfsConfig;
use cohesix_hostfs::ffi;
use cohesix_hostfs::hostfs::{S_IFDIR, S_IFREG, SEEK_SET};
use cohesix_hostfs::simcall::Loopback;
use cohesix_hostfs::{HostFs, HostStat, OpenFlags};
use tempfile::tempdir;

#[test]
fn c_abi_round_trip_over_loopback() {
    let dir = tempdir().expect("tempdir");
    let fs = HostFs::new(Loopback::new(HostfsConfig::default().with_root(dir.path())));
    let path = CString::new("/blob.bin").expect("cstring");
    let flags = (OpenFlags::RDWR | OpenFlags::CREAT).bits() as i32;

    let fd = unsafe { ffi::open(&fs, path.as_ptr(), flags, 0o644) };
    assert!(fd >= 3, "descriptor {fd}");

    let data = [1u8, 2, 3, 4];
    assert_eq!(unsafe { ffi::write(&fs, fd, data.as_ptr().cast(), data.len()) }, 4);
    assert_eq!(ffi::lseek(&fs, fd, 0, SEEK_SET), 0);
    let mut back = [0u8; 4];
    assert_eq!(unsafe { ffi::read(&fs, fd, back.as_mut_ptr().cast(), back.len()) }, 4);
    assert_eq!(back, data);
    assert_eq!(ffi::close(&fs, fd), 0);
    assert_eq!(ffi::close(&fs, fd), -9);

    let mut st = HostStat::default();
    assert_eq!(unsafe { ffi::stat(&fs, path.as_ptr(), &mut st) }, 0);
    assert_eq!(st.st_mode, S_IFREG | 0o777);

    let gone = CString::new("/gone").expect("cstring");
    assert_eq!(unsafe { ffi::stat(&fs, gone.as_ptr(), &mut st) }, 0);
    assert_eq!(st.st_mode, S_IFDIR | 0o777);
}

#[test]
fn c_abi_open_failure_is_negative_errno() {
    let dir = tempdir().expect("tempdir");
    let fs = HostFs::new(Loopback::new(HostfsConfig::default().with_root(dir.path())));
    let path = CString::new("nope").expect("cstring");
    let rdonly = OpenFlags::RDONLY.bits() as i32;
    assert_eq!(unsafe { ffi::open(&fs, path.as_ptr(), rdonly, 0) }, -2);
}

#[test]
fn c_abi_forwards_null_pointers_to_the_host() {
    let dir = tempdir().expect("tempdir");
    let fs = HostFs::new(Loopback::new(HostfsConfig::default().with_root(dir.path())));
    let path = CString::new("/empty").expect("cstring");
    let flags = (OpenFlags::RDWR | OpenFlags::CREAT).bits() as i32;
    let rdonly = OpenFlags::RDONLY.bits() as i32;

    assert_eq!(unsafe { ffi::open(&fs, ptr::null(), rdonly, 0) }, -14);
    let fd = unsafe { ffi::open(&fs, path.as_ptr(), flags, 0o644) };
    assert!(fd >= 3, "descriptor {fd}");
    assert_eq!(unsafe { ffi::read(&fs, fd, ptr::null_mut(), 0) }, 0);
    assert_eq!(unsafe { ffi::write(&fs, fd, ptr::null(), 0) }, 0);
    assert_eq!(unsafe { ffi::read(&fs, fd, ptr::null_mut(), 8) }, -14);
    assert_eq!(ffi::close(&fs, fd), 0);
    assert_eq!(unsafe { ffi::read(&fs, fd, ptr::null_mut(), 0) }, -9);
}
