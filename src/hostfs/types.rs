// CLASSIFICATION: COMMUNITY
// Filename: types.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFREG: u32 = 0o100000;

pub const NAME_MAX: usize = 255;

/// File metadata as reported to the guest VFS.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HostStat {
    pub st_mode: u32,
    pub st_nlink: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_size: i64,
    pub st_blksize: i32,
    pub st_blocks: i64,
    pub st_atime: i64,
    pub st_mtime: i64,
    pub st_ctime: i64,
}

impl HostStat {
    /// Zeroed record carrying only `mode`.
    pub fn with_mode(mode: u32) -> Self {
        Self {
            st_mode: mode,
            ..Self::default()
        }
    }

    pub fn is_dir(&self) -> bool {
        self.st_mode & S_IFMT == S_IFDIR
    }

    pub fn is_file(&self) -> bool {
        self.st_mode & S_IFMT == S_IFREG
    }
}

/// Filesystem statistics.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HostStatfs {
    pub f_type: u32,
    pub f_namelen: u32,
    pub f_bsize: u32,
    pub f_blocks: u64,
    pub f_bfree: u64,
    pub f_bavail: u64,
    pub f_files: u64,
    pub f_ffree: u64,
}

/// Directory entry slot filled by `readdir`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostDirent {
    pub d_type: u8,
    pub d_name: [u8; NAME_MAX + 1],
}

impl Default for HostDirent {
    fn default() -> Self {
        Self {
            d_type: 0,
            d_name: [0; NAME_MAX + 1],
        }
    }
}

impl HostDirent {
    /// Name bytes up to the first NUL.
    pub fn name(&self) -> &[u8] {
        let end = self.d_name.iter().position(|&b| b == 0).unwrap_or(self.d_name.len());
        &self.d_name[..end]
    }
}

/// Open directory stream. The simulator never hands one out.
#[derive(Debug)]
pub struct HostDir {
    _private: (),
}
