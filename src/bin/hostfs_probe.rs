// CLASSIFICATION: COMMUNITY
// Filename: hostfs_probe.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

use std::ffi::CString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use cohesix_hostfs::config::{self, HostfsConfig};
use cohesix_hostfs::simcall::Loopback;
use cohesix_hostfs::{translate_open_flags, HostFs, OpenFlags};

#[derive(Parser)]
#[command(about = "Exercise the hostfs simcall bridge against a loopback root")]
struct Cli {
    /// Host directory guest paths resolve against
    #[arg(long)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Report the mode hostfs would give a path
    Stat { path: String },
    /// Print a guest file to stdout
    Cat { path: String },
    /// Copy a local file into the guest namespace
    Put { src: PathBuf, dst: String },
    /// Show the simulator encoding of guest open flags
    Flags { bits: String },
}

fn guest_path(path: &str) -> anyhow::Result<CString> {
    CString::new(path).with_context(|| format!("path {path:?} contains NUL"))
}

fn parse_bits(raw: &str) -> anyhow::Result<u32> {
    let parsed = match raw.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse::<u32>(),
    };
    parsed.with_context(|| format!("invalid flag bits {raw:?}"))
}

fn cmd_stat(fs: &HostFs<Loopback>, path: &str) -> anyhow::Result<()> {
    let st = fs.stat(&guest_path(path)?);
    let kind = if st.is_dir() { "directory" } else { "file" };
    println!("{path}: {kind} mode {:o}", st.st_mode);
    Ok(())
}

fn cmd_cat(fs: &HostFs<Loopback>, path: &str) -> anyhow::Result<()> {
    let fd = fs
        .open(&guest_path(path)?, OpenFlags::RDONLY, 0)
        .map_err(|e| anyhow!("open {path}: {e}"))?;
    let mut buf = [0u8; 512];
    let mut out = io::stdout().lock();
    loop {
        let n = fs.read(fd, &mut buf).map_err(|e| anyhow!("read {path}: {e}"))?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
    }
    fs.close(fd).map_err(|e| anyhow!("close {path}: {e}"))?;
    Ok(())
}

fn cmd_put(fs: &HostFs<Loopback>, src: &Path, dst: &str) -> anyhow::Result<()> {
    let data = std::fs::read(src).with_context(|| format!("read {}", src.display()))?;
    let flags = OpenFlags::WRONLY | OpenFlags::CREAT | OpenFlags::TRUNC;
    let fd = fs
        .open(&guest_path(dst)?, flags, 0o644)
        .map_err(|e| anyhow!("open {dst}: {e}"))?;
    let mut rest = data.as_slice();
    while !rest.is_empty() {
        let n = fs.write(fd, rest).map_err(|e| anyhow!("write {dst}: {e}"))?;
        if n == 0 {
            return Err(anyhow!("write {dst}: host accepted no bytes"));
        }
        rest = &rest[n..];
    }
    fs.close(fd).map_err(|e| anyhow!("close {dst}: {e}"))?;
    println!("{} bytes -> {dst}", data.len());
    Ok(())
}

fn loopback() -> anyhow::Result<HostFs<Loopback>> {
    Ok(HostFs::new(Loopback::from_config()?))
}

fn cmd_flags(raw: &str) -> anyhow::Result<()> {
    let guest = OpenFlags::from_bits_retain(parse_bits(raw)?);
    let host = translate_open_flags(guest);
    println!("guest {:#06x} -> simcall {:#06x}", guest.bits(), host.bits());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(root) = cli.root {
        let cfg = HostfsConfig::from_env()?.with_root(root);
        config::set_config(cfg)?;
    }

    match cli.cmd {
        Cmd::Stat { path } => cmd_stat(&loopback()?, &path)?,
        Cmd::Cat { path } => cmd_cat(&loopback()?, &path)?,
        Cmd::Put { src, dst } => cmd_put(&loopback()?, &src, &dst)?,
        Cmd::Flags { bits } => cmd_flags(&bits)?,
    }
    Ok(())
}
