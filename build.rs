//! Build script for likesync.
//!
//! Copies `.env.example` into the local data directory so users find a
//! configuration template next to where the binary looks for `.env`:
//! - Linux: `~/.local/share/likesync/.env.example`
//! - macOS: `~/Library/Application Support/likesync/.env.example`
//! - Windows: `%LOCALAPPDATA%/likesync/.env.example`
//!
//! Failing to write the template never fails the build, it only emits a
//! cargo warning. Sandboxed builds often have a read-only home directory.

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=.env.example");

    if let Err(e) = copy_env_template() {
        println!("cargo:warning=could not install .env.example: {}", e);
    }
}

fn copy_env_template() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");
    if !template.is_file() {
        return Err(format!("{} not found", template.display()).into());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("likesync");
    fs::create_dir_all(&out_dir)?;
    fs::copy(&template, out_dir.join(".env.example"))?;

    Ok(())
}
