// File Operations for RSA Encryption/Decryption
// Reads inputs and key files for the core and persists its results

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::rsa::{RsaError, RsaKeyPair, RsaPrivateKey, RsaPublicKey};

/// Errors that can occur during file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Crypto error: {0}")]
    Crypto(#[from] RsaError),
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> FileError + '_ {
    move |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read entire file into memory
pub fn read_file(path: &Path) -> FileResult<Vec<u8>> {
    let mut file = File::open(path).map_err(io_err(path))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).map_err(io_err(path))?;
    Ok(data)
}

/// Write data to file
pub fn write_file(path: &Path, data: &[u8]) -> FileResult<()> {
    let mut file = File::create(path).map_err(io_err(path))?;
    file.write_all(data).map_err(io_err(path))?;
    Ok(())
}

/// `<stem>.pub.json` and `<stem>.priv.json`
pub fn key_paths(stem: &Path) -> (PathBuf, PathBuf) {
    let with_suffix = |suffix: &str| {
        let mut name = stem.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };
    (with_suffix(".pub.json"), with_suffix(".priv.json"))
}

/// Write both halves of a key pair next to each other
pub fn write_keypair(stem: &Path, keypair: &RsaKeyPair) -> FileResult<(PathBuf, PathBuf)> {
    let (pub_path, priv_path) = key_paths(stem);
    write_file(&pub_path, keypair.public_key.to_json()?.as_bytes())?;
    write_file(&priv_path, keypair.private_key.to_json()?.as_bytes())?;
    Ok((pub_path, priv_path))
}

pub fn read_public_key(path: &Path) -> FileResult<RsaPublicKey> {
    let text = read_file(path)?;
    Ok(RsaPublicKey::from_json(&String::from_utf8_lossy(&text))?)
}

pub fn read_private_key(path: &Path) -> FileResult<RsaPrivateKey> {
    let text = read_file(path)?;
    Ok(RsaPrivateKey::from_json(&String::from_utf8_lossy(&text))?)
}

/// Format file size for display
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
