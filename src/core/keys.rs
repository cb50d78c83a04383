//! Key file generation and loading.
//!
//! The credential key is distributed as a JSON array of 32 integers, one
//! per byte:
//!
//! ```json
//! [12, 200, 7, ...]
//! ```
//!
//! Anyone holding this file can decrypt every envelope sealed under it, so
//! it is written owner-readable only.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::cipher::CipherConfig;
use crate::core::constants::KEY_LEN;
use crate::error::{KeyError, Result};

/// A 256-bit key together with the file it came from or will be written to.
pub struct KeyFile {
    path: PathBuf,
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl KeyFile {
    /// Generate a fresh random key destined for `path`.
    ///
    /// Nothing is written until [`KeyFile::save`] is called.
    pub fn generate(path: impl Into<PathBuf>) -> Self {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        rand::rng().fill_bytes(&mut key[..]);
        Self {
            path: path.into(),
            key,
        }
    }

    /// Load and validate a key file.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NotFound` if the file does not exist and
    /// `KeyError::Invalid` unless it holds exactly 32 integers in 0..=255.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading key file");

        if !path.exists() {
            return Err(KeyError::NotFound(path.to_path_buf()).into());
        }

        let contents = Zeroizing::new(fs::read_to_string(path).map_err(|source| {
            KeyError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }
        })?);

        let key = parse_key_array(&contents).map_err(|reason| KeyError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        #[cfg(unix)]
        warn_if_world_readable(path);

        Ok(Self {
            path: path.to_path_buf(),
            key,
        })
    }

    /// Write the key array, refusing to clobber an existing file unless
    /// `force` is set.
    ///
    /// Parent directories are created as needed and the file is restricted
    /// to 0600 on Unix.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::AlreadyExists` or `KeyError::WriteFailed`.
    pub fn save(&self, force: bool) -> Result<()> {
        if self.path.exists() && !force {
            return Err(KeyError::AlreadyExists(self.path.clone()).into());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(KeyError::WriteFailed)?;
        }

        let contents = Zeroizing::new(format!("{}\n", self.to_json()));
        fs::write(&self.path, contents.as_bytes()).map_err(KeyError::WriteFailed)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(KeyError::WriteFailed)?;
        }

        debug!(path = %self.path.display(), "key file written");
        Ok(())
    }

    /// Render the key as a JSON integer array.
    pub fn to_json(&self) -> String {
        let values: Vec<String> = self.key.iter().map(|b| b.to_string()).collect();
        format!("[{}]", values.join(", "))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hand the key to the cipher.
    pub fn into_config(self) -> CipherConfig {
        CipherConfig::new(*self.key)
    }
}

impl fmt::Debug for KeyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFile")
            .field("path", &self.path)
            .field("key", &"[redacted]")
            .finish()
    }
}

/// Parse a JSON array of 32 byte values.
fn parse_key_array(contents: &str) -> std::result::Result<Zeroizing<[u8; KEY_LEN]>, String> {
    let values: Zeroizing<Vec<i64>> = Zeroizing::new(
        serde_json::from_str(contents).map_err(|e| format!("expected a JSON integer array: {}", e))?,
    );

    if values.len() != KEY_LEN {
        return Err(format!(
            "expected {} values, found {}",
            KEY_LEN,
            values.len()
        ));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    for (i, value) in values.iter().enumerate() {
        key[i] = u8::try_from(*value)
            .map_err(|_| format!("value {} at index {} is outside 0..=255", value, i))?;
    }
    Ok(key)
}

#[cfg(unix)]
fn warn_if_world_readable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            tracing::warn!(
                path = %path.display(),
                mode = format!("{:o}", mode),
                "key file is readable by other users"
            );
        }
    }
}
