//! Local filesystem writer for the raw and simplified outputs.
//!
//! Files are written to a temporary sibling first and renamed into place,
//! so a reader never sees a half-written file on the same filesystem.

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{CollectionResult, SimplifiedOutput};
use crate::storage::{WrittenFiles, simple_path};

/// Ensure the parent directory of `path` exists.
async fn ensure_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes atomically (write to temp, then rename).
async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_dir(path).await?;

    let tmp = tmp_path(path);
    let written = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

/// Write pretty-printed JSON, returning the number of bytes written.
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<usize> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    write_bytes(path, &bytes).await?;
    Ok(bytes.len())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write the raw result to `path` and the simplified output next to it.
pub async fn write_outputs(
    path: &Path,
    result: &CollectionResult,
    simplified: &SimplifiedOutput,
) -> Result<WrittenFiles> {
    let raw_bytes = write_json(path, result).await?;
    log::info!("Raw data written to {}", path.display());

    let simple = simple_path(path);
    let simple_bytes = write_json(&simple, simplified).await?;
    log::info!("Simplified data written to {}", simple.display());

    Ok(WrittenFiles {
        raw_path: path.to_path_buf(),
        raw_bytes,
        simple_path: simple,
        simple_bytes,
    })
}

/// Read a raw result file back.
pub async fn read_collection(path: &Path) -> Result<CollectionResult> {
    read_json(path).await
}

/// Read a simplified output file back.
pub async fn read_simplified(path: &Path) -> Result<SimplifiedOutput> {
    read_json(path).await
}
