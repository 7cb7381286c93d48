//! Anonymous FTP retrieval of the extent CSV.

use std::path::{Path, PathBuf};

use suppaftp::types::FileType;
use suppaftp::FtpStream;

use super::ExtentError;

const FTP_PORT: u16 = 21;
const ANONYMOUS_USER: &str = "anonymous";
const ANONYMOUS_PASSWORD: &str = "anonymous@";

/// Download `remote_path` from `host` into `local_path`.
///
/// The transfer itself is blocking and runs on the blocking thread pool.
pub async fn download_file_ftp(
    host: &str,
    remote_path: &str,
    local_path: &Path,
) -> Result<PathBuf, ExtentError> {
    let host = host.to_string();
    let remote_path = remote_path.to_string();
    let local_path = local_path.to_path_buf();

    tokio::task::spawn_blocking(move || download_blocking(&host, &remote_path, &local_path)).await?
}

fn download_blocking(host: &str, remote_path: &str, local_path: &Path) -> Result<PathBuf, ExtentError> {
    tracing::info!("Connecting to FTP: {}", host);
    let mut ftp = FtpStream::connect((host, FTP_PORT))?;
    ftp.login(ANONYMOUS_USER, ANONYMOUS_PASSWORD)?;
    ftp.transfer_type(FileType::Binary)?;

    tracing::info!("Downloading file: {}", remote_path);
    let contents = ftp.retr_as_buffer(remote_path)?;
    std::fs::write(local_path, contents.into_inner()).map_err(|source| ExtentError::Io {
        path: local_path.to_path_buf(),
        source,
    })?;

    ftp.quit()?;
    tracing::info!("File saved as: {}", local_path.display());
    Ok(local_path.to_path_buf())
}
