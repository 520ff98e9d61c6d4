use std::path::{Path, PathBuf};

use crate::config::DEFAULT_FILE_NAME;

#[derive(Clone, Debug, PartialEq)]
pub struct ReceiveDirectory(PathBuf);

impl ReceiveDirectory {
    pub fn new(p: PathBuf) -> Self {
        ReceiveDirectory(p)
    }
    pub fn new_default() -> Result<Self, Box<dyn std::error::Error>> {
        default_datadir().map(ReceiveDirectory::new)
    }
}

impl ReceiveDirectory {
    pub fn exists(&self) -> bool {
        self.0.as_path().exists()
    }
    pub fn init(&self) -> Result<(), Box<dyn std::error::Error>> {
        create_directory(self.0.as_path())
    }
    pub fn path(&self) -> &Path {
        self.0.as_path()
    }
    pub fn config_path(&self) -> PathBuf {
        self.0.join(DEFAULT_FILE_NAME)
    }
}

/// Get the absolute path to the receive-wallet data folder.
///
/// This a "ReceiveWallet" directory in the XDG standard configuration directory for all OSes but
/// Linux-based ones, for which it's `~/.receive-wallet`.
fn default_datadir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    #[cfg(target_os = "linux")]
    let configs_dir = dirs::home_dir();

    #[cfg(not(target_os = "linux"))]
    let configs_dir = dirs::config_dir();

    if let Some(mut path) = configs_dir {
        #[cfg(target_os = "linux")]
        path.push(".receive-wallet");

        #[cfg(not(target_os = "linux"))]
        path.push("ReceiveWallet");

        return Ok(path);
    }

    Err("Failed to get default data directory".into())
}

fn create_directory(datadir_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(unix)]
    return {
        use std::fs::DirBuilder;
        use std::os::unix::fs::DirBuilderExt;

        let mut builder = DirBuilder::new();
        builder.mode(0o700).recursive(true).create(datadir_path)?;
        Ok(())
    };

    #[cfg(not(unix))]
    return {
        std::fs::create_dir_all(datadir_path)?;
        Ok(())
    };
}
