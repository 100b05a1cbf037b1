use crate::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Executable names tried on `PATH` when no install location matches
const EXECUTABLE_NAMES: &[&str] = &["google-chrome", "chromium", "chromium-browser", "chrome"];

/// Locates a Chrome or Chromium binary
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
}

impl ChromeFinder {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// Find the browser: explicit path, then install locations, then `PATH`.
    ///
    /// An explicit path is never second-guessed; if it is wrong the search fails.
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.custom_path {
            return validate_chrome_path(path);
        }

        if let Some(path) = Self::default_paths()
            .into_iter()
            .find_map(|path| validate_chrome_path(&path).ok())
        {
            return Ok(path);
        }

        if let Some(path) = std::env::var_os("PATH").and_then(|paths| find_on_path(&paths)) {
            return Ok(path);
        }

        Err(Error::Browser(format!(
            "Chrome not found. Checked: {} and {} on PATH. Use --chrome-path to specify location.",
            Self::default_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            EXECUTABLE_NAMES.join("/")
        )))
    }

    fn default_paths() -> Vec<PathBuf> {
        #[cfg(target_os = "macos")]
        return vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ];

        #[cfg(target_os = "linux")]
        return vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/snap/bin/chromium"),
        ];

        #[cfg(target_os = "windows")]
        return vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return vec![];
    }
}

/// Search a `PATH`-style list of directories for a known browser executable
fn find_on_path(paths: &OsStr) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    EXECUTABLE_NAMES
        .iter()
        .find_map(|name| which::which_in(name, Some(paths), &cwd).ok())
}

fn validate_chrome_path(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(Error::Browser(format!(
            "Chrome not found at: {}",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)?.permissions().mode();
        if mode & 0o111 == 0 {
            return Err(Error::Browser(format!(
                "Chrome binary not executable: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}
