use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};

pub const APPLICATION_DIR: &str = "hourglass";
pub const DEFAULT_HOURS_FILE: &str = "hours.xml";

/// Platform directory holding the default hours file and the logs. Created when missing.
///
/// Linux and other unix systems use `$XDG_DATA_HOME/hourglass` or
/// `$HOME/.local/share/hourglass`, Windows uses `%APPDATA%\hourglass`.
pub fn create_application_default_path() -> Result<PathBuf> {
    let mut path = platform_data_dir()?;
    path.push(APPLICATION_DIR);
    ensure_dir(&path)?;
    Ok(path)
}

/// Hours file used when none is given on the command line.
pub fn default_hours_file() -> Result<PathBuf> {
    Ok(create_application_default_path()?.join(DEFAULT_HOURS_FILE))
}

fn platform_data_dir() -> Result<PathBuf> {
    cfg_if::cfg_if! {
        if #[cfg(windows)] {
            env::var("APPDATA")
                .map(PathBuf::from)
                .map_err(|_| anyhow!("APPDATA should be present on Windows"))
        } else {
            data_dir_from(env::var("XDG_DATA_HOME").ok(), env::var("HOME").ok())
        }
    }
}

#[cfg_attr(windows, allow(dead_code))]
fn data_dir_from(xdg_data_home: Option<String>, home: Option<String>) -> Result<PathBuf> {
    match (xdg_data_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => Ok(PathBuf::from(xdg)),
        (_, Some(home)) if !home.is_empty() => Ok(Path::new(&home).join(".local/share")),
        _ => Err(anyhow!("Couldn't find neither XDG_DATA_HOME nor HOME")),
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    match std::fs::create_dir_all(path) {
        Ok(_) => Ok(()),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(v) => Err(v.into()),
    }
}
