use dirs::config_dir;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub const APP_DIR: &str = "naf-calendar";

pub fn config_root() -> PathBuf {
    let base = config_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    base.join(APP_DIR)
}

pub fn config_path() -> PathBuf {
    config_root().join("config.json")
}

pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_lives_under_app_dir() {
        let path = config_path();
        assert!(path.ends_with("naf-calendar/config.json"));
    }

    #[test]
    fn ensure_parent_creates_missing_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("a/b/calendar.ics");
        ensure_parent(&target).expect("create parents");
        assert!(dir.path().join("a/b").is_dir());
        ensure_parent(Path::new("calendar.ics")).expect("bare file name");
    }
}
