//! Small platform helpers: PATH lookup and interpreter layout.

use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Names containing a path separator are returned as-is when they point at a
/// file. Does NOT use the `which` command.
pub fn find_on_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(tool);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }

    let names: Vec<String> = if cfg!(windows) && Path::new(tool).extension().is_none() {
        vec![format!("{tool}.exe"), tool.to_string()]
    } else {
        vec![tool.to_string()]
    };

    for dir in path_entries {
        for name in &names {
            let candidate = dir.join(name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Default name of the host Python interpreter.
pub fn default_python() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

/// Path of the interpreter inside a virtual environment.
pub fn venv_python(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts").join("python.exe")
    } else {
        venv.join("bin").join("python")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn find_on_path_returns_first_executable() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("python3"), "not executable").unwrap();
        make_executable(&second.path().join("python3"));

        let found = find_on_path(
            "python3",
            &[first.path().to_path_buf(), second.path().to_path_buf()],
        );
        assert_eq!(found, Some(second.path().join("python3")));
    }

    #[test]
    fn find_on_path_missing_tool() {
        let dir = TempDir::new().unwrap();
        assert!(find_on_path("python3", &[dir.path().to_path_buf()]).is_none());
    }

    #[test]
    fn find_on_path_accepts_explicit_path() {
        let dir = TempDir::new().unwrap();
        let python = dir.path().join("python");
        fs::write(&python, "").unwrap();
        let tool = python.to_string_lossy().to_string();
        assert_eq!(find_on_path(&tool, &[]), Some(python));
    }

    #[cfg(unix)]
    #[test]
    fn venv_python_uses_bin_on_unix() {
        assert_eq!(
            venv_python(Path::new("comfy_venv")),
            PathBuf::from("comfy_venv/bin/python")
        );
    }
}
