use crate::error::CliError;
use crate::model::PlayerState;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub fn resolve_db_path(cli_db_path: Option<&str>) -> Result<String, CliError> {
    if let Some(p) = cli_db_path.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        return Ok(p.to_string());
    }

    if let Ok(p) = std::env::var("QUESTFIT_DB_PATH") {
        let p = p.trim().to_string();
        if !p.is_empty() {
            return Ok(p);
        }
    }

    let base = std::env::var("XDG_DATA_HOME")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let home = std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok());

    let base = match (base, home) {
        (Some(b), _) => b,
        (None, Some(h)) => Path::new(&h)
            .join(".local")
            .join("share")
            .to_string_lossy()
            .to_string(),
        (None, None) => return Err(CliError::io("State IO error")),
    };

    Ok(Path::new(&base)
        .join("questfit")
        .join("state.json")
        .to_string_lossy()
        .to_string())
}

/// Loads the aggregate. A missing file is first run; a file that fails to
/// parse degrades to a fresh default aggregate rather than an error, so a
/// damaged document never blocks the app.
pub fn read_state(db_path: &str) -> Result<PlayerState, CliError> {
    match fs::read_to_string(db_path) {
        Ok(txt) => match serde_json::from_str(&txt) {
            Ok(state) => Ok(state),
            Err(_) => Ok(PlayerState::default()),
        },
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                Ok(PlayerState::default())
            } else {
                Err(CliError::io("State IO error"))
            }
        }
    }
}

fn ensure_parent_dir(db_path: &str) -> Result<(), CliError> {
    let dir = Path::new(db_path)
        .parent()
        .ok_or_else(|| CliError::io("State IO error"))?;
    fs::create_dir_all(dir).map_err(|_| CliError::io("State IO error"))?;

    #[cfg(unix)]
    {
        let _ = fs::set_permissions(dir, fs::Permissions::from_mode(0o700));
    }

    Ok(())
}

struct WriteLock {
    path: PathBuf,
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn with_write_lock<R>(
    db_path: &str,
    f: impl FnOnce() -> Result<R, CliError>,
) -> Result<R, CliError> {
    let lock_path = PathBuf::from(format!("{}.lock", db_path));

    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&lock_path)
    {
        Ok(_file) => {
            #[cfg(unix)]
            {
                let _ = _file.set_permissions(fs::Permissions::from_mode(0o600));
            }
            let _guard = WriteLock { path: lock_path };
            f()
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                Err(CliError::io("State file is locked"))
            } else {
                Err(CliError::io("State IO error"))
            }
        }
    }
}

fn write_state_inner(db_path: &str, state: &PlayerState) -> Result<(), CliError> {
    ensure_parent_dir(db_path)?;

    let dir = Path::new(db_path)
        .parent()
        .ok_or_else(|| CliError::io("State IO error"))?;

    let tmp_path = dir.join(format!(".state.json.tmp.{}", std::process::id()));
    let data =
        serde_json::to_string_pretty(state).map_err(|_| CliError::io("State IO error"))? + "\n";

    {
        let mut f = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|_| CliError::io("State IO error"))?;

        #[cfg(unix)]
        {
            let _ = f.set_permissions(fs::Permissions::from_mode(0o600));
        }

        f.write_all(data.as_bytes())
            .map_err(|_| CliError::io("State IO error"))?;
        let _ = f.flush();
    }

    fs::rename(&tmp_path, db_path).map_err(|_| {
        let _ = fs::remove_file(&tmp_path);
        CliError::io("State IO error")
    })?;

    #[cfg(unix)]
    {
        let _ = fs::set_permissions(db_path, fs::Permissions::from_mode(0o600));
    }

    Ok(())
}

/// Read-modify-write under the lock sentinel: load, apply `mutator`, persist
/// the whole aggregate atomically (temp file + rename).
pub fn update_state<R>(
    db_path: &str,
    mutator: impl FnOnce(&mut PlayerState) -> Result<R, CliError>,
) -> Result<R, CliError> {
    ensure_parent_dir(db_path)?;
    with_write_lock(db_path, || {
        let mut state = read_state(db_path)?;
        let out = mutator(&mut state)?;
        write_state_inner(db_path, &state)?;
        Ok(out)
    })
}
