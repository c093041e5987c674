use std::{
    io::Write,
    path::{Component, Path, PathBuf},
};

/// helper function to "mkdir -p path" - make all directories along a path
pub fn create_dirs<P>(path: P) -> std::io::Result<()>
where
    P: AsRef<Path>,
{
    let dirspath = path.as_ref();
    if dirspath.as_os_str().is_empty() || dirspath.is_dir() {
        Ok(())
    } else {
        std::fs::create_dir_all(dirspath)
    }
}

/// creates the directory that will hold `file`, if it has one.
pub fn create_parent_dirs<P>(file: P) -> std::io::Result<()>
where
    P: AsRef<Path>,
{
    match file.as_ref().parent() {
        Some(parent) => create_dirs(parent),
        None => Ok(()),
    }
}

/// writes `contents` to a temporary file next to `path` and renames it into
/// place, so readers never observe a partially written file.
pub fn write_atomic<P>(path: P, contents: &[u8]) -> std::io::Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// joins `path` onto `base` (unless already absolute) and removes `.` and `..`
/// components without touching the filesystem.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
