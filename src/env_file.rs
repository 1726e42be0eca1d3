use crate::errors::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Current `.env` content, empty when the file does not exist yet
pub fn read_env_file(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

pub fn write_env_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let content = read_env_file(&dir.path().join(".env")).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join(".env");

        write_env_file(&path, "EE_ID=node-1\nEE_SUPERVISOR=false\n").unwrap();
        assert_eq!(read_env_file(&path).unwrap(), "EE_ID=node-1\nEE_SUPERVISOR=false\n");
    }
}
