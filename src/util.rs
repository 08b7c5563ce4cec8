use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Transcript paths listed one per line; blank lines and `#` comments are
/// skipped. Relative entries resolve against the list's own directory.
pub fn parse_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading input list {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let mut inputs = Vec::new();
    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = PathBuf::from(trimmed);
        inputs.push(if entry.is_absolute() {
            entry
        } else {
            base.join(entry)
        });
    }
    if inputs.is_empty() {
        return Err(anyhow!("input list {} had no entries", path.display()));
    }
    Ok(inputs)
}

pub fn timestamp_suffix() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{secs}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_list_skips_comments_and_resolves_relative_paths() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let list = tmp.path().join("inputs.txt");
        fs::write(&list, "# recorded games\n\na.txt\n  /abs/b.txt  \n")?;
        let inputs = parse_input_list(&list)?;
        assert_eq!(inputs, vec![tmp.path().join("a.txt"), PathBuf::from("/abs/b.txt")]);
        Ok(())
    }

    #[test]
    fn empty_input_list_is_an_error() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let list = tmp.path().join("inputs.txt");
        fs::write(&list, "# nothing yet\n")?;
        assert!(parse_input_list(&list).is_err());
        Ok(())
    }
}
