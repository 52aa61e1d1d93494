//! Score file persistence
//!
//! One score per line, appended on every save. Reading skips anything that
//! does not parse so a hand-edited file never blocks the game.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::PersistError;

/// Append `score` as a line to `path`, creating the file if needed
pub fn append_score(path: &Path, score: u64) -> Result<(), PersistError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{score}")?;
    log::info!("Appended score {score} to {}", path.display());
    Ok(())
}

/// Read every score in `path`, in file order
pub fn read_scores(path: &Path) -> Result<Vec<u64>, PersistError> {
    let text = fs::read_to_string(path)?;
    Ok(parse_scores(&text))
}

fn parse_scores(text: &str) -> Vec<u64> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match line.parse() {
                Ok(score) => Some(score),
                Err(_) => {
                    log::warn!("Skipping unreadable score on line {}: {line:?}", i + 1);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        append_score(&path, 3).unwrap();
        append_score(&path, 12).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "3\n12\n");
        assert_eq!(read_scores(&path).unwrap(), vec![3, 12]);
    }

    #[test]
    fn test_append_to_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(append_score(dir.path(), 1), Err(PersistError::Io(_))));
    }

    #[test]
    fn test_parse_skips_garbage() {
        assert_eq!(parse_scores("4\n\n  7 \nabc\n-2\n9"), vec![4, 7, 9]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_scores(&dir.path().join("missing.txt")).is_err());
    }
}
