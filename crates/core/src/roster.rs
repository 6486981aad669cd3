//! Player roster ingestion.

use std::{fs, path::Path};

use tracing::debug;

use crate::error::{GameError, Result};

/// Default roster file name, one player per line.
pub const DEFAULT_ROSTER_FILE: &str = "Players.txt";

/// Split roster text into player names, skipping blank lines.
pub fn parse_roster(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a roster file from disk.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| GameError::from_io(path, err))?;
    let players = parse_roster(&content);
    debug!(path = %path.display(), players = players.len(), "loaded roster");
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn blank_lines_and_padding_are_dropped() {
        let players = parse_roster("Ada\n\n  Grace  \r\n\t\nLinus\n");
        assert_eq!(players, ["Ada", "Grace", "Linus"]);
    }

    #[test]
    fn reads_roster_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DEFAULT_ROSTER_FILE);
        fs::write(&path, "Ada\nGrace\n\nLinus\nBarbara\n")?;

        let players = load_roster(&path)?;
        assert_eq!(players.len(), 4);
        assert_eq!(players[3], "Barbara");
        Ok(())
    }

    #[test]
    fn missing_roster_is_unavailable() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let err = load_roster(dir.path().join("nobody.txt")).unwrap_err();
        assert!(matches!(err, GameError::SourceUnavailable { .. }));
        Ok(())
    }
}
