//! Loads a newline-delimited user-agent file and picks one uniformly at
//! random, once per run.

use rand::seq::SliceRandom;
use std::path::Path;

use crate::error::SpiderError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Read `path`, strip blank lines, and return one random entry. Returns
/// `DEFAULT_USER_AGENT` if the file is empty after filtering.
pub fn pick_from_file(path: &Path) -> Result<String, SpiderError> {
    let contents = std::fs::read_to_string(path)?;
    let agents: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut rng = rand::thread_rng();
    Ok(agents
        .choose(&mut rng)
        .map(|s| s.to_string())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn picks_one_of_the_listed_agents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "agent-one").unwrap();
        writeln!(file, "agent-two").unwrap();
        writeln!(file, "").unwrap();

        let picked = pick_from_file(file.path()).unwrap();
        assert!(picked == "agent-one" || picked == "agent-two");
    }

    #[test]
    fn falls_back_to_default_on_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let picked = pick_from_file(file.path()).unwrap();
        assert_eq!(picked, DEFAULT_USER_AGENT);
    }
}
