//! Output markers written around the caller's commands.

use uuid::Uuid;

const TOKEN_PREFIX: &str = "STATARUN-CUT-";

/// A per-session token embedded twice in the do-file as a block comment.
///
/// Stata echoes each do-file line into its log, so the comment shows up on a
/// line of its own right before and right after the caller's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    token: String,
}

impl Sentinel {
    /// Generate a fresh token. The random part makes a collision with anything
    /// the caller's commands print practically impossible.
    pub fn generate() -> Self {
        Self {
            token: format!("{}{}", TOKEN_PREFIX, Uuid::new_v4().simple()),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// The do-file line carrying the token.
    pub fn comment_line(&self) -> String {
        format!("/*{}*/", self.token)
    }

    /// Whether a log line is an echo of the marker.
    pub fn matches(&self, line: &str) -> bool {
        line.contains(&self.token)
    }

    /// Indices of every log line carrying the marker.
    pub fn positions<S: AsRef<str>>(&self, lines: &[S]) -> Vec<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.matches(line.as_ref()))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_per_session() {
        assert_ne!(Sentinel::generate(), Sentinel::generate());
    }

    #[test]
    fn comment_line_is_a_block_comment() {
        let s = Sentinel::generate();
        let line = s.comment_line();
        assert!(line.starts_with("/*STATARUN-CUT-"));
        assert!(line.ends_with("*/"));
        assert!(!line.contains(' '));
    }

    #[test]
    fn echoed_marker_is_found() {
        let s = Sentinel::generate();
        let lines = vec![
            "  ___  ____  ____  ____  ____ (R)".to_string(),
            format!(". {}", s.comment_line()),
            "2".to_string(),
            format!(". {}", s.comment_line()),
        ];
        assert_eq!(s.positions(&lines), vec![1, 3]);
    }

    #[test]
    fn other_sessions_markers_do_not_match() {
        let mine = Sentinel::generate();
        let theirs = Sentinel::generate();
        assert!(!mine.matches(&theirs.comment_line()));
    }
}
