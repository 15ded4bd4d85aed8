use serde::{Deserialize, Serialize};

/// Number of entries kept.
pub const LEADERBOARD_CAPACITY: usize = 10;
const INITIALS_LEN: usize = 3;

/// One high score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub initials: String,
    pub score: u32,
}

/// High scores in descending order, at most ten entries.
///
/// Serialized as a flat JSON array; loading sorts and truncates whatever
/// was stored.
///
/// ```
/// use orbtris_engine::Leaderboard;
///
/// let mut board = Leaderboard::default();
/// assert_eq!(board.qualifying_position(150), Some(0));
/// board.insert("ab", 150);
/// assert_eq!(board.entries()[0].initials, "AB-");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LeaderboardEntry>", into = "Vec<LeaderboardEntry>")]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        let entries = (0..LEADERBOARD_CAPACITY)
            .map(|_| LeaderboardEntry {
                initials: "-".repeat(INITIALS_LEN),
                score: 0,
            })
            .collect();
        Self { entries }
    }
}

impl From<Vec<LeaderboardEntry>> for Leaderboard {
    fn from(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_CAPACITY);
        Self { entries }
    }
}

impl From<Leaderboard> for Vec<LeaderboardEntry> {
    fn from(board: Leaderboard) -> Self {
        board.entries
    }
}

/// Uppercases, cuts to three characters, and pads with `-`.
///
/// ```
/// use orbtris_engine::normalize_initials;
///
/// assert_eq!(normalize_initials("jw"), "JW-");
/// assert_eq!(normalize_initials("abcd"), "ABC");
/// ```
#[must_use]
pub fn normalize_initials(initials: &str) -> String {
    let mut normalized: String = initials.to_uppercase().chars().take(INITIALS_LEN).collect();
    while normalized.chars().count() < INITIALS_LEN {
        normalized.push('-');
    }
    normalized
}

impl Leaderboard {
    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Position a score would take, or `None` if it does not qualify.
    ///
    /// A score qualifies when it beats a stored score. A list with free
    /// slots also takes any positive score at its end.
    #[must_use]
    pub fn qualifying_position(&self, score: u32) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| score > entry.score)
            .or_else(|| {
                (self.entries.len() < LEADERBOARD_CAPACITY && score > 0)
                    .then_some(self.entries.len())
            })
    }

    /// Inserts a score with normalized initials, dropping the lowest entry
    /// beyond capacity. Returns the position taken.
    pub fn insert(&mut self, initials: &str, score: u32) -> Option<usize> {
        let position = self.qualifying_position(score)?;
        self.entries.insert(
            position,
            LeaderboardEntry {
                initials: normalize_initials(initials),
                score,
            },
        );
        self.entries.truncate(LEADERBOARD_CAPACITY);
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(scores: &[u32]) -> Leaderboard {
        scores
            .iter()
            .map(|&score| LeaderboardEntry {
                initials: "JWO".to_owned(),
                score,
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_qualifying_position() {
        let board = board(&[12700, 2590, 1940, 1790, 1010, 930, 460, 100, 20, 0]);
        assert_eq!(board.qualifying_position(20000), Some(0));
        assert_eq!(board.qualifying_position(500), Some(6));
        // ties do not displace
        assert_eq!(board.qualifying_position(100), Some(8));
        assert_eq!(board.qualifying_position(1), Some(9));
        assert_eq!(board.qualifying_position(0), None);
    }

    #[test]
    fn test_short_list_accepts_positive_scores() {
        let board = board(&[300, 200]);
        assert_eq!(board.qualifying_position(50), Some(2));
        assert_eq!(board.qualifying_position(0), None);
    }

    #[test]
    fn test_insert_truncates() {
        let mut board = board(&[90, 80, 70, 60, 50, 40, 30, 20, 10, 5]);
        assert_eq!(board.insert("xyz", 55), Some(4));
        assert_eq!(board.entries().len(), LEADERBOARD_CAPACITY);
        assert_eq!(board.entries()[4].initials, "XYZ");
        assert_eq!(board.entries().last().unwrap().score, 10);
        assert_eq!(board.insert("low", 1), None);
    }

    #[test]
    fn test_normalize_initials() {
        assert_eq!(normalize_initials(""), "---");
        assert_eq!(normalize_initials("q"), "Q--");
        assert_eq!(normalize_initials("Jwo!"), "JWO");
    }

    #[test]
    fn test_json_sorts_on_load() {
        let json = r#"[
            { "initials": "AAA", "score": 10 },
            { "initials": "BBB", "score": 30 },
            { "initials": "CCC", "score": 20 }
        ]"#;
        let board: Leaderboard = serde_json::from_str(json).unwrap();
        let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, [30, 20, 10]);

        let json = serde_json::to_string(&board).unwrap();
        assert!(json.starts_with(r#"[{"initials":"BBB","score":30}"#));
    }
}
