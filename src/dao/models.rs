use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Player name stored when a submission does not carry one.
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";
/// Mode stored when a submission does not carry one, and queried by default.
pub const DEFAULT_MODE: &str = "normal";
/// Column width of `player_name`.
pub const PLAYER_NAME_MAX_CHARS: usize = 50;
/// Column width of `session_id`.
pub const SESSION_ID_MAX_CHARS: usize = 100;

/// Persisted high-score row. Never mutated once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighScoreEntity {
    /// Synthetic identifier assigned by the store.
    pub id: i64,
    /// Display name, at most [`PLAYER_NAME_MAX_CHARS`] characters.
    pub player_name: String,
    /// Ranking key; any value, negatives included.
    pub score: i64,
    /// Level reached when the run ended.
    pub level: i64,
    /// Enemies killed during the run.
    pub kills: i64,
    /// Seconds spent in the run.
    pub time_played: i64,
    /// Difficulty bucket the score is ranked in (matched verbatim).
    pub mode: String,
    /// Server time of the submission, set once by the store.
    pub created_at: SystemTime,
}

/// Score fields supplied by a caller, before the store assigns id and timestamp.
/// Fields mirror [`HighScoreEntity`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct NewHighScore {
    pub player_name: String,
    pub score: i64,
    pub level: i64,
    pub kills: i64,
    pub time_played: i64,
    pub mode: String,
}

impl Default for NewHighScore {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_owned(),
            score: 0,
            level: 1,
            kills: 0,
            time_played: 0,
            mode: DEFAULT_MODE.to_owned(),
        }
    }
}

impl NewHighScore {
    /// Attach the store-assigned id and creation time.
    pub fn into_entity(self, id: i64, created_at: SystemTime) -> HighScoreEntity {
        HighScoreEntity {
            id,
            player_name: self.player_name,
            score: self.score,
            level: self.level,
            kills: self.kills,
            time_played: self.time_played,
            mode: self.mode,
            created_at,
        }
    }
}

/// Persisted play session, keyed by the caller-provided `session_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSessionEntity {
    /// Synthetic identifier assigned by the store.
    pub id: i64,
    /// Opaque identifier unique across all sessions.
    pub session_id: String,
    /// Optional display name given when the session started.
    pub player_name: Option<String>,
    /// Server time at which the session was opened.
    pub started_at: SystemTime,
    /// Set exactly once, when the session ends.
    pub ended_at: Option<SystemTime>,
    /// Score reported on end; 0 while the session runs.
    pub final_score: i64,
}

impl GameSessionEntity {
    /// Whether the session already recorded its end.
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }
}

/// Truncate a player name to the column width, counting characters rather than bytes.
pub fn clamp_player_name(name: String) -> String {
    match name.char_indices().nth(PLAYER_NAME_MAX_CHARS) {
        Some((cut, _)) => name[..cut].to_owned(),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_high_score_defaults_match_column_defaults() {
        let score = NewHighScore::default();
        assert_eq!(score.player_name, "Anonymous");
        assert_eq!(score.score, 0);
        assert_eq!(score.level, 1);
        assert_eq!(score.kills, 0);
        assert_eq!(score.time_played, 0);
        assert_eq!(score.mode, "normal");
    }

    #[test]
    fn clamp_player_name_keeps_short_names() {
        assert_eq!(clamp_player_name("Ace".into()), "Ace");
        assert_eq!(clamp_player_name(String::new()), "");
    }

    #[test]
    fn clamp_player_name_cuts_on_char_boundary() {
        let long = "é".repeat(60);
        let clamped = clamp_player_name(long);
        assert_eq!(clamped.chars().count(), PLAYER_NAME_MAX_CHARS);
        assert!(clamped.chars().all(|c| c == 'é'));
    }
}
