//! Catalogue of the statistics tracked per player.
//!
//! Identifiers match the rows of `stats_definitions`; the gameplay server
//! writes values keyed by these ids and the statistics page reads them back
//! joined to their names.

use serde::{Deserialize, Serialize};

/// How a session value is folded into the lifetime (global) value.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    Sum,
    Max,
    Min,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKind {
    LeftMoves,
    RightMoves,
    UpMoves,
    DownMoves,
    TotalMoves,
    BlocksMoved,
    BlocksMerged,
    GameRestarts,
    GameWins,
    GameLoses,
    TotalTimePlayed,
    TotalScore,
    HighestScore,
    MaximalBlock,
    SlowestWin,
    SlowestLose,
    FastestWin,
    FastestLose,
}

impl StatKind {
    pub const ALL: [StatKind; 18] = [
        StatKind::LeftMoves,
        StatKind::RightMoves,
        StatKind::UpMoves,
        StatKind::DownMoves,
        StatKind::TotalMoves,
        StatKind::BlocksMoved,
        StatKind::BlocksMerged,
        StatKind::GameRestarts,
        StatKind::GameWins,
        StatKind::GameLoses,
        StatKind::TotalTimePlayed,
        StatKind::TotalScore,
        StatKind::HighestScore,
        StatKind::MaximalBlock,
        StatKind::SlowestWin,
        StatKind::SlowestLose,
        StatKind::FastestWin,
        StatKind::FastestLose,
    ];

    /// Row id in `stats_definitions`.
    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn from_id(id: i64) -> Option<StatKind> {
        usize::try_from(id).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            StatKind::LeftMoves => "Left moves",
            StatKind::RightMoves => "Right moves",
            StatKind::UpMoves => "Up moves",
            StatKind::DownMoves => "Down moves",
            StatKind::TotalMoves => "Total moves",
            StatKind::BlocksMoved => "Blocks moved",
            StatKind::BlocksMerged => "Blocks merged",
            StatKind::GameRestarts => "Game restarts",
            StatKind::GameWins => "Game wins",
            StatKind::GameLoses => "Game loses",
            StatKind::TotalTimePlayed => "Total time played",
            StatKind::TotalScore => "Total score",
            StatKind::HighestScore => "Highest score",
            StatKind::MaximalBlock => "Maximal block",
            StatKind::SlowestWin => "Slowest win",
            StatKind::SlowestLose => "Slowest lose",
            StatKind::FastestWin => "Fastest win",
            StatKind::FastestLose => "Fastest lose",
        }
    }

    /// Accepts the display name or the variant name, ignoring case, spaces
    /// and underscores (`"total score"`, `"TotalScore"`, `"total_score"`).
    pub fn parse(text: &str) -> Option<StatKind> {
        let wanted = normalize(text);
        Self::ALL
            .iter()
            .copied()
            .find(|kind| normalize(kind.name()) == wanted)
    }

    pub fn merge_policy(self) -> MergePolicy {
        match self {
            StatKind::HighestScore
            | StatKind::MaximalBlock
            | StatKind::SlowestWin
            | StatKind::SlowestLose => MergePolicy::Max,
            StatKind::FastestWin | StatKind::FastestLose => MergePolicy::Min,
            _ => MergePolicy::Sum,
        }
    }
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_ordered() {
        for (index, kind) in StatKind::ALL.iter().enumerate() {
            assert_eq!(kind.id(), index as i64);
            assert_eq!(StatKind::from_id(index as i64), Some(*kind));
        }
        assert_eq!(StatKind::from_id(18), None);
        assert_eq!(StatKind::from_id(-1), None);
    }

    #[test]
    fn test_merge_policies() {
        assert_eq!(StatKind::TotalScore.merge_policy(), MergePolicy::Sum);
        assert_eq!(StatKind::GameWins.merge_policy(), MergePolicy::Sum);
        assert_eq!(StatKind::HighestScore.merge_policy(), MergePolicy::Max);
        assert_eq!(StatKind::SlowestLose.merge_policy(), MergePolicy::Max);
        assert_eq!(StatKind::FastestWin.merge_policy(), MergePolicy::Min);
        assert_eq!(StatKind::FastestLose.merge_policy(), MergePolicy::Min);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(StatKind::parse("Total score"), Some(StatKind::TotalScore));
        assert_eq!(StatKind::parse("totalscore"), Some(StatKind::TotalScore));
        assert_eq!(StatKind::parse("fastest_win"), Some(StatKind::FastestWin));
        assert_eq!(StatKind::parse("MaximalBlock"), Some(StatKind::MaximalBlock));
        assert_eq!(StatKind::parse("nonsense"), None);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = StatKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), StatKind::ALL.len());
    }
}
