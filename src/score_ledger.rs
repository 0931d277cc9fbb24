use crate::team::TEAM_COUNT;

/// Cumulative score per team. Counters only ever go up, and only the round
/// orchestration touches them (one increment per correct guess).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    scores: [u32; TEAM_COUNT],
}

impl ScoreLedger {
    pub fn restore(scores: [u32; TEAM_COUNT]) -> Self {
        ScoreLedger { scores }
    }

    pub fn increment(&mut self, team_index: usize) {
        self.scores[team_index] += 1;
    }

    pub fn snapshot(&self) -> [u32; TEAM_COUNT] {
        self.scores
    }
}
