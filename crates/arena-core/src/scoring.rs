//! Battle scoring and knockout ranking
//!
//! A completed response earns up to 40 points for speed, 30 for detail
//! (word count) and 30 for length. With all three entities ranked, the
//! lowest is eliminated and the top score wins.

use crate::board::Board;
use crate::types::Entity;
use std::time::Duration;

const SPEED_MAX: f64 = 40.0;
const SPEED_PENALTY_PER_SEC: f64 = 2.0;
const DETAIL_MAX: f64 = 30.0;
const WORDS_PER_POINT: f64 = 10.0;
const LENGTH_MAX: f64 = 30.0;
const UNITS_PER_POINT: f64 = 50.0;

/// Number of `' '`-separated fields. An empty response counts as one word.
pub fn word_count(response: &str) -> usize {
    response.split(' ').count()
}

/// Length in UTF-16 code units, the unit the backend's web client counts in.
/// Characters outside the BMP (most emoji) count twice.
pub fn text_length(response: &str) -> usize {
    response.encode_utf16().count()
}

pub fn score(response: &str, elapsed: Duration) -> u32 {
    let speed = (SPEED_MAX - elapsed.as_secs_f64() * SPEED_PENALTY_PER_SEC).max(0.0);
    let detail = (word_count(response) as f64 / WORDS_PER_POINT).min(DETAIL_MAX);
    let length = (text_length(response) as f64 / UNITS_PER_POINT).min(LENGTH_MAX);
    (speed + detail + length).round() as u32
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scored {
    pub entity: Entity,
    pub score: u32,
    pub words: usize,
}

/// Completed entities ordered by score, best first.
#[derive(Clone, Debug, Default)]
pub struct Standings {
    entries: Vec<Scored>,
}

impl Standings {
    pub fn from_board(board: &Board) -> Self {
        let mut entries: Vec<Scored> = board
            .iter()
            .filter(|(_, state)| state.is_complete())
            .map(|(entity, state)| Scored {
                entity,
                score: score(&state.accumulated, state.elapsed.unwrap_or_default()),
                words: word_count(&state.accumulated),
            })
            .collect();
        // Stable sort keeps display order among ties.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }

    pub fn entries(&self) -> &[Scored] {
        &self.entries
    }

    pub fn get(&self, entity: Entity) -> Option<&Scored> {
        self.entries.iter().find(|s| s.entity == entity)
    }

    pub fn knockout(&self) -> Option<Knockout> {
        match self.entries.as_slice() {
            [first, second, third, ..] => Some(Knockout {
                winner: first.entity,
                runner_up: second.entity,
                eliminated: third.entity,
            }),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Knockout {
    pub winner: Entity,
    pub runner_up: Entity,
    pub eliminated: Entity,
}

impl Knockout {
    pub fn explanation(&self, standings: &Standings) -> String {
        let points = |e: Entity| standings.get(e).map(|s| s.score).unwrap_or(0);
        let words = standings.get(self.winner).map(|s| s.words).unwrap_or(0);
        let best = points(self.winner);
        format!(
            "{} WINS!\n\nScore: {} points\n\nVictory Factors:\n\
             - Speed: {}ms average\n\
             - Detail: {} words\n\
             - Accuracy: Comprehensive answer\n\n\
             Defeated: {} ({} pts) and {} ({} pts)",
            self.winner.display_name(),
            best,
            speed_label(best),
            words,
            self.runner_up.display_name(),
            points(self.runner_up),
            self.eliminated.display_name(),
            points(self.eliminated),
        )
    }
}

/// The "average" shown in the explanation is derived from the score alone.
fn speed_label(score: u32) -> i64 {
    (100.0 - f64::from(score) / 2.0).round() as i64
}
