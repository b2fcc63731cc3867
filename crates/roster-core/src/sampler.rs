// Random per-team player selection.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::ingest::TeamPlayerIndex;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("minimum ({min}) exceeds maximum ({max})")]
    MinExceedsMax { min: usize, max: usize },
}

/// Validated `min <= max` pair. Validation happens when the caller builds
/// this; `sample` trusts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBounds {
    min: usize,
    max: usize,
}

impl SampleBounds {
    pub fn new(min: usize, max: usize) -> Result<Self, BoundsError> {
        if min > max {
            return Err(BoundsError::MinExceedsMax { min, max });
        }
        Ok(SampleBounds { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

/// Team -> randomly chosen entries for one draw. Order within a team is
/// the draw order, not the roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionResult {
    teams: BTreeMap<String, Vec<String>>,
}

impl SelectionResult {
    pub fn selected(&self, team: &str) -> Option<&[String]> {
        self.teams.get(team).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.teams.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Size of the largest team selection; the number of player columns.
    pub fn max_selected(&self) -> usize {
        self.teams.values().map(Vec::len).max().unwrap_or(0)
    }

    /// The selection as a padded table: a `Team, Player 1, ..., Player N`
    /// header and one row per team, short rows filled with empty cells.
    pub fn grid(&self) -> SelectionGrid {
        let width = self.max_selected();
        let mut header = Vec::with_capacity(width + 1);
        header.push("Team".to_string());
        header.extend((1..=width).map(|i| format!("Player {i}")));

        let rows = self
            .teams
            .iter()
            .map(|(team, players)| {
                let mut row = Vec::with_capacity(width + 1);
                row.push(team.clone());
                row.extend(players.iter().cloned());
                row.resize(width + 1, String::new());
                row
            })
            .collect();

        SelectionGrid { header, rows }
    }
}

/// Rectangular rendering of a `SelectionResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionGrid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Result of a draw as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Selected(SelectionResult),
    /// The index holds no players at all. Informational, not an error.
    NoPlayersFound,
}

/// Draw, for every team independently, `k` uniform in `[min, max]` and then
/// `min(k, available)` distinct entries uniformly without replacement.
///
/// Every team in `index` appears in the result, including teams with no
/// players (empty selection).
pub fn sample<R: Rng + ?Sized>(
    index: &TeamPlayerIndex,
    bounds: SampleBounds,
    rng: &mut R,
) -> SelectionResult {
    let teams = index
        .iter()
        .map(|(team, players)| {
            let k = rng.gen_range(bounds.min..=bounds.max);
            let n = k.min(players.len());
            let chosen = players.choose_multiple(&mut *rng, n).cloned().collect();
            (team.to_string(), chosen)
        })
        .collect();
    SelectionResult { teams }
}

/// `sample`, reporting an index without any players as `NoPlayersFound`.
pub fn draw<R: Rng + ?Sized>(
    index: &TeamPlayerIndex,
    bounds: SampleBounds,
    rng: &mut R,
) -> DrawOutcome {
    if index.player_count() == 0 {
        return DrawOutcome::NoPlayersFound;
    }
    DrawOutcome::Selected(sample(index, bounds, rng))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
