use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::catalog::Metric;

// ---------------------------------------------------------------------------
// Position – the role codes used by the source's `Pos` column
// ---------------------------------------------------------------------------

/// A player role. The source encodes one or more of these per player as a
/// comma-joined code string (`"FW"`, `"FW,MF"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Every position, in the order the selector lists them.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Two-letter source code.
    pub fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }

    /// Full name shown in the position selector.
    pub fn label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        }
    }

    pub fn from_code(code: &str) -> Option<Position> {
        Position::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// Parse a comma-joined code cell into the set of roles.
    ///
    /// Codes are matched whole, so `"F"` never matches `DF`. Unknown codes
    /// are dropped; an empty or unparseable cell yields an empty set, which
    /// matches no position filter.
    pub fn parse_list(cell: &str) -> Vec<Position> {
        cell.split(',')
            .filter_map(|tok| Position::from_code(tok.trim()))
            .collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// PlayerRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One player's season shooting line, with a declared schema: the base
/// columns are typed fields, the remaining numeric metrics live in `stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player: String,
    pub nation: Option<String>,
    /// Roles parsed from the source's `Pos` cell at load time.
    pub positions: Vec<Position>,
    pub age: Option<u32>,
    /// Birth year; column is dataset-dependent.
    pub born: Option<i32>,
    /// Games played in 90-minute units.
    pub nineties: f64,
    pub shots: u32,
    /// Remaining numeric metrics; an absent key is a missing value.
    pub stats: BTreeMap<Metric, f64>,
}

impl PlayerRecord {
    /// Uniform numeric accessor bridging the typed fields and the stats map.
    pub fn stat(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Nineties => Some(self.nineties),
            Metric::Shots => Some(f64::from(self.shots)),
            other => self.stats.get(&other).copied(),
        }
    }

    /// Whether the player covers the given role.
    pub fn plays(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }
}

// ---------------------------------------------------------------------------
// ShootingDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset, immutable after load, with the sidebar bounds
/// precomputed once.
#[derive(Debug, Clone)]
pub struct ShootingDataset {
    /// All players (rows), in source order.
    pub players: Vec<PlayerRecord>,
    /// Sortable metric columns present in the source file.
    pub metric_columns: BTreeSet<Metric>,
    /// Whether the source carried a birth-year column.
    pub has_born: bool,
    /// Observed min/max age; `None` when no row has an age.
    pub age_bounds: Option<(u32, u32)>,
    /// Observed maximum of the `90s` column.
    pub max_nineties: f64,
    /// Observed maximum of the `Sh` column.
    pub max_shots: u32,
}

impl ShootingDataset {
    /// Build the dataset and precompute the observed bounds.
    ///
    /// `metric_columns` comes from the loader's schema detection; `90s` and
    /// `Sh` are required columns and always counted as present.
    pub fn from_players(
        players: Vec<PlayerRecord>,
        mut metric_columns: BTreeSet<Metric>,
        has_born: bool,
    ) -> Self {
        metric_columns.insert(Metric::Nineties);
        metric_columns.insert(Metric::Shots);

        let mut age_bounds: Option<(u32, u32)> = None;
        let mut max_nineties = 0.0_f64;
        let mut max_shots = 0_u32;

        for p in &players {
            if let Some(age) = p.age {
                age_bounds = Some(match age_bounds {
                    Some((lo, hi)) => (lo.min(age), hi.max(age)),
                    None => (age, age),
                });
            }
            max_nineties = max_nineties.max(p.nineties);
            max_shots = max_shots.max(p.shots);
        }

        ShootingDataset {
            players,
            metric_columns,
            has_born,
            age_bounds,
            max_nineties,
            max_shots,
        }
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Sortable metrics in catalog order.
    pub fn sortable_metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.metric_columns.iter().copied()
    }

    pub fn has_column(&self, metric: Metric) -> bool {
        self.metric_columns.contains(&metric)
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

/// Minimal record constructor shared by unit tests across the data modules.
#[cfg(test)]
pub(crate) fn test_player(
    player: &str,
    age: u32,
    positions: &[Position],
    nineties: f64,
    shots: u32,
) -> PlayerRecord {
    PlayerRecord {
        player: player.to_string(),
        nation: None,
        positions: positions.to_vec(),
        age: Some(age),
        born: None,
        nineties,
        shots,
        stats: BTreeMap::new(),
    }
}
