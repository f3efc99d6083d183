use thiserror::Error;

use super::catalog::Metric;
use super::model::{Position, ShootingDataset};

// ---------------------------------------------------------------------------
// FilterCriteria – everything the user picked for one evaluation
// ---------------------------------------------------------------------------

/// The full set of user-chosen filter/sort parameters.
///
/// Built fresh from the sidebar controls on every evaluation and handed to
/// [`evaluate`] by reference; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// `None` until the user picks a position.
    pub position: Option<Position>,
    /// `None` until the user picks a sort metric.
    pub sort_key: Option<Metric>,
    pub sort_descending: bool,
    /// Inclusive age window.
    pub age_range: (u32, u32),
    /// Minimum games played in 90-minute units; `0` disables the constraint.
    pub min_nineties: f64,
    /// Minimum shots taken; `0` disables the constraint.
    pub min_shots: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            position: None,
            sort_key: None,
            sort_descending: true,
            age_range: (0, 99),
            min_nineties: 0.0,
            min_shots: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineStatus – the defined "no table" outcomes
// ---------------------------------------------------------------------------

/// Why the pipeline produced no table. Neither variant is a crash path; the
/// UI renders both as guidance text in place of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipelineStatus {
    /// Position or sort metric has not been picked yet.
    #[error("Select a position and a sort metric to view the table.")]
    AwaitingSelection,
    /// The requested sort column is not in the loaded table (schema drift).
    #[error("Sort column \"{}\" is not present in the loaded dataset.", .0.key())]
    UnknownSortColumn(Metric),
}

// ---------------------------------------------------------------------------
// DisplayTable – the pipeline's output
// ---------------------------------------------------------------------------

/// One column of the display table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnId {
    Player,
    Age,
    Born,
    Nation,
    Position,
    Stat(Metric),
}

impl ColumnId {
    /// Table header text.
    pub fn label(self) -> &'static str {
        match self {
            ColumnId::Player => "Player",
            ColumnId::Age => "Age",
            ColumnId::Born => "Born",
            ColumnId::Nation => "Nation",
            ColumnId::Position => "Pos",
            ColumnId::Stat(m) => m.label(),
        }
    }

    /// Numeric columns get centered cells in the table.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnId::Age | ColumnId::Born | ColumnId::Stat(_))
    }
}

/// The display column set plus row indices into the source table, already
/// in display order. Indices guarantee the output is a subset of the input
/// rows and that nothing was copied or mutated to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTable {
    pub columns: Vec<ColumnId>,
    /// Indices into [`ShootingDataset::players`].
    pub rows: Vec<usize>,
}

impl DisplayTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// evaluate – guard, filter, sort, project
// ---------------------------------------------------------------------------

/// Run the filter/sort/projection pipeline for one set of criteria.
///
/// Pure over its inputs: the dataset is only read and the result is freshly
/// allocated, so identical inputs always yield identical output. Rows
/// missing a filtered field fail that filter; a row missing the sort value
/// sorts as the minimum possible value for the column (first when
/// ascending, last when descending).
pub fn evaluate(
    dataset: &ShootingDataset,
    criteria: &FilterCriteria,
) -> Result<DisplayTable, PipelineStatus> {
    let (Some(position), Some(sort_key)) = (criteria.position, criteria.sort_key) else {
        return Err(PipelineStatus::AwaitingSelection);
    };
    if !dataset.has_column(sort_key) {
        return Err(PipelineStatus::UnknownSortColumn(sort_key));
    }

    let (min_age, max_age) = criteria.age_range;
    let mut rows: Vec<usize> = dataset
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            if !p.age.is_some_and(|a| (min_age..=max_age).contains(&a)) {
                return false;
            }
            if !p.plays(position) {
                return false;
            }
            if criteria.min_nineties > 0.0 && p.nineties < criteria.min_nineties {
                return false;
            }
            if criteria.min_shots > 0 && p.shots < criteria.min_shots {
                return false;
            }
            true
        })
        .map(|(i, _)| i)
        .collect();

    // Stable sort: ties keep source order, so re-runs are deterministic.
    let sort_value =
        |i: usize| dataset.players[i].stat(sort_key).unwrap_or(f64::NEG_INFINITY);
    rows.sort_by(|&a, &b| {
        let ord = sort_value(a).total_cmp(&sort_value(b));
        if criteria.sort_descending {
            ord.reverse()
        } else {
            ord
        }
    });

    Ok(DisplayTable {
        columns: display_columns(dataset, sort_key),
        rows,
    })
}

/// The fixed base columns, plus the sort metric when it is not already one
/// of them (`90s` and `Sh` are). `Born` appears only when the source had it.
fn display_columns(dataset: &ShootingDataset, sort_key: Metric) -> Vec<ColumnId> {
    let mut columns = vec![ColumnId::Player, ColumnId::Age];
    if dataset.has_born {
        columns.push(ColumnId::Born);
    }
    columns.extend([
        ColumnId::Nation,
        ColumnId::Position,
        ColumnId::Stat(Metric::Nineties),
        ColumnId::Stat(Metric::Shots),
    ]);
    if !matches!(sort_key, Metric::Nineties | Metric::Shots) {
        columns.push(ColumnId::Stat(sort_key));
    }
    columns
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::{test_player, PlayerRecord};

    /// Dataset whose metric columns are the union of the rows' stats keys.
    fn dataset(players: Vec<PlayerRecord>) -> ShootingDataset {
        let mut columns = BTreeSet::new();
        for p in &players {
            columns.extend(p.stats.keys().copied());
        }
        ShootingDataset::from_players(players, columns, false)
    }

    /// Two-row table: a young forward with plenty of shots and an older
    /// midfielder with few.
    fn scenario_table() -> ShootingDataset {
        dataset(vec![
            test_player("A", 20, &[Position::Forward], 10.0, 30),
            test_player("B", 25, &[Position::Midfielder], 5.0, 10),
        ])
    }

    fn criteria(position: Position, sort_key: Metric) -> FilterCriteria {
        FilterCriteria {
            position: Some(position),
            sort_key: Some(sort_key),
            sort_descending: true,
            age_range: (18, 30),
            ..FilterCriteria::default()
        }
    }

    fn names(ds: &ShootingDataset, table: &DisplayTable) -> Vec<String> {
        table
            .rows
            .iter()
            .map(|&i| ds.players[i].player.clone())
            .collect()
    }

    #[test]
    fn awaiting_selection_until_both_selectors_set() {
        let ds = scenario_table();

        let mut c = FilterCriteria::default();
        assert_eq!(evaluate(&ds, &c), Err(PipelineStatus::AwaitingSelection));

        c.position = Some(Position::Forward);
        assert_eq!(evaluate(&ds, &c), Err(PipelineStatus::AwaitingSelection));

        c.position = None;
        c.sort_key = Some(Metric::Shots);
        // Other parameters do not matter while a selector is unset.
        c.min_shots = 1000;
        c.age_range = (40, 41);
        assert_eq!(evaluate(&ds, &c), Err(PipelineStatus::AwaitingSelection));
    }

    #[test]
    fn unknown_sort_column_is_reported() {
        let ds = scenario_table();
        let c = criteria(Position::Forward, Metric::ExpectedGoals);
        assert_eq!(
            evaluate(&ds, &c),
            Err(PipelineStatus::UnknownSortColumn(Metric::ExpectedGoals))
        );
        // The guidance text names the missing source column.
        let msg = PipelineStatus::UnknownSortColumn(Metric::ExpectedGoals).to_string();
        assert!(msg.contains("\"xG\""), "{msg}");
    }

    #[test]
    fn position_filter_keeps_only_matching_roles() {
        let ds = scenario_table();
        let got = evaluate(&ds, &criteria(Position::Forward, Metric::Shots)).unwrap();
        assert_eq!(names(&ds, &got), vec!["A"]);
    }

    #[test]
    fn multi_role_players_match_any_of_their_codes() {
        let ds = dataset(vec![
            test_player("A", 22, &[Position::Forward, Position::Midfielder], 8.0, 20),
            test_player("B", 22, &[Position::Defender], 8.0, 5),
        ]);
        let got = evaluate(&ds, &criteria(Position::Midfielder, Metric::Shots)).unwrap();
        assert_eq!(names(&ds, &got), vec!["A"]);
    }

    #[test]
    fn min_shots_threshold_applies_regardless_of_position() {
        let ds = scenario_table();

        let mut c = criteria(Position::Forward, Metric::Shots);
        c.min_shots = 20;
        let got = evaluate(&ds, &c).unwrap();
        assert_eq!(names(&ds, &got), vec!["A"]);

        // The midfielder has 10 shots; the same threshold empties the view.
        let mut c = criteria(Position::Midfielder, Metric::Shots);
        c.min_shots = 20;
        let got = evaluate(&ds, &c).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn min_nineties_threshold_applies_regardless_of_position() {
        let ds = scenario_table();

        let mut c = criteria(Position::Forward, Metric::Shots);
        c.min_nineties = 6.0;
        let got = evaluate(&ds, &c).unwrap();
        assert_eq!(names(&ds, &got), vec!["A"]);

        // The midfielder has exactly 5.0 nineties; the bound is inclusive.
        let mut c = criteria(Position::Midfielder, Metric::Shots);
        c.min_nineties = 5.0;
        let got = evaluate(&ds, &c).unwrap();
        assert_eq!(names(&ds, &got), vec!["B"]);

        c.min_nineties = 5.1;
        let got = evaluate(&ds, &c).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn age_window_is_inclusive_and_missing_ages_fail_closed() {
        let mut no_age = test_player("C", 0, &[Position::Forward], 3.0, 6);
        no_age.age = None;
        let ds = dataset(vec![
            test_player("A", 18, &[Position::Forward], 10.0, 30),
            test_player("B", 30, &[Position::Forward], 5.0, 10),
            no_age,
        ]);

        let got = evaluate(&ds, &criteria(Position::Forward, Metric::Shots)).unwrap();
        assert_eq!(names(&ds, &got), vec!["A", "B"]);

        let mut tight = criteria(Position::Forward, Metric::Shots);
        tight.age_range = (19, 29);
        let got = evaluate(&ds, &tight).unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn zero_thresholds_disable_the_optional_filters() {
        let ds = dataset(vec![test_player("A", 20, &[Position::Forward], 0.0, 0)]);
        let got = evaluate(&ds, &criteria(Position::Forward, Metric::Shots)).unwrap();
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn sort_orders_both_directions_and_keeps_ties_stable() {
        let ds = dataset(vec![
            test_player("A", 20, &[Position::Forward], 1.0, 10),
            test_player("B", 20, &[Position::Forward], 2.0, 30),
            test_player("C", 20, &[Position::Forward], 3.0, 10),
            test_player("D", 20, &[Position::Forward], 4.0, 20),
        ]);

        let mut c = criteria(Position::Forward, Metric::Shots);
        let got = evaluate(&ds, &c).unwrap();
        // Descending; A and C tie on 10 and keep source order.
        assert_eq!(names(&ds, &got), vec!["B", "D", "A", "C"]);

        c.sort_descending = false;
        let got = evaluate(&ds, &c).unwrap();
        assert_eq!(names(&ds, &got), vec!["A", "C", "D", "B"]);
    }

    #[test]
    fn adjacent_pairs_respect_the_sort_direction() {
        let ds = dataset(vec![
            test_player("A", 20, &[Position::Forward], 7.1, 12),
            test_player("B", 21, &[Position::Forward], 30.0, 88),
            test_player("C", 22, &[Position::Forward], 15.2, 40),
            test_player("D", 23, &[Position::Forward], 2.0, 3),
        ]);
        for descending in [true, false] {
            let mut c = criteria(Position::Forward, Metric::Nineties);
            c.sort_descending = descending;
            let got = evaluate(&ds, &c).unwrap();
            for pair in got.rows.windows(2) {
                let a = ds.players[pair[0]].nineties;
                let b = ds.players[pair[1]].nineties;
                if descending {
                    assert!(a >= b);
                } else {
                    assert!(a <= b);
                }
            }
        }
    }

    #[test]
    fn missing_sort_values_sort_as_the_column_minimum() {
        let mut with_xg = test_player("A", 20, &[Position::Forward], 10.0, 30);
        with_xg.stats.insert(Metric::ExpectedGoals, 4.2);
        let without_xg = test_player("B", 20, &[Position::Forward], 8.0, 25);
        let mut low_xg = test_player("C", 20, &[Position::Forward], 9.0, 28);
        low_xg.stats.insert(Metric::ExpectedGoals, 0.1);
        let ds = dataset(vec![with_xg, without_xg, low_xg]);

        let mut c = criteria(Position::Forward, Metric::ExpectedGoals);
        let got = evaluate(&ds, &c).unwrap();
        // Descending: missing value last.
        assert_eq!(names(&ds, &got), vec!["A", "C", "B"]);

        c.sort_descending = false;
        let got = evaluate(&ds, &c).unwrap();
        // Ascending: missing value first.
        assert_eq!(names(&ds, &got), vec!["B", "C", "A"]);
    }

    #[test]
    fn evaluate_is_idempotent() {
        let ds = scenario_table();
        let c = criteria(Position::Forward, Metric::Shots);
        assert_eq!(evaluate(&ds, &c), evaluate(&ds, &c));
    }

    #[test]
    fn output_rows_are_a_subset_of_the_input() {
        let ds = dataset(vec![
            test_player("A", 20, &[Position::Forward], 10.0, 30),
            test_player("B", 21, &[Position::Forward], 5.0, 10),
            test_player("C", 22, &[Position::Forward], 7.0, 20),
        ]);
        let got = evaluate(&ds, &criteria(Position::Forward, Metric::Shots)).unwrap();

        let mut seen = BTreeSet::new();
        for &i in &got.rows {
            assert!(i < ds.len());
            assert!(seen.insert(i), "row {i} appeared twice");
        }
    }

    #[test]
    fn tightening_a_threshold_never_grows_the_result() {
        let ds = dataset(vec![
            test_player("A", 20, &[Position::Forward], 10.0, 30),
            test_player("B", 21, &[Position::Forward], 5.0, 10),
            test_player("C", 22, &[Position::Forward], 7.0, 20),
            test_player("D", 23, &[Position::Forward], 1.0, 2),
        ]);

        let mut prev = usize::MAX;
        for min_shots in [0, 5, 15, 25, 100] {
            let mut c = criteria(Position::Forward, Metric::Shots);
            c.min_shots = min_shots;
            let len = evaluate(&ds, &c).unwrap().len();
            assert!(len <= prev, "minShots={min_shots} grew the result");
            prev = len;
        }

        let mut prev = usize::MAX;
        for min_nineties in [0.0, 2.0, 6.0, 8.0, 50.0] {
            let mut c = criteria(Position::Forward, Metric::Shots);
            c.min_nineties = min_nineties;
            let len = evaluate(&ds, &c).unwrap().len();
            assert!(len <= prev, "min90s={min_nineties} grew the result");
            prev = len;
        }
    }

    #[test]
    fn projection_appends_the_sort_column_once() {
        let ds = scenario_table();

        let base = vec![
            ColumnId::Player,
            ColumnId::Age,
            ColumnId::Nation,
            ColumnId::Position,
            ColumnId::Stat(Metric::Nineties),
            ColumnId::Stat(Metric::Shots),
        ];

        // Sorting by a base metric adds nothing.
        let got = evaluate(&ds, &criteria(Position::Forward, Metric::Shots)).unwrap();
        assert_eq!(got.columns, base);

        // Sorting by anything else appends exactly that column.
        let mut with_goals = scenario_table();
        with_goals.metric_columns.insert(Metric::Goals);
        let got = evaluate(&with_goals, &criteria(Position::Forward, Metric::Goals)).unwrap();
        let mut expected = base.clone();
        expected.push(ColumnId::Stat(Metric::Goals));
        assert_eq!(got.columns, expected);
    }

    #[test]
    fn born_column_tracks_the_source_schema() {
        let mut ds = scenario_table();
        ds.has_born = true;
        let got = evaluate(&ds, &criteria(Position::Forward, Metric::Shots)).unwrap();
        assert_eq!(got.columns[2], ColumnId::Born);
    }

    #[test]
    fn empty_dataset_yields_an_empty_table_not_an_error() {
        let ds = dataset(Vec::new());
        let got = evaluate(&ds, &criteria(Position::Forward, Metric::Shots)).unwrap();
        assert!(got.is_empty());
        assert!(!got.columns.is_empty());
    }
}
