use eframe::egui::{Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::catalog::Metric;
use crate::data::model::{PlayerRecord, ShootingDataset};
use crate::data::pipeline::{ColumnId, DisplayTable};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

/// Render the current pipeline result in the central panel.
///
/// Guard states (nothing selected yet, unknown sort column) render as a
/// centered message instead of an empty grid. Zero matching rows are not a
/// guard state: the table still draws, header only.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to get started (File → Open…)");
        });
        return;
    };

    match &state.view {
        Ok(table) => draw_table(ui, dataset, table),
        Err(status) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(status.to_string());
            });
        }
    }
}

fn draw_table(ui: &mut Ui, dataset: &ShootingDataset, table: &DisplayTable) {
    let mut builder = TableBuilder::new(ui).striped(true);
    for (i, _) in table.columns.iter().enumerate() {
        let col = if i == 0 {
            // Player name gets the wide, clipping column.
            Column::initial(160.0).resizable(true).clip(true).at_least(80.0)
        } else {
            Column::auto().resizable(true).at_least(48.0)
        };
        builder = builder.column(col);
    }

    builder
        .header(24.0, |mut header| {
            for &column in &table.columns {
                header.col(|ui| {
                    let label = RichText::new(column.label()).strong();
                    if column.is_numeric() {
                        ui.centered_and_justified(|ui| {
                            ui.label(label);
                        });
                    } else {
                        ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                            ui.label(label);
                        });
                    }
                });
            }
        })
        .body(|body| {
            body.rows(20.0, table.rows.len(), |mut row| {
                let record = &dataset.players[table.rows[row.index()]];
                for &column in &table.columns {
                    row.col(|ui| {
                        let text = cell_text(record, column);
                        if column.is_numeric() {
                            ui.centered_and_justified(|ui| {
                                ui.label(text);
                            });
                        } else {
                            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                                ui.label(text);
                            });
                        }
                    });
                }
            });
        });
}

/// Text for one table cell. Missing optional values render as a dash.
fn cell_text(record: &PlayerRecord, column: ColumnId) -> String {
    match column {
        ColumnId::Player => record.player.clone(),
        ColumnId::Age => match record.age {
            Some(age) => age.to_string(),
            None => "-".into(),
        },
        ColumnId::Born => match record.born {
            Some(year) => year.to_string(),
            None => "-".into(),
        },
        ColumnId::Nation => record.nation.clone().unwrap_or_else(|| "-".into()),
        ColumnId::Position => {
            if record.positions.is_empty() {
                "-".into()
            } else {
                record
                    .positions
                    .iter()
                    .map(|p| p.code())
                    .collect::<Vec<_>>()
                    .join(",")
            }
        }
        ColumnId::Stat(metric) => match record.stat(metric) {
            None => "-".into(),
            Some(v) if metric.is_integer() => format!("{v:.0}"),
            Some(v) if metric == Metric::Nineties => format!("{v:.1}"),
            Some(v) => format!("{v:.2}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{test_player, Position};

    #[test]
    fn counting_stats_render_without_decimals() {
        let p = test_player("Haaland", 23, &[Position::Forward], 28.4, 113);
        assert_eq!(cell_text(&p, ColumnId::Stat(Metric::Shots)), "113");
        assert_eq!(cell_text(&p, ColumnId::Stat(Metric::Nineties)), "28.4");
    }

    #[test]
    fn rate_stats_render_with_two_decimals() {
        let mut p = test_player("Kane", 30, &[Position::Forward], 30.0, 120);
        p.stats.insert(Metric::ExpectedGoals, 27.1);
        assert_eq!(cell_text(&p, ColumnId::Stat(Metric::ExpectedGoals)), "27.10");
    }

    #[test]
    fn missing_values_render_as_dash() {
        let mut p = test_player("Trialist", 0, &[Position::Midfielder], 1.0, 2);
        p.age = None;
        p.nation = None;
        p.born = None;
        assert_eq!(cell_text(&p, ColumnId::Age), "-");
        assert_eq!(cell_text(&p, ColumnId::Born), "-");
        assert_eq!(cell_text(&p, ColumnId::Nation), "-");
        assert_eq!(cell_text(&p, ColumnId::Stat(Metric::ExpectedGoals)), "-");
    }

    #[test]
    fn position_cell_joins_codes_in_source_order() {
        let p = test_player(
            "Kimmich",
            29,
            &[Position::Midfielder, Position::Defender],
            30.0,
            25,
        );
        assert_eq!(cell_text(&p, ColumnId::Position), "MF,DF");
    }

    #[test]
    fn zero_matching_rows_render_as_an_empty_table() {
        use std::collections::BTreeSet;

        use eframe::egui::{CentralPanel, Context, RawInput, Shape};

        fn collect_text(shape: &Shape, out: &mut Vec<String>) {
            match shape {
                Shape::Text(text) => out.push(text.galley.text().to_string()),
                Shape::Vec(shapes) => {
                    for s in shapes {
                        collect_text(s, out);
                    }
                }
                _ => {}
            }
        }

        let mut state = AppState::default();
        state.set_dataset(ShootingDataset::from_players(
            vec![test_player("A", 20, &[Position::Forward], 10.0, 30)],
            BTreeSet::new(),
            false,
        ));
        // No midfielders in the dataset, so the view is Ok but has no rows.
        state.controls.position = Some(Position::Midfielder);
        state.controls.sort_key = Some(Metric::Shots);
        state.refresh_view();
        assert!(state.view.as_ref().is_ok_and(|t| t.is_empty()));

        let ctx = Context::default();
        let output = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| results_table(ui, &state));
        });

        let mut texts = Vec::new();
        for clipped in &output.shapes {
            collect_text(&clipped.shape, &mut texts);
        }
        // The header row still renders even though no rows matched.
        assert!(texts.iter().any(|t| t == "Player"), "{texts:?}");
        assert!(texts.iter().any(|t| t == "Shots"), "{texts:?}");
    }
}
