use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::catalog::Metric;
use crate::data::model::Position;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – criteria widgets
// ---------------------------------------------------------------------------

/// Render the left criteria panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    let logo = egui::include_image!("../../assets/logo.png");
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(logo)
                .max_width(ui.available_width() * 0.8)
                .max_height(110.0),
        );
    });
    ui.add_space(4.0);

    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Copy bounds out so the widgets below can borrow the controls mutably.
    let sortable: Vec<Metric> = dataset.sortable_metrics().collect();
    let (age_lo, age_hi) = dataset.age_bounds.unwrap_or((0, 0));
    let max_nineties = dataset.max_nineties.ceil() as u32;
    let max_shots = dataset.max_shots;

    let controls = &mut state.controls;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Required filters");

            // ---- Position selector ----
            let position_text = controls
                .position
                .map(Position::label)
                .unwrap_or("Select...");
            egui::ComboBox::from_label("Position")
                .selected_text(position_text)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(controls.position.is_none(), "Select...")
                        .clicked()
                    {
                        controls.position = None;
                    }
                    for pos in Position::ALL {
                        if ui
                            .selectable_label(controls.position == Some(pos), pos.label())
                            .clicked()
                        {
                            controls.position = Some(pos);
                        }
                    }
                });

            // ---- Sort metric selector ----
            let sort_text = controls.sort_key.map(Metric::label).unwrap_or("Select...");
            egui::ComboBox::from_label("Sort by")
                .selected_text(sort_text)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(controls.sort_key.is_none(), "Select...")
                        .clicked()
                    {
                        controls.sort_key = None;
                    }
                    for metric in &sortable {
                        if ui
                            .selectable_label(controls.sort_key == Some(*metric), metric.label())
                            .clicked()
                        {
                            controls.sort_key = Some(*metric);
                        }
                    }
                });

            ui.checkbox(&mut controls.sort_descending, "Sort descending");

            ui.separator();
            ui.strong("Optional filters");

            // ---- Age window ----
            ui.add(Slider::new(&mut controls.age_min, age_lo..=age_hi).text("Min age"));
            ui.add(Slider::new(&mut controls.age_max, age_lo..=age_hi).text("Max age"));
            // Keep the window well-formed whichever end moved.
            if controls.age_min > controls.age_max {
                controls.age_max = controls.age_min;
            }

            // ---- Activity thresholds (0 disables the filter) ----
            ui.add(
                Slider::new(&mut controls.min_nineties, 0..=max_nineties)
                    .text("Minimum 90s played"),
            );
            ui.add(Slider::new(&mut controls.min_shots, 0..=max_shots).text("Minimum shots taken"));
        });

    // Re-run the pipeline after any control change.
    state.refresh_view();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} players loaded, {} shown",
                ds.len(),
                state.visible_rows()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open player shooting data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} players, {} sortable metrics",
                    dataset.len(),
                    dataset.metric_columns.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
