use crate::data::catalog::Metric;
use crate::data::model::{Position, ShootingDataset};
use crate::data::pipeline::{evaluate, DisplayTable, FilterCriteria, PipelineStatus};

// ---------------------------------------------------------------------------
// Sidebar controls
// ---------------------------------------------------------------------------

/// Widget-backed values for the sidebar controls.
///
/// egui keeps these alive across frames; the [`FilterCriteria`] handed to
/// the pipeline is rebuilt from them on every refresh, never mutated in
/// place.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaControls {
    pub position: Option<Position>,
    pub sort_key: Option<Metric>,
    pub sort_descending: bool,
    pub age_min: u32,
    pub age_max: u32,
    /// Whole-number slider value for the minimum-90s threshold.
    pub min_nineties: u32,
    pub min_shots: u32,
}

impl Default for CriteriaControls {
    fn default() -> Self {
        CriteriaControls {
            position: None,
            sort_key: None,
            sort_descending: true,
            age_min: 0,
            age_max: 0,
            min_nineties: 0,
            min_shots: 0,
        }
    }
}

impl CriteriaControls {
    /// Controls for a freshly loaded dataset: selectors unset, thresholds
    /// off, age window spanning the observed bounds.
    pub fn for_dataset(dataset: &ShootingDataset) -> Self {
        let (age_min, age_max) = dataset.age_bounds.unwrap_or((0, 0));
        CriteriaControls {
            age_min,
            age_max,
            ..CriteriaControls::default()
        }
    }

    /// Build the criteria for one pipeline run.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            position: self.position,
            sort_key: self.sort_key,
            sort_descending: self.sort_descending,
            age_range: (self.age_min, self.age_max),
            min_nineties: f64::from(self.min_nineties),
            min_shots: self.min_shots,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub dataset: Option<ShootingDataset>,

    /// Sidebar control values.
    pub controls: CriteriaControls,

    /// Result of the last pipeline run (cached between interactions).
    pub view: Result<DisplayTable, PipelineStatus>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            dataset: None,
            controls: CriteriaControls::default(),
            view: Err(PipelineStatus::AwaitingSelection),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the controls to its bounds.
    pub fn set_dataset(&mut self, dataset: ShootingDataset) {
        self.controls = CriteriaControls::for_dataset(&dataset);
        self.view = evaluate(&dataset, &self.controls.criteria());
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Re-run the pipeline after a control change.
    pub fn refresh_view(&mut self) {
        if let Some(ds) = &self.dataset {
            self.view = evaluate(ds, &self.controls.criteria());
        }
    }

    /// Rows in the current view; zero while a guard state is showing.
    pub fn visible_rows(&self) -> usize {
        self.view.as_ref().map(DisplayTable::len).unwrap_or(0)
    }
}
