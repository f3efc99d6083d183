use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::catalog::Metric;
use super::model::{PlayerRecord, Position, ShootingDataset};

/// Columns every source file must carry; validated once per load.
const REQUIRED_COLUMNS: [&str; 5] = ["Player", "Pos", "Age", "90s", "Sh"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a player shooting dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the FBRef column names, one player per row
/// * `.json`    – records orientation: `[{ "Player": …, "Sh": 30, … }, …]`
/// * `.parquet` – flat scalar columns (strings, ints, floats)
pub fn load_file(path: &Path) -> Result<ShootingDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    if dataset.is_empty() {
        log::warn!("{} contained no player rows", path.display());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw record – the tolerant wire shape shared by the CSV and JSON readers
// ---------------------------------------------------------------------------

/// One source row before coercion into [`PlayerRecord`].
///
/// Numeric fields are all `f64` so integer-typed and float-typed sources
/// (pandas promotes int columns with gaps to float) both deserialize; the
/// conversion below casts them down. Empty CSV cells and JSON nulls become
/// `None`.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Player")]
    player: String,
    #[serde(rename = "Nation")]
    nation: Option<String>,
    #[serde(rename = "Pos")]
    pos: Option<String>,
    #[serde(rename = "Age")]
    age: Option<f64>,
    #[serde(rename = "Born")]
    born: Option<f64>,
    #[serde(rename = "90s")]
    nineties: Option<f64>,
    #[serde(rename = "Gls")]
    goals: Option<f64>,
    #[serde(rename = "Sh")]
    shots: Option<f64>,
    #[serde(rename = "SoT")]
    shots_on_target: Option<f64>,
    #[serde(rename = "SoT%")]
    sot_pct: Option<f64>,
    #[serde(rename = "Sh/90")]
    shots_per90: Option<f64>,
    #[serde(rename = "SoT/90")]
    sot_per90: Option<f64>,
    #[serde(rename = "G/Sh")]
    goals_per_shot: Option<f64>,
    #[serde(rename = "G/SoT")]
    goals_per_sot: Option<f64>,
    #[serde(rename = "Dist")]
    distance: Option<f64>,
    #[serde(rename = "FK")]
    free_kicks: Option<f64>,
    #[serde(rename = "PK")]
    penalties: Option<f64>,
    #[serde(rename = "PKatt")]
    penalty_attempts: Option<f64>,
    #[serde(rename = "xG")]
    xg: Option<f64>,
    #[serde(rename = "npxG")]
    npxg: Option<f64>,
    #[serde(rename = "npxG/Sh")]
    npxg_per_shot: Option<f64>,
    #[serde(rename = "G-xG")]
    goals_minus_xg: Option<f64>,
    #[serde(rename = "np:G-xG")]
    np_goals_minus_xg: Option<f64>,
}

impl RawRecord {
    /// Coerce into the declared schema. Non-finite values (a literal `NaN`
    /// cell, say) become missing so the pipeline never meets them; missing
    /// `90s`/`Sh` coerce to zero, the column minimum.
    fn into_player(self) -> PlayerRecord {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());

        let entries = [
            (Metric::Goals, self.goals),
            (Metric::ShotsOnTarget, self.shots_on_target),
            (Metric::ShotsOnTargetPct, self.sot_pct),
            (Metric::ShotsPer90, self.shots_per90),
            (Metric::ShotsOnTargetPer90, self.sot_per90),
            (Metric::GoalsPerShot, self.goals_per_shot),
            (Metric::GoalsPerShotOnTarget, self.goals_per_sot),
            (Metric::AvgShotDistance, self.distance),
            (Metric::FreeKickGoals, self.free_kicks),
            (Metric::PenaltyGoals, self.penalties),
            (Metric::PenaltyAttempts, self.penalty_attempts),
            (Metric::ExpectedGoals, self.xg),
            (Metric::NonPenaltyXg, self.npxg),
            (Metric::NonPenaltyXgPerShot, self.npxg_per_shot),
            (Metric::GoalsMinusXg, self.goals_minus_xg),
            (Metric::NonPenaltyGoalsMinusXg, self.np_goals_minus_xg),
        ];
        let stats: BTreeMap<Metric, f64> = entries
            .into_iter()
            .filter_map(|(metric, value)| finite(value).map(|v| (metric, v)))
            .collect();

        PlayerRecord {
            player: self.player,
            nation: self.nation,
            positions: self
                .pos
                .as_deref()
                .map(Position::parse_list)
                .unwrap_or_default(),
            age: finite(self.age).map(|a| a as u32),
            born: finite(self.born).map(|b| b as i32),
            nineties: finite(self.nineties).unwrap_or(0.0),
            shots: finite(self.shots).map(|s| s as u32).unwrap_or(0),
            stats,
        }
    }
}

/// Fail fast when the source is missing one of the required columns.
fn check_required<F: Fn(&str) -> bool>(has_column: F) -> Result<()> {
    for col in REQUIRED_COLUMNS {
        if !has_column(col) {
            bail!("missing required column '{col}'");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<ShootingDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

fn read_csv<R: std::io::Read>(input: R) -> Result<ShootingDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    check_required(|col| headers.iter().any(|h| h == col))
        .context("validating CSV schema")?;
    let metric_columns: BTreeSet<Metric> =
        headers.iter().filter_map(|h| Metric::from_key(h)).collect();
    let has_born = headers.iter().any(|h| h == "Born");

    let mut players = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        players.push(raw.into_player());
    }

    Ok(ShootingDataset::from_players(players, metric_columns, has_born))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')` shape:
///
/// ```json
/// [
///   { "Player": "Kylian Mbappé", "Pos": "FW", "Age": 26,
///     "90s": 31.5, "Sh": 140, "xG": 27.1 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ShootingDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<ShootingDataset> {
    let records: Vec<JsonMap<String, JsonValue>> =
        serde_json::from_str(text).context("parsing JSON records")?;

    // A zero-record file carries no schema to validate against.
    if records.is_empty() {
        return Ok(ShootingDataset::from_players(Vec::new(), BTreeSet::new(), false));
    }

    let mut keys: BTreeSet<&str> = BTreeSet::new();
    for rec in &records {
        keys.extend(rec.keys().map(String::as_str));
    }
    check_required(|col| keys.contains(col)).context("validating JSON schema")?;
    let metric_columns: BTreeSet<Metric> =
        keys.iter().filter_map(|k| Metric::from_key(k)).collect();
    let has_born = keys.contains("Born");

    let mut players = Vec::with_capacity(records.len());
    for (i, rec) in records.into_iter().enumerate() {
        let raw: RawRecord = serde_json::from_value(JsonValue::Object(rec))
            .with_context(|| format!("JSON record {i}"))?;
        players.push(raw.into_player());
    }

    Ok(ShootingDataset::from_players(players, metric_columns, has_born))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of player rows.
///
/// Expected schema: flat scalar columns named like the FBRef export, with
/// `Player`/`Nation`/`Pos` strings, `Age`/`Born` integers, and metrics as
/// Int32/Int64/Float32/Float64. Required columns must carry a matching
/// type or the load is rejected; optional and metric columns with other
/// types are skipped. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<ShootingDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();

    check_required(|col| schema.index_of(col).is_ok())
        .context("validating parquet schema")?;

    let player_idx = schema.index_of("Player")?;
    let pos_idx = schema.index_of("Pos")?;
    let age_idx = schema.index_of("Age")?;
    let nineties_idx = schema.index_of("90s")?;
    let shots_idx = schema.index_of("Sh")?;
    let nation_idx = schema.index_of("Nation").ok();
    let born_idx = schema.index_of("Born").ok();

    // A mistyped required column would otherwise read every cell as missing.
    for (col, idx) in [("Player", player_idx), ("Pos", pos_idx)] {
        let dt = schema.field(idx).data_type();
        if !matches!(dt, DataType::Utf8 | DataType::LargeUtf8) {
            bail!("required column '{col}' is {dt:?}, expected strings");
        }
    }
    for (col, idx) in [("Age", age_idx), ("90s", nineties_idx), ("Sh", shots_idx)] {
        let dt = schema.field(idx).data_type();
        if !is_numeric(dt) {
            bail!("required column '{col}' is {dt:?}, expected numbers");
        }
    }

    // Only numeric columns count as sortable metrics.
    let metric_columns: BTreeSet<Metric> = schema
        .fields()
        .iter()
        .filter(|f| is_numeric(f.data_type()))
        .filter_map(|f| Metric::from_key(f.name()))
        .collect();
    // `90s` and `Sh` land in the typed fields, not the stats map.
    let stat_cols: Vec<(usize, Metric)> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| is_numeric(f.data_type()))
        .filter_map(|(i, f)| Metric::from_key(f.name()).map(|m| (i, m)))
        .filter(|(_, m)| !matches!(m, Metric::Nineties | Metric::Shots))
        .collect();

    let reader = builder.build().context("building parquet reader")?;
    let has_born = born_idx.is_some();
    let mut players = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let row_no = players.len();
            let player = read_string(batch.column(player_idx), row)
                .with_context(|| format!("row {row_no}: null 'Player' cell"))?;
            let positions = read_string(batch.column(pos_idx), row)
                .as_deref()
                .map(Position::parse_list)
                .unwrap_or_default();

            let mut stats = BTreeMap::new();
            for &(idx, metric) in &stat_cols {
                if let Some(v) = read_f64(batch.column(idx), row).filter(|v| v.is_finite()) {
                    stats.insert(metric, v);
                }
            }

            players.push(PlayerRecord {
                player,
                nation: nation_idx.and_then(|i| read_string(batch.column(i), row)),
                positions,
                age: read_f64(batch.column(age_idx), row).map(|a| a as u32),
                born: born_idx
                    .and_then(|i| read_f64(batch.column(i), row))
                    .map(|b| b as i32),
                nineties: read_f64(batch.column(nineties_idx), row)
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0),
                shots: read_f64(batch.column(shots_idx), row)
                    .map(|s| s as u32)
                    .unwrap_or(0),
                stats,
            });
        }
    }

    Ok(ShootingDataset::from_players(players, metric_columns, has_born))
}

// -- Parquet / Arrow helpers --

/// Read a string cell from a Utf8 or LargeUtf8 column.
fn read_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

/// Read a numeric cell as `f64` from any integer or float column.
/// Unsupported column types read as missing.
fn read_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        _ => None,
    }
}

/// Column types [`read_f64`] understands.
fn is_numeric(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Int32 | DataType::Int64 | DataType::Float32 | DataType::Float64
    )
}
