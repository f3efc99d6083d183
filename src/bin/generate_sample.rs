use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Row model
// ---------------------------------------------------------------------------

/// Shot-volume profile for one broad playing role.
struct Archetype {
    code: &'static str,
    weight: u64,
    shots_per90: (f64, f64),
    xg_per_shot: f64,
    dist_mean: f64,
    secondary: &'static [&'static str],
}

const ARCHETYPES: [Archetype; 4] = [
    Archetype {
        code: "FW",
        weight: 3,
        shots_per90: (1.6, 4.2),
        xg_per_shot: 0.11,
        dist_mean: 13.5,
        secondary: &["MF"],
    },
    Archetype {
        code: "MF",
        weight: 3,
        shots_per90: (0.7, 2.2),
        xg_per_shot: 0.08,
        dist_mean: 18.0,
        secondary: &["FW", "DF"],
    },
    Archetype {
        code: "DF",
        weight: 3,
        shots_per90: (0.2, 0.9),
        xg_per_shot: 0.06,
        dist_mean: 12.0,
        secondary: &["MF"],
    },
    Archetype {
        code: "GK",
        weight: 1,
        shots_per90: (0.0, 0.02),
        xg_per_shot: 0.03,
        dist_mean: 22.0,
        secondary: &[],
    },
];

const FIRST_NAMES: [&str; 20] = [
    "Erling", "Jude", "Kylian", "Bukayo", "Florian", "Lautaro", "Viktor", "Ousmane", "Martin",
    "Jamal", "Harry", "Phil", "Cole", "Rasmus", "Khvicha", "Rafael", "Moussa", "Serhou", "Loïs",
    "Dominik",
];

const LAST_NAMES: [&str; 20] = [
    "Haaland", "Bellingham", "Mbappé", "Saka", "Wirtz", "Martínez", "Gyökeres", "Dembélé",
    "Ødegaard", "Musiala", "Kane", "Foden", "Palmer", "Højlund", "Kvaratskhelia", "Leão", "Diaby",
    "Guirassy", "Openda", "Szoboszlai",
];

const NATIONS: [&str; 10] = [
    "no NOR", "de GER", "eng ENG", "fr FRA", "es ESP", "br BRA", "ar ARG", "pt POR", "it ITA",
    "nl NED",
];

/// One generated player row, with the same optional cells a real FBRef
/// shooting export has (per-shot ratios blank when a player never shot, etc).
struct Row {
    player: String,
    nation: Option<String>,
    pos: String,
    age: Option<i64>,
    born: Option<i64>,
    nineties: f64,
    goals: f64,
    shots: f64,
    sot: f64,
    sot_pct: Option<f64>,
    shots_per90: f64,
    sot_per90: f64,
    goals_per_shot: Option<f64>,
    goals_per_sot: Option<f64>,
    dist: Option<f64>,
    fk: f64,
    pk: f64,
    pk_att: f64,
    xg: f64,
    npxg: f64,
    npxg_per_shot: Option<f64>,
    g_minus_xg: f64,
    npg_minus_xg: f64,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn pick_archetype(rng: &mut SimpleRng) -> &'static Archetype {
    let total: u64 = ARCHETYPES.iter().map(|a| a.weight).sum();
    let mut r = rng.below(total);
    for arch in &ARCHETYPES {
        if r < arch.weight {
            return arch;
        }
        r -= arch.weight;
    }
    &ARCHETYPES[0]
}

fn generate_row(rng: &mut SimpleRng) -> Row {
    let arch = pick_archetype(rng);

    let player = format!(
        "{} {}",
        FIRST_NAMES[rng.below(FIRST_NAMES.len() as u64) as usize],
        LAST_NAMES[rng.below(LAST_NAMES.len() as u64) as usize],
    );
    let nation = if rng.below(50) == 0 {
        None
    } else {
        Some(NATIONS[rng.below(NATIONS.len() as u64) as usize].to_string())
    };
    let pos = if !arch.secondary.is_empty() && rng.below(4) == 0 {
        format!(
            "{},{}",
            arch.code,
            arch.secondary[rng.below(arch.secondary.len() as u64) as usize]
        )
    } else {
        arch.code.to_string()
    };

    // A few rows with no recorded birth data, like real exports.
    let (age, born) = if rng.below(25) == 0 {
        (None, None)
    } else {
        let age = 16 + rng.below(23) as i64;
        (Some(age), Some(2024 - age))
    };

    let nineties = round1(rng.uniform(0.5, 34.0));
    let shots = (rng.uniform(arch.shots_per90.0, arch.shots_per90.1) * nineties)
        .round()
        .max(0.0);

    let mut pk_att = 0.0;
    if arch.code != "DF" && arch.code != "GK" && shots > 40.0 && rng.below(4) == 0 {
        pk_att = ((1 + rng.below(6)) as f64).min(shots);
    }

    let npxg = round2((shots - pk_att) * arch.xg_per_shot * rng.uniform(0.8, 1.25));
    let xg = round2(npxg + 0.79 * pk_att);

    let goals = rng
        .gauss(xg, (xg * 0.35).max(1.0))
        .round()
        .clamp(0.0, shots);
    let pk = if pk_att > 0.0 {
        // Roughly one in four attempts is missed.
        let missed = if rng.below(4) == 0 { 1.0 } else { 0.0 };
        (pk_att - missed).max(0.0).min(goals)
    } else {
        0.0
    };
    let fk = if rng.below(5) == 0 {
        (rng.below(3) as f64).min(goals - pk).max(0.0)
    } else {
        0.0
    };

    // On-target count stays between goals scored and shots taken.
    let sot = (shots * rng.uniform(0.25, 0.45)).round().clamp(goals, shots);

    let per_shot = |num: f64, den: f64| (den > 0.0).then(|| round2(num / den));

    Row {
        player,
        nation,
        pos,
        age,
        born,
        nineties,
        goals,
        shots,
        sot,
        sot_pct: (shots > 0.0).then(|| round1(sot / shots * 100.0)),
        shots_per90: round2(shots / nineties),
        sot_per90: round2(sot / nineties),
        goals_per_shot: per_shot(goals, shots),
        goals_per_sot: per_shot(goals, sot),
        dist: (shots > 0.0).then(|| round1(rng.gauss(arch.dist_mean, 2.5).clamp(5.0, 30.0))),
        fk,
        pk,
        pk_att,
        xg,
        npxg,
        npxg_per_shot: per_shot(npxg, shots - pk_att),
        g_minus_xg: round2(goals - xg),
        npg_minus_xg: round2((goals - pk) - npxg),
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

const HEADER: [&str; 23] = [
    "Player", "Nation", "Pos", "Age", "Born", "90s", "Gls", "Sh", "SoT", "SoT%", "Sh/90", "SoT/90",
    "G/Sh", "G/SoT", "Dist", "FK", "PK", "PKatt", "xG", "npxG", "npxG/Sh", "G-xG", "np:G-xG",
];

fn write_parquet(rows: &[Row], path: &str) {
    let float_col = |get: fn(&Row) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(
            rows.iter().map(get).collect::<Vec<_>>(),
        ))
    };

    let columns: Vec<(&str, ArrayRef, bool)> = vec![
        (
            "Player",
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.player.as_str()).collect::<Vec<_>>(),
            )),
            false,
        ),
        (
            "Nation",
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.nation.as_deref()).collect::<Vec<_>>(),
            )),
            true,
        ),
        (
            "Pos",
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.pos.as_str()).collect::<Vec<_>>(),
            )),
            false,
        ),
        (
            "Age",
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.age).collect::<Vec<_>>(),
            )),
            true,
        ),
        (
            "Born",
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.born).collect::<Vec<_>>(),
            )),
            true,
        ),
        ("90s", float_col(|r| Some(r.nineties)), false),
        ("Gls", float_col(|r| Some(r.goals)), false),
        ("Sh", float_col(|r| Some(r.shots)), false),
        ("SoT", float_col(|r| Some(r.sot)), false),
        ("SoT%", float_col(|r| r.sot_pct), true),
        ("Sh/90", float_col(|r| Some(r.shots_per90)), false),
        ("SoT/90", float_col(|r| Some(r.sot_per90)), false),
        ("G/Sh", float_col(|r| r.goals_per_shot), true),
        ("G/SoT", float_col(|r| r.goals_per_sot), true),
        ("Dist", float_col(|r| r.dist), true),
        ("FK", float_col(|r| Some(r.fk)), false),
        ("PK", float_col(|r| Some(r.pk)), false),
        ("PKatt", float_col(|r| Some(r.pk_att)), false),
        ("xG", float_col(|r| Some(r.xg)), false),
        ("npxG", float_col(|r| Some(r.npxg)), false),
        ("npxG/Sh", float_col(|r| r.npxg_per_shot), true),
        ("G-xG", float_col(|r| Some(r.g_minus_xg)), false),
        ("np:G-xG", float_col(|r| Some(r.npg_minus_xg)), false),
    ];

    let batch =
        RecordBatch::try_from_iter_with_nullable(columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn write_csv(rows: &[Row], path: &str) {
    let int = |v: f64| format!("{v:.0}");
    let opt1 = |v: Option<f64>| v.map(|x| format!("{x:.1}")).unwrap_or_default();
    let opt2 = |v: Option<f64>| v.map(|x| format!("{x:.2}")).unwrap_or_default();

    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer.write_record(HEADER).expect("Failed to write header");
    for r in rows {
        let record = [
            r.player.clone(),
            r.nation.clone().unwrap_or_default(),
            r.pos.clone(),
            r.age.map(|a| a.to_string()).unwrap_or_default(),
            r.born.map(|b| b.to_string()).unwrap_or_default(),
            format!("{:.1}", r.nineties),
            int(r.goals),
            int(r.shots),
            int(r.sot),
            opt1(r.sot_pct),
            format!("{:.2}", r.shots_per90),
            format!("{:.2}", r.sot_per90),
            opt2(r.goals_per_shot),
            opt2(r.goals_per_sot),
            opt1(r.dist),
            int(r.fk),
            int(r.pk),
            int(r.pk_att),
            format!("{:.2}", r.xg),
            format!("{:.2}", r.npxg),
            opt2(r.npxg_per_shot),
            format!("{:.2}", r.g_minus_xg),
            format!("{:.2}", r.npg_minus_xg),
        ];
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Row> = (0..250).map(|_| generate_row(&mut rng)).collect();

    write_parquet(&rows, "sample_players.parquet");
    write_csv(&rows, "sample_players.csv");

    println!(
        "Wrote {} players to sample_players.parquet and sample_players.csv",
        rows.len()
    );
}
