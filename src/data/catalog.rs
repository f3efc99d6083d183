use std::fmt;

// ---------------------------------------------------------------------------
// Metric catalog – the fixed set of shooting statistics the dashboard knows
// ---------------------------------------------------------------------------

/// A shooting metric column, identified by its stable source header.
///
/// `key()` is the column header as it appears in FBRef exports (`"Sh"`,
/// `"SoT%"`, `"np:G-xG"`, …); `label()` is the human-readable name shown in
/// the sort selector and table header. Variant order is the catalog order,
/// so ordered collections of `Metric` iterate the way the source sheet lays
/// its columns out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    /// Games played, in 90-minute units. Also a base display column.
    Nineties,
    Goals,
    /// Shots taken. Also a base display column.
    Shots,
    ShotsOnTarget,
    ShotsOnTargetPct,
    ShotsPer90,
    ShotsOnTargetPer90,
    GoalsPerShot,
    GoalsPerShotOnTarget,
    AvgShotDistance,
    FreeKickGoals,
    PenaltyGoals,
    PenaltyAttempts,
    ExpectedGoals,
    NonPenaltyXg,
    NonPenaltyXgPerShot,
    GoalsMinusXg,
    NonPenaltyGoalsMinusXg,
}

impl Metric {
    /// Every metric, in catalog order.
    pub const ALL: [Metric; 18] = [
        Metric::Nineties,
        Metric::Goals,
        Metric::Shots,
        Metric::ShotsOnTarget,
        Metric::ShotsOnTargetPct,
        Metric::ShotsPer90,
        Metric::ShotsOnTargetPer90,
        Metric::GoalsPerShot,
        Metric::GoalsPerShotOnTarget,
        Metric::AvgShotDistance,
        Metric::FreeKickGoals,
        Metric::PenaltyGoals,
        Metric::PenaltyAttempts,
        Metric::ExpectedGoals,
        Metric::NonPenaltyXg,
        Metric::NonPenaltyXgPerShot,
        Metric::GoalsMinusXg,
        Metric::NonPenaltyGoalsMinusXg,
    ];

    /// Stable source column header.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Nineties => "90s",
            Metric::Goals => "Gls",
            Metric::Shots => "Sh",
            Metric::ShotsOnTarget => "SoT",
            Metric::ShotsOnTargetPct => "SoT%",
            Metric::ShotsPer90 => "Sh/90",
            Metric::ShotsOnTargetPer90 => "SoT/90",
            Metric::GoalsPerShot => "G/Sh",
            Metric::GoalsPerShotOnTarget => "G/SoT",
            Metric::AvgShotDistance => "Dist",
            Metric::FreeKickGoals => "FK",
            Metric::PenaltyGoals => "PK",
            Metric::PenaltyAttempts => "PKatt",
            Metric::ExpectedGoals => "xG",
            Metric::NonPenaltyXg => "npxG",
            Metric::NonPenaltyXgPerShot => "npxG/Sh",
            Metric::GoalsMinusXg => "G-xG",
            Metric::NonPenaltyGoalsMinusXg => "np:G-xG",
        }
    }

    /// Human-readable label for selectors and table headers.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Nineties => "Games Played (90s)",
            Metric::Goals => "Goals",
            Metric::Shots => "Shots",
            Metric::ShotsOnTarget => "Shots on Target",
            Metric::ShotsOnTargetPct => "Shot on Target (%)",
            Metric::ShotsPer90 => "Shots per 90",
            Metric::ShotsOnTargetPer90 => "Shots on Target per 90",
            Metric::GoalsPerShot => "Goals per Shot",
            Metric::GoalsPerShotOnTarget => "Goals per Shot on Target",
            Metric::AvgShotDistance => "Average Shot Distance",
            Metric::FreeKickGoals => "Free Kick Goals",
            Metric::PenaltyGoals => "Penalty Goals",
            Metric::PenaltyAttempts => "Penalty Attempts",
            Metric::ExpectedGoals => "Expected Goals (xG)",
            Metric::NonPenaltyXg => "Non-Penalty xG",
            Metric::NonPenaltyXgPerShot => "npxG per Shot",
            Metric::GoalsMinusXg => "Goals minus xG",
            Metric::NonPenaltyGoalsMinusXg => "Non-Penalty Goals minus xG",
        }
    }

    /// Reverse lookup from a source column header.
    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.key() == key)
    }

    /// Whole-count metrics render without decimals.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Metric::Goals
                | Metric::Shots
                | Metric::ShotsOnTarget
                | Metric::FreeKickGoals
                | Metric::PenaltyGoals
                | Metric::PenaltyAttempts
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
