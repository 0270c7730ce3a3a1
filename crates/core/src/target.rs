//! Dashboard target-string grammar.
//!
//! A target is a flat `_`-delimited string encoding query intent, e.g.
//! `ue_0_dl_mcs` or `ptime_DL encoding`. Saved dashboards embed these
//! literal strings, so the token vocabulary and token positions are part of
//! the wire contract and must not change.

/// Link direction of a UE radio report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Downlink,
    Uplink,
}

impl Direction {
    /// All directions, in manifest order.
    pub const ALL: [Direction; 2] = [Direction::Downlink, Direction::Uplink];

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "dl" => Some(Direction::Downlink),
            "ul" => Some(Direction::Uplink),
            _ => None,
        }
    }

    /// The wire token for this direction.
    pub fn token(self) -> &'static str {
        match self {
            Direction::Downlink => "dl",
            Direction::Uplink => "ul",
        }
    }
}

/// Scalar measure selected from a UE radio report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Modulation and coding scheme index.
    Mcs,
    /// Signal-to-noise ratio.
    Snr,
    /// MAC-layer throughput, reported in megabits per second.
    Throughput,
    /// Allocated resource block count.
    ResourceBlocks,
    /// Wideband channel quality indicator.
    WidebandCqi,
}

impl Measure {
    /// All measures, in manifest order.
    pub const ALL: [Measure; 5] = [
        Measure::Mcs,
        Measure::Snr,
        Measure::Throughput,
        Measure::ResourceBlocks,
        Measure::WidebandCqi,
    ];

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "mcs" => Some(Measure::Mcs),
            "snr" => Some(Measure::Snr),
            "tp" => Some(Measure::Throughput),
            "nbrb" => Some(Measure::ResourceBlocks),
            "wbcqi" => Some(Measure::WidebandCqi),
            _ => None,
        }
    }

    /// The wire token for this measure.
    pub fn token(self) -> &'static str {
        match self {
            Measure::Mcs => "mcs",
            Measure::Snr => "snr",
            Measure::Throughput => "tp",
            Measure::ResourceBlocks => "nbrb",
            Measure::WidebandCqi => "wbcqi",
        }
    }
}

/// Parsed query intent for a single dashboard target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetQuery {
    /// Per-record processing-time series for a baseband function.
    ProcessingTime { scope: String },
    /// Mean/std/time statistics table for a baseband function.
    ProcessingTimeStats { scope: String },
    /// Static threshold reference table used for dashboard shading.
    ProcessingTimeThreshold { scope: String },
    /// UE radio-link measurement series.
    UeState {
        scope: String,
        direction: Direction,
        measure: Measure,
        /// `true` for the serving-side (`ueself`) family.
        self_only: bool,
    },
}

impl TargetQuery {
    /// Decode a `_`-delimited target string.
    ///
    /// Returns `None` for anything outside the vocabulary: fewer than two
    /// tokens, an unknown family token, or an unknown direction/measure.
    /// Callers skip such targets rather than failing the whole request.
    pub fn parse(raw: &str) -> Option<TargetQuery> {
        let tokens: Vec<&str> = raw.split('_').collect();
        if tokens.len() < 2 {
            return None;
        }

        match tokens[0] {
            "ptime" => Some(TargetQuery::ProcessingTime {
                scope: tokens[1].to_owned(),
            }),
            "statsptime" => Some(TargetQuery::ProcessingTimeStats {
                scope: tokens[1].to_owned(),
            }),
            "threshold" => Some(TargetQuery::ProcessingTimeThreshold {
                scope: tokens[1].to_owned(),
            }),
            family @ ("ue" | "ueself") => {
                let direction = Direction::from_token(tokens.get(2)?)?;
                let measure = Measure::from_token(tokens.get(3)?)?;
                Some(TargetQuery::UeState {
                    scope: tokens[1].to_owned(),
                    direction,
                    measure,
                    self_only: family == "ueself",
                })
            }
            _ => None,
        }
    }

    /// Every target string this backend understands, served by `/search`.
    ///
    /// Generated from the same enums `parse` matches on, so the manifest
    /// cannot drift from the grammar.
    pub fn manifest() -> Vec<String> {
        // Example scopes for the front end to start from; dashboards
        // substitute their own function names and UE ids.
        const FUNCTION_SCOPES: [&str; 2] = ["DL encoding", "UL decoding"];
        const UE_SCOPE: &str = "0";

        let mut targets = Vec::new();
        for scope in FUNCTION_SCOPES {
            targets.push(format!("threshold_{scope}"));
            targets.push(format!("statsptime_{scope}"));
            targets.push(format!("ptime_{scope}"));
        }
        for family in ["ue", "ueself"] {
            for direction in Direction::ALL {
                for measure in Measure::ALL {
                    targets.push(format!(
                        "{family}_{UE_SCOPE}_{}_{}",
                        direction.token(),
                        measure.token()
                    ));
                }
            }
        }
        targets
    }
}
