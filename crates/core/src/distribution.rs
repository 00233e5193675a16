//! Age buckets and percentage distribution.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the four fixed, disjoint age ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AgeBucket {
    /// `age < 20`
    Under20,
    /// `20 <= age <= 40`
    From20To40,
    /// `40 < age <= 60`
    From40To60,
    /// `age > 60`
    Over60,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::Under20,
        AgeBucket::From20To40,
        AgeBucket::From40To60,
        AgeBucket::Over60,
    ];

    /// Bucket for a numeric age.
    pub fn for_age(age: i64) -> Self {
        match age {
            a if a < 20 => Self::Under20,
            a if a <= 40 => Self::From20To40,
            a if a <= 60 => Self::From40To60,
            _ => Self::Over60,
        }
    }

    /// Label used in queries and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Under20 => "< 20",
            Self::From20To40 => "20 to 40",
            Self::From40To60 => "40 to 60",
            Self::Over60 => "> 60",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.label() == s)
            .ok_or_else(|| format!("unknown age bucket label: {s:?}"))
    }
}

/// Share of users falling into one bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub bucket: AgeBucket,
    pub count: u64,
    /// `100 * count / total`, two decimals.
    pub percentage: String,
}

/// Turn per-bucket counts into a percentage distribution.
///
/// Buckets with a zero count are dropped. Entries are ordered by label as
/// a plain string, so `"20 to 40"` sorts before `"< 20"`. An empty or
/// all-zero input yields an empty distribution.
pub fn summarize<I>(counts: I) -> Vec<DistributionEntry>
where
    I: IntoIterator<Item = (AgeBucket, u64)>,
{
    let mut present: Vec<(AgeBucket, u64)> =
        counts.into_iter().filter(|(_, count)| *count > 0).collect();
    let total: u64 = present.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    present.sort_by(|(a, _), (b, _)| a.label().cmp(b.label()));
    present
        .into_iter()
        .map(|(bucket, count)| DistributionEntry {
            bucket,
            count,
            percentage: format!("{:.2}", count as f64 * 100.0 / total as f64),
        })
        .collect()
}
