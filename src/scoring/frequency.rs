use serde::{Deserialize, Serialize};

/// The five test tones presented during tonal audiometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Frequency {
    Hz500,
    Hz1000,
    Hz2000,
    Hz4000,
    Hz8000,
}

impl Frequency {
    /// Canonical order, lowest tone first.
    pub const ALL: [Frequency; 5] = [
        Frequency::Hz500,
        Frequency::Hz1000,
        Frequency::Hz2000,
        Frequency::Hz4000,
        Frequency::Hz8000,
    ];

    pub fn hz(&self) -> u32 {
        match self {
            Self::Hz500 => 500,
            Self::Hz1000 => 1000,
            Self::Hz2000 => 2000,
            Self::Hz4000 => 4000,
            Self::Hz8000 => 8000,
        }
    }

    /// Key used in JSON payloads (`"500"`, `"1000"`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hz500 => "500",
            Self::Hz1000 => "1000",
            Self::Hz2000 => "2000",
            Self::Hz4000 => "4000",
            Self::Hz8000 => "8000",
        }
    }

    /// Numeric match, so `500.0` and `500` name the same tone.
    pub fn matches(&self, value: f64) -> bool {
        value == f64::from(self.hz())
    }
}

/// One value per test frequency.
///
/// Serialises as an object keyed by frequency label in ascending order,
/// which is the shape clients expect for thresholds, reliability ratios
/// and the calibration table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerFrequency<T> {
    #[serde(rename = "500")]
    pub hz_500: T,
    #[serde(rename = "1000")]
    pub hz_1000: T,
    #[serde(rename = "2000")]
    pub hz_2000: T,
    #[serde(rename = "4000")]
    pub hz_4000: T,
    #[serde(rename = "8000")]
    pub hz_8000: T,
}

impl<T> PerFrequency<T> {
    pub fn from_fn(mut f: impl FnMut(Frequency) -> T) -> Self {
        Self {
            hz_500: f(Frequency::Hz500),
            hz_1000: f(Frequency::Hz1000),
            hz_2000: f(Frequency::Hz2000),
            hz_4000: f(Frequency::Hz4000),
            hz_8000: f(Frequency::Hz8000),
        }
    }

    pub fn get(&self, frequency: Frequency) -> &T {
        match frequency {
            Frequency::Hz500 => &self.hz_500,
            Frequency::Hz1000 => &self.hz_1000,
            Frequency::Hz2000 => &self.hz_2000,
            Frequency::Hz4000 => &self.hz_4000,
            Frequency::Hz8000 => &self.hz_8000,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Frequency, &T)> + '_ {
        Frequency::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}
