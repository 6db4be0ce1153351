/// Tagged category score.
///
/// Internally a score is either a measured value or `NoReference` (the job
/// stated nothing for this category). The raw `-1` encoding exists only at
/// the serialization boundary, so sentinel values never enter arithmetic.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire encoding of `CategoryScore::NoReference`.
pub const NO_REFERENCE: f64 = -1.0;

/// Score used when the job states a requirement but the candidate record
/// has nothing to compare against. Neither a match nor a penalty.
pub const NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoryScore {
    /// Measured similarity, nominally in [0, 100]. Cosine-based scores can
    /// dip below 0 for opposed vectors.
    Scored(f64),
    /// The job side had no data for this category.
    NoReference,
}

impl CategoryScore {
    pub fn neutral() -> Self {
        CategoryScore::Scored(NEUTRAL)
    }

    pub fn value(self) -> Option<f64> {
        match self {
            CategoryScore::Scored(v) => Some(v),
            CategoryScore::NoReference => None,
        }
    }

    /// Raw wire value: the measured score, or -1.
    pub fn to_raw(self) -> f64 {
        self.value().unwrap_or(NO_REFERENCE)
    }

    /// Inverse of `to_raw`. Exactly -1 decodes to `NoReference`.
    pub fn from_raw(raw: f64) -> Self {
        if raw == NO_REFERENCE {
            CategoryScore::NoReference
        } else {
            CategoryScore::Scored(raw)
        }
    }

    /// Weighted blend of a semantic and a lexical sub-score.
    ///
    /// When only one side has a reference it stands alone; when neither does
    /// the result is `NoReference`.
    pub fn blend(semantic: CategoryScore, semantic_weight: f64, lexical: CategoryScore, lexical_weight: f64) -> Self {
        match (semantic, lexical) {
            (CategoryScore::Scored(s), CategoryScore::Scored(l)) => {
                CategoryScore::Scored(semantic_weight * s + lexical_weight * l)
            }
            (CategoryScore::Scored(s), CategoryScore::NoReference) => CategoryScore::Scored(s),
            (CategoryScore::NoReference, CategoryScore::Scored(l)) => CategoryScore::Scored(l),
            (CategoryScore::NoReference, CategoryScore::NoReference) => CategoryScore::NoReference,
        }
    }
}

impl Serialize for CategoryScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_raw())
    }
}

impl<'de> Deserialize<'de> for CategoryScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(CategoryScore::from_raw)
    }
}
