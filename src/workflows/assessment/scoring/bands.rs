use serde::{Deserialize, Serialize};

use crate::workflows::assessment::instrument::BandThreshold;

/// Qualitative zone assigned to a numeric score, or the distinguished
/// insufficient-data verdict when no score could be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandVerdict {
    Assigned { label: String },
    InsufficientData,
}

pub const INSUFFICIENT_DATA_LABEL: &str = "insufficient data";

impl BandVerdict {
    pub fn label(&self) -> &str {
        match self {
            BandVerdict::Assigned { label } => label,
            BandVerdict::InsufficientData => INSUFFICIENT_DATA_LABEL,
        }
    }
}

/// Classify a score against ordered ascending cut points: the first band
/// whose upper bound is at or above the score wins, with the final band
/// catching everything else. A missing score is never treated as zero.
pub(crate) fn classify(score: Option<f64>, bands: &[BandThreshold]) -> BandVerdict {
    let Some(score) = score else {
        return BandVerdict::InsufficientData;
    };

    for band in bands {
        match band.upper {
            Some(upper) if score <= upper => {
                return BandVerdict::Assigned {
                    label: band.label.clone(),
                };
            }
            _ => {}
        }
    }

    match bands.last() {
        Some(top) => BandVerdict::Assigned {
            label: top.label.clone(),
        },
        None => BandVerdict::InsufficientData,
    }
}
