use super::params::SelectionMode;
use super::SelectionStage;
use crate::error::GroundingError;
use rand::Rng;
use serde::Serialize;

/// Added to every probability before computing entropy so that `0 * ln 0`
/// never appears.
const ENTROPY_FLOOR: f64 = 1e-15;

/// Normalised discrete distribution over a caller-owned list of items.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    probabilities: Vec<f64>,
    entropy: f64,
}

impl Distribution {
    /// Normalises raw non-negative scores.
    ///
    /// Fails on negative or non-finite scores and when every score is zero;
    /// there is no uniform fallback.
    pub fn from_scores(scores: &[f64], stage: SelectionStage) -> Result<Self, GroundingError> {
        if let Some((index, &value)) = scores
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s < 0.0)
        {
            return Err(GroundingError::InvalidScore { index, value });
        }
        let total: f64 = scores.iter().sum();
        if !(total > 0.0) {
            return Err(GroundingError::ZeroMass { stage });
        }
        let probabilities: Vec<f64> = scores.iter().map(|s| s / total).collect();
        let entropy = entropy(&probabilities);
        Ok(Self {
            probabilities,
            entropy,
        })
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities.get(index).copied().unwrap_or(0.0)
    }

    /// Shannon entropy in nats.
    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Inverse-CDF sample. Zero-probability entries are never returned.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u: f64 = rng.gen();
        let mut cumulative = 0.0;
        let mut last_positive = 0;
        for (i, &p) in self.probabilities.iter().enumerate() {
            if p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_positive = i;
            if u < cumulative {
                return i;
            }
        }
        // Rounding left the cumulative sum just under `u`.
        last_positive
    }

    /// Index of the most probable entry, the first one on ties.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &p) in self.probabilities.iter().enumerate() {
            if p > self.probabilities[best] {
                best = i;
            }
        }
        best
    }

    pub fn select<R: Rng + ?Sized>(&self, mode: SelectionMode, rng: &mut R) -> usize {
        match mode {
            SelectionMode::Sample => self.sample(rng),
            SelectionMode::Best => self.argmax(),
        }
    }
}

/// Entropy (nats) of a probability vector, stabilised with a small floor and
/// renormalised first.
pub fn entropy(probabilities: &[f64]) -> f64 {
    let total: f64 = probabilities.iter().map(|p| p + ENTROPY_FLOOR).sum();
    if !(total > 0.0) {
        return 0.0;
    }
    -probabilities
        .iter()
        .map(|p| {
            let q = (p + ENTROPY_FLOOR) / total;
            q * q.ln()
        })
        .sum::<f64>()
}
