//! Transfer-point scoring and ranking.

use serde::{Deserialize, Serialize};

use super::MultimodalGraph;
use crate::models::{DemandMatrix, TransitMode};

/// Weight of connectivity degree in the transfer score.
pub const SCORE_WEIGHT_DEGREE: f64 = 0.4;
/// Weight of touching demand in the transfer score.
pub const SCORE_WEIGHT_DEMAND: f64 = 0.3;
/// Weight of cross-mode interchange pairs in the transfer score.
pub const SCORE_WEIGHT_CROSS_MODE: f64 = 0.3;

/// Ranking entry for one transfer point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferScore {
    /// Stop id.
    pub stop_id: String,
    /// Resolved display name.
    pub stop_name: String,
    /// Weighted score used for ranking.
    pub score: f64,
    /// Distinct services calling at the stop.
    pub degree: usize,
    /// Daily passengers over demand pairs touching the stop.
    pub demand: f64,
    /// Bus-route count times metro-line count at the stop.
    pub cross_mode: usize,
}

/// Scores every transfer point of the graph and ranks them descending.
///
/// The score is a weighted sum (0.4 / 0.3 / 0.3) of connectivity
/// degree, touching demand, and the number of possible cross-mode
/// interchange pairs. Used for reporting only; routing never consults
/// it.
pub fn score_transfer_points(
    graph: &MultimodalGraph,
    demand: &DemandMatrix,
) -> Vec<TransferScore> {
    let mut scores: Vec<TransferScore> = graph
        .stop_ids()
        .filter(|id| graph.is_transfer_point(id))
        .map(|id| {
            let services = graph.services_at(id);
            let degree = services.len();
            let bus = services
                .iter()
                .filter(|(m, _)| *m == TransitMode::Bus)
                .count();
            let metro = services
                .iter()
                .filter(|(m, _)| *m == TransitMode::Metro)
                .count();
            let cross_mode = bus * metro;
            let touching = demand.touching(id);
            TransferScore {
                stop_id: id.to_string(),
                stop_name: graph.stop_name(id).to_string(),
                score: SCORE_WEIGHT_DEGREE * degree as f64
                    + SCORE_WEIGHT_DEMAND * touching
                    + SCORE_WEIGHT_CROSS_MODE * cross_mode as f64,
                degree,
                demand: touching,
                cross_mode,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.stop_id.cmp(&b.stop_id))
    });
    scores
}
