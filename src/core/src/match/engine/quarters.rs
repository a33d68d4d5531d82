use crate::shared::SimRng;

const QUARTER_WEIGHTS: [f64; 4] = [0.20, 0.30, 0.20, 0.30];
const QUARTER_NOISE: f64 = 0.1;
const QUARTER_SCORES: [u16; 13] = [0, 3, 6, 7, 10, 13, 14, 17, 20, 21, 24, 27, 28];

/// Splits regulation points across quarters. The first three quarters take
/// the reachable score closest to their share; the fourth gets the rest.
pub fn split_quarters(points: u16, rng: &mut SimRng) -> [u16; 4] {
    let weights: Vec<f64> = QUARTER_WEIGHTS
        .iter()
        .map(|weight| (weight + rng.range_f64(-QUARTER_NOISE, QUARTER_NOISE)).max(0.01))
        .collect();
    let total_weight: f64 = weights.iter().sum();

    let mut quarters = [0u16; 4];
    let mut remaining = points;

    for (quarter, weight) in weights.iter().take(3).enumerate() {
        let target = points as f64 * weight / total_weight;

        let snapped = QUARTER_SCORES
            .iter()
            .copied()
            .filter(|score| *score <= remaining)
            .min_by(|a, b| (*a as f64 - target).abs().total_cmp(&(*b as f64 - target).abs()))
            .unwrap_or(0);

        quarters[quarter] = snapped;
        remaining -= snapped;
    }

    quarters[3] = remaining;

    quarters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarters_sum_to_points() {
        let mut rng = SimRng::seed_from(21);

        for points in 0..70 {
            let quarters = split_quarters(points, &mut rng);
            assert_eq!(quarters.iter().sum::<u16>(), points);
            for score in &quarters[..3] {
                assert!(QUARTER_SCORES.contains(score), "{:?}", quarters);
            }
        }
    }

    #[test]
    fn test_shutout_stays_scoreless() {
        let mut rng = SimRng::seed_from(1);
        assert_eq!(split_quarters(0, &mut rng), [0, 0, 0, 0]);
    }
}
