//! Sales funnel derived from active users.

use serde::{Deserialize, Serialize};

/// Share of visitors reaching each stage.
pub const FUNNEL_STAGES: [(&str, f64); 4] = [
    ("visitors", 1.0),
    ("leads", 0.4),
    ("opportunities", 0.1),
    ("customers", 0.04),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    pub name: String,
    pub value: f64,
    /// Percentage of the first stage
    pub percent_of_initial: f64,
}

/// Builds the funnel from the total visitors of a window.
pub fn sales_funnel(visitors: f64) -> Vec<FunnelStage> {
    FUNNEL_STAGES
        .iter()
        .map(|(name, ratio)| FunnelStage {
            name: name.to_string(),
            value: visitors * ratio,
            percent_of_initial: ratio * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_funnel_applies_stage_ratios() {
        let stages = sales_funnel(1000.0);
        let values: Vec<f64> = stages.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1000.0, 400.0, 100.0, 40.0]);
        assert_eq!(stages[3].name, "customers");
        assert_eq!(stages[1].percent_of_initial, 40.0);
    }
}
