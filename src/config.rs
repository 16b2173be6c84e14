use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Static dashboard configuration
// ---------------------------------------------------------------------------

/// Display bounds of the payload range control. These are fixed and do not
/// follow the dataset; only the initial handle positions do.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub mark_every: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10_000.0,
            step: 1_000.0,
            mark_every: 2_000.0,
        }
    }
}

impl SliderConfig {
    /// Tick positions shown under the slider, `min..=max` every `mark_every`.
    pub fn marks(&self) -> Vec<f64> {
        if self.mark_every <= 0.0 || self.max < self.min {
            return vec![self.min];
        }
        let n = ((self.max - self.min) / self.mark_every).floor() as usize;
        (0..=n).map(|i| self.min + i as f64 * self.mark_every).collect()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Launch records read once at startup.
    pub data_path: PathBuf,
    pub window_title: String,
    pub heading: String,
    pub slider: SliderConfig,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub chart_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("spacex_launch_dash.csv"),
            window_title: "Launch Records Dashboard".to_string(),
            heading: "SpaceX Launch Records Dashboard".to_string(),
            slider: SliderConfig::default(),
            window_size: [1200.0, 900.0],
            min_window_size: [700.0, 500.0],
            chart_height: 320.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marks() {
        assert_eq!(
            SliderConfig::default().marks(),
            vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10000.0]
        );
    }

    #[test]
    fn test_degenerate_marks() {
        let cfg = SliderConfig {
            mark_every: 0.0,
            ..SliderConfig::default()
        };
        assert_eq!(cfg.marks(), vec![0.0]);
    }
}
