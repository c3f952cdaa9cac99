use std::fmt;

/// Min, mean and max of a range profile, skipping missing (NaN) gates.
/// All three are NaN when every gate is missing.
#[derive(Debug, Clone, Copy)]
pub struct QuantityStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl QuantityStats {
    pub fn from_values(values: &[f64]) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for &value in values.iter().filter(|v| !v.is_nan()) {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Self {
                min: f64::NAN,
                mean: f64::NAN,
                max: f64::NAN,
            };
        }

        Self {
            min,
            mean: sum / count as f64,
            max,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.mean.is_nan()
    }
}

impl fmt::Display for QuantityStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} / {:.3} / {:.3}", self.min, self.mean, self.max)
    }
}
