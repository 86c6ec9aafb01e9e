//! Piecewise-linear color gradients.

/// A color ramp defined by N evenly-spaced color stops.
/// `t = 0` maps to the first color, `t = 1` to the last.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<[f32; 3]>,
}

impl ColorRamp {
    /// Ramp through `stops`. An empty list yields mid-gray; a single stop
    /// yields a constant ramp.
    #[must_use]
    pub fn new(stops: Vec<[f32; 3]>) -> Self {
        if stops.is_empty() {
            return Self {
                stops: vec![[0.5, 0.5, 0.5]],
            };
        }
        Self { stops }
    }

    /// Interpolate the ramp at position `t` in [0, 1].
    #[must_use]
    pub fn sample(&self, t: f32) -> [f32; 3] {
        if self.stops.len() == 1 {
            return self.stops[0];
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.stops.len() - 1;
        let scaled = t * n as f32;
        let idx = (scaled as usize).min(n - 1);
        let frac = scaled - idx as f32;

        let a = &self.stops[idx];
        let b = &self.stops[idx + 1];
        [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        ]
    }
}

impl Default for ColorRamp {
    /// Blue → Red
    fn default() -> Self {
        Self {
            stops: vec![[0.1, 0.2, 0.9], [0.9, 0.15, 0.1]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_first_and_last_stop() {
        let ramp = ColorRamp::new(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
        ]);
        assert_eq!(ramp.sample(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(1.0), [1.0, 1.0, 1.0]);
        assert_eq!(ramp.sample(0.5), [1.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(0.25), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn out_of_range_clamps() {
        let ramp = ColorRamp::default();
        assert_eq!(ramp.sample(-3.0), ramp.sample(0.0));
        assert_eq!(ramp.sample(7.0), ramp.sample(1.0));
        assert_eq!(ramp.sample(f32::NAN), ramp.sample(0.0));
    }

    #[test]
    fn single_stop_is_constant() {
        let ramp = ColorRamp::new(vec![[0.2, 0.4, 0.6]]);
        assert_eq!(ramp.sample(0.7), [0.2, 0.4, 0.6]);
    }
}
