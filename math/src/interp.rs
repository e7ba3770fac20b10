use itertools::Itertools;

/// A one-dimensional table of `(x, y)` samples interpolated in log-log space.
///
/// - Build a `LogLogTable` from sorted samples with `from_samples()`,
/// - `evaluate()` the table at any positive x-value.
///
/// Between two tabulated points the value follows the power law through them. Outside the
/// tabulated domain the power law of the nearest edge segment is extended (no clamping).
/// When either bracketing y-value is not strictly positive, that segment falls back to linear
/// interpolation in y against log(x), so tables holding signed fit coefficients still work.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLogTable {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

/// Reasons a sample set can't form a `LogLogTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// Fewer than two samples.
    TooShort,
    /// x-values are not strictly ascending (index of the first offending sample).
    Unsorted(usize),
    /// An x-value is not strictly positive, or a value is not finite (index of the sample).
    OutOfDomain(usize),
}

impl LogLogTable {
    /// Builds a table from separate x and y columns. The x-values must be strictly ascending and
    /// positive; all values must be finite.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, TableShape> {
        if xs.len() < 2 || ys.len() != xs.len() {
            return Err(TableShape::TooShort);
        }
        if let Some(i) = xs
            .iter()
            .zip(ys.iter())
            .position(|(&x, &y)| !(x > 0.0) || !x.is_finite() || !y.is_finite())
        {
            return Err(TableShape::OutOfDomain(i));
        }
        if let Some((i, _)) = xs.iter().tuple_windows().find_position(|(a, b)| a >= b) {
            return Err(TableShape::Unsorted(i + 1));
        }
        Ok(Self { xs, ys })
    }

    pub fn from_samples(xs_and_ys: &[(f64, f64)]) -> Result<Self, TableShape> {
        let (xs, ys) = xs_and_ys.iter().cloned().unzip();
        Self::new(xs, ys)
    }

    /// Evaluates the table at `at`, which must be strictly positive.
    pub fn evaluate(&self, at: f64) -> f64 {
        debug_assert!(at > 0.0);
        // Index of the upper bracketing sample, kept inside [1, len - 1] so the edge segments
        // are reused for extrapolation.
        let i1 = self
            .xs
            .partition_point(|&x| x < at)
            .clamp(1, self.xs.len() - 1);
        let (x0, x1) = (self.xs[i1 - 1], self.xs[i1]);
        let (y0, y1) = (self.ys[i1 - 1], self.ys[i1]);
        if at == x0 {
            return y0;
        } else if at == x1 {
            return y1;
        }
        let frac = (at.ln() - x0.ln()) / (x1.ln() - x0.ln());
        if y0 > 0.0 && y1 > 0.0 {
            (y0.ln() + frac * (y1.ln() - y0.ln())).exp()
        } else {
            y0 + frac * (y1 - y0)
        }
    }
}
