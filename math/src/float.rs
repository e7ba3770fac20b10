/// Represents closed intervals on the real-number axis. Any `Interval` covers at least 1 point;
/// operations that could produce an empty interval return `Option<Interval>` instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

/// Divides the given `interval` evenly into `count` pieces and returns the midpoint of each piece
/// together with the width of each piece.
/// ```
/// let (mids, width) = math::float::linspace((0.0, 10.0), 4);
/// assert_eq!(mids, vec![1.25, 3.75, 6.25, 8.75]);
/// assert_eq!(width, 2.5);
/// ```
pub fn linspace(interval: (f64, f64), count: usize) -> (Vec<f64>, f64) {
    let (a, b) = interval;
    (
        (0..count)
            .map(|i| (i as f64 + 0.5) / count as f64 * (b - a) + a)
            .collect::<Vec<_>>(),
        (b - a) / count as f64,
    )
}

/// Returns `count` evenly spaced values from `a` to `b` inclusive, and the step between them.
/// A single value is `a` with a zero step.
pub fn linspace_inclusive(a: f64, b: f64, count: usize) -> (Vec<f64>, f64) {
    if count <= 1 {
        return (vec![a], 0.0);
    }
    let step = (b - a) / (count - 1) as f64;
    ((0..count).map(|i| a + step * i as f64).collect(), step)
}

impl Interval {
    /// Constructs an `Interval` with `a` and `b` being the endpoint.
    /// A comparison is made to determine which one is lesser / greater.
    pub fn new(a: f64, b: f64) -> Self {
        assert!(!a.is_nan());
        assert!(!b.is_nan());
        let (a, b) = min_max(a, b);
        Interval { min: a, max: b }
    }

    /// The whole real axis. Used as the neutral element of `intersect`.
    pub fn everything() -> Self {
        Interval {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn length(&self) -> f64 {
        assert!(self.max >= self.min);
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Returns the overlap of two intervals, or `None` if they are disjoint.
    /// Touching intervals overlap in a single point.
    pub fn intersect(&self, other: Interval) -> Option<Interval> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then(|| Interval { min, max })
    }

}

pub fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[macro_export]
macro_rules! assert_le {
    ($left:expr, $right:expr) => {
        if $left > $right {
            panic!(
                "Assertion failed: {} <= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_lt {
    ($left:expr, $right:expr) => {
        if $left >= $right {
            panic!(
                "Assertion failed: {} < {} (values: {} vs. {})",
                stringify!($left),
                stringify! {$right},
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_gt {
    ($left:expr, $right:expr) => {
        if $left <= $right {
            panic!(
                "Assertion failed: {} > {} (values: {} vs. {})",
                stringify!($left),
                stringify! {$right},
                $left,
                $right
            )
        }
    };
}

#[macro_export]
macro_rules! assert_ge {
    ($left:expr, $right:expr) => {
        if $left < $right {
            panic!(
                "Assertion failed: {} >= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}
