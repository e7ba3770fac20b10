use math::interp::{LogLogTable, TableShape};

/// Largest mean-free-path argument the geometric-progression fits are valid for. Deeper
/// penetrations reuse the buildup at this depth.
pub const MAX_GP_MFP: f64 = 40.0;

/// Geometric-progression (ANS-6.4.3) exposure buildup coefficients at one photon energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpCoefficients {
    pub b: f64,
    pub c: f64,
    pub a: f64,
    pub x_k: f64,
    pub d: f64,
}

impl GpCoefficients {
    /// Reads one tabulated row, ordered `[b, c, a, X, d]`.
    pub fn from_row(row: [f64; 5]) -> Self {
        let [b, c, a, x_k, d] = row;
        Self { b, c, a, x_k, d }
    }

    /// The K(x) term of the fit.
    pub fn k(&self, mfp: f64) -> f64 {
        let tanh_m2 = (-2.0f64).tanh();
        self.c * mfp.powf(self.a)
            + self.d * ((mfp / self.x_k - 2.0).tanh() - tanh_m2) / (1.0 - tanh_m2)
    }

    /// Buildup factor at a penetration depth of `mfp` mean free paths. Never below 1.
    pub fn buildup(&self, mfp: f64) -> f64 {
        let x = mfp.min(MAX_GP_MFP);
        if !(x > 0.0) {
            return 1.0;
        }
        let k = self.k(x).max(0.0);
        let buildup = if (k - 1.0).abs() < 1e-10 {
            1.0 + (self.b - 1.0) * x
        } else {
            1.0 + (self.b - 1.0) * (k.powf(x) - 1.0) / (k - 1.0)
        };
        if buildup.is_finite() {
            buildup.max(1.0)
        } else {
            1.0
        }
    }
}

/// Energy-dependent GP coefficients. Each coefficient is interpolated on its own over energy
/// with the same log-log policy as the cross-section tables.
#[derive(Debug, Clone, PartialEq)]
pub struct GpTable {
    b: LogLogTable,
    c: LogLogTable,
    a: LogLogTable,
    x_k: LogLogTable,
    d: LogLogTable,
}

impl GpTable {
    pub fn new(energies: &[f64], rows: &[[f64; 5]]) -> Result<Self, TableShape> {
        let column = |i: usize| LogLogTable::new(energies.to_vec(), rows.iter().map(|r| r[i]).collect());
        Ok(Self {
            b: column(0)?,
            c: column(1)?,
            a: column(2)?,
            x_k: column(3)?,
            d: column(4)?,
        })
    }

    pub fn coefficients_at(&self, energy: f64) -> GpCoefficients {
        GpCoefficients {
            b: self.b.evaluate(energy),
            c: self.c.evaluate(energy),
            a: self.a.evaluate(energy),
            x_k: self.x_k.evaluate(energy),
            d: self.d.evaluate(energy),
        }
    }

    pub fn buildup(&self, energy: f64, mfp: f64) -> f64 {
        self.coefficients_at(energy).buildup(mfp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_1mev() -> GpCoefficients {
        GpCoefficients::from_row([2.129, 1.361, -0.080, 14.29, 0.042])
    }

    #[test]
    fn no_buildup_without_material() {
        assert_eq!(water_1mev().buildup(0.0), 1.0);
    }

    #[test]
    fn grows_with_depth() {
        let gp = water_1mev();
        let mut last = 1.0;
        for i in 1..=40 {
            let b = gp.buildup(i as f64);
            assert!(b > last, "buildup at {} mfp: {} <= {}", i, b, last);
            last = b;
        }
    }

    #[test]
    fn depth_is_capped() {
        let gp = water_1mev();
        assert_eq!(gp.buildup(55.0), gp.buildup(MAX_GP_MFP));
    }

    #[test]
    fn unit_k_is_linear() {
        // c = 1 with a = 0 and d = 0 gives K = 1 everywhere.
        let gp = GpCoefficients::from_row([1.5, 1.0, 0.0, 14.0, 0.0]);
        assert!((gp.buildup(4.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn never_below_one() {
        // b < 1 would pull the factor under one.
        let gp = GpCoefficients::from_row([0.5, 0.9, 0.1, 14.0, -0.05]);
        for i in 0..50 {
            assert!(gp.buildup(i as f64 * 0.9) >= 1.0);
        }
    }

    #[test]
    fn table_reproduces_rows() {
        let rows = [[2.0, 1.3, -0.1, 14.0, 0.05], [1.5, 1.1, 0.02, 13.5, -0.01]];
        let table = GpTable::new(&[1.0, 2.0], &rows).unwrap();
        assert_eq!(table.coefficients_at(1.0), GpCoefficients::from_row(rows[0]));
        assert_eq!(table.coefficients_at(2.0), GpCoefficients::from_row(rows[1]));
        // Signed coefficient crosses zero: linear in value.
        let mid = table.coefficients_at(2f64.sqrt());
        assert!((mid.a - (-0.04)).abs() < 1e-12);
    }
}
