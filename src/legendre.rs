use crate::NMAX;

/// One quasi-normalized derivative Legendre pair at degree `n`, order `m`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub n: usize,
    pub m: usize,
    pub v: f64,
    pub w: f64,
}

/// Walks orders `m = 0..=NMAX + 1` and, within each order, degrees
/// `n = m..=NMAX + 1`, yielding the `V`/`W` pair at every step.
///
/// The sectoral terms (`n == m`) are stepped from the previous sectoral pair
/// using the equatorial ratios; the remaining terms of an order come from the
/// usual three-term recurrence in degree. The walk goes one degree past
/// `NMAX` because the field sum reads degree `n - 1` coefficients.
#[derive(Debug, Clone)]
pub struct DerivativeLegendre {
    a: f64,
    b: f64,
    f: f64,
    g: f64,
    m: usize,
    n: usize,
    v_top: f64,
    w_top: f64,
    v_prev: f64,
    w_prev: f64,
    v: f64,
    w: f64,
}

impl DerivativeLegendre {
    /// `radius` is the model reference radius, `position` is in the same unit.
    pub fn new(radius: f64, position: &[f64; 3]) -> Self {
        let [x, y, z] = *position;
        let norm_sq = x * x + y * y + z * z;
        let scale = radius / norm_sq;
        let v_top = radius / norm_sq.sqrt();
        Self {
            a: scale * x,
            b: scale * y,
            f: scale * z,
            g: scale * radius,
            m: 0,
            n: 0,
            v_top,
            w_top: 0.0,
            v_prev: 0.0,
            w_prev: 0.0,
            v: v_top,
            w: 0.0,
        }
    }

    fn sectoral_step(&mut self) {
        let k = (2 * self.m - 1) as f64;
        let v_top = self.v_top;
        self.v_top = k * (self.a * v_top - self.b * self.w_top);
        self.w_top = k * (self.a * self.w_top + self.b * v_top);
        self.v_prev = 0.0;
        self.w_prev = 0.0;
        self.v = self.v_top;
        self.w = self.w_top;
    }

    fn degree_step(&mut self) {
        let (n, m) = (self.n, self.m);
        let inv = 1.0 / (n - m) as f64;
        let k1 = (2 * n - 1) as f64 * self.f;
        let k2 = (n + m - 1) as f64 * self.g;

        let v = self.v;
        self.v = (k1 * v - k2 * self.v_prev) * inv;
        self.v_prev = v;

        let w = self.w;
        self.w = (k1 * w - k2 * self.w_prev) * inv;
        self.w_prev = w;
    }
}

impl Iterator for DerivativeLegendre {
    type Item = Term;

    fn next(&mut self) -> Option<Term> {
        if self.m > NMAX + 1 {
            return None;
        }
        if self.n == self.m {
            if self.m != 0 {
                self.sectoral_step();
            }
        } else {
            self.degree_step();
        }
        let term = Term {
            n: self.n,
            m: self.m,
            v: self.v,
            w: self.w,
        };

        if self.n == NMAX + 1 {
            self.m += 1;
            self.n = self.m;
        } else {
            self.n += 1;
        }
        Some(term)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.m > NMAX + 1 {
            0
        } else {
            // rest of this order, then every later order
            let rows = NMAX + 1 - self.m;
            (NMAX + 2 - self.n) + rows * (rows + 1) / 2
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DerivativeLegendre {}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    const R: f64 = 6_371_200.0;

    #[test]
    fn test_visit_order_and_count() {
        let terms: Vec<Term> = DerivativeLegendre::new(R, &[1.0e6, 2.0e6, 6.0e6]).collect();
        assert_eq!(terms.len(), (NMAX + 2) * (NMAX + 3) / 2);
        assert_eq!((terms[0].m, terms[0].n), (0, 0));
        assert_eq!((terms[NMAX + 1].m, terms[NMAX + 1].n), (0, NMAX + 1));
        assert_eq!((terms[NMAX + 2].m, terms[NMAX + 2].n), (1, 1));
        let last = terms.last().unwrap();
        assert_eq!((last.m, last.n), (NMAX + 1, NMAX + 1));
        for pair in terms.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!((b.m == a.m && b.n == a.n + 1) || (b.m == a.m + 1 && b.n == b.m));
        }
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let mut it = DerivativeLegendre::new(R, &[R, 0.0, 0.0]);
        let total = it.len();
        assert_eq!(total, 105);
        for consumed in 1..=total {
            it.next();
            assert_eq!(it.len(), total - consumed);
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn test_low_order_closed_forms() {
        // Solid harmonics of the external potential: V00 = R/r,
        // V10 = R² z / r³, V11 = R² x / r³, W11 = R² y / r³.
        let [x, y, z]: [f64; 3] = [2.0e6, -3.0e6, 5.5e6];
        let r = (x * x + y * y + z * z).sqrt();
        let terms: Vec<Term> = DerivativeLegendre::new(R, &[x, y, z]).collect();
        let at = |n: usize, m: usize| terms.iter().find(|t| t.n == n && t.m == m).copied().unwrap();

        assert_float_eq!(at(0, 0).v, R / r, rmax <= 1e-12);
        assert_eq!(at(0, 0).w, 0.0);
        assert_float_eq!(at(1, 0).v, R * R * z / r.powi(3), rmax <= 1e-12);
        assert_float_eq!(at(1, 1).v, R * R * x / r.powi(3), rmax <= 1e-12);
        assert_float_eq!(at(1, 1).w, R * R * y / r.powi(3), rmax <= 1e-12);
        // V20 = R³ (3z² - r²) / (2 r⁵)
        assert_float_eq!(
            at(2, 0).v,
            R.powi(3) * (3.0 * z * z - r * r) / (2.0 * r.powi(5)),
            rmax <= 1e-12
        );
    }

    #[test]
    fn test_equatorial_plane_has_no_odd_zonal_terms() {
        let terms = DerivativeLegendre::new(R, &[4.0e6, 5.0e6, 0.0]);
        for t in terms.filter(|t| t.m == 0 && t.n % 2 == 1) {
            assert_eq!(t.v, 0.0, "V({}, 0)", t.n);
        }
    }
}
