//! World Magnetic Model evaluated directly in Earth-centered, Earth-fixed
//! coordinates.
//!
//! The field is computed from a degree/order 12 spherical-harmonic expansion
//! without going through geodetic latitude or longitude: the position enters
//! only through the ratios `R·x/r²`, `R·y/r²`, `R·z/r²` and `R²/r²`, which feed
//! a recursion over quasi-normalized derivative Legendre functions.
//!
//! ```
//! let position = [1111164.8708100126, 0.0, 6259542.961028692];
//! let field = wmm_ecef::geomag(2020.0, &position);
//! assert!((field[2] * 1e9 + 52635.5).abs() < 0.1);
//! ```

pub mod constants;
mod error;
mod legendre;
mod table;
pub mod utils;

pub use error::{Result, WmmError};
pub use legendre::{DerivativeLegendre, Term};

/// Highest degree and order of the expansion.
pub const NMAX: usize = 12;

/// Number of (n, m) pairs with `0 <= m <= n <= NMAX`.
pub const TOTAL_COEFFS: usize = (NMAX + 1) * (NMAX + 2) / 2;

/// Offset of the (n, m) term in a coefficient table.
///
/// Terms are grouped by order, each order running over increasing degree.
/// Callers must keep `m <= n <= NMAX`.
#[inline]
pub const fn index(n: usize, m: usize) -> usize {
    m * (2 * NMAX - m + 1) / 2 + n
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientEntry {
    /// nT
    pub main_cos: f64,
    /// nT
    pub main_sin: f64,
    /// nT/yr
    pub secular_cos: f64,
    /// nT/yr
    pub secular_sin: f64,
}

impl CoefficientEntry {
    pub const ZERO: CoefficientEntry = CoefficientEntry::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(main_cos: f64, main_sin: f64, secular_cos: f64, secular_sin: f64) -> Self {
        Self {
            main_cos,
            main_sin,
            secular_cos,
            secular_sin,
        }
    }

    /// Cosine and sine terms `years_since_epoch` after the model epoch.
    #[inline]
    pub fn at(&self, years_since_epoch: f64) -> (f64, f64) {
        (
            self.main_cos + years_since_epoch * self.secular_cos,
            self.main_sin + years_since_epoch * self.secular_sin,
        )
    }
}

/// A complete set of model parameters: epoch, reference radius and the
/// pre-normalized coefficient table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    epoch: f64,
    earth_radius: f64,
    coefficients: [CoefficientEntry; TOTAL_COEFFS],
}

impl Model {
    pub const fn new(
        epoch: f64,
        earth_radius: f64,
        coefficients: [CoefficientEntry; TOTAL_COEFFS],
    ) -> Self {
        Self {
            epoch,
            earth_radius,
            coefficients,
        }
    }

    /// Decimal year at which the main-field terms are exact.
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    /// Reference radius in meters.
    pub fn earth_radius(&self) -> f64 {
        self.earth_radius
    }

    pub fn coefficients(&self) -> &[CoefficientEntry; TOTAL_COEFFS] {
        &self.coefficients
    }

    pub fn coefficient(&self, n: usize, m: usize) -> &CoefficientEntry {
        &self.coefficients[index(n, m)]
    }

    /// Magnetic field in tesla at `position` (meters, ECEF) and `decimal_year`.
    ///
    /// The result is expressed in the same frame as the position. No validity
    /// window is enforced; times far from the epoch are extrapolated linearly.
    /// `position` must not be the zero vector, otherwise the output is not
    /// finite.
    pub fn field(&self, decimal_year: f64, position: &[f64; 3]) -> [f64; 3] {
        let t = decimal_year - self.epoch;
        let lookup = |n: usize, m: usize| self.coefficient(n, m).at(t);

        let mut px = 0.0;
        let mut py = 0.0;
        let mut pz = 0.0;

        for Term { n, m, v, w } in DerivativeLegendre::new(self.earth_radius, position) {
            if m < NMAX && n >= m + 2 {
                let (c, s) = lookup(n - 1, m + 1);
                let k = 0.5 * (n - m) as f64 * (n - m - 1) as f64;
                px += k * (c * v + s * w);
                py += k * (-c * w + s * v);
            }
            if m >= 2 && n >= 2 {
                let (c, s) = lookup(n - 1, m - 1);
                px += 0.5 * (-c * v - s * w);
                py += 0.5 * (-c * w + s * v);
            }
            if m == 1 && n >= 2 {
                let (c, _) = lookup(n - 1, 0);
                px += -c * v;
                py += -c * w;
            }
            if m < n && n >= 2 {
                let (c, s) = lookup(n - 1, m);
                pz += (n - m) as f64 * (-c * v - s * w);
            }
        }

        // nT gradient to tesla field
        [px * -1e-9, py * -1e-9, pz * -1e-9]
    }

    /// Same as [`Model::field`], with the time given as Unix milliseconds.
    pub fn field_at_unix_millis(&self, time_ms: i64, position: &[f64; 3]) -> Result<[f64; 3]> {
        let decimal_year = utils::unix_millis_to_decimal_year(time_ms)?;
        Ok(self.field(decimal_year, position))
    }
}

/// WMM2020 magnetic field in tesla at an ECEF `position` in meters.
pub fn geomag(decimal_year: f64, position: &[f64; 3]) -> [f64; 3] {
    constants::WMM2020.field(decimal_year, position)
}
