// Brooks-Corey relative permeability for a wetting/non-wetting pair

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{BlError, BlResult};
use crate::properties::{positive, Fluid};

/// Offset added to the power bases so that they stay positive at the end points.
pub const EPSILON: f64 = f64::EPSILON;

/// Brooks-Corey coefficients of one rock segment.
///
/// # Fields
/// * smin1: irreducible wetting-phase saturation
/// * smin2: residual non-wetting-phase saturation
/// * n1, n2: Corey exponents
/// * kr_max1, kr_max2: end-point relative permeabilities
/// * ds: saturation step of the tabulated curves
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreyParams {
    pub smin1: f64,
    pub smin2: f64,
    pub n1: f64,
    pub n2: f64,
    pub kr_max1: f64,
    pub kr_max2: f64,
    pub ds: f64,
}

/// Relative permeability curves of a fluid pair inside one rock segment.
#[derive(Clone, Debug, PartialEq)]
pub struct BrooksCorey {
    pub wetting: Fluid,
    pub non_wetting: Fluid,
    pub params: CoreyParams,
}

impl BrooksCorey {
    pub fn new(wetting: Fluid, non_wetting: Fluid, params: CoreyParams) -> BlResult<Self> {
        let p = &params;
        for &(what, s) in &[("smin1", p.smin1), ("smin2", p.smin2)] {
            if !(0.0..1.0).contains(&s) {
                return Err(BlError::InvalidParameter { what, value: s });
            }
        }
        if p.smin1 + p.smin2 >= 1.0 {
            return Err(BlError::InvalidParameter {
                what: "smin1 + smin2",
                value: p.smin1 + p.smin2,
            });
        }
        positive("n1", p.n1)?;
        positive("n2", p.n2)?;
        for &(what, kr) in &[("kr_max1", p.kr_max1), ("kr_max2", p.kr_max2)] {
            if !(kr > 0.0 && kr <= 1.0) {
                return Err(BlError::InvalidParameter { what, value: kr });
            }
        }
        if !(p.ds > 0.0 && p.ds < 1.0 - p.smin1 - p.smin2) {
            return Err(BlError::InvalidParameter {
                what: "ds",
                value: p.ds,
            });
        }
        Ok(BrooksCorey {
            wetting,
            non_wetting,
            params,
        })
    }

    /// Saturation interval `(smin1, 1 - smin2)` where the curves are evaluated.
    pub fn saturation_limits(&self) -> (f64, f64) {
        (self.params.smin1, 1.0 - self.params.smin2)
    }

    /// Mobile saturation span $1 - S_{min,1} - S_{min,2}$.
    pub fn mobile_span(&self) -> f64 {
        1.0 - self.params.smin1 - self.params.smin2
    }

    /// Rejects saturations outside the closed interval, and NaN.
    pub fn check(&self, sat: f64) -> BlResult<f64> {
        let (min, max) = self.saturation_limits();
        if sat >= min && sat <= max {
            Ok(sat)
        } else {
            Err(BlError::SaturationOutOfRange {
                value: sat,
                min,
                max,
            })
        }
    }

    /// Projects a saturation onto the valid interval.
    pub fn clamp(&self, sat: f64) -> f64 {
        let (min, max) = self.saturation_limits();
        sat.max(min).min(max)
    }

    /// Wetting-phase base $S + \epsilon - S_{min,1}$.
    pub(crate) fn wetting_base(&self, sat: f64) -> f64 {
        sat + EPSILON - self.params.smin1
    }

    /// Non-wetting-phase base $\epsilon + 1 - S - S_{min,2}$.
    pub(crate) fn non_wetting_base(&self, sat: f64) -> f64 {
        EPSILON + 1.0 - sat - self.params.smin2
    }

    /// Relative permeability of the wetting phase
    ///
    /// $$\begin{equation}
    /// k_{r1} = k_{r1,max} \left(\frac{S + \epsilon - S_{min,1}}{1 - S_{min,1} - S_{min,2}}\right)^{n_1}
    /// \end{equation}$$
    pub fn kr1(&self, sat: f64) -> BlResult<f64> {
        let sat = self.check(sat)?;
        Ok(self.params.kr_max1 * (self.wetting_base(sat) / self.mobile_span()).powf(self.params.n1))
    }

    /// Relative permeability of the non-wetting phase
    ///
    /// $$\begin{equation}
    /// k_{r2} = k_{r2,max} \left(\frac{\epsilon + 1 - S - S_{min,2}}{1 - S_{min,1} - S_{min,2}}\right)^{n_2}
    /// \end{equation}$$
    pub fn kr2(&self, sat: f64) -> BlResult<f64> {
        let sat = self.check(sat)?;
        Ok(self.params.kr_max2
            * (self.non_wetting_base(sat) / self.mobile_span()).powf(self.params.n2))
    }

    /// Mobility ratio, non-wetting over wetting
    ///
    /// $$M = \frac{k_{r2}}{\mu_2}\frac{\mu_1}{k_{r1}}$$
    pub fn mob(&self, sat: f64) -> BlResult<f64> {
        Ok(self.kr2(sat)? / self.non_wetting.viscosity * self.wetting.viscosity / self.kr1(sat)?)
    }

    pub fn kr1_array(&self, sat: &Array1<f64>) -> BlResult<Array1<f64>> {
        sat.iter().map(|&s| self.kr1(s)).collect()
    }

    pub fn kr2_array(&self, sat: &Array1<f64>) -> BlResult<Array1<f64>> {
        sat.iter().map(|&s| self.kr2(s)).collect()
    }

    /// Saturation samples $S_{min,1} + \epsilon, S_{min,1} + \epsilon + dS, \ldots$
    /// strictly below $1 - S_{min,2} - \epsilon$.
    pub fn saturation_grid(&self) -> Array1<f64> {
        let start = self.params.smin1 + EPSILON;
        let stop = 1.0 - self.params.smin2 - EPSILON;
        Array1::range(start, stop, self.params.ds)
    }
}
