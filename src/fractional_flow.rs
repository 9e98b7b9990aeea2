// Fractional flow of the wetting phase and its saturation derivative

use ndarray::Array1;
use tracing::debug;

use crate::error::{BlError, BlResult};
use crate::properties::Rock;
use crate::relperm::BrooksCorey;

/// Gravity number of a segment
///
/// $$N_g = \frac{A k (\rho_1 - \rho_2) g \sin\theta}{q_t \mu_1}$$
///
/// # Arguments
/// * kr: relative permeability curves of the segment
/// * rock: segment geometry
/// * flow_total: total injection rate in m^3/s
/// * gravity: gravitational acceleration in m/s^2
pub fn gravity_number(kr: &BrooksCorey, rock: &Rock, flow_total: f64, gravity: f64) -> f64 {
    let density_diff = kr.wetting.density - kr.non_wetting.density;
    rock.area * rock.permeability * density_diff * gravity * rock.dip.sin()
        / (flow_total * kr.wetting.viscosity)
}

/// Wetting-phase fractional flow with gravity segregation
///
/// $$\begin{equation}
/// f_w = \frac{1 - N_g k_{r1}}{1 + M}
/// \end{equation}$$
///
/// # Arguments
/// * sat: wetting-phase saturation
/// * kr: relative permeability curves of the segment
/// * rock: segment geometry
/// * flow_total: total injection rate in m^3/s
/// * gravity: gravitational acceleration in m/s^2
pub fn fractional_flow(
    sat: f64,
    kr: &BrooksCorey,
    rock: &Rock,
    flow_total: f64,
    gravity: f64,
) -> BlResult<f64> {
    let mob = kr.mob(sat)?;
    let n_g = gravity_number(kr, rock, flow_total, gravity);
    Ok((1.0 - n_g * kr.kr1(sat)?) / (1.0 + mob))
}

/// Saturation derivative of [`fractional_flow`]
///
/// With $b_1 = S + \epsilon - S_{min,1}$ and $b_2 = \epsilon + 1 - S - S_{min,2}$,
/// $dM/dS = -M (n_1/b_1 + n_2/b_2)$ and $dk_{r1}/dS = n_1 k_{r1}/b_1$, so
///
/// $$\begin{equation}
/// \frac{\partial f_w}{\partial S} = \frac{M (n_1/b_1 + n_2/b_2)}{(1 + M)^2}
///  - N_g k_{r1} \frac{(1 + M) n_1/b_1 + M (n_1/b_1 + n_2/b_2)}{(1 + M)^2}
/// \end{equation}$$
pub fn fractional_flow_derivative(
    sat: f64,
    kr: &BrooksCorey,
    rock: &Rock,
    flow_total: f64,
    gravity: f64,
) -> BlResult<f64> {
    let mob = kr.mob(sat)?;
    let kr1 = kr.kr1(sat)?;
    let n_g = gravity_number(kr, rock, flow_total, gravity);
    let wet = kr.params.n1 / kr.wetting_base(sat);
    let non_wet = kr.params.n2 / kr.non_wetting_base(sat);
    let denom = (1.0 + mob).powi(2);
    let viscous = mob * (wet + non_wet) / denom;
    let segregation = n_g * kr1 * (wet * (1.0 + mob) + mob * (wet + non_wet)) / denom;
    Ok(viscous - segregation)
}

/// Saturation samples of one segment with fractional flow and its derivative.
#[derive(Clone, Debug)]
pub struct FlowTables {
    pub segment: u32,
    pub saturation: Array1<f64>,
    pub fw: Array1<f64>,
    pub dfw: Array1<f64>,
}

impl FlowTables {
    pub fn len(&self) -> usize {
        self.saturation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saturation.is_empty()
    }
}

/// Tabulates `fw` and `dfw` over the saturation grid of a segment.
pub fn build_tables(
    rock: &Rock,
    kr: &BrooksCorey,
    flow_total: f64,
    gravity: f64,
) -> BlResult<FlowTables> {
    if !(flow_total > 0.0 && flow_total.is_finite()) {
        return Err(BlError::InvalidParameter {
            what: "injection rate",
            value: flow_total,
        });
    }
    let saturation = kr.saturation_grid();
    if saturation.len() < 3 {
        return Err(BlError::FrontNotFound { segment: rock.id });
    }
    let fw = saturation
        .iter()
        .map(|&s| fractional_flow(s, kr, rock, flow_total, gravity))
        .collect::<BlResult<Array1<f64>>>()?;
    let dfw = saturation
        .iter()
        .map(|&s| fractional_flow_derivative(s, kr, rock, flow_total, gravity))
        .collect::<BlResult<Array1<f64>>>()?;
    debug!(
        segment = rock.id,
        samples = saturation.len(),
        "built fractional flow tables"
    );
    Ok(FlowTables {
        segment: rock.id,
        saturation,
        fw,
        dfw,
    })
}
