// Non-wetting phase pressure along a known saturation profile

use tracing::debug;

use crate::error::{BlError, BlResult};
use crate::profile::Profile;
use crate::segment::Composite;

/// Integrates the pressure from the producer back to the injector
///
/// For every step of length $\Delta x$ the non-wetting phase flux sets the
/// pressure gradient
///
/// $$\begin{equation}
/// P_j = P_{j-1} + \Delta x \left(\frac{q_t (1 - f_w)}{T} - \rho_2 g \sin\theta\right),
/// \quad T = \frac{A k k_{r2}}{\mu_2}
/// \end{equation}$$
///
/// Positions beyond the extent of `saturation` keep the reference pressure.
/// Interpolated saturations are clamped onto the interval of the segment
/// they fall in.
///
/// # Arguments
/// * reference_pressure: pressure at the producer in Pa
/// * saturation: saturation profile over the composite rock
/// * composite: both rock segments
/// * flow_total: injection rate in m^3/s
/// * gravity: gravitational acceleration in m/s^2
/// * steps: number of integration steps over the composite length
///
/// # Returns
/// pressure profile ordered from injector to producer
pub fn reconstruct_pressure(
    reference_pressure: f64,
    saturation: &Profile,
    composite: &Composite,
    flow_total: f64,
    gravity: f64,
    steps: usize,
) -> BlResult<Profile> {
    if steps == 0 {
        return Err(BlError::InvalidParameter {
            what: "pressure steps",
            value: 0.0,
        });
    }
    let length = composite.total_length();
    let dx = length / steps as f64;
    let interpolant = saturation.interpolator("saturation profile")?;
    let extent = saturation.extent();

    let mut backwards = Profile::with_capacity(steps + 1);
    let mut pressure = reference_pressure;
    backwards.push(length, pressure);
    for j in 1..=steps {
        let x = if j == steps {
            0.0
        } else {
            length - j as f64 * dx
        };
        if x > extent {
            pressure = reference_pressure;
        } else {
            let segment = composite.segment_at(x);
            let sat = segment.kr.clamp(interpolant.eval(x)?);
            let fw = segment.fw(sat, flow_total, gravity)?;
            let non_wetting = &segment.kr.non_wetting;
            let transmissibility = segment.rock.area * segment.rock.permeability
                * segment.kr.kr2(sat)?
                / non_wetting.viscosity;
            let head = non_wetting.density * gravity * segment.rock.dip.sin();
            pressure += dx * (flow_total * (1.0 - fw) / transmissibility - head);
        }
        backwards.push(x, pressure);
    }
    debug!(
        injector = pressure,
        producer = reference_pressure,
        "reconstructed pressure"
    );

    backwards.x.reverse();
    backwards.value.reverse();
    Ok(backwards)
}
