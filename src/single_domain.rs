// Saturation profiles while the front is still inside segment 1

use rayon::prelude::*;
use tracing::info;

use crate::error::BlResult;
use crate::fractional_flow::FlowTables;
use crate::front::Front;
use crate::profile::{Profile, TimedProfile};
use crate::segment::Segment;
use crate::time_grid::TimeGrid;

/// Self-similar profiles of one segment before the front leaves it.
///
/// # Fields
/// * interface_time: time for the front to cross the segment, $t_{ff}$
/// * front_index: index of the front saturation in the segment tables
/// * steps: profiles for every requested time before `interface_time`
#[derive(Clone, Debug)]
pub struct SingleDomainEvolution {
    pub interface_time: f64,
    pub front_index: usize,
    pub steps: Vec<TimedProfile>,
}

/// Position of each saturation above the front at time `time`
///
/// $$\begin{equation}
/// x(S, t) = \frac{q_t t}{A \phi} \frac{\partial f_w}{\partial S}
/// \end{equation}$$
///
/// Returned from the inlet saturation down to the front saturation.
pub fn characteristic_positions(
    tables: &FlowTables,
    front: &Front,
    segment: &Segment,
    flow_total: f64,
    time: f64,
) -> Vec<(f64, f64)> {
    let reach = segment.velocity(flow_total) * time;
    (front.index..tables.len())
        .rev()
        .map(|k| (reach * tables.dfw[k], tables.saturation[k]))
        .collect()
}

/// Profile of the segment at `time`: inlet plateau, rarefaction branch,
/// shock down to the initial saturation, initial plateau up to the segment end.
///
/// The inlet plateau sits at $1 - S_{min,2}$ of this segment, the one holding
/// the injector.
pub fn segment_profile(
    tables: &FlowTables,
    front: &Front,
    segment: &Segment,
    flow_total: f64,
    time: f64,
) -> Profile {
    let branch = characteristic_positions(tables, front, segment, flow_total, time);
    let inlet = segment.inlet_saturation();
    let initial = segment.initial_saturation();
    let mut profile = Profile::with_capacity(branch.len() + 4);
    profile.push(0.0, inlet);
    if let Some(&(x_top, _)) = branch.first() {
        profile.push(x_top, inlet);
    }
    for &(x, s) in &branch {
        profile.push(x, s);
    }
    let x_front = branch.last().map(|p| p.0).unwrap_or(0.0);
    profile.push(x_front, initial);
    profile.push(segment.rock.length, initial);
    profile
}

/// Evolves the saturation profile of `segment` over the grid times that come
/// before the front reaches the end of the segment.
///
/// # Arguments
/// * tables: fractional flow tables of the segment
/// * front: Welge front of the segment
/// * segment: rock and relative permeability of the segment
/// * flow_total: injection rate in m^3/s
/// * grid: requested output times
pub fn evolve_single_domain(
    tables: &FlowTables,
    front: &Front,
    segment: &Segment,
    flow_total: f64,
    grid: &TimeGrid,
) -> BlResult<SingleDomainEvolution> {
    let interface_time = segment.crossing_time(tables.dfw[front.index], flow_total);
    if interface_time > grid.horizon() {
        info!(
            segment = segment.rock.id,
            interface_time, "front does not reach the segment end within the horizon"
        );
    } else {
        info!(
            segment = segment.rock.id,
            interface_time, "front reaches the segment end"
        );
    }
    let steps = grid
        .single_domain_times(interface_time)
        .into_par_iter()
        .map(|time| TimedProfile {
            time,
            profile: segment_profile(tables, front, segment, flow_total, time),
        })
        .collect();
    Ok(SingleDomainEvolution {
        interface_time,
        front_index: front.index,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::front::locate_front;
    use crate::samples::{composite, DAY, FLOW, GRAVITY};

    fn grid(horizon: f64) -> TimeGrid {
        TimeGrid::Uniform {
            start: 0.1 * DAY,
            step: 0.1 * DAY,
            horizon,
        }
    }

    #[test]
    fn interface_time_is_positive_and_finite() {
        let segment = composite().first;
        let tables = segment.tables(FLOW, GRAVITY).unwrap();
        let front = locate_front(&tables).unwrap();
        let evolution = evolve_single_domain(&tables, &front, &segment, FLOW, &grid(DAY)).unwrap();
        assert!(evolution.interface_time > 0.0 && evolution.interface_time.is_finite());
        assert_eq!(evolution.front_index, front.index);
        assert!(evolution
            .steps
            .iter()
            .all(|step| step.time < evolution.interface_time));
    }

    #[test]
    fn front_moves_with_its_characteristic_speed() {
        let segment = composite().first;
        let tables = segment.tables(FLOW, GRAVITY).unwrap();
        let front = locate_front(&tables).unwrap();
        let time = 0.3 * DAY;
        let profile = segment_profile(&tables, &front, &segment, FLOW, time);
        let expected = FLOW * time / segment.rock.pore_area() * tables.dfw[front.index];
        let at_front = profile
            .iter()
            .find(|&(_, s)| s == front.saturation)
            .unwrap();
        assert_relative_eq!(at_front.0, expected, max_relative = 1e-12);
    }

    #[test]
    fn profile_is_bracketed_by_plateaus() {
        let segment = composite().first;
        let tables = segment.tables(FLOW, GRAVITY).unwrap();
        let front = locate_front(&tables).unwrap();
        let profile = segment_profile(&tables, &front, &segment, FLOW, 0.2 * DAY);
        assert_eq!(profile.first(), Some((0.0, 0.8)));
        assert_eq!(profile.last(), Some((6.0, 0.2)));
        assert!(profile.x.windows(2).all(|w| w[1] >= w[0]));
        assert!(profile.value.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn long_crossing_covers_horizon() {
        let segment = composite().first;
        let tables = segment.tables(FLOW, GRAVITY).unwrap();
        let front = locate_front(&tables).unwrap();
        let short = grid(0.4 * DAY);
        let evolution = evolve_single_domain(&tables, &front, &segment, FLOW, &short).unwrap();
        assert!(evolution.interface_time > short.horizon());
        assert_eq!(evolution.steps.len(), 4);
        assert_relative_eq!(
            evolution.steps.last().unwrap().time,
            short.horizon(),
            max_relative = 1e-12
        );
    }
}
