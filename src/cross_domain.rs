// Saturation profiles after the front has crossed into segment 2

use ndarray::s;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{BlError, BlResult};
use crate::fractional_flow::FlowTables;
use crate::front::Front;
use crate::interpolation::LinearTable;
use crate::profile::Profile;
use crate::segment::Composite;
use crate::single_domain::characteristic_positions;
use crate::time_grid::TimeGrid;

/// Relative storage in segment 2 treated as zero at the first step.
const ARRIVAL_VOLUME_TOLERANCE: f64 = 1e-3;

/// Relative slack on positions compared against segment boundaries.
const POSITION_TOLERANCE: f64 = 1e-12;

/// State of the composite rock at one time after the interface arrival.
///
/// The profile starts at the inlet saturation of segment 1, the segment
/// holding the injector, and ends at the initial saturation of segment 2.
///
/// # Fields
/// * interface_saturation: segment-1 saturation leaving through the interface
/// * interface_flux: wetting fractional flow through the interface
/// * downstream_saturation: segment-2 saturation carrying the same flux
/// * average_saturation: mean saturation of segment 1 (Welge)
/// * segment1_volume, segment2_volume: injected wetting volume stored per segment
/// * front_index: truncation index in the segment-2 candidate profile
/// * front_position, front_saturation: shock location and upstream saturation in segment 2
#[derive(Clone, Debug, Serialize)]
pub struct CrossDomainStep {
    pub time: f64,
    pub interface_saturation: f64,
    pub interface_flux: f64,
    pub downstream_saturation: f64,
    pub average_saturation: f64,
    pub segment1_volume: f64,
    pub segment2_volume: f64,
    pub front_index: usize,
    pub front_position: f64,
    pub front_saturation: f64,
    pub profile: Profile,
}

/// Result of the two-segment evolution.
///
/// `avg_saturation` and `front_flux` describe segment 1 at the moment the
/// front reaches the interface. `breakthrough_time` is the first requested
/// time at which the front would lie past the producer; `steps` stop before it.
#[derive(Clone, Debug, Serialize)]
pub struct CrossDomainEvolution {
    pub avg_saturation: f64,
    pub front_flux: f64,
    pub breakthrough_time: Option<f64>,
    pub steps: Vec<CrossDomainStep>,
}

enum StepOutcome {
    Inside(CrossDomainStep),
    Breakthrough { time: f64, position: f64 },
}

/// Tables and inverse interpolants shared by every time step.
struct Coupling<'a> {
    composite: &'a Composite,
    upstream: &'a FlowTables,
    front: &'a Front,
    flow_total: f64,
    gravity: f64,
    interface_time: f64,
    /// Segment-2 saturation matching the flux of the arriving front.
    arrival_saturation: f64,
    saturation_from_dfw1: LinearTable,
    saturation_from_fw1: LinearTable,
    saturation_from_fw2: LinearTable,
}

impl<'a> Coupling<'a> {
    fn new(
        composite: &'a Composite,
        upstream: &'a FlowTables,
        front: &'a Front,
        downstream: &FlowTables,
        flow_total: f64,
        gravity: f64,
        interface_time: f64,
    ) -> BlResult<Self> {
        let saturation_from_dfw1 = LinearTable::inverse(
            "segment 1 dfw",
            &upstream.saturation.slice(s![front.index..]).to_vec(),
            &upstream.dfw.slice(s![front.index..]).to_vec(),
        )?;
        let saturation_from_fw1 =
            LinearTable::inverse("segment 1 fw", &upstream.saturation.to_vec(), &upstream.fw.to_vec())?;
        let saturation_from_fw2 = LinearTable::inverse(
            "segment 2 fw",
            &downstream.saturation.to_vec(),
            &downstream.fw.to_vec(),
        )?;
        let arrival_saturation = saturation_from_fw2.eval(upstream.fw[front.index])?;
        Ok(Coupling {
            composite,
            upstream,
            front,
            flow_total,
            gravity,
            interface_time,
            arrival_saturation,
            saturation_from_dfw1,
            saturation_from_fw1,
            saturation_from_fw2,
        })
    }

    /// Segment-2 saturations from the interface value down to the initial
    /// saturation, with their positions at `time`.
    ///
    /// Saturations above the arrival value entered segment 2 later, at the time
    /// $t_s$ the matching segment-1 saturation reached the interface. The others
    /// entered together with the front at the arrival time.
    fn candidate(&self, time: f64, interface_value: f64) -> BlResult<Vec<(f64, f64)>> {
        let first = &self.composite.first;
        let second = &self.composite.second;
        let (qt, g) = (self.flow_total, self.gravity);
        let ds = second.kr.params.ds;
        let interface = self.composite.interface();
        let speed = second.velocity(qt);

        let mut points = vec![(interface, interface_value)];
        let mut k = 1;
        loop {
            let sat = interface_value - k as f64 * ds;
            if sat <= self.arrival_saturation {
                break;
            }
            let upstream_sat = self.saturation_from_fw1.eval(second.fw(sat, qt, g)?)?;
            let entry_time = first.crossing_time(first.dfw(upstream_sat, qt, g)?, qt);
            let x = interface + speed * second.dfw(sat, qt, g)? * (time - entry_time);
            points.push((x, sat));
            k += 1;
        }
        let floor = second.initial_saturation();
        let mut k = 1;
        loop {
            let sat = self.arrival_saturation - k as f64 * ds;
            if sat <= floor {
                break;
            }
            let x = interface + speed * second.dfw(sat, qt, g)? * (time - self.interface_time);
            points.push((x, sat));
            k += 1;
        }
        Ok(points)
    }

    /// First candidate index where the stored volume reaches `required`.
    fn balance(&self, candidate: &[(f64, f64)], required: f64, time: f64) -> BlResult<usize> {
        if required <= 0.0 {
            return Ok(0);
        }
        let second = &self.composite.second;
        let pore_area = second.rock.pore_area();
        let floor = second.initial_saturation();
        let mut stored = 0.0;
        for j in 0..candidate.len().saturating_sub(1) {
            let (x0, _) = candidate[j];
            let (x1, s1) = candidate[j + 1];
            stored += pore_area * (x1 - x0) * (s1 - floor);
            if stored >= required {
                return Ok(j + 1);
            }
        }
        Err(BlError::VolumeBalance {
            time,
            required,
            available: stored,
        })
    }

    fn step(&self, time: f64, first_step: bool) -> BlResult<StepOutcome> {
        let first = &self.composite.first;
        let second = &self.composite.second;
        let (qt, g) = (self.flow_total, self.gravity);
        let interface = self.composite.interface();
        let total_length = self.composite.total_length();

        let dfw_out = first.rock.pore_volume() / (qt * time);
        let interface_saturation = self.saturation_from_dfw1.eval(dfw_out)?;
        let interface_flux = first.fw(interface_saturation, qt, g)?;
        let average_saturation = interface_saturation + (1.0 - interface_flux) / dfw_out;

        let injected = qt * time;
        let segment1_volume =
            first.rock.pore_volume() * (average_saturation - first.initial_saturation());
        let mut segment2_volume = injected - segment1_volume;
        if first_step && (segment2_volume / injected).abs() <= ARRIVAL_VOLUME_TOLERANCE {
            segment2_volume = 0.0;
        }

        let downstream_saturation = self.saturation_from_fw2.eval(interface_flux)?;
        let candidate = self.candidate(time, downstream_saturation)?;
        let front_index = self.balance(&candidate, segment2_volume, time)?;
        let (front_position, front_saturation) = candidate[front_index];
        if front_position > total_length * (1.0 + POSITION_TOLERANCE) {
            return Ok(StepOutcome::Breakthrough {
                time,
                position: front_position,
            });
        }

        let upstream = characteristic_positions(self.upstream, self.front, first, qt, time);
        let mut profile = Profile::with_capacity(upstream.len() + front_index + 5);
        profile.push(0.0, first.inlet_saturation());
        if let Some(&(x_top, _)) = upstream.first() {
            if x_top <= interface * (1.0 + POSITION_TOLERANCE) {
                profile.push(x_top.min(interface), first.inlet_saturation());
            }
        }
        for &(x, s) in upstream
            .iter()
            .take_while(|p| p.0 <= interface * (1.0 + POSITION_TOLERANCE))
        {
            profile.push(x.min(interface), s);
        }
        for &(x, s) in &candidate[..=front_index] {
            profile.push(x.min(total_length), s);
        }
        let front_position = front_position.min(total_length);
        profile.push(front_position, second.initial_saturation());
        profile.push(total_length, second.initial_saturation());

        debug!(
            time,
            interface_saturation,
            downstream_saturation,
            front_position,
            "cross-domain step"
        );
        Ok(StepOutcome::Inside(CrossDomainStep {
            time,
            interface_saturation,
            interface_flux,
            downstream_saturation,
            average_saturation,
            segment1_volume,
            segment2_volume,
            front_index,
            front_position,
            front_saturation,
            profile,
        }))
    }
}

/// Evolves the profile through both segments once the front has reached
/// the interface at `interface_time`.
///
/// # Arguments
/// * composite: both rock segments
/// * upstream, front: tables and Welge front of segment 1
/// * downstream: tables of segment 2
/// * flow_total: injection rate in m^3/s
/// * gravity: gravitational acceleration in m/s^2
/// * interface_time: arrival time of the front at the interface
/// * grid: requested output times
///
/// Times from the first one whose front passes the producer onwards are
/// dropped and reported through `breakthrough_time`.
#[allow(clippy::too_many_arguments)]
pub fn evolve_cross_domain(
    composite: &Composite,
    upstream: &FlowTables,
    front: &Front,
    downstream: &FlowTables,
    flow_total: f64,
    gravity: f64,
    interface_time: f64,
    grid: &TimeGrid,
) -> BlResult<CrossDomainEvolution> {
    let coupling = Coupling::new(
        composite,
        upstream,
        front,
        downstream,
        flow_total,
        gravity,
        interface_time,
    )?;
    let front_flux = upstream.fw[front.index];
    let avg_saturation = front.saturation + (1.0 - front_flux) / front.derivative;
    info!(
        avg_saturation,
        front_flux,
        arrival_saturation = coupling.arrival_saturation,
        "front entered segment 2"
    );
    let outcomes: Vec<BlResult<StepOutcome>> = grid
        .cross_domain_times(interface_time)
        .into_par_iter()
        .enumerate()
        .map(|(i, time)| coupling.step(time, i == 0))
        .collect();

    let mut steps = Vec::with_capacity(outcomes.len());
    let mut breakthrough_time = None;
    for outcome in outcomes {
        match outcome? {
            StepOutcome::Inside(step) => steps.push(step),
            StepOutcome::Breakthrough { time, position } => {
                warn!(
                    time,
                    position,
                    kept = steps.len(),
                    "front passed the producer, later times are not reported"
                );
                breakthrough_time = Some(time);
                break;
            }
        }
    }
    Ok(CrossDomainEvolution {
        avg_saturation,
        front_flux,
        breakthrough_time,
        steps,
    })
}
