// Scenario configuration and the full two-segment run

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cross_domain::{evolve_cross_domain, CrossDomainEvolution};
use crate::error::{BlError, BlResult};
use crate::front::{locate_front, Front};
use crate::pressure::reconstruct_pressure;
use crate::profile::Profile;
use crate::properties::{Fluid, Rock};
use crate::relperm::{BrooksCorey, CoreyParams};
use crate::segment::{Composite, Segment};
use crate::single_domain::{evolve_single_domain, SingleDomainEvolution};
use crate::time_grid::TimeGrid;

fn default_gravity() -> f64 {
    9.81
}

fn default_pressure_steps() -> usize {
    100
}

/// Operating conditions shared by every stage of the run.
///
/// # Fields
/// * injection_rate: total injected rate in m^3/s
/// * gravity: gravitational acceleration in m/s^2
/// * reference_pressure: pressure at the producer in Pa
/// * pressure_steps: integration steps of the pressure reconstruction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub injection_rate: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    #[serde(default)]
    pub reference_pressure: f64,
    #[serde(default = "default_pressure_steps")]
    pub pressure_steps: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FluidPair {
    pub wetting: Fluid,
    pub non_wetting: Fluid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub rock: Rock,
    pub relperm: CoreyParams,
}

/// A displacement through two rock segments, as read from a scenario file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub fluids: FluidPair,
    pub segments: [SegmentConfig; 2],
    pub settings: Settings,
    pub time: TimeGrid,
}

/// Which stage produced a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    SingleDomain,
    CrossDomain,
}

/// Saturation and pressure along the composite rock at one time.
///
/// Saturation profiles start at $1 - S_{min,2}$ of segment 1, which holds the
/// injector, and end at $S_{min,1}$ of segment 2 at the producer.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub time: f64,
    pub phase: Phase,
    pub saturation: Profile,
    pub pressure: Profile,
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub front: Front,
    pub single: SingleDomainEvolution,
    pub cross: Option<CrossDomainEvolution>,
    pub snapshots: Vec<Snapshot>,
}

impl Solution {
    pub fn interface_time(&self) -> f64 {
        self.single.interface_time
    }
}

impl Scenario {
    pub fn from_yaml_str(text: &str) -> BlResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> BlResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Scenario::from_yaml_str(&text)
    }

    /// Validated segments with their relative permeability curves.
    pub fn composite(&self) -> BlResult<Composite> {
        self.fluids.wetting.validate()?;
        self.fluids.non_wetting.validate()?;
        let build = |config: &SegmentConfig| -> BlResult<Segment> {
            config.rock.validate()?;
            let kr = BrooksCorey::new(
                self.fluids.wetting.clone(),
                self.fluids.non_wetting.clone(),
                config.relperm,
            )?;
            Ok(Segment::new(config.rock.clone(), kr))
        };
        Ok(Composite::new(
            build(&self.segments[0])?,
            build(&self.segments[1])?,
        ))
    }

    fn validate_settings(&self) -> BlResult<()> {
        let settings = &self.settings;
        if !(settings.injection_rate > 0.0 && settings.injection_rate.is_finite()) {
            return Err(BlError::InvalidParameter {
                what: "injection rate",
                value: settings.injection_rate,
            });
        }
        if !settings.gravity.is_finite() || !settings.reference_pressure.is_finite() {
            return Err(BlError::InvalidParameter {
                what: "gravity or reference pressure",
                value: settings.gravity + settings.reference_pressure,
            });
        }
        self.time.validate()
    }

    /// Saturation and pressure profiles for every time of the grid.
    pub fn run(&self) -> BlResult<Solution> {
        self.validate_settings()?;
        let composite = self.composite()?;
        let Settings {
            injection_rate: qt,
            gravity: g,
            reference_pressure,
            pressure_steps,
        } = self.settings;

        let upstream = composite.first.tables(qt, g)?;
        let front = locate_front(&upstream)?;
        let single = evolve_single_domain(&upstream, &front, &composite.first, qt, &self.time)?;

        let cross = if single.interface_time <= self.time.horizon() {
            let downstream = composite.second.tables(qt, g)?;
            Some(evolve_cross_domain(
                &composite,
                &upstream,
                &front,
                &downstream,
                qt,
                g,
                single.interface_time,
                &self.time,
            )?)
        } else {
            info!("flow does not reach segment 2 within the horizon");
            None
        };

        let total_length = composite.total_length();
        let downstream_initial = composite.second.initial_saturation();
        let mut saturations: Vec<(f64, Phase, Profile)> = single
            .steps
            .iter()
            .map(|step| {
                let mut profile = step.profile.clone();
                profile.push(total_length, downstream_initial);
                (step.time, Phase::SingleDomain, profile)
            })
            .collect();
        if let Some(cross) = &cross {
            saturations.extend(
                cross
                    .steps
                    .iter()
                    .map(|step| (step.time, Phase::CrossDomain, step.profile.clone())),
            );
        }

        let snapshots = saturations
            .into_par_iter()
            .map(|(time, phase, saturation)| {
                let pressure = reconstruct_pressure(
                    reference_pressure,
                    &saturation,
                    &composite,
                    qt,
                    g,
                    pressure_steps,
                )?;
                Ok(Snapshot {
                    time,
                    phase,
                    saturation,
                    pressure,
                })
            })
            .collect::<BlResult<Vec<_>>>()?;
        info!(snapshots = snapshots.len(), "scenario finished");

        Ok(Solution {
            front,
            single,
            cross,
            snapshots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
fluids:
  wetting: { name: Water, viscosity: 1.0e-3, density: 1000.0 }
  non_wetting: { name: Oil, viscosity: 5.0e-3, density: 800.0 }
segments:
  - rock: { id: 1, length: 6.0, area: 1.0, porosity: 0.3, permeability: 1.0e-14 }
    relperm: { smin1: 0.2, smin2: 0.2, n1: 1.5, n2: 2.5, kr_max1: 0.8, kr_max2: 0.8, ds: 1.0e-3 }
  - rock: { id: 2, length: 6.0, area: 1.0, porosity: 0.3, permeability: 1.0e-14 }
    relperm: { smin1: 0.2, smin2: 0.2, n1: 2.5, n2: 1.5, kr_max1: 0.75, kr_max2: 0.75, ds: 1.0e-3 }
settings:
  injection_rate: 1.0e-5
time: { kind: uniform, start: 8640.0, step: 8640.0, horizon: 86400.0 }
"#;

    #[test]
    fn defaults_fill_settings() {
        let scenario = Scenario::from_yaml_str(SCENARIO).unwrap();
        assert_eq!(scenario.settings.gravity, 9.81);
        assert_eq!(scenario.settings.reference_pressure, 0.0);
        assert_eq!(scenario.settings.pressure_steps, 100);
        assert_eq!(scenario.segments[0].rock.dip, 0.0);
    }

    #[test]
    fn invalid_rock_is_rejected() {
        let text = SCENARIO.replacen("porosity: 0.3", "porosity: -0.3", 1);
        let scenario = Scenario::from_yaml_str(&text).unwrap();
        assert!(matches!(
            scenario.run(),
            Err(BlError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = Scenario::from_yaml_str("fluids: [").unwrap_err();
        assert!(matches!(err, BlError::Config(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn inlet_follows_injector_segment() {
        let text = SCENARIO.replacen(
            "smin1: 0.2, smin2: 0.2, n1: 2.5",
            "smin1: 0.2, smin2: 0.25, n1: 2.5",
            1,
        );
        let solution = Scenario::from_yaml_str(&text).unwrap().run().unwrap();
        assert!(solution.cross.is_some());
        for snapshot in &solution.snapshots {
            assert_eq!(snapshot.saturation.first(), Some((0.0, 0.8)));
            assert_eq!(snapshot.saturation.last(), Some((12.0, 0.2)));
        }
    }

    #[test]
    fn run_orders_snapshots_by_time() {
        let solution = Scenario::from_yaml_str(SCENARIO).unwrap().run().unwrap();
        assert!(solution.cross.is_some());
        let times: Vec<f64> = solution.snapshots.iter().map(|s| s.time).collect();
        assert!(times.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(solution.snapshots[0].phase, Phase::SingleDomain);
        assert_eq!(solution.snapshots.last().unwrap().phase, Phase::CrossDomain);
    }
}
