use std::path::PathBuf;

use approx::assert_relative_eq;
use bl_composite::{export, locate_front, BlError, Phase, Profile, Scenario, TimeGrid};
use tempfile::tempdir;

const DAY: f64 = 86400.0;

fn demo() -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/composite.yaml");
    Scenario::from_path(path).unwrap()
}

#[test]
fn front_and_arrival_of_reference_case() {
    let scenario = demo();
    let composite = scenario.composite().unwrap();
    let tables = composite.first.tables(1e-5, 9.81).unwrap();
    let front = locate_front(&tables).unwrap();
    assert!(front.saturation > 0.2 && front.saturation < 0.8);

    let solution = scenario.run().unwrap();
    let arrival = solution.interface_time();
    assert!(arrival > 0.0 && arrival.is_finite());
    assert_eq!(solution.front, front);
}

#[test]
fn short_horizon_stays_in_first_segment() {
    let mut scenario = demo();
    scenario.time = TimeGrid::Uniform {
        start: 0.1 * DAY,
        step: 0.1 * DAY,
        horizon: 0.5 * DAY,
    };
    let solution = scenario.run().unwrap();
    assert!(solution.interface_time() > 0.5 * DAY);
    assert!(solution.cross.is_none());
    assert_eq!(solution.snapshots.len(), 5);
    assert!(solution
        .snapshots
        .iter()
        .all(|s| s.phase == Phase::SingleDomain));
    assert_relative_eq!(
        solution.snapshots.last().unwrap().time,
        0.5 * DAY,
        max_relative = 1e-12
    );
}

#[test]
fn snapshots_are_bracketed_by_boundary_saturations() {
    let scenario = demo();
    let solution = scenario.run().unwrap();
    let inlet = 1.0 - scenario.segments[0].relperm.smin2;
    let initial = scenario.segments[1].relperm.smin1;
    for snapshot in &solution.snapshots {
        assert_eq!(snapshot.saturation.first(), Some((0.0, inlet)));
        assert_eq!(snapshot.saturation.last(), Some((12.0, initial)));
        assert_eq!(snapshot.pressure.last(), Some((12.0, 0.0)));
        assert!(snapshot.pressure.value.iter().all(|p| p.is_finite()));
    }
}

/// Trapezoidal wetting volume above the initial saturation of each segment.
fn stored_volume(scenario: &Scenario, profile: &Profile) -> f64 {
    let interface = scenario.segments[0].rock.length;
    profile
        .iter()
        .zip(profile.iter().skip(1))
        .map(|((x0, s0), (x1, s1))| {
            let segment = if 0.5 * (x0 + x1) < interface {
                &scenario.segments[0]
            } else {
                &scenario.segments[1]
            };
            let pore_area = segment.rock.area * segment.rock.porosity;
            pore_area * (x1 - x0) * (0.5 * (s0 + s1) - segment.relperm.smin1)
        })
        .sum()
}

#[test]
fn profiles_hold_the_injected_volume() {
    let scenario = demo();
    let solution = scenario.run().unwrap();
    let rate = scenario.settings.injection_rate;
    for snapshot in &solution.snapshots {
        assert_relative_eq!(
            stored_volume(&scenario, &snapshot.saturation),
            rate * snapshot.time,
            max_relative = 1e-2
        );
    }
    let cross = solution.cross.expect("front reaches segment 2 within a day");
    assert_eq!(cross.steps[0].time, solution.single.interface_time);
    for step in &cross.steps {
        assert!(step.front_position >= 6.0 && step.front_position <= 12.0);
    }
}

#[test]
fn horizon_past_breakthrough_keeps_earlier_snapshots() {
    let mut scenario = demo();
    scenario.time = TimeGrid::Uniform {
        start: 0.1 * DAY,
        step: 0.1 * DAY,
        horizon: 1.5 * DAY,
    };
    let solution = scenario.run().unwrap();
    let cross = solution.cross.as_ref().unwrap();
    let breakthrough = cross.breakthrough_time.unwrap();
    assert_relative_eq!(breakthrough, 1.5 * DAY, max_relative = 1e-9);
    assert_eq!(solution.snapshots.len(), 5 + 10);
    assert_eq!(solution.snapshots.last().unwrap().phase, Phase::CrossDomain);
    for snapshot in &solution.snapshots {
        assert!(snapshot.time < breakthrough);
        assert_eq!(snapshot.saturation.last(), Some((12.0, 0.2)));
    }
}

#[test]
fn coarse_saturation_step_is_a_configuration_error() {
    let mut scenario = demo();
    scenario.segments[0].relperm.ds = 0.25;
    let err = scenario.run().unwrap_err();
    assert!(matches!(err, BlError::FrontNotFound { segment: 1 }));
}

#[test]
fn writes_one_file_pair_per_snapshot() {
    let scenario = demo();
    let solution = scenario.run().unwrap();
    let dir = tempdir().unwrap();
    let written = export::write_solution(dir.path(), "Water", &solution).unwrap();
    assert_eq!(written.len(), 2 * solution.snapshots.len());
    assert!(dir
        .path()
        .join("water.alpha/water.alpha-1.00-days.csv")
        .exists());
    assert!(dir.path().join("p/p-0.10-days.csv").exists());
}
