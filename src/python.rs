// Python bindings, built with the "python" feature

use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::BlError;
use crate::front::locate_front;
use crate::scenario::Scenario;
use crate::segment::Segment;

fn to_py_err(err: BlError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn pick(scenario: &Scenario, segment: usize) -> PyResult<Segment> {
    let composite = scenario.composite().map_err(to_py_err)?;
    match segment {
        1 => Ok(composite.first),
        2 => Ok(composite.second),
        _ => Err(PyValueError::new_err("segment must be 1 or 2")),
    }
}

type Array<'py> = Bound<'py, PyArray1<f64>>;

#[pyfunction]
#[pyo3(name = "saturation_tables")]
fn saturation_tables_py<'py>(
    py: Python<'py>,
    scenario: &str,
    segment: usize,
) -> PyResult<(Array<'py>, Array<'py>, Array<'py>)> {
    let scenario = Scenario::from_yaml_str(scenario).map_err(to_py_err)?;
    let segment = pick(&scenario, segment)?;
    let settings = &scenario.settings;
    let tables = segment
        .tables(settings.injection_rate, settings.gravity)
        .map_err(to_py_err)?;
    Ok((
        tables.saturation.into_pyarray_bound(py),
        tables.fw.into_pyarray_bound(py),
        tables.dfw.into_pyarray_bound(py),
    ))
}

#[pyfunction]
#[pyo3(name = "front_saturation")]
fn front_saturation_py(scenario: &str, segment: usize) -> PyResult<(usize, f64, f64, f64)> {
    let scenario = Scenario::from_yaml_str(scenario).map_err(to_py_err)?;
    let segment = pick(&scenario, segment)?;
    let settings = &scenario.settings;
    let tables = segment
        .tables(settings.injection_rate, settings.gravity)
        .map_err(to_py_err)?;
    let front = locate_front(&tables).map_err(to_py_err)?;
    Ok((front.index, front.saturation, front.derivative, front.intercept))
}

#[pyfunction]
#[pyo3(name = "run_scenario")]
#[allow(clippy::type_complexity)]
fn run_scenario_py<'py>(
    py: Python<'py>,
    scenario: &str,
) -> PyResult<Vec<(f64, Array<'py>, Array<'py>, Array<'py>, Array<'py>)>> {
    let scenario = Scenario::from_yaml_str(scenario).map_err(to_py_err)?;
    let solution = py.allow_threads(|| scenario.run()).map_err(to_py_err)?;
    Ok(solution
        .snapshots
        .into_iter()
        .map(|snapshot| {
            (
                snapshot.time,
                snapshot.saturation.x.into_pyarray_bound(py),
                snapshot.saturation.value.into_pyarray_bound(py),
                snapshot.pressure.x.into_pyarray_bound(py),
                snapshot.pressure.value.into_pyarray_bound(py),
            )
        })
        .collect())
}

#[pymodule]
#[pyo3(name = "_core")]
fn bl_composite(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(saturation_tables_py, m)?)?;
    m.add_function(wrap_pyfunction!(front_saturation_py, m)?)?;
    m.add_function(wrap_pyfunction!(run_scenario_py, m)?)?;
    Ok(())
}
