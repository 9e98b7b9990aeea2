// Welge tangent construction for the shock saturation

use peroxide::fuga::{BisectionMethod, RootFinder, RootFindingProblem};
use serde::Serialize;
use tracing::debug;

use crate::error::{BlError, BlResult};
use crate::fractional_flow::FlowTables;
use crate::segment::Segment;

/// Shock front of one segment, constant in time within the segment.
///
/// # Fields
/// * index: position of the front in the saturation table
/// * saturation: front saturation $S_{wf}$
/// * derivative: slope of Welge's tangent, $f_w(S_{wf}) / (S_{wf} - S_0)$
/// * intercept: intercept of the tangent line
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Front {
    pub index: usize,
    pub saturation: f64,
    pub derivative: f64,
    pub intercept: f64,
}

/// Front saturation using Welge's method
///
/// Scans the table from low to high saturation and accepts the first interior
/// index where the secant from the first sample lies between `dfw` at the
/// neighbouring samples and is at least the mean slope of the table.
pub fn locate_front(tables: &FlowTables) -> BlResult<Front> {
    let sat = &tables.saturation;
    let fw = &tables.fw;
    let dfw = &tables.dfw;
    let n = sat.len();
    if n < 3 {
        return Err(BlError::FrontNotFound {
            segment: tables.segment,
        });
    }
    let mean_slope = 1.0 / (sat[n - 1] - sat[0]);

    for i in 1..n - 1 {
        let secant = fw[i] / (sat[i] - sat[0]);
        if secant < dfw[i - 1] && secant > dfw[i + 1] && secant >= mean_slope {
            let front = Front {
                index: i,
                saturation: sat[i],
                derivative: secant,
                intercept: fw[i] - secant * sat[i],
            };
            debug!(
                segment = tables.segment,
                index = i,
                saturation = front.saturation,
                "located Welge front"
            );
            return Ok(front);
        }
    }
    Err(BlError::FrontNotFound {
        segment: tables.segment,
    })
}

struct TangentCondition<'a> {
    segment: &'a Segment,
    flow_total: f64,
    gravity: f64,
    origin: f64,
    bracket: (f64, f64),
}

impl TangentCondition<'_> {
    fn residual(&self, sat: f64) -> BlResult<f64> {
        let fw = self.segment.fw(sat, self.flow_total, self.gravity)?;
        let dfw = self.segment.dfw(sat, self.flow_total, self.gravity)?;
        Ok(fw / (sat - self.origin) - dfw)
    }
}

impl RootFindingProblem<1, 1, (f64, f64)> for TangentCondition<'_> {
    fn function(&self, x: [f64; 1]) -> anyhow::Result<[f64; 1]> {
        Ok([self.residual(x[0])?])
    }

    fn initial_guess(&self) -> (f64, f64) {
        self.bracket
    }
}

/// Solves the tangent condition $f_w(S)/(S - S_0) = f'_w(S)$ between the table
/// neighbours of `front`, giving the tangent point to round-off.
pub fn refine_front(
    tables: &FlowTables,
    front: &Front,
    segment: &Segment,
    flow_total: f64,
    gravity: f64,
) -> BlResult<Front> {
    let sat = &tables.saturation;
    if front.index == 0 || front.index + 1 >= sat.len() {
        return Err(BlError::Refinement(format!(
            "front index {} is not interior to the {} samples of segment {}",
            front.index,
            sat.len(),
            tables.segment
        )));
    }
    let problem = TangentCondition {
        segment,
        flow_total,
        gravity,
        origin: sat[0],
        bracket: (sat[front.index - 1], sat[front.index + 1]),
    };
    let low = problem.residual(problem.bracket.0)?;
    let high = problem.residual(problem.bracket.1)?;
    if low * high > 0.0 {
        return Err(BlError::Refinement(format!(
            "tangent condition not bracketed in segment {}",
            tables.segment
        )));
    }
    let finder = BisectionMethod {
        max_iter: 100,
        tol: 1e-10,
    };
    let root = finder
        .find(&problem)
        .map_err(|e| BlError::Refinement(e.to_string()))?[0];
    let derivative = segment.dfw(root, flow_total, gravity)?;
    let fw = segment.fw(root, flow_total, gravity)?;
    Ok(Front {
        index: front.index,
        saturation: root,
        derivative,
        intercept: fw - derivative * root,
    })
}
