// Rock segments paired with their relative permeability curves

use crate::error::BlResult;
use crate::fractional_flow::{build_tables, fractional_flow, fractional_flow_derivative, FlowTables};
use crate::properties::Rock;
use crate::relperm::BrooksCorey;

/// One rock segment together with the Brooks-Corey curves of the displacing pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub rock: Rock,
    pub kr: BrooksCorey,
}

impl Segment {
    pub fn new(rock: Rock, kr: BrooksCorey) -> Self {
        Segment { rock, kr }
    }

    pub fn fw(&self, sat: f64, flow_total: f64, gravity: f64) -> BlResult<f64> {
        fractional_flow(sat, &self.kr, &self.rock, flow_total, gravity)
    }

    pub fn dfw(&self, sat: f64, flow_total: f64, gravity: f64) -> BlResult<f64> {
        fractional_flow_derivative(sat, &self.kr, &self.rock, flow_total, gravity)
    }

    pub fn tables(&self, flow_total: f64, gravity: f64) -> BlResult<FlowTables> {
        build_tables(&self.rock, &self.kr, flow_total, gravity)
    }

    /// Characteristic speed factor $q_t / (A \phi)$.
    pub fn velocity(&self, flow_total: f64) -> f64 {
        flow_total / self.rock.pore_area()
    }

    /// Time for the characteristic carrying `dfw` to cross the whole segment.
    pub fn crossing_time(&self, dfw: f64, flow_total: f64) -> f64 {
        self.rock.pore_volume() / (flow_total * dfw)
    }

    /// Saturation injected at the inlet, $1 - S_{min,2}$.
    pub fn inlet_saturation(&self) -> f64 {
        1.0 - self.kr.params.smin2
    }

    /// Saturation ahead of the front, $S_{min,1}$.
    pub fn initial_saturation(&self) -> f64 {
        self.kr.params.smin1
    }
}

/// Two segments in series: segment 1 holds the injector, segment 2 the producer.
#[derive(Clone, Debug, PartialEq)]
pub struct Composite {
    pub first: Segment,
    pub second: Segment,
}

impl Composite {
    pub fn new(first: Segment, second: Segment) -> Self {
        Composite { first, second }
    }

    /// Position of the interface between the segments.
    pub fn interface(&self) -> f64 {
        self.first.rock.length
    }

    pub fn total_length(&self) -> f64 {
        self.first.rock.length + self.second.rock.length
    }

    /// Segment holding position `x`; the interface itself belongs to segment 2.
    pub fn segment_at(&self, x: f64) -> &Segment {
        if x < self.interface() {
            &self.first
        } else {
            &self.second
        }
    }
}
