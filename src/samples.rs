// Water/oil displacement through two 6 m segments, shared by the unit tests

use crate::properties::{Fluid, Rock};
use crate::relperm::{BrooksCorey, CoreyParams};
use crate::segment::{Composite, Segment};

pub const FLOW: f64 = 1e-5;
pub const GRAVITY: f64 = 9.81;
pub const DAY: f64 = 86400.0;

pub fn water() -> Fluid {
    Fluid::new("Water", 1e-3, 1e3).unwrap()
}

pub fn oil() -> Fluid {
    Fluid::new("Oil", 5e-3, 800.0).unwrap()
}

pub fn rock(id: u32) -> Rock {
    Rock::new(id, 6.0, 1.0, 0.3, 1e-14, 0.0).unwrap()
}

pub fn dipping_rock() -> Rock {
    Rock::new(1, 6.0, 1.0, 0.3, 1e-14, 0.3).unwrap()
}

pub fn water_oil() -> BrooksCorey {
    BrooksCorey::new(
        water(),
        oil(),
        CoreyParams {
            smin1: 0.2,
            smin2: 0.2,
            n1: 1.5,
            n2: 2.5,
            kr_max1: 0.8,
            kr_max2: 0.8,
            ds: 1e-3,
        },
    )
    .unwrap()
}

pub fn water_oil_second() -> BrooksCorey {
    BrooksCorey::new(
        water(),
        oil(),
        CoreyParams {
            smin1: 0.2,
            smin2: 0.2,
            n1: 2.5,
            n2: 1.5,
            kr_max1: 0.75,
            kr_max2: 0.75,
            ds: 1e-3,
        },
    )
    .unwrap()
}

pub fn composite() -> Composite {
    Composite::new(
        Segment::new(rock(1), water_oil()),
        Segment::new(rock(2), water_oil_second()),
    )
}
