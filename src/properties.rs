// Rock and fluid records

use serde::{Deserialize, Serialize};

use crate::error::{BlError, BlResult};

/// One homogeneous segment of the composite 1D rock.
///
/// # Fields
/// * id: segment number in the composite domain, 1 is next to the injector
/// * length: segment length in m
/// * area: cross-sectional area open to flow in m^2
/// * porosity: effective porosity
/// * permeability: absolute permeability in m^2
/// * dip: angle between the segment and the horizontal axis in radians
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    pub id: u32,
    pub length: f64,
    pub area: f64,
    pub porosity: f64,
    pub permeability: f64,
    #[serde(default)]
    pub dip: f64,
}

impl Rock {
    pub fn new(
        id: u32,
        length: f64,
        area: f64,
        porosity: f64,
        permeability: f64,
        dip: f64,
    ) -> BlResult<Self> {
        let rock = Rock {
            id,
            length,
            area,
            porosity,
            permeability,
            dip,
        };
        rock.validate()?;
        Ok(rock)
    }

    /// Checks the physical bounds of the record. Deserialized rocks go through here too.
    pub fn validate(&self) -> BlResult<()> {
        positive("rock length", self.length)?;
        positive("rock area", self.area)?;
        positive("rock permeability", self.permeability)?;
        if !(self.porosity > 0.0 && self.porosity <= 1.0) {
            return Err(BlError::InvalidParameter {
                what: "rock porosity",
                value: self.porosity,
            });
        }
        if !self.dip.is_finite() {
            return Err(BlError::InvalidParameter {
                what: "rock dip",
                value: self.dip,
            });
        }
        Ok(())
    }

    /// Pore volume per unit length, $A \phi$.
    pub fn pore_area(&self) -> f64 {
        self.area * self.porosity
    }

    /// Pore volume of the whole segment.
    pub fn pore_volume(&self) -> f64 {
        self.pore_area() * self.length
    }
}

/// Incompressible Newtonian fluid.
///
/// # Fields
/// * name: label used in logs and exported file names
/// * viscosity: dynamic viscosity in Pa.s
/// * density: density in kg/m^3
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fluid {
    pub name: String,
    pub viscosity: f64,
    pub density: f64,
}

impl Fluid {
    pub fn new(name: impl Into<String>, viscosity: f64, density: f64) -> BlResult<Self> {
        let fluid = Fluid {
            name: name.into(),
            viscosity,
            density,
        };
        fluid.validate()?;
        Ok(fluid)
    }

    pub fn validate(&self) -> BlResult<()> {
        positive("fluid viscosity", self.viscosity)?;
        if !(self.density >= 0.0 && self.density.is_finite()) {
            return Err(BlError::InvalidParameter {
                what: "fluid density",
                value: self.density,
            });
        }
        Ok(())
    }
}

pub(crate) fn positive(what: &'static str, value: f64) -> BlResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(BlError::InvalidParameter { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rock_rejects_bad_porosity() {
        assert!(Rock::new(1, 6.0, 1.0, 0.3, 1e-14, 0.0).is_ok());
        let err = Rock::new(1, 6.0, 1.0, 1.3, 1e-14, 0.0).unwrap_err();
        assert!(matches!(
            err,
            BlError::InvalidParameter {
                what: "rock porosity",
                ..
            }
        ));
    }

    #[test]
    fn rock_pore_volume() {
        let rock = Rock::new(1, 6.0, 2.0, 0.25, 1e-14, 0.0).unwrap();
        assert_eq!(rock.pore_area(), 0.5);
        assert_eq!(rock.pore_volume(), 3.0);
    }

    #[test]
    fn fluid_rejects_zero_viscosity() {
        assert!(Fluid::new("Water", 1e-3, 1e3).is_ok());
        assert!(Fluid::new("Water", 0.0, 1e3).is_err());
        assert!(Fluid::new("Oil", 5e-3, f64::NAN).is_err());
    }
}
