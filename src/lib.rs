//! Analytical Buckley-Leverett displacement through a composite 1D rock.
//!
//! Two rock segments in series are flooded at a constant total rate. The
//! crate builds Brooks-Corey fractional flow tables, locates the Welge front,
//! evolves the saturation profile before and after the front crosses the
//! segment interface and reconstructs the non-wetting phase pressure. The
//! profiles serve as reference data for numerical two-phase solvers.

pub mod cross_domain;
pub mod error;
pub mod export;
pub mod fractional_flow;
pub mod front;
pub mod interpolation;
pub mod pressure;
pub mod profile;
pub mod properties;
pub mod relperm;
pub mod scenario;
pub mod segment;
pub mod single_domain;
pub mod time_grid;

#[cfg(feature = "python")]
mod python;
#[cfg(test)]
pub(crate) mod samples;

pub use cross_domain::{evolve_cross_domain, CrossDomainEvolution, CrossDomainStep};
pub use error::{BlError, BlResult};
pub use fractional_flow::{build_tables, FlowTables};
pub use front::{locate_front, refine_front, Front};
pub use pressure::reconstruct_pressure;
pub use profile::{Profile, TimedProfile};
pub use properties::{Fluid, Rock};
pub use relperm::{BrooksCorey, CoreyParams};
pub use scenario::{Phase, Scenario, Settings, Snapshot, Solution};
pub use segment::{Composite, Segment};
pub use single_domain::{evolve_single_domain, SingleDomainEvolution};
pub use time_grid::TimeGrid;
