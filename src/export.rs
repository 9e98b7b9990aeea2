// Space separated files for post-processing and solver comparison

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::BlResult;
use crate::fractional_flow::FlowTables;
use crate::profile::Profile;
use crate::scenario::Solution;
use crate::segment::Segment;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Time label used in file names, in days with two decimals.
pub fn day_label(time: f64) -> String {
    format!("{:.2}", time / SECONDS_PER_DAY)
}

/// Writes `x value` lines without header.
pub fn write_profile(path: &Path, profile: &Profile) -> BlResult<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for (x, value) in profile.iter() {
        writeln!(out, "{} {}", x, value)?;
    }
    out.flush()?;
    Ok(())
}

/// Writes one saturation and one pressure file per snapshot:
/// `<phase>.alpha/<phase>.alpha-<days>-days.csv` and `p/p-<days>-days.csv`.
pub fn write_solution(dir: &Path, wetting_name: &str, solution: &Solution) -> BlResult<Vec<PathBuf>> {
    let field = format!("{}.alpha", wetting_name.to_lowercase());
    let saturation_dir = dir.join(&field);
    let pressure_dir = dir.join("p");
    fs::create_dir_all(&saturation_dir)?;
    fs::create_dir_all(&pressure_dir)?;

    let mut written = Vec::with_capacity(2 * solution.snapshots.len());
    for snapshot in &solution.snapshots {
        let label = day_label(snapshot.time);
        let saturation_path = saturation_dir.join(format!("{}-{}-days.csv", field, label));
        write_profile(&saturation_path, &snapshot.saturation)?;
        let pressure_path = pressure_dir.join(format!("p-{}-days.csv", label));
        write_profile(&pressure_path, &snapshot.pressure)?;
        written.push(saturation_path);
        written.push(pressure_path);
    }
    info!(files = written.len(), dir = %dir.display(), "wrote profiles");
    Ok(written)
}

/// Writes `S kr1 kr2 fw dfw` for every tabulated saturation of a segment.
pub fn write_curves(dir: &Path, segment: &Segment, tables: &FlowTables) -> BlResult<PathBuf> {
    let curves_dir = dir.join("curves");
    fs::create_dir_all(&curves_dir)?;
    let path = curves_dir.join(format!("segment-{}.csv", segment.rock.id));
    let mut out = BufWriter::new(fs::File::create(&path)?);
    for k in 0..tables.len() {
        let sat = tables.saturation[k];
        writeln!(
            out,
            "{} {} {} {} {}",
            sat,
            segment.kr.kr1(sat)?,
            segment.kr.kr2(sat)?,
            tables.fw[k],
            tables.dfw[k]
        )?;
    }
    out.flush()?;
    Ok(path)
}
