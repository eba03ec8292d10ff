//! Plain-text output of displacement fields and trajectories.
//!
//! Fields are written as two files, one per component. Each line holds one
//! sampled row (every `step` pixels) and each value one sampled column,
//! separated by `", "`. Lost and unwritten cells are written as `0`.
//!
//! Trajectories are written one per line as `x, y` pairs in temporal order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{FlowTrackError, Result};
use crate::field::DisplacementField;
use crate::point::Trajectory;

/// Suffix of the horizontal-component file.
pub const HORIZONTAL_SUFFIX: &str = "_h";

/// Suffix of the vertical-component file.
pub const VERTICAL_SUFFIX: &str = "_f";

/// Write the sampled horizontal and vertical components of `field`.
pub fn write_flow_components<H: Write, V: Write>(
    field: &DisplacementField,
    step: usize,
    horizontal: &mut H,
    vertical: &mut V,
) -> Result<()> {
    if step == 0 {
        return Err(FlowTrackError::InvalidStep);
    }

    for row in (0..field.height()).step_by(step) {
        for (i, col) in (0..field.width()).step_by(step).enumerate() {
            if i != 0 {
                write!(horizontal, ", ")?;
                write!(vertical, ", ")?;
            }
            let (dx, dy) = field.components(row, col);
            write!(horizontal, "{}", dx)?;
            write!(vertical, "{}", dy)?;
        }
        writeln!(horizontal)?;
        writeln!(vertical)?;
    }
    Ok(())
}

/// Paths of the two component files for `prefix`.
pub fn flow_paths(prefix: &Path) -> (PathBuf, PathBuf) {
    let with_suffix = |suffix: &str| {
        let mut name = prefix.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };
    (with_suffix(HORIZONTAL_SUFFIX), with_suffix(VERTICAL_SUFFIX))
}

/// Write `field` to `<prefix>_h` and `<prefix>_f`; returns both paths.
pub fn write_flow(
    field: &DisplacementField,
    prefix: &Path,
    step: usize,
) -> Result<(PathBuf, PathBuf)> {
    let (h_path, v_path) = flow_paths(prefix);
    let mut h_file = BufWriter::new(File::create(&h_path)?);
    let mut v_file = BufWriter::new(File::create(&v_path)?);
    write_flow_components(field, step, &mut h_file, &mut v_file)?;
    h_file.flush()?;
    v_file.flush()?;
    Ok((h_path, v_path))
}

/// Write one line per trajectory.
pub fn write_trajectories<W: Write>(trajectories: &[Trajectory], out: &mut W) -> Result<()> {
    for trajectory in trajectories {
        for (j, p) in trajectory.points.iter().enumerate() {
            if j != 0 {
                write!(out, ", ")?;
            }
            write!(out, "{}, {}", p.x, p.y)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_trajectories_file(trajectories: &[Trajectory], path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_trajectories(trajectories, &mut file)?;
    file.flush()?;
    Ok(())
}
