use std::path::Path;

use tracing::{debug, info};

use super::{parse_keywords, read_file};
use crate::error::GrdeclError;
use crate::fault::Fault;
use crate::grid::{FaceType, GridTopology};
use crate::math::Color3;

fn bad_record(token: &str) -> GrdeclError {
    GrdeclError::BadValue {
        keyword: "FAULTS".to_owned(),
        token: token.to_owned(),
    }
}

/// Converts a one-based index token to zero-based.
fn parse_index(token: &str) -> Result<usize, GrdeclError> {
    match token.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index - 1),
        _ => Err(bad_record(token)),
    }
}

/// Builds faults from every `FAULTS` keyword in `text`.
///
/// Each record is `name i1 i2 j1 j2 k1 k2 face` with one-based inclusive
/// ranges. Records sharing a name add to the same fault, and faults keep
/// the order of their first record. New faults get `default_color`.
///
/// # Errors
///
/// Returns [`GrdeclError::BadValue`] for a short record, an invalid index,
/// or an unknown face name.
pub fn parse_faults(
    text: &str,
    grid: &impl GridTopology,
    default_color: Color3,
) -> Result<Vec<Fault>, GrdeclError> {
    let mut faults: Vec<Fault> = Vec::new();
    for block in parse_keywords(text).iter().filter(|b| b.name == "FAULTS") {
        for record in block.records() {
            let [name, i1, i2, j1, j2, k1, k2, face, ..] = record else {
                return Err(bad_record(&record.join(" ")));
            };
            let face = FaceType::from_eclipse_name(face).ok_or_else(|| bad_record(face))?;
            let i = (parse_index(i1)?, parse_index(i2)?);
            let j = (parse_index(j1)?, parse_index(j2)?);
            let k = (parse_index(k1)?, parse_index(k2)?);

            let index = match faults.iter().position(|f| &f.name == name) {
                Some(index) => index,
                None => {
                    faults.push(Fault::new(name.clone(), Vec::new()).with_color(default_color));
                    faults.len() - 1
                }
            };
            let added = faults[index].add_ijk_box(grid, i, j, k, face);
            debug!(fault = %name, added, "fault record");
        }
    }
    Ok(faults)
}

/// Reads the faults of the GRDECL file at `path`, colored `default_color`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a record is malformed.
pub fn read_faults(
    path: impl AsRef<Path>,
    grid: &impl GridTopology,
    default_color: Color3,
) -> Result<Vec<Fault>, GrdeclError> {
    let path = path.as_ref();
    let faults = parse_faults(&read_file(path)?, grid, default_color)?;
    info!(path = %path.display(), count = faults.len(), "read faults");
    Ok(faults)
}
