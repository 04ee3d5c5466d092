use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, warn};

use super::{find_keyword, parse_keywords, read_file, KeywordBlock};
use crate::error::{GrdeclError, Result};
use crate::grid::MainGrid;
use crate::io::ProgressObserver;
use crate::results::{CellResults, ResultType};

const KNOWN_PROPERTY_KEYWORDS: [&str; 40] = [
    "AQUIFERA", "ACTNUM", "EQLNUM", "FIPNUM", "KRG", "KRGR", "KRO", "KRORG", "KRORW", "KRW",
    "KRWR", "MINPVV", "MULTPV", "MULTX", "MULTX-", "MULTY", "MULTY-", "MULTZ", "NTG", "PCG",
    "PCW", "PERMX", "PERMY", "PERMZ", "PORO", "PVTNUM", "SATNUM", "SGCR", "SGL", "SGLPC", "SGU",
    "SGWCR", "SWATINIT", "SWCR", "SWGCR", "SWL", "SWLPC", "TRANX", "TRANY", "TRANZ",
];

/// Keywords [`read_properties`] imports as cell results.
#[must_use]
pub fn known_property_keywords() -> &'static [&'static str] {
    &KNOWN_PROPERTY_KEYWORDS
}

fn required<'a>(
    blocks: &'a [KeywordBlock],
    name: &str,
) -> std::result::Result<&'a KeywordBlock, GrdeclError> {
    find_keyword(blocks, name).ok_or_else(|| GrdeclError::MissingKeyword(name.to_owned()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_dimension(value: Option<&f64>) -> std::result::Result<usize, GrdeclError> {
    match value {
        Some(&v) if v >= 1.0 && (v - v.round()).abs() < f64::EPSILON => Ok(v as usize),
        _ => Err(GrdeclError::BadValue {
            keyword: "SPECGRID".to_owned(),
            token: value.map(ToString::to_string).unwrap_or_default(),
        }),
    }
}

/// Reads a corner-point grid from `SPECGRID`, `COORD` and `ZCORN`, with
/// optional `ACTNUM` and `MAPAXES`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required keyword is
/// missing or malformed, or the keyword sizes do not match `SPECGRID`.
pub fn open_grid_file(
    path: impl AsRef<Path>,
    progress: &mut dyn ProgressObserver,
) -> Result<MainGrid> {
    let path = path.as_ref();
    progress.start(7, "Read grid from Eclipse input file");

    let blocks = parse_keywords(&read_file(path)?);
    progress.set_progress(1);

    // NX NY NZ, then optional NUMRES and the COORD type flag.
    let specgrid = required(&blocks, "SPECGRID")?.values_prefix(3)?;
    let ni = to_dimension(specgrid.first())?;
    let nj = to_dimension(specgrid.get(1))?;
    let nk = to_dimension(specgrid.get(2))?;
    progress.set_progress(2);

    let coord = required(&blocks, "COORD")?.values()?;
    progress.set_progress(3);

    let zcorn = required(&blocks, "ZCORN")?.values()?;
    progress.set_progress(4);

    #[allow(clippy::cast_possible_truncation)]
    let actnum: Option<Vec<i32>> = find_keyword(&blocks, "ACTNUM")
        .map(KeywordBlock::values)
        .transpose()?
        .map(|values| values.into_iter().map(|v| v as i32).collect());
    progress.set_progress(5);

    let map_axes = find_keyword(&blocks, "MAPAXES")
        .map(KeywordBlock::values)
        .transpose()?;
    progress.set_progress(6);

    let mut grid = MainGrid::from_corner_point(ni, nj, nk, &coord, &zcorn, actnum.as_deref())?;
    if let Some(axes) = map_axes {
        match <[f64; 6]>::try_from(axes.as_slice()) {
            Ok(axes) => grid.set_map_axes(axes),
            Err(_) => warn!(count = axes.len(), "MAPAXES needs 6 values, ignored"),
        }
    }
    progress.set_progress(7);

    info!(path = %path.display(), ni, nj, nk, "read grid");
    Ok(grid)
}

/// Imports every known property keyword in the file as an input result.
///
/// Result names are made unique against existing results. Returns the new
/// result names mapped to the keywords they were read from. Keywords with
/// malformed data are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_properties(
    path: impl AsRef<Path>,
    results: &mut CellResults,
    progress: &mut dyn ProgressObserver,
) -> std::result::Result<BTreeMap<String, String>, GrdeclError> {
    let path = path.as_ref();
    let blocks = parse_keywords(&read_file(path)?);
    progress.start(blocks.len(), "Reading Eclipse input properties");

    let mut new_results = BTreeMap::new();
    for (step, block) in blocks.iter().enumerate() {
        if KNOWN_PROPERTY_KEYWORDS.contains(&block.name.as_str()) {
            match block.values() {
                Ok(values) => {
                    let name = results.make_result_name_unique(&block.name);
                    store_input_result(results, &name, values);
                    new_results.insert(name, block.name.clone());
                }
                Err(err) => warn!(%err, "skipping property"),
            }
        }
        progress.set_progress(step + 1);
    }

    info!(path = %path.display(), count = new_results.len(), "read properties");
    Ok(new_results)
}

/// Reads `keyword` from the file into the input result `result_name`,
/// replacing its data if it exists.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the keyword is missing, or
/// its data is not numeric.
pub fn read_property(
    path: impl AsRef<Path>,
    results: &mut CellResults,
    keyword: &str,
    result_name: &str,
) -> std::result::Result<(), GrdeclError> {
    let blocks = parse_keywords(&read_file(path.as_ref())?);
    let values = required(&blocks, keyword)?.values()?;
    store_input_result(results, result_name, values);
    Ok(())
}

fn store_input_result(results: &mut CellResults, name: &str, values: Vec<f64>) {
    let index = results.add_empty_scalar_result(ResultType::Input, name);
    if let Some(steps) = results.cell_scalar_results_mut(index) {
        debug!(name, count = values.len(), "stored input result");
        *steps = vec![values];
    }
}
