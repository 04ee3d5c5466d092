use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::GrdeclError;
use crate::grid::GridTopology;
use crate::io::ProgressObserver;
use crate::results::{is_undefined, CellResults, UNDEFINED_VALUE};

const VALUES_PER_LINE: usize = 5;

fn time_step_values<'a>(
    results: &'a CellResults,
    result_name: &str,
    time_step: usize,
) -> Result<&'a [f64], GrdeclError> {
    let result = results
        .find_scalar_result_index(result_name)
        .and_then(|index| results.result(index))
        .ok_or_else(|| GrdeclError::UnknownResult(result_name.to_owned()))?;
    result
        .values
        .get(time_step)
        .map(Vec::as_slice)
        .ok_or_else(|| GrdeclError::TimeStepOutOfRange {
            result: result_name.to_owned(),
            time_step,
        })
}

fn write_file(
    path: &Path,
    keyword: &str,
    data: &[f64],
    progress: &mut dyn ProgressObserver,
) -> Result<(), GrdeclError> {
    let write_error = |source| GrdeclError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut out = BufWriter::new(File::create(path).map_err(write_error)?);
    write_data_to_text_file(&mut out, keyword, data, progress).map_err(write_error)?;
    out.flush().map_err(write_error)?;
    info!(path = %path.display(), keyword, count = data.len(), "wrote keyword");
    Ok(())
}

/// Writes `result_name` at `time_step` as `keyword`, in cell index order.
///
/// # Errors
///
/// Returns an error if the result or time step does not exist, or the file
/// cannot be written.
pub fn write_property_to_text_file(
    path: impl AsRef<Path>,
    results: &CellResults,
    time_step: usize,
    result_name: &str,
    keyword: &str,
    progress: &mut dyn ProgressObserver,
) -> Result<(), GrdeclError> {
    let data = time_step_values(results, result_name, time_step)?;
    write_file(path.as_ref(), keyword, data, progress)
}

/// Writes `result_name` at `time_step` as `keyword`, visiting every cell of
/// `grid` with I fastest and K slowest.
///
/// Undefined values, and cells beyond the result data, are written as
/// `undefined_value`.
///
/// # Errors
///
/// Returns an error if the result or time step does not exist, or the file
/// cannot be written.
#[allow(clippy::too_many_arguments)]
pub fn write_binary_result_to_text_file(
    path: impl AsRef<Path>,
    grid: &impl GridTopology,
    results: &CellResults,
    time_step: usize,
    result_name: &str,
    keyword: &str,
    undefined_value: f64,
    progress: &mut dyn ProgressObserver,
) -> Result<(), GrdeclError> {
    let values = time_step_values(results, result_name, time_step)?;

    let mut data = Vec::with_capacity(grid.cell_count());
    for k in 0..grid.cell_count_k() {
        for j in 0..grid.cell_count_j() {
            for i in 0..grid.cell_count_i() {
                let value = grid
                    .cell_index(i, j, k)
                    .and_then(|cell| values.get(cell).copied())
                    .unwrap_or(UNDEFINED_VALUE);
                data.push(if is_undefined(value) { undefined_value } else { value });
            }
        }
    }
    write_file(path.as_ref(), keyword, &data, progress)
}

/// Writes one keyword block: a comment header, the keyword, the values
/// right-aligned in 16 columns with five per line, and the terminator.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_data_to_text_file(
    out: &mut impl Write,
    keyword: &str,
    data: &[f64],
    progress: &mut dyn ProgressObserver,
) -> std::io::Result<()> {
    progress.start(data.len(), "Writing data to file");
    let report_every = (data.len() / 20).max(1);

    write!(
        out,
        "\n-- Exported from {}\n{keyword}\n",
        env!("CARGO_PKG_NAME")
    )?;
    for (index, value) in data.iter().enumerate() {
        write!(out, "{value:>16}")?;
        let written = index + 1;
        if written % VALUES_PER_LINE == 0 {
            writeln!(out)?;
        }
        if written % report_every == 0 {
            progress.set_progress(written);
        }
    }
    write!(out, "\n/\n")
}
