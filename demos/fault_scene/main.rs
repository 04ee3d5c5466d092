//! Builds fault scene parts for a grid and prints the resulting draw list.
//!
//! Usage:
//! ```text
//! cargo run --example fault_scene                               # built-in 4x3x2 grid
//! cargo run --example fault_scene -- model.grdecl               # grid, faults and properties
//! cargo run --example fault_scene -- model.grdecl prefs.toml    # with display preferences
//! ```

use faultscene::color::LinearScalarMapper;
use faultscene::config::Preferences;
use faultscene::fault::{Fault, FaultCollection, FaultDisplaySettings};
use faultscene::grid::{FaceType, GridTopology, MainGrid};
use faultscene::io::{grdecl, NoProgress};
use faultscene::math::{Color3, Point3, Vector3};
use faultscene::results::{CaseResults, PorosityModel, ResultType, WellPipeTable};
use faultscene::scene::{SceneModel, SceneStore};
use faultscene::visualization::{CellResultSlot, FaultCollectionPartManager};
use tracing::info;

fn built_in_case() -> faultscene::Result<(MainGrid, Vec<Fault>, CaseResults)> {
    let grid = MainGrid::regular(4, 3, 2, Point3::origin(), Vector3::new(100.0, 100.0, 10.0))?;

    let mut fault = Fault::new("F1", Vec::new()).with_color(Color3::new(0.8, 0.2, 0.2));
    fault.add_ijk_box(&grid, (1, 1), (0, 2), (0, 1), FaceType::PosI);

    let mut results = CaseResults::new();
    let cells = results.cell_results_mut(PorosityModel::Matrix);
    let index = cells.add_empty_scalar_result(ResultType::Static, "PORO");
    if let Some(steps) = cells.cell_scalar_results_mut(index) {
        #[allow(clippy::cast_precision_loss)]
        steps.push((0..grid.cell_count()).map(|c| 0.1 + c as f64 * 0.01).collect());
    }
    Ok((grid, vec![fault], results))
}

fn file_case(
    path: &str,
    preferences: &Preferences,
) -> faultscene::Result<(MainGrid, Vec<Fault>, CaseResults)> {
    let grid = grdecl::open_grid_file(path, &mut NoProgress)?;
    let faults = grdecl::read_faults(path, &grid, preferences.default_fault_color)?;
    let mut results = CaseResults::new();
    let added = grdecl::read_properties(
        path,
        results.cell_results_mut(PorosityModel::Matrix),
        &mut NoProgress,
    )?;
    info!(properties = ?added.keys().collect::<Vec<_>>(), "imported");
    Ok((grid, faults, results))
}

fn main() -> faultscene::Result<()> {
    // Default: WARN for everything, INFO for faultscene.
    // Override with RUST_LOG env var (e.g. RUST_LOG=faultscene=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("fault_scene=info".parse().unwrap_or_default())
        .add_directive("faultscene=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let preferences = match args.get(1) {
        Some(path) => Preferences::from_toml_file(path)?,
        None => Preferences::default(),
    };
    let (grid, faults, results) = match args.first() {
        Some(path) => file_case(path, &preferences)?,
        None => built_in_case()?,
    };

    let collection = FaultCollection::new(faults).with_display(FaultDisplaySettings {
        show_nncs: true,
        show_fault_label: true,
        ..FaultDisplaySettings::default()
    });

    let mut store = SceneStore::new();
    let mut manager = FaultCollectionPartManager::new(&grid, &collection, &preferences, &mut store)?;

    let mapper = LinearScalarMapper::continuous(
        0.0,
        0.4,
        vec![Color3::new(0.0, 0.0, 1.0), Color3::new(1.0, 0.0, 0.0)],
    );
    let wells = WellPipeTable::new(grid.cell_count());
    let slot = CellResultSlot::new("PORO", PorosityModel::Matrix, &mapper, &results, &wells);
    manager.update_colors(0, &slot, &collection, &mut store)?;

    let mut model = SceneModel::new();
    manager.append_parts_to_model(&collection, &mut model, &mut store)?;
    manager.append_label_parts_to_model(&collection, &mut model, &mut store)?;

    for part in model.draw_order(&store)? {
        println!(
            "{:>5}  {:<32} {} vertices",
            part.priority,
            part.name,
            part.drawable.vertices().len()
        );
    }
    let bounds = model.bounding_box(&store)?;
    info!(parts = model.part_count(), ?bounds, "scene built");
    Ok(())
}
