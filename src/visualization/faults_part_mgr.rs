use tracing::debug;

use crate::config::Preferences;
use crate::error::Result;
use crate::fault::FaultCollection;
use crate::grid::{CellVisibility, GridTopology};
use crate::scene::{SceneModel, SceneStore, TransformId};

use super::{CellResultSlot, FaultPartManager};

/// Composes the parts of every fault in a collection into a scene model.
///
/// Holds one [`FaultPartManager`] per fault, in collection order. The fault
/// set is fixed; when faults are added or removed the manager must be
/// rebuilt.
#[derive(Debug)]
pub struct FaultCollectionPartManager<'g, G: GridTopology> {
    fault_parts: Vec<FaultPartManager<'g, G>>,
    transform: Option<TransformId>,
    force_visibility: bool,
}

impl<'g, G: GridTopology> FaultCollectionPartManager<'g, G> {
    /// Creates a manager for every fault of `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated part cannot be found in `store`.
    pub fn new(
        grid: &'g G,
        collection: &FaultCollection,
        preferences: &Preferences,
        store: &mut SceneStore,
    ) -> Result<Self> {
        let fault_parts = (0..collection.faults.len())
            .map(|idx| FaultPartManager::new(grid, collection, idx, preferences.clone(), store))
            .collect::<Result<Vec<_>>>()?;
        debug!(faults = fault_parts.len(), "created fault collection parts");
        Ok(Self {
            fault_parts,
            transform: None,
            force_visibility: false,
        })
    }

    #[must_use]
    pub fn fault_part_managers(&self) -> &[FaultPartManager<'g, G>] {
        &self.fault_parts
    }

    pub fn fault_part_managers_mut(&mut self) -> &mut [FaultPartManager<'g, G>] {
        &mut self.fault_parts
    }

    /// Transform assigned to every part appended to a model.
    pub fn set_transform(&mut self, transform: TransformId) {
        self.transform = Some(transform);
    }

    /// Regenerates the geometry of every fault for `visibility`.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    pub fn set_cell_visibility(
        &mut self,
        visibility: &CellVisibility,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        for mgr in &mut self.fault_parts {
            mgr.set_cell_visibility(visibility, collection, store)?;
        }
        Ok(())
    }

    /// Shows fault faces and mesh lines of every fault regardless of the
    /// display flags. NNC faces are not affected.
    pub fn set_fault_force_visibility(&mut self, force_visibility: bool) {
        self.force_visibility = force_visibility;
    }

    fn check_fault_count(&self, collection: &FaultCollection) {
        assert_eq!(
            collection.faults.len(),
            self.fault_parts.len(),
            "fault collection changed without rebuilding its part manager"
        );
    }

    /// Moves `parts` into `model`, assigning the shared transform.
    fn add_transformed(
        &self,
        parts: &SceneModel,
        model: &mut SceneModel,
        store: &mut SceneStore,
    ) -> Result<()> {
        for &id in parts.part_ids() {
            store.part_mut(id)?.transform = self.transform;
            model.add_part(id);
        }
        Ok(())
    }

    /// Appends the fault surfaces, mesh lines and NNC faces that the
    /// display settings and per-fault flags allow.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    ///
    /// # Panics
    ///
    /// Panics if the number of faults in `collection` differs from the one
    /// this manager was built for.
    pub fn append_parts_to_model(
        &self,
        collection: &FaultCollection,
        model: &mut SceneModel,
        store: &mut SceneStore,
    ) -> Result<()> {
        let display = &collection.display;
        let is_showing_grid = display.is_grid_visualization_mode;
        if !display.show_fault_collection && !is_showing_grid {
            return Ok(());
        }
        self.check_fault_count(collection);

        let mut parts = SceneModel::new();
        for (fault, mgr) in collection.faults.iter().zip(&self.fault_parts) {
            // Overrides the per-fault and face flags, but not the NNC gate.
            let force_display = is_showing_grid || self.force_visibility;

            if fault.show_fault || force_display {
                if display.show_fault_faces || force_display {
                    mgr.append_native_fault_faces_to_model(&mut parts);
                }
                if display.show_opposite_fault_faces || force_display {
                    mgr.append_opposite_fault_faces_to_model(&mut parts);
                }
                if display.show_fault_faces
                    || display.show_opposite_fault_faces
                    || display.show_nncs
                    || force_display
                {
                    mgr.append_mesh_line_parts_to_model(&mut parts);
                }
            }

            if fault.show_fault && display.show_fault_collection && display.show_nncs {
                mgr.append_nnc_faces_to_model(&mut parts);
            }
        }

        self.add_transformed(&parts, model, store)
    }

    /// Appends the labels of the shown faults.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    ///
    /// # Panics
    ///
    /// Panics if the number of faults in `collection` differs from the one
    /// this manager was built for.
    pub fn append_label_parts_to_model(
        &self,
        collection: &FaultCollection,
        model: &mut SceneModel,
        store: &mut SceneStore,
    ) -> Result<()> {
        let display = &collection.display;
        if !display.show_fault_collection || !display.show_fault_label {
            return Ok(());
        }
        self.check_fault_count(collection);

        let mut parts = SceneModel::new();
        for (fault, mgr) in collection.faults.iter().zip(&self.fault_parts) {
            if fault.show_fault {
                mgr.append_label_parts_to_model(&mut parts);
            }
        }

        self.add_transformed(&parts, model, store)
    }

    /// Colors every fault with its own color.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    pub fn apply_single_color_effect(
        &mut self,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        for mgr in &mut self.fault_parts {
            mgr.apply_single_color_effect(collection, store)?;
        }
        Ok(())
    }

    /// Colors all faults from `slot` when results are shown on faults,
    /// otherwise with their single colors.
    ///
    /// # Errors
    ///
    /// Returns an error if a part handle no longer resolves in `store`.
    pub fn update_colors(
        &mut self,
        time_step: usize,
        slot: &CellResultSlot<'_>,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> Result<()> {
        if !collection.display.show_results_on_faults {
            return self.apply_single_color_effect(collection, store);
        }
        for mgr in &mut self.fault_parts {
            mgr.update_cell_result_color(time_step, slot, collection, store)?;
        }
        Ok(())
    }

    pub fn update_cell_edge_result_color(&mut self, time_step: usize, slot: &CellResultSlot<'_>) {
        for mgr in &mut self.fault_parts {
            mgr.update_cell_edge_result_color(time_step, slot);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::color::LinearScalarMapper;
    use crate::fault::Fault;
    use crate::grid::{FaceType, MainGrid, NncConnection};
    use crate::math::{Point3, Vector3};
    use crate::results::{CaseResults, PorosityModel, ResultType, WellPipeTable};
    use crate::scene::{Effect, Transform};

    fn grid() -> MainGrid {
        let mut grid =
            MainGrid::regular(3, 1, 1, Point3::origin(), Vector3::new(1.0, 1.0, 1.0)).unwrap();
        grid.add_nnc(NncConnection {
            cell1: 0,
            cell2: 1,
            face: FaceType::PosI,
            polygon: vec![
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 1.0),
            ],
            transmissibility: 1.0,
        });
        grid
    }

    /// Two faults: `A` between cells 0 and 1, `B` between cells 1 and 2.
    fn collection(grid: &MainGrid) -> FaultCollection {
        let mut a = Fault::new("A", Vec::new());
        a.add_ijk_box(grid, (0, 0), (0, 0), (0, 0), FaceType::PosI);
        let mut b = Fault::new("B", Vec::new());
        b.add_ijk_box(grid, (1, 1), (0, 0), (0, 0), FaceType::PosI);
        FaultCollection::new(vec![a, b])
    }

    fn build<'g>(
        grid: &'g MainGrid,
        collection: &FaultCollection,
        store: &mut SceneStore,
    ) -> FaultCollectionPartManager<'g, MainGrid> {
        FaultCollectionPartManager::new(grid, collection, &Preferences::default(), store).unwrap()
    }

    #[test]
    fn one_manager_per_fault_in_order() {
        let grid = grid();
        let collection = collection(&grid);
        let mut store = SceneStore::new();
        let mgr = build(&grid, &collection, &mut store);
        let indices: Vec<usize> = mgr
            .fault_part_managers()
            .iter()
            .map(FaultPartManager::fault_index)
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn default_settings_show_faces_and_mesh() {
        let grid = grid();
        let collection = collection(&grid);
        let mut store = SceneStore::new();
        let mgr = build(&grid, &collection, &mut store);

        let mut model = SceneModel::new();
        mgr.append_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        // Per fault: native, opposite, two mesh line parts.
        assert_eq!(model.part_count(), 8);
        let nnc = mgr.fault_part_managers()[0].nnc_faces().unwrap();
        assert!(!model.contains(nnc));
    }

    #[test]
    fn forced_visibility_does_not_open_nnc_gate() {
        let grid = grid();
        let mut collection = collection(&grid);
        collection.faults[0].show_fault = false;
        collection.display.show_fault_faces = false;
        collection.display.show_nncs = true;
        let mut store = SceneStore::new();
        let mut mgr = build(&grid, &collection, &mut store);
        mgr.set_fault_force_visibility(true);

        let mut model = SceneModel::new();
        mgr.append_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        let hidden = &mgr.fault_part_managers()[0];
        assert!(model.contains(hidden.native_faces().unwrap()));
        assert!(model.contains(hidden.opposite_faces().unwrap()));
        assert!(model.contains(hidden.native_grid_lines().unwrap()));
        assert!(!model.contains(hidden.nnc_faces().unwrap()));
    }

    #[test]
    fn nncs_need_shown_fault_and_collection() {
        let grid = grid();
        let mut collection = collection(&grid);
        collection.display.show_nncs = true;
        let mut store = SceneStore::new();
        let mgr = build(&grid, &collection, &mut store);
        let nnc = mgr.fault_part_managers()[0].nnc_faces().unwrap();

        let mut model = SceneModel::new();
        mgr.append_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        assert!(model.contains(nnc));

        // Grid mode shows faults of a hidden collection, but not its NNCs.
        collection.display.show_fault_collection = false;
        collection.display.is_grid_visualization_mode = true;
        let mut model = SceneModel::new();
        mgr.append_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        assert!(!model.is_empty());
        assert!(!model.contains(nnc));
    }

    #[test]
    fn hidden_collection_appends_nothing() {
        let grid = grid();
        let mut collection = collection(&grid);
        collection.display.show_fault_collection = false;
        let mut store = SceneStore::new();
        let mgr = build(&grid, &collection, &mut store);

        let mut model = SceneModel::new();
        mgr.append_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn mesh_lines_follow_nnc_flag_alone() {
        let grid = grid();
        let mut collection = collection(&grid);
        collection.display.show_fault_faces = false;
        collection.display.show_opposite_fault_faces = false;
        collection.display.show_nncs = true;
        let mut store = SceneStore::new();
        let mgr = build(&grid, &collection, &mut store);

        let mut model = SceneModel::new();
        mgr.append_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        let first = &mgr.fault_part_managers()[0];
        assert!(!model.contains(first.native_faces().unwrap()));
        assert!(model.contains(first.native_grid_lines().unwrap()));
        assert!(model.contains(first.nnc_faces().unwrap()));
    }

    #[test]
    fn appended_parts_share_transform() {
        let grid = grid();
        let collection = collection(&grid);
        let mut store = SceneStore::new();
        let mut mgr = build(&grid, &collection, &mut store);
        let tid = store.add_transform(Transform::scaling(Vector3::new(1.0, 1.0, 2.0)));
        mgr.set_transform(tid);

        let mut model = SceneModel::new();
        mgr.append_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        for &id in model.part_ids() {
            assert_eq!(store.part(id).unwrap().transform, Some(tid));
        }
        let bb = model.bounding_box(&store).unwrap();
        assert!((bb.max.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn labels_need_label_flag_and_shown_fault() {
        let grid = grid();
        let mut collection = collection(&grid);
        let mut store = SceneStore::new();
        let mgr = build(&grid, &collection, &mut store);

        let mut model = SceneModel::new();
        mgr.append_label_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        assert!(model.is_empty());

        collection.display.show_fault_label = true;
        collection.faults[1].show_fault = false;
        mgr.append_label_parts_to_model(&collection, &mut model, &mut store)
            .unwrap();
        let first = &mgr.fault_part_managers()[0];
        assert_eq!(model.part_count(), 2);
        assert!(model.contains(first.label().unwrap()));
        assert!(model.contains(first.label_line().unwrap()));
    }

    #[test]
    fn update_colors_switches_on_result_flag() {
        let grid = grid();
        let mut collection = collection(&grid);
        let mut store = SceneStore::new();
        let mut mgr = build(&grid, &collection, &mut store);

        let mut case = CaseResults::new();
        let results = case.cell_results_mut(PorosityModel::Matrix);
        let idx = results.add_empty_scalar_result(ResultType::Static, "PORO");
        results
            .cell_scalar_results_mut(idx)
            .unwrap()
            .push(vec![0.1, 0.2, 0.3]);
        let mapper = LinearScalarMapper::continuous(0.0, 1.0, Vec::new());
        let wells = WellPipeTable::new(3);
        let slot = CellResultSlot::new("PORO", PorosityModel::Matrix, &mapper, &case, &wells);

        mgr.update_colors(0, &slot, &collection, &mut store).unwrap();
        for fault in mgr.fault_part_managers() {
            let part = store.part(fault.native_faces().unwrap()).unwrap();
            assert!(matches!(part.effect, Effect::ScalarMapper { .. }));
        }

        collection.display.show_results_on_faults = false;
        mgr.update_colors(0, &slot, &collection, &mut store).unwrap();
        mgr.update_cell_edge_result_color(0, &slot);
        for fault in mgr.fault_part_managers() {
            let part = store.part(fault.native_faces().unwrap()).unwrap();
            assert!(matches!(part.effect, Effect::Surface { .. }));
        }
    }

    #[test]
    fn cell_visibility_reaches_every_fault() {
        let grid = grid();
        let collection = collection(&grid);
        let mut store = SceneStore::new();
        let mut mgr = build(&grid, &collection, &mut store);

        mgr.set_cell_visibility(&CellVisibility::all_hidden(3), &collection, &mut store)
            .unwrap();
        for fault in mgr.fault_part_managers() {
            assert!(fault.native_faces().is_none());
            assert!(fault.opposite_faces().is_none());
            assert!(fault.nnc_faces().is_none());
        }
    }

    #[test]
    #[should_panic(expected = "fault collection changed")]
    fn fault_count_mismatch_panics() {
        let grid = grid();
        let mut collection = collection(&grid);
        let mut store = SceneStore::new();
        let mgr = build(&grid, &collection, &mut store);
        collection.faults.pop();

        let mut model = SceneModel::new();
        let _ = mgr.append_parts_to_model(&collection, &mut model, &mut store);
    }
}
