//! Scene parts for faults: per-fault geometry and coloring, and the
//! collection-level policy deciding what goes into a scene model.

mod fault_part_mgr;
mod faults_part_mgr;
mod result_slot;

pub use fault_part_mgr::{
    face_culling_mode, find_closest_vertex, label_placement, resolve_label_color,
    FaultPartManager, LabelPlacement, PRIORITY_FAULT_GEOMETRY, PRIORITY_LABEL, PRIORITY_MESH,
    PRIORITY_NNC_GEOMETRY, PRIORITY_TRANSPARENT,
};
pub use faults_part_mgr::FaultCollectionPartManager;
pub use result_slot::CellResultSlot;
