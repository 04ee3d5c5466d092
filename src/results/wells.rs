/// Which well, if any, owns each cell and whether its pipe is shown.
pub trait WellPipeVisibility {
    fn is_visible(&self, well: usize, time_step: usize) -> bool;
    fn well_index_for_cell(&self, cell: usize) -> Option<usize>;
}

/// Table-backed [`WellPipeVisibility`].
#[derive(Debug, Clone, Default)]
pub struct WellPipeTable {
    cell_to_well: Vec<Option<usize>>,
    /// `[time_step][well]`
    pipe_visible: Vec<Vec<bool>>,
}

impl WellPipeTable {
    #[must_use]
    pub fn new(cell_count: usize) -> Self {
        Self {
            cell_to_well: vec![None; cell_count],
            pipe_visible: Vec::new(),
        }
    }

    /// Marks `cells` as belonging to `well`. Out-of-range cells are ignored.
    pub fn set_well_cells(&mut self, well: usize, cells: &[usize]) {
        for &cell in cells {
            if let Some(slot) = self.cell_to_well.get_mut(cell) {
                *slot = Some(well);
            }
        }
    }

    pub fn set_pipe_visible(&mut self, well: usize, time_step: usize, visible: bool) {
        if self.pipe_visible.len() <= time_step {
            self.pipe_visible.resize(time_step + 1, Vec::new());
        }
        let row = &mut self.pipe_visible[time_step];
        if row.len() <= well {
            row.resize(well + 1, false);
        }
        row[well] = visible;
    }
}

impl WellPipeVisibility for WellPipeTable {
    fn is_visible(&self, well: usize, time_step: usize) -> bool {
        self.pipe_visible
            .get(time_step)
            .and_then(|row| row.get(well))
            .copied()
            .unwrap_or(false)
    }

    fn well_index_for_cell(&self, cell: usize) -> Option<usize> {
        self.cell_to_well.get(cell).copied().flatten()
    }
}
