/// Per-cell visibility mask used when generating geometry.
///
/// Cells beyond the end of the mask count as hidden.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellVisibility {
    flags: Vec<bool>,
}

impl CellVisibility {
    /// A mask with every one of `cell_count` cells visible.
    #[must_use]
    pub fn all_visible(cell_count: usize) -> Self {
        Self {
            flags: vec![true; cell_count],
        }
    }

    /// A mask with every one of `cell_count` cells hidden.
    #[must_use]
    pub fn all_hidden(cell_count: usize) -> Self {
        Self {
            flags: vec![false; cell_count],
        }
    }

    #[must_use]
    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    #[must_use]
    pub fn is_visible(&self, cell: usize) -> bool {
        self.flags.get(cell).copied().unwrap_or(false)
    }

    /// Sets the visibility of one cell. Out-of-range cells are ignored.
    pub fn set_visible(&mut self, cell: usize, visible: bool) {
        if let Some(flag) = self.flags.get_mut(cell) {
            *flag = visible;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.flags.iter().filter(|&&v| v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_is_hidden() {
        let vis = CellVisibility::all_visible(3);
        assert!(vis.is_visible(2));
        assert!(!vis.is_visible(3));
    }

    #[test]
    fn set_visible_updates_count() {
        let mut vis = CellVisibility::all_hidden(4);
        vis.set_visible(1, true);
        vis.set_visible(9, true);
        assert_eq!(vis.visible_count(), 1);
        assert!(vis.is_visible(1));
    }
}
