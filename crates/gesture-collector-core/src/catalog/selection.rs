use crate::catalog::CatalogEntry;

/// Checked/unchecked state layered over one catalog snapshot.
///
/// Purely transient: build it from [`SessionCatalog::list`] and rebuild it
/// after every mutation.
///
/// [`SessionCatalog::list`]: crate::SessionCatalog::list
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: Vec<(CatalogEntry, bool)>,
}

impl Selection {
    /// Wraps a snapshot with nothing selected.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            items: entries.into_iter().map(|e| (e, false)).collect(),
        }
    }

    /// Entries in snapshot order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.items.iter().map(|(e, _)| e)
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the entry at `index` is checked.
    pub fn is_selected(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|(_, checked)| *checked)
    }

    /// Flips the entry at `index`. Returns the new state, or `None` when the
    /// index is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let (_, checked) = self.items.get_mut(index)?;
        *checked = !*checked;
        Some(*checked)
    }

    /// "Select all" toggle: checks everything, or clears everything when all
    /// entries are already checked.
    pub fn toggle_all(&mut self) {
        let target = !self.all_selected();
        for (_, checked) in &mut self.items {
            *checked = target;
        }
    }

    /// Unchecks every entry.
    pub fn clear(&mut self) {
        for (_, checked) in &mut self.items {
            *checked = false;
        }
    }

    /// Whether the snapshot is non-empty and every entry is checked.
    pub fn all_selected(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|(_, checked)| *checked)
    }

    /// Checked entries in snapshot order.
    pub fn selected(&self) -> Vec<CatalogEntry> {
        self.items
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(e, _)| e.clone())
            .collect()
    }
}
