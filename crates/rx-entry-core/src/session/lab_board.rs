//! Lab test orders: staged chips, then a committed table.

use crate::models::TestOrder;
use crate::suggest::normalize_name;

/// Staged and committed lab orders for one section.
#[derive(Debug, Clone, Default)]
pub struct TestOrderBoard {
    staged: Vec<TestOrder>,
    table: Vec<TestOrder>,
}

impl TestOrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a test by name. Blank names and names already staged are
    /// ignored; returns the new order's id.
    pub fn stage(&mut self, name: &str) -> Option<String> {
        let key = normalize_name(name);
        if key.is_empty() || self.staged.iter().any(|t| normalize_name(&t.name) == key) {
            return None;
        }
        let order = TestOrder::new(name);
        let id = order.id.clone();
        self.staged.push(order);
        Some(id)
    }

    /// Move one staged order into the table.
    pub fn promote(&mut self, id: &str) -> bool {
        match self.staged.iter().position(|t| t.id == id) {
            Some(index) => {
                let order = self.staged.remove(index);
                self.table.push(order);
                true
            }
            None => false,
        }
    }

    /// Move every staged order into the table, keeping order.
    pub fn promote_all(&mut self) -> usize {
        let count = self.staged.len();
        self.table.append(&mut self.staged);
        count
    }

    pub fn remove_staged(&mut self, id: &str) -> bool {
        let before = self.staged.len();
        self.staged.retain(|t| t.id != id);
        self.staged.len() != before
    }

    pub fn remove_row(&mut self, id: &str) -> bool {
        let before = self.table.len();
        self.table.retain(|t| t.id != id);
        self.table.len() != before
    }

    pub fn update_notes(&mut self, id: &str, notes: &str) -> bool {
        self.row_mut(id).map(|t| t.notes = notes.to_string()).is_some()
    }

    pub fn toggle_notes(&mut self, id: &str) -> bool {
        self.row_mut(id).map(|t| t.show_notes = !t.show_notes).is_some()
    }

    /// Staged orders whose name contains `query`, case-insensitively.
    pub fn filter_staged(&self, query: &str) -> Vec<&TestOrder> {
        let q = normalize_name(query);
        self.staged
            .iter()
            .filter(|t| q.is_empty() || t.name.to_lowercase().contains(&q))
            .collect()
    }

    pub fn staged(&self) -> &[TestOrder] {
        &self.staged
    }

    pub fn table(&self) -> &[TestOrder] {
        &self.table
    }

    fn row_mut(&mut self, id: &str) -> Option<&mut TestOrder> {
        self.table.iter_mut().find(|t| t.id == id)
    }
}
