//! Editor state
//!
//! The product editor's working copy: an owned product list plus the
//! current row selection. Mutations operate on the in-memory list;
//! nothing persists until [`EditorState::save_to`] pushes the list
//! through the catalog.

use std::collections::HashSet;

use crate::{
    catalog::{Catalog, CatalogData, CatalogError, Product},
    util::fresh_product_id,
};

/// The editor's working state.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    products: Vec<Product>,
    selection: HashSet<i64>,
}

impl EditorState {
    /// Start editing a catalog. Products are normalized up front so
    /// every row has an id, a title and a two-slot gallery.
    #[must_use]
    pub fn new(mut data: CatalogData) -> Self {
        data.normalize();
        Self {
            products: data.products,
            selection: HashSet::new(),
        }
    }

    /// The products being edited.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Mutable access to one row.
    pub fn product_mut(&mut self, index: usize) -> Option<&mut Product> {
        self.products.get_mut(index)
    }

    /// Ids of the currently selected rows.
    #[must_use]
    pub fn selection(&self) -> &HashSet<i64> {
        &self.selection
    }

    /// Flip one row's selection. Unknown ids are ignored.
    pub fn toggle(&mut self, id: i64) {
        if !self.selection.remove(&id) && self.products.iter().any(|p| p.id == id) {
            self.selection.insert(id);
        }
    }

    /// Select every row.
    pub fn select_all(&mut self) {
        self.selection = self.products.iter().map(|p| p.id).collect();
    }

    /// Deselect every row.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// `true` when every row is selected and there is at least one row.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.products.is_empty() && self.selection.len() == self.products.len()
    }

    /// Prepend a fresh draft product and return its id.
    pub fn add_product(&mut self) -> i64 {
        let mut product = Product::default();
        product.normalize();
        let id = product.id;
        self.products.insert(0, product);
        id
    }

    /// Duplicate the row at `index`, inserting the copy right after it.
    ///
    /// The copy gets a fresh id, a `-copy` slug and a `(Copy)` title
    /// suffix. Returns the copy's id, or `None` for an out-of-range
    /// index.
    pub fn duplicate(&mut self, index: usize) -> Option<i64> {
        let original = self.products.get(index)?;

        let mut copy = original.clone();
        copy.id = fresh_product_id();
        copy.slug = if original.slug.is_empty() {
            String::new()
        } else {
            format!("{}-copy", original.slug)
        };
        copy.title = format!("{} (Copy)", original.title);
        copy.normalize();

        let id = copy.id;
        self.products.insert(index.saturating_add(1).min(self.products.len()), copy);
        Some(id)
    }

    /// Delete the row at `index`. Out-of-range indexes are ignored.
    pub fn delete(&mut self, index: usize) {
        if index < self.products.len() {
            let removed = self.products.remove(index);
            self.selection.remove(&removed.id);
        }
    }

    /// Delete every selected row, then clear the selection.
    pub fn delete_selected(&mut self) {
        self.products.retain(|p| !self.selection.contains(&p.id));
        self.selection.clear();
    }

    /// Set the hidden flag on every selected row, then clear the
    /// selection.
    pub fn set_selected_hidden(&mut self, hidden: bool) {
        for product in &mut self.products {
            if self.selection.contains(&product.id) {
                product.hidden = hidden;
            }
        }
        self.selection.clear();
    }

    /// Normalize and persist the working list as the user catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the save fails even after the
    /// catalog's quota recovery.
    pub fn save_to(&mut self, catalog: &Catalog) -> Result<(), CatalogError> {
        for product in &mut self.products {
            product.normalize();
        }
        catalog.save_products(&CatalogData::new(self.products.clone()))
    }
}
