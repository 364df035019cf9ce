#[allow(clippy::module_inception)]
mod catalog;
mod selection;

pub use {
    catalog::{CatalogEntry, DeleteFailure, DeleteReport, SessionCatalog},
    selection::Selection,
};
