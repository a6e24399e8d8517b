// src/render/mod.rs
// =============================================================================
// Turning fetched data into text.
//
// Submodules:
// - age: "last pushed" timestamps -> "3d ago"
// - table: ordered rows -> Markdown document
// =============================================================================

mod age;
mod table;

pub use age::format_age;
pub use table::TableLayout;
