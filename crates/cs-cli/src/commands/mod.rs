pub mod check_index;
pub mod run;
pub mod units;

use std::fs;
use std::path::Path;

use cs_core::UnitCatalog;

/// Load a unit table from `path`, or the built-in one when no path is given.
fn load_catalog(path: Option<&Path>) -> Result<UnitCatalog, String> {
    let Some(path) = path else {
        return Ok(UnitCatalog::standard());
    };
    let json = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    UnitCatalog::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}
