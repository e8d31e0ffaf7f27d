use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use ledframe_core::{PanelGeometry, SerpentineMapper};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let output = PathBuf::from("tests")
        .join("golden")
        .join("layout_32x24")
        .join("expected_layout.json");
    let layout = SerpentineMapper::new(PanelGeometry::DEFAULT).layout();
    let json = serde_json::to_string(&layout)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(&output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
