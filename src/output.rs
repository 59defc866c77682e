//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines, kept pure for
//! testability; `main.rs` prints them. Paths are shown as given on the
//! command line.
//!
//! ```text
//! circle  face.jpg (640x480) → avatar.png (256x256)
//! square  face.jpg (640x480) → square.png (480x480)
//! batch   team/bob.jpg (300x300) → out/team/bob.png (256x256)
//! batch   broken.png: Unsupported or corrupt image data: ...
//! ```

use crate::batch::{BatchEvent, BatchSummary};
use crate::imaging::Dimensions;
use std::path::Path;

/// Width of the command label column.
const LABEL_WIDTH: usize = 7;

fn label(name: &str) -> String {
    format!("{:<width$}", name, width = LABEL_WIDTH)
}

/// One `source (WxH) → output (WxH)` line.
pub fn format_conversion(
    command: &str,
    source: &Path,
    source_dims: Dimensions,
    output: &Path,
    output_dims: Dimensions,
) -> String {
    format!(
        "{} {} ({}) → {} ({})",
        label(command),
        source.display(),
        source_dims,
        output.display(),
        output_dims
    )
}

/// Lines for the `double` command.
pub fn format_double(
    front: &Path,
    back: &Path,
    output: &Path,
    output_dims: Dimensions,
) -> Vec<String> {
    vec![
        format!("{} {} + {}", label("double"), front.display(), back.display()),
        format!("{} → {} ({})", label(""), output.display(), output_dims),
    ]
}

/// Plain-text `identify` output.
pub fn format_identify(path: &Path, dims: Dimensions, format: Option<&str>) -> String {
    match format {
        Some(f) => format!("{}: {} {}", path.display(), f, dims),
        None => format!("{}: {}", path.display(), dims),
    }
}

/// JSON `identify` output.
pub fn format_identify_json(path: &Path, dims: Dimensions, format: Option<&str>) -> String {
    serde_json::json!({
        "path": path.display().to_string(),
        "width": dims.width,
        "height": dims.height,
        "format": format,
    })
    .to_string()
}

/// One line per batch event.
pub fn format_batch_event(event: &BatchEvent) -> String {
    match event {
        BatchEvent::Written {
            source,
            output,
            original,
            diameter,
        } => format_conversion(
            "batch",
            source,
            *original,
            output,
            Dimensions {
                width: *diameter,
                height: *diameter,
            },
        ),
        BatchEvent::Failed { source, reason } => {
            format!("{} {}: {}", label("batch"), source.display(), reason)
        }
    }
}

/// Closing line of a batch run.
pub fn format_batch_summary(summary: &BatchSummary) -> String {
    format!("==> Batch complete: {}", summary)
}
