//! Console rendering of an export run.

use sp2md_core::assets::{AssetOutcome, AssetReport};
use sp2md_core::ExportReport;
use std::path::Path;

pub fn render(report: &ExportReport, export_dir: &Path) -> String {
    let mut lines: Vec<String> = Vec::new();
    for post in &report.posts {
        lines.push(format!("Got post with title \"{}\"", post.title));
        lines.push(format!("Successfully wrote post body to {}", post.path.display()));
        lines.push("Checking through post content...".to_string());
        match &post.assets {
            AssetReport::NoContent => lines.push("No content found!".to_string()),
            AssetReport::Fetched(results) => {
                lines.extend(results.iter().map(|result| {
                    let name = &result.reference.local_name;
                    match &result.outcome {
                        AssetOutcome::Saved { .. } => {
                            format!("Successfully downloaded {name} to {}", export_dir.display())
                        }
                        AssetOutcome::Failed(e) => format!("Failed to download {name}: {e}"),
                    }
                }));
            }
        }
    }
    if report.aborted {
        lines.push("Stopped before all posts were exported.".to_string());
    }
    lines.push(format!(
        "Exported {} post(s), {} asset(s) downloaded, {} failed.",
        report.posts.len(),
        report.assets_saved(),
        report.assets_failed()
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
