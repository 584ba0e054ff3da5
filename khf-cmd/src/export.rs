//! `export` and `render` subcommands: write the filtered view to disk.

use crate::config::{DatasetArgs, SelectionArgs};
use khf_dashboard::{export_csv, export_filename, DashboardView, Snapshot};
use khf_facility::FilterSelection;
use log::info;
use std::path::{Path, PathBuf};

/// Filtered rows as CSV, with the selection normalized first.
pub fn filtered_csv(snapshot: &Snapshot, selection: FilterSelection) -> anyhow::Result<(FilterSelection, String)> {
    let selection = snapshot.db.normalize_selection(selection)?;
    let facilities = snapshot.db.filter(&selection.predicates())?;
    let csv = export_csv(&facilities)?;
    Ok((selection, csv))
}

/// Write the CSV export of the selected view.
///
/// Without `output` the file is named after the selection and written to the
/// current directory.
pub async fn run_export(
    dataset: &DatasetArgs,
    selection: &SelectionArgs,
    output: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let snapshot = Snapshot::load(&dataset.source()).await?;
    let (selection, csv) = filtered_csv(&snapshot, selection.selection())?;
    let path = output.unwrap_or_else(|| PathBuf::from(export_filename(&selection)));
    tokio::fs::write(&path, csv).await?;
    info!("Export complete. Output: {}", path.display());
    Ok(path)
}

/// Write a static dashboard page plus the CSV export it links to.
///
/// The export lands in the same directory as `output`. Returns the paths of
/// the page and the export.
pub async fn run_render(
    dataset: &DatasetArgs,
    selection: &SelectionArgs,
    output: &Path,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    let snapshot = Snapshot::load(&dataset.source()).await?;
    let view = DashboardView::build(&snapshot, selection.selection(), None)?;
    let html = view.to_html(&snapshot)?;

    let export_path = output
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(view.export_filename());
    let (_, csv) = filtered_csv(&snapshot, view.selection.clone())?;
    tokio::fs::write(output, html).await?;
    tokio::fs::write(&export_path, csv).await?;

    info!(
        "Render complete. Output: {} (export: {})",
        output.display(),
        export_path.display()
    );
    Ok((output.to_path_buf(), export_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
Facility_N,Type,Owner,County,Sub_County,Constituen,Nearest_To,Latitude,Longitude
Mbagathi,Hospital,MoH,Nairobi,Dagoretti,Dagoretti,Nairobi,-1.3,36.8
Kasarani HC,Health Centre,MoH,Nairobi,Kasarani,Kasarani,Nairobi,-1.2,36.9
Kisumu Dispensary,Dispensary,Private,Kisumu,Kisumu East,Kisumu East,Kisumu,-0.1,34.7
";

    fn dataset(dir: &Path) -> DatasetArgs {
        let path = dir.join("facilities.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        DatasetArgs {
            dataset: path.to_string_lossy().into_owned(),
        }
    }

    fn nairobi() -> SelectionArgs {
        SelectionArgs {
            county: Some("Nairobi".to_string()),
            constituency: None,
        }
    }

    #[tokio::test]
    async fn export_writes_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let path = run_export(&dataset(dir.path()), &nairobi(), Some(output.clone()))
            .await
            .unwrap();
        assert_eq!(path, output);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.contains("Mbagathi"));
        assert!(!written.contains("Kisumu Dispensary"));
    }

    #[tokio::test]
    async fn render_writes_page_and_export_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dashboard.html");
        let (page, export) = run_render(&dataset(dir.path()), &nairobi(), &output)
            .await
            .unwrap();

        assert_eq!(export, dir.path().join("facilities_Nairobi_all.csv"));
        let html = std::fs::read_to_string(&page).unwrap();
        assert!(html.contains("href=\"facilities_Nairobi_all.csv\""));
        let csv = std::fs::read_to_string(&export).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[tokio::test]
    async fn missing_dataset_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = DatasetArgs {
            dataset: dir.path().join("nope.csv").to_string_lossy().into_owned(),
        };
        assert!(run_export(&args, &SelectionArgs::default(), None).await.is_err());
    }
}
