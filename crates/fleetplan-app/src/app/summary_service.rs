//! Summary Service - combine hub areas across plan files
//!
//! Runs either inline ([`summarize_hubs`]) or on a worker thread
//! ([`spawn_summary`]) that reports [`SummaryEvent`]s over a channel.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use fleetplan_domain::service::{combine_hub_areas, HubFileAreas};
use fleetplan_infra::plan_files::{hub_area_records, hub_names};
use fleetplan_infra::workbook::read_first_sheet;
use fleetplan_infra::xlsx_writer::{write_table, TableStyle};
use fleetplan_infra::Sheet;
use fleetplan_types::Result;
use serde::Serialize;

use crate::scanner::scan_plan_files;

const OUTPUT_SHEET: &str = "Sheet1";

/// A hub needs areas from at least this many files to be summarised
pub const MIN_FILES_PER_HUB: usize = 2;

/// Shared flag checked between files and between hubs
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress message from the summary worker
#[derive(Debug, Clone)]
pub enum SummaryEvent {
    /// Plan files found in the input folder
    Scanned { files: usize },
    /// A file was read and its hubs recorded
    FileRead { path: PathBuf, hubs: usize },
    /// A file was unreadable or had no HubName column
    FileSkipped { path: PathBuf, reason: String },
    /// Hubs shared by enough files to summarise
    HubsFound { total: usize, shared: usize },
    HubSkipped { hub: String, reason: String },
    HubWritten { hub: String, path: PathBuf, files: usize },
    /// Completed (possibly cancelled)
    Finished(SummaryReport),
    /// Aborted before any hub was processed
    Failed(String),
}

/// Outcome of a summary run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryReport {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub hubs_found: usize,
    pub written: Vec<PathBuf>,
    pub skipped_hubs: Vec<String>,
    pub cancelled: bool,
}

struct PlanSheet {
    path: PathBuf,
    stem: String,
    sheet: Sheet,
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn skip_file<F>(path: &Path, reason: String, report: &mut SummaryReport, notify: &mut F)
where
    F: FnMut(SummaryEvent),
{
    log::warn!("skipping {}: {}", path.display(), reason);
    report.files_skipped += 1;
    notify(SummaryEvent::FileSkipped {
        path: path.to_path_buf(),
        reason,
    });
}

/// Read every plan file, mapping each hub to the files that mention it
fn read_plan_sheets<F>(
    files: &[PathBuf],
    cancel: &CancellationToken,
    report: &mut SummaryReport,
    notify: &mut F,
) -> (Vec<PlanSheet>, BTreeMap<String, Vec<usize>>)
where
    F: FnMut(SummaryEvent),
{
    let mut sheets = Vec::new();
    let mut hubs: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for path in files {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }

        let sheet = match read_first_sheet(path) {
            Ok(sheet) => sheet,
            Err(e) => {
                skip_file(path, e.to_string(), report, notify);
                continue;
            }
        };
        let Some(names) = hub_names(&sheet) else {
            skip_file(path, "no HubName column".to_string(), report, notify);
            continue;
        };

        let index = sheets.len();
        for name in &names {
            hubs.entry(name.clone()).or_default().push(index);
        }
        log::debug!("{}: {} hubs", path.display(), names.len());
        notify(SummaryEvent::FileRead {
            path: path.clone(),
            hubs: names.len(),
        });
        sheets.push(PlanSheet {
            path: path.clone(),
            stem: file_stem(path),
            sheet,
        });
    }

    (sheets, hubs)
}

fn summarize_hub(
    hub: &str,
    file_indexes: &[usize],
    sheets: &[PlanSheet],
    output_dir: &Path,
) -> std::result::Result<(PathBuf, usize), String> {
    let mut files = Vec::with_capacity(file_indexes.len());
    for &i in file_indexes {
        let plan = &sheets[i];
        match hub_area_records(&plan.sheet, hub) {
            Ok(records) => files.push(HubFileAreas {
                source: plan.stem.clone(),
                records,
            }),
            Err(e) => log::warn!("hub {}: skipping {}: {}", hub, plan.path.display(), e),
        }
    }

    if files.len() < MIN_FILES_PER_HUB {
        return Err(format!("only {} file(s) with hub areas", files.len()));
    }

    let summary =
        combine_hub_areas(hub, &files).ok_or_else(|| "no hub area rows".to_string())?;
    log::debug!(
        "hub {}: {} rows, total area {}",
        hub,
        summary.rows.len(),
        summary.total_hub_area()
    );
    let path = output_dir.join(summary.file_name());
    write_table(
        &path,
        OUTPUT_SHEET,
        &summary.headers(),
        &summary.cell_rows(),
        TableStyle::Plain,
    )
    .map_err(|e| e.to_string())?;
    Ok((path, files.len()))
}

/// Scan `input_dir` and write a `Summary_<hub>.xlsx` into `output_dir` for
/// every hub found in at least two plan files.
///
/// Per-file and per-hub failures are logged and skipped. Only a failed scan
/// of the input folder is returned as an error.
pub fn summarize_hubs<F>(
    input_dir: &Path,
    output_dir: &Path,
    cancel: &CancellationToken,
    mut notify: F,
) -> Result<SummaryReport>
where
    F: FnMut(SummaryEvent),
{
    let files = scan_plan_files(input_dir)?;
    std::fs::create_dir_all(output_dir)?;
    log::info!("found {} plan files in {}", files.len(), input_dir.display());
    notify(SummaryEvent::Scanned { files: files.len() });

    let mut report = SummaryReport {
        files_scanned: files.len(),
        ..SummaryReport::default()
    };

    let (sheets, hubs) = read_plan_sheets(&files, cancel, &mut report, &mut notify);
    report.hubs_found = hubs.len();
    let shared = hubs
        .values()
        .filter(|f| f.len() >= MIN_FILES_PER_HUB)
        .count();
    log::info!("{} hubs, {} shared by two or more files", hubs.len(), shared);
    notify(SummaryEvent::HubsFound {
        total: hubs.len(),
        shared,
    });

    for (hub, file_indexes) in &hubs {
        if report.cancelled || cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }

        let outcome = if file_indexes.len() < MIN_FILES_PER_HUB {
            Err("found in only one file".to_string())
        } else {
            summarize_hub(hub, file_indexes, &sheets, output_dir)
        };

        match outcome {
            Ok((path, files)) => {
                log::info!("hub {}: combined {} files into {}", hub, files, path.display());
                notify(SummaryEvent::HubWritten {
                    hub: hub.clone(),
                    path: path.clone(),
                    files,
                });
                report.written.push(path);
            }
            Err(reason) => {
                log::warn!("hub {}: skipped, {}", hub, reason);
                notify(SummaryEvent::HubSkipped {
                    hub: hub.clone(),
                    reason,
                });
                report.skipped_hubs.push(hub.clone());
            }
        }
    }

    if report.cancelled {
        log::warn!("hub summary cancelled after {} files written", report.written.len());
    }
    Ok(report)
}

/// Run [`summarize_hubs`] on a worker thread.
///
/// The last event sent is always `Finished` or `Failed`.
pub fn spawn_summary(
    input_dir: PathBuf,
    output_dir: PathBuf,
    cancel: CancellationToken,
) -> (Receiver<SummaryEvent>, JoinHandle<()>) {
    let (tx, rx) = channel();

    let handle = thread::spawn(move || {
        let progress = tx.clone();
        let result = summarize_hubs(&input_dir, &output_dir, &cancel, |event| {
            let _ = progress.send(event);
        });
        let last = match result {
            Ok(report) => SummaryEvent::Finished(report),
            Err(e) => SummaryEvent::Failed(e.to_string()),
        };
        let _ = tx.send(last);
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetplan_infra::workbook::read_sheet;
    use fleetplan_types::CellValue;
    use tempfile::tempdir;

    fn write_plan(path: &Path, rows: &[(&str, f64, f64, f64)]) {
        let headers: Vec<String> = ["HubName", "Bus_Capacity", "Headway (min)", "Hub_Area"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cells: Vec<Vec<CellValue>> = rows
            .iter()
            .map(|(hub, cap, headway, area)| {
                vec![
                    CellValue::text(*hub),
                    CellValue::Number(*cap),
                    CellValue::Number(*headway),
                    CellValue::Number(*area),
                ]
            })
            .collect();
        write_table(path, "Operational_Analysis", &headers, &cells, TableStyle::Plain).unwrap();
    }

    #[test]
    fn test_summarize_hubs_shared_hub_only() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_plan(
            &input.path().join("Operational_Plan_north.xlsx"),
            &[("Gate3", 25.0, 10.0, 840.0), ("Gate3", 50.0, 10.0, 420.0)],
        );
        write_plan(
            &input.path().join("Operational_Plan_south.xlsx"),
            &[("Gate3", 25.0, 10.0, 140.0), ("Ext. Hub01", 25.0, 10.0, 70.0)],
        );

        let mut events = Vec::new();
        let report = summarize_hubs(
            input.path(),
            output.path(),
            &CancellationToken::new(),
            |e| events.push(e),
        )
        .unwrap();

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.hubs_found, 2);
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.skipped_hubs, vec!["Ext. Hub01"]);
        assert!(events
            .iter()
            .any(|e| matches!(e, SummaryEvent::HubWritten { hub, .. } if hub == "Gate3")));

        let summary = read_sheet(&output.path().join("Summary_Gate3.xlsx"), OUTPUT_SHEET).unwrap();
        assert_eq!(
            summary.headers,
            vec![
                "Bus_Capacity",
                "Headway (min)",
                "Hub_Area_North",
                "Hub_Area_South",
                "Sum_Hub_Area"
            ]
        );
        assert_eq!(summary.row_count(), 2);
        assert_eq!(summary.cell(0, 4), &CellValue::Number(980.0));
        assert_eq!(summary.cell(1, 3), &CellValue::Number(0.0));
        assert_eq!(summary.cell(1, 4), &CellValue::Number(420.0));
    }

    #[test]
    fn test_summarize_hubs_skips_bad_files() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        std::fs::write(input.path().join("broken.xlsx"), b"not a workbook").unwrap();
        write_plan(&input.path().join("plan_a.xlsx"), &[("Gate3", 25.0, 10.0, 70.0)]);

        let report = summarize_hubs(
            input.path(),
            output.path(),
            &CancellationToken::new(),
            |_| {},
        )
        .unwrap();
        assert_eq!(report.files_skipped, 1);
        assert!(report.written.is_empty());
        assert_eq!(report.skipped_hubs, vec!["Gate3"]);
    }

    #[test]
    fn test_cancelled_before_start() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        write_plan(&input.path().join("plan_a.xlsx"), &[("Gate3", 25.0, 10.0, 70.0)]);
        write_plan(&input.path().join("plan_b.xlsx"), &[("Gate3", 25.0, 10.0, 70.0)]);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = summarize_hubs(input.path(), output.path(), &cancel, |_| {}).unwrap();
        assert!(report.cancelled);
        assert!(report.written.is_empty());
    }

    #[test]
    fn test_spawn_summary_reports_failure_last() {
        let output = tempdir().unwrap();
        let (rx, handle) = spawn_summary(
            output.path().join("missing"),
            output.path().to_path_buf(),
            CancellationToken::new(),
        );
        handle.join().unwrap();
        let events: Vec<SummaryEvent> = rx.iter().collect();
        assert!(matches!(events.last(), Some(SummaryEvent::Failed(_))));
    }
}
