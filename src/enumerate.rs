use tracing::{debug, info, warn};

use crate::platform::{ProcessEntry, ProcessTable, SnapshotError, WindowTable};
use crate::window_info::{ProcessName, WindowRecord};

/// Lists visible, titled top-level windows with their owning process.
///
/// The process table is snapshotted once and every record resolves against
/// that snapshot. Lookup failures degrade to a sentinel name instead of
/// aborting the listing.
pub fn enumerate<W, P>(windows: &W, processes: &P) -> Vec<WindowRecord>
where
    W: WindowTable + ?Sized,
    P: ProcessTable + ?Sized,
{
    info!(event = "window.enumerate_started");

    let all = windows.top_level_windows();
    let total = all.len();
    let mut hidden_count = 0;
    let mut untitled_count = 0;

    let eligible: Vec<_> = all
        .into_iter()
        .filter(|&window| {
            if !windows.is_visible(window) {
                hidden_count += 1;
                return false;
            }
            if windows.title_len(window) == 0 {
                untitled_count += 1;
                return false;
            }
            true
        })
        .collect();

    debug!(
        event = "window.enumerate_filtered",
        total = total,
        hidden_count = hidden_count,
        untitled_count = untitled_count,
        eligible_count = eligible.len()
    );

    if eligible.is_empty() {
        info!(event = "window.enumerate_completed", count = 0);
        return Vec::new();
    }

    let snapshot = processes.snapshot();
    if let Err(e) = &snapshot {
        warn!(event = "window.process_snapshot_failed", error = %e);
    }

    let records: Vec<WindowRecord> = eligible
        .into_iter()
        .map(|window| {
            let process_id = windows.process_id(window);
            WindowRecord {
                handle: window,
                process_id,
                process_name: process_name(&snapshot, process_id),
                title: windows.title(window),
            }
        })
        .collect();

    info!(event = "window.enumerate_completed", count = records.len());
    records
}

fn process_name(
    snapshot: &Result<Vec<ProcessEntry>, SnapshotError>,
    process_id: u32,
) -> ProcessName {
    let entries = match snapshot {
        Ok(entries) => entries,
        Err(SnapshotError::SnapshotFailed) => return ProcessName::SnapshotFailed,
        Err(SnapshotError::EnumerationFailed) => return ProcessName::EnumerationFailed,
    };
    // pid 0 is the idle process, never a window owner
    if process_id == 0 {
        return ProcessName::Unknown;
    }
    entries
        .iter()
        .find(|entry| entry.pid == process_id)
        .map_or(ProcessName::Unknown, |entry| {
            ProcessName::Resolved(entry.exe_name.clone())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDesktop, FakeProcesses, FakeWindow};

    fn desktop() -> FakeDesktop {
        FakeDesktop::new(vec![
            FakeWindow::new(0x10, "Editor").pid(100),
            FakeWindow::new(0x20, "").pid(100),
            FakeWindow::new(0x30, "Tool Window").pid(200).hidden(),
            FakeWindow::new(0x40, "Terminal").pid(300),
            FakeWindow::new(0x50, "Orphan").pid(999),
        ])
    }

    fn processes() -> FakeProcesses {
        FakeProcesses::with(&[(100, "editor.exe"), (200, "tool.exe"), (300, "term.exe")])
    }

    #[test]
    fn keeps_visible_titled_windows_in_os_order() {
        let records = enumerate(&desktop(), &processes());
        let handles: Vec<_> = records.iter().map(|r| r.handle.value()).collect();
        assert_eq!(handles, vec![0x10, 0x40, 0x50]);
    }

    #[test]
    fn skips_visible_window_without_title() {
        let records = enumerate(&desktop(), &processes());
        assert!(records.iter().all(|r| r.handle.value() != 0x20));
    }

    #[test]
    fn skips_hidden_window_with_title() {
        let records = enumerate(&desktop(), &processes());
        assert!(records.iter().all(|r| r.title != "Tool Window"));
    }

    #[test]
    fn resolves_names_and_falls_back_to_unknown() {
        let records = enumerate(&desktop(), &processes());
        assert_eq!(records[0].process_name, ProcessName::Resolved("editor.exe".into()));
        assert_eq!(records[0].process_id, 100);
        assert_eq!(records[0].title, "Editor");
        assert_eq!(records[1].process_name, ProcessName::Resolved("term.exe".into()));
        assert_eq!(records[2].process_name, ProcessName::Unknown);
    }

    #[test]
    fn failed_snapshot_marks_every_record() {
        let records = enumerate(&desktop(), &FakeProcesses::failing(SnapshotError::SnapshotFailed));
        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|r| r.process_name.as_str() == "Snapshot Failed"));
    }

    #[test]
    fn failed_first_entry_is_its_own_sentinel() {
        let records =
            enumerate(&desktop(), &FakeProcesses::failing(SnapshotError::EnumerationFailed));
        assert!(records
            .iter()
            .all(|r| r.process_name == ProcessName::EnumerationFailed));
    }

    #[test]
    fn owner_pid_zero_is_unknown() {
        let desktop = FakeDesktop::new(vec![FakeWindow::new(0x60, "Ghost").pid(0)]);
        let processes = FakeProcesses::with(&[(0, "[System Process]")]);
        let records = enumerate(&desktop, &processes);
        assert_eq!(records[0].process_name, ProcessName::Unknown);
    }

    #[test]
    fn no_snapshot_when_nothing_is_eligible() {
        let desktop = FakeDesktop::new(vec![FakeWindow::new(0x70, "").pid(1)]);
        let processes = processes();
        assert!(enumerate(&desktop, &processes).is_empty());
        assert_eq!(processes.snapshot_calls(), 0);
    }

    #[test]
    fn snapshot_taken_once_per_enumeration() {
        let processes = processes();
        enumerate(&desktop(), &processes);
        assert_eq!(processes.snapshot_calls(), 1);
    }
}
