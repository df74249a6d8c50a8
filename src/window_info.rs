use std::fmt;

/// Handle of a window that the OS reported as live.
///
/// Only the platform layer creates these, either while enumerating the
/// window table or when a parsed handle passes the liveness query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(usize);

impl WindowHandle {
    pub(crate) const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn value(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessName {
    Resolved(String),
    Unknown,
    SnapshotFailed,
    EnumerationFailed,
}

impl ProcessName {
    pub fn as_str(&self) -> &str {
        match self {
            ProcessName::Resolved(name) => name,
            ProcessName::Unknown => "Unknown",
            ProcessName::SnapshotFailed => "Snapshot Failed",
            ProcessName::EnumerationFailed => "Enumeration Failed",
        }
    }
}

impl fmt::Display for ProcessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub handle: WindowHandle,
    pub process_id: u32,
    pub process_name: ProcessName,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_distinct() {
        assert_eq!(ProcessName::Unknown.to_string(), "Unknown");
        assert_eq!(ProcessName::SnapshotFailed.to_string(), "Snapshot Failed");
        assert_eq!(ProcessName::EnumerationFailed.to_string(), "Enumeration Failed");
        assert_eq!(ProcessName::Resolved("explorer.exe".into()).as_str(), "explorer.exe");
    }

    #[test]
    fn display_honours_column_width() {
        assert_eq!(format!("{:<10}|", ProcessName::Unknown), "Unknown   |");
    }
}
