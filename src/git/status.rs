use serde::Serialize;

/// The subset of porcelain status codes that gets recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum StatusKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    pub status: StatusKind,
}

/// Branch and working tree state reported by one `git status --porcelain --branch` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_branch: Option<String>,
    pub ahead: u32,
    pub behind: u32,
    /// In the order the lines were received. Empty means a clean working tree.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<StatusEntry>,
}

impl StatusSnapshot {
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }
}

pub trait StatusEntryFactory {
    fn create(
        &self,
        path: String,
        status: StatusKind,
        original_path: Option<String>,
    ) -> StatusEntry;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEntryFactory;

impl StatusEntryFactory for DefaultEntryFactory {
    fn create(
        &self,
        path: String,
        status: StatusKind,
        original_path: Option<String>,
    ) -> StatusEntry {
        debug_assert!(
            status != StatusKind::Renamed || original_path.is_some(),
            "renamed entry without an original path"
        );

        StatusEntry {
            path,
            original_path,
            status,
        }
    }
}
