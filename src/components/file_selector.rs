use tracing::debug;

use crate::i18n::I18nManager;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FileSelectionError {
    #[error("{} exceed the size limit of {limit} bytes", .oversized.join(", "))]
    TooLarge { oversized: Vec<String>, limit: u64 },
}

impl FileSelectionError {
    pub fn message(&self, i18n: &I18nManager) -> String {
        match self {
            Self::TooLarge { limit, .. } => {
                i18n.t_with("file.too_large", &[("limit", &format_size(*limit))])
            }
        }
    }
}

/// Shows the names of the files picked in one file input and enforces a
/// per-file size ceiling. A selection is accepted whole or not at all.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSelector {
    max_size: u64,
    selection: Vec<SelectedFile>,
    error: Option<FileSelectionError>,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSelector {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(max_size: u64) -> Self {
        Self {
            max_size,
            selection: Vec::new(),
            error: None,
        }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Handles the input's `change` event.
    pub fn select(
        &mut self,
        files: Vec<SelectedFile>,
    ) -> Result<&[SelectedFile], FileSelectionError> {
        self.error = None;
        let oversized = files
            .iter()
            .filter(|file| file.size > self.max_size)
            .map(|file| file.name.clone())
            .collect::<Vec<_>>();

        if !oversized.is_empty() {
            debug!(
                count = oversized.len(),
                limit = self.max_size,
                "rejecting oversized selection"
            );
            self.selection.clear();
            let error = FileSelectionError::TooLarge {
                oversized,
                limit: self.max_size,
            };
            self.error = Some(error.clone());
            return Err(error);
        }

        self.selection = files;
        Ok(self.selection.as_slice())
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.error = None;
    }

    pub fn selection(&self) -> &[SelectedFile] {
        &self.selection
    }

    pub fn error(&self) -> Option<&FileSelectionError> {
        self.error.as_ref()
    }

    /// File names joined for the `.form-file-name` display.
    pub fn display(&self) -> String {
        self.selection
            .iter()
            .map(|file| file.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes}B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_accepted_file() {
        let mut selector = FileSelector::new();
        let accepted = selector
            .select(vec![
                SelectedFile::new("cv.pdf", 120_000),
                SelectedFile::new("portfolio.zip", 4_000_000),
            ])
            .expect("files under the ceiling");
        assert_eq!(accepted.len(), 2);
        assert_eq!(selector.display(), "cv.pdf, portfolio.zip");
        assert!(selector.error().is_none());
    }

    #[test]
    fn any_oversized_file_clears_the_whole_selection_with_one_error() {
        let mut selector = FileSelector::new();
        selector
            .select(vec![SelectedFile::new("ok.png", 10)])
            .expect("small file");

        let error = selector
            .select(vec![
                SelectedFile::new("a.mov", DEFAULT_MAX_FILE_SIZE + 1),
                SelectedFile::new("b.png", 10),
                SelectedFile::new("c.mov", DEFAULT_MAX_FILE_SIZE * 2),
            ])
            .expect_err("oversized files");

        assert_eq!(
            error,
            FileSelectionError::TooLarge {
                oversized: vec!["a.mov".into(), "c.mov".into()],
                limit: DEFAULT_MAX_FILE_SIZE,
            }
        );
        assert!(selector.selection().is_empty());
        assert_eq!(selector.display(), "");
        assert_eq!(
            error.message(&I18nManager::with_locale("en")),
            "File size must be less than 5MB"
        );
    }

    #[test]
    fn file_at_the_ceiling_is_accepted() {
        let mut selector = FileSelector::with_max_size(1024);
        assert!(selector.select(vec![SelectedFile::new("exact.txt", 1024)]).is_ok());
        assert_eq!(format_size(1024), "1KB");
        assert_eq!(format_size(1500), "1500B");
    }
}
