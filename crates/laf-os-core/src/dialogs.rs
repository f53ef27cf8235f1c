//! Native file dialog requests.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDialogKind {
    OpenFile,
    OpenFiles,
    OpenFolder,
    SaveFile,
}

impl FileDialogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileDialogKind::OpenFile => "open-file",
            FileDialogKind::OpenFiles => "open-files",
            FileDialogKind::OpenFolder => "open-folder",
            FileDialogKind::SaveFile => "save-file",
        }
    }

    pub fn allows_multiple(self) -> bool {
        matches!(self, FileDialogKind::OpenFiles)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    /// Extension without the leading dot, e.g. `"png"`.
    pub extension: String,
    pub description: String,
}

/// Everything a platform needs to present a file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDialog {
    pub kind: FileDialogKind,
    pub title: String,
    pub file_name: Option<PathBuf>,
    pub default_extension: Option<String>,
    pub filters: Vec<FileFilter>,
}

impl FileDialog {
    pub fn new(kind: FileDialogKind) -> Self {
        Self {
            kind,
            title: String::new(),
            file_name: None,
            default_extension: None,
            filters: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_file_name(mut self, file_name: impl AsRef<Path>) -> Self {
        self.file_name = Some(file_name.as_ref().to_path_buf());
        self
    }

    pub fn with_default_extension(mut self, extension: &str) -> Self {
        self.default_extension = Some(extension.trim_start_matches('.').to_string());
        self
    }

    pub fn with_filter(mut self, extension: &str, description: &str) -> Self {
        self.filters.push(FileFilter {
            extension: extension.trim_start_matches('.').to_string(),
            description: description.to_string(),
        });
        self
    }

    /// The file name with the default extension appended when it has none.
    pub fn file_name_with_default_extension(&self) -> Option<PathBuf> {
        let name = self.file_name.as_ref()?;
        match (&self.default_extension, name.extension()) {
            (Some(ext), None) => Some(name.with_extension(ext)),
            _ => Some(name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_strips_leading_dots() {
        let dialog = FileDialog::new(FileDialogKind::SaveFile)
            .with_title("Save Sprite")
            .with_default_extension(".aseprite")
            .with_filter(".png", "PNG image");

        assert_eq!(dialog.title, "Save Sprite");
        assert_eq!(dialog.default_extension.as_deref(), Some("aseprite"));
        assert_eq!(dialog.filters[0].extension, "png");
    }

    #[test]
    fn default_extension_only_fills_missing_extension() {
        let dialog = FileDialog::new(FileDialogKind::SaveFile)
            .with_default_extension("png")
            .with_file_name("sprite");
        assert_eq!(
            dialog.file_name_with_default_extension(),
            Some(PathBuf::from("sprite.png"))
        );

        let dialog = dialog.with_file_name("sprite.gif");
        assert_eq!(
            dialog.file_name_with_default_extension(),
            Some(PathBuf::from("sprite.gif"))
        );
    }

    #[test]
    fn only_open_files_allows_multiple() {
        assert!(FileDialogKind::OpenFiles.allows_multiple());
        assert!(!FileDialogKind::OpenFile.allows_multiple());
        assert!(!FileDialogKind::SaveFile.allows_multiple());
    }
}
