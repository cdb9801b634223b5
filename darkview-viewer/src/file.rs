use darkview_core::{MediaType, ViewerError, ACCEPTED_EXTENSIONS};
use std::path::{Path, PathBuf};

/// A file the user picked or dropped onto the window
#[derive(Debug, Clone)]
pub struct ChosenFile {
    path: PathBuf,
    name: String,
    media_type: MediaType,
}

impl ChosenFile {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string();
        let media_type = MediaType::from_path(&path);
        Self {
            path,
            name,
            media_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    pub async fn read(&self) -> Result<Vec<u8>, ViewerError> {
        tokio::fs::read(&self.path).await.map_err(|err| ViewerError::Read {
            file_name: self.name.clone(),
            reason: err.to_string(),
        })
    }
}

/// Show the file dialog. `None` when the user cancels.
pub async fn choose() -> Option<ChosenFile> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Open a document")
        .add_filter("PDF or image", ACCEPTED_EXTENSIONS)
        .pick_file()
        .await?;
    Some(ChosenFile::from_path(handle.path().to_path_buf()))
}
