use std::path::PathBuf;
use thiserror::Error;

pub type SheetDiffResult<T> = Result<T, SheetDiffError>;

#[derive(Error, Debug)]
pub enum SheetDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Directory '{}' created. Please add Excel files and rerun.", .0.display())]
    DirectoryCreated(PathBuf),

    #[error("Not enough spreadsheet files in '{}': found {found}, need 2", .dir.display())]
    NotEnoughFiles { dir: PathBuf, found: usize },

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Archive error: {0}")]
    Archive(String),
}
