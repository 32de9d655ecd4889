//! Zip bundling of comparison artifacts

use crate::error::{SheetDiffError, SheetDiffResult};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Deflate `files` into `zip_path`, each stored under its file name
pub fn bundle(files: &[PathBuf], zip_path: &Path) -> SheetDiffResult<()> {
    let mut seen = HashSet::new();
    for file in files {
        let name = entry_name(file)?;
        if !seen.insert(name.clone()) {
            return Err(SheetDiffError::Archive(format!(
                "Duplicate archive entry: {}",
                name
            )));
        }
    }

    let writer = BufWriter::new(File::create(zip_path)?);
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        let name = entry_name(file)?;
        let data = std::fs::read(file)?;
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&data)?;
        debug!(entry = %name, bytes = data.len(), "archived file");
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(())
}

fn entry_name(path: &Path) -> SheetDiffResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SheetDiffError::Archive(format!("Not a file: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_bundle_roundtrip() {
        let temp = TempDir::new().unwrap();
        let report = temp.path().join("difference.txt");
        let book = temp.path().join("difference.xlsx");
        std::fs::write(&report, "report body").unwrap();
        std::fs::write(&book, [0u8, 1, 2, 3]).unwrap();

        let zip_path = temp.path().join("difference.zip");
        bundle(&[report, book], &zip_path).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut body = String::new();
        archive
            .by_name("difference.txt")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "report body");
    }

    #[test]
    fn test_bundle_rejects_duplicate_names() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        std::fs::create_dir(&a).unwrap();
        std::fs::write(a.join("x.txt"), "1").unwrap();
        std::fs::write(temp.path().join("x.txt"), "2").unwrap();

        let result = bundle(
            &[a.join("x.txt"), temp.path().join("x.txt")],
            &temp.path().join("out.zip"),
        );
        assert!(matches!(result, Err(SheetDiffError::Archive(_))));
    }
}
