//! Input file catalogs: a directory scan and an explicit list.

use crate::domain::error::StatsError;
use crate::ports::catalog_port::CatalogPort;
use std::fs;
use std::path::PathBuf;

/// Every regular file in `dir` whose name ends with `suffix`.
pub struct DirCatalog {
    dir: PathBuf,
    suffix: String,
}

impl DirCatalog {
    pub fn new(dir: PathBuf, suffix: impl Into<String>) -> Self {
        Self {
            dir,
            suffix: suffix.into(),
        }
    }
}

impl CatalogPort for DirCatalog {
    fn list_files(&self) -> Result<Vec<PathBuf>, StatsError> {
        let catalog_err = |e: std::io::Error| StatsError::Catalog {
            dir: self.dir.display().to_string(),
            reason: e.to_string(),
        };

        let entries = fs::read_dir(&self.dir).map_err(catalog_err)?;
        let mut files = Vec::new();

        for entry in entries {
            let entry = entry.map_err(catalog_err)?;
            let name = entry.file_name();
            if !name.to_string_lossy().ends_with(&self.suffix) {
                continue;
            }
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            files.push(entry.path());
        }

        // read_dir order is filesystem-dependent; sort so runs are repeatable
        files.sort();
        Ok(files)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Files named explicitly by the caller, kept in the given order.
pub struct FileList {
    files: Vec<PathBuf>,
}

impl FileList {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl CatalogPort for FileList {
    fn list_files(&self) -> Result<Vec<PathBuf>, StatsError> {
        Ok(self.files.clone())
    }

    fn location(&self) -> String {
        format!("{} listed file(s)", self.files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path();
        fs::write(path.join("MSFT.csv"), "h\n").unwrap();
        fs::write(path.join("AAPL.csv"), "h\n").unwrap();
        fs::write(path.join("notes.txt"), "h\n").unwrap();
        fs::write(path.join("IBM.csv.bak"), "h\n").unwrap();
        fs::create_dir(path.join("archive.csv")).unwrap();
        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn lists_matching_files_only() {
        let dir = setup();
        let catalog = DirCatalog::new(dir.path().to_path_buf(), ".csv");
        let files = catalog.list_files().unwrap();
        let mut got = names(&files);
        got.sort();
        assert_eq!(got, vec!["AAPL.csv", "MSFT.csv"]);
        assert!(files.iter().all(|p| p.starts_with(dir.path())));
    }

    #[test]
    fn custom_suffix() {
        let dir = setup();
        let catalog = DirCatalog::new(dir.path().to_path_buf(), ".txt");
        assert_eq!(names(&catalog.list_files().unwrap()), vec!["notes.txt"]);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let catalog = DirCatalog::new(dir.path().join("absent"), ".csv");
        let err = catalog.list_files().unwrap_err();
        assert!(matches!(err, StatsError::Catalog { .. }));
        assert!(!err.is_skippable());
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let catalog = DirCatalog::new(dir.path().to_path_buf(), ".csv");
        assert!(catalog.list_files().unwrap().is_empty());
    }

    #[test]
    fn file_list_keeps_order() {
        let list = FileList::new(vec![PathBuf::from("b.csv"), PathBuf::from("a.csv")]);
        assert_eq!(
            list.list_files().unwrap(),
            vec![PathBuf::from("b.csv"), PathBuf::from("a.csv")]
        );
        assert_eq!(list.location(), "2 listed file(s)");
    }
}
