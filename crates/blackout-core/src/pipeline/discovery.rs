//! File discovery for finding images under a batch root.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;

/// Discovers eligible image files in directories.
pub struct FileDiscovery {
    config: ProcessingConfig,
    /// Canonical path of a directory whose contents are never returned
    excluded: Option<PathBuf>,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            config,
            excluded: None,
        }
    }

    /// Skip the subtree at `dir`, however the walked paths happen to spell it.
    ///
    /// Directories are matched by canonical path, so `./output` and `output`
    /// (or a symlink to it) are the same directory. A `dir` that does not
    /// exist yet excludes nothing.
    pub fn excluding(mut self, dir: &Path) -> Self {
        self.excluded = std::fs::canonicalize(dir).ok();
        self
    }

    /// Recursively find all files under `root` with a supported extension.
    ///
    /// Unreadable directory entries are ignored. Results are sorted by path
    /// so log output is reproducible; processing order is not guaranteed.
    pub fn discover(&self, root: &Path) -> Vec<DiscoveredFile> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_excluded(e))
            .filter_map(|e| e.ok())
        {
            let entry_path = entry.path();
            if entry.file_type().is_file() && self.is_supported(entry_path) {
                if let Ok(meta) = entry.metadata() {
                    files.push(DiscoveredFile {
                        path: entry_path.to_path_buf(),
                        size: meta.len(),
                    });
                }
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        match &self.excluded {
            Some(excluded) if entry.file_type().is_dir() => std::fs::canonicalize(entry.path())
                .map(|dir| &dir == excluded)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_supported() {
        let discovery = FileDiscovery::new(ProcessingConfig::default());

        for name in [
            "a.jpg", "a.JPG", "a.jpeg", "a.png", "a.bmp", "a.tif", "a.TIFF", "a.webp",
        ] {
            assert!(discovery.is_supported(Path::new(name)), "{name}");
        }
        for name in ["a.gif", "a.txt", "a", ".png.bak", "a.heic"] {
            assert!(!discovery.is_supported(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn test_discover_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("a.jpg"), b"x").unwrap();
        fs::write(root.join("notes.txt"), b"x").unwrap();
        fs::write(root.join("sub/b.PNG"), b"xy").unwrap();
        fs::write(root.join("sub/deeper/c.webp"), b"xyz").unwrap();

        let files = FileDiscovery::new(ProcessingConfig::default()).discover(root);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.jpg"),
                PathBuf::from("sub/b.PNG"),
                PathBuf::from("sub/deeper/c.webp"),
            ]
        );
        assert_eq!(FileDiscovery::total_size(&files), 6);
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileDiscovery::new(ProcessingConfig::default()).discover(dir.path());
        assert!(files.is_empty());
    }

    #[test]
    fn test_excluded_dir_matches_any_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("output")).unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("frame.png"), b"x").unwrap();
        fs::write(root.join("output/frame.png"), b"x").unwrap();

        // The walk sees `sub/../output`, which never starts with `output`.
        let discovery = FileDiscovery::new(ProcessingConfig::default())
            .excluding(&root.join("output"));
        let files = discovery.discover(&root.join("sub/.."));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path.file_name().unwrap(), "frame.png");
        assert!(!files[0].path.to_string_lossy().contains("output"));
    }

    #[test]
    fn test_excluded_root_still_walks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();

        let files = FileDiscovery::new(ProcessingConfig::default())
            .excluding(dir.path())
            .discover(dir.path());
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_custom_format_list() {
        let config = ProcessingConfig {
            supported_formats: vec!["PNG".to_string()],
            ..ProcessingConfig::default()
        };
        let discovery = FileDiscovery::new(config);
        assert!(discovery.is_supported(Path::new("x.png")));
        assert!(!discovery.is_supported(Path::new("x.jpg")));
    }
}
