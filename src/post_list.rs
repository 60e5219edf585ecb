use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "md";

/// Directory the posts are read from.
#[derive(Debug, Clone)]
pub struct SourceDir {
    pub root_dir: PathBuf,
    /// Extension of post files, without the dot.
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceEntry {
    Post(PathBuf),
    /// Anything else found in the directory: other extensions, sub directories.
    Other(PathBuf),
}

impl SourceDir {
    pub fn new(root_dir: PathBuf, extension: &str) -> SourceDir {
        SourceDir {
            root_dir,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Entries of the directory, sorted by file name.
    pub fn retrieve_entries(&self) -> io::Result<Vec<SourceEntry>> {
        let mut paths = vec![];
        for entry in fs::read_dir(&self.root_dir)? {
            paths.push(entry?.path());
        }
        paths.sort();

        let entries = paths.into_iter()
            .map(|path| {
                if path.is_file() && self.is_post_file(&path) {
                    SourceEntry::Post(path)
                } else {
                    SourceEntry::Other(path)
                }
            })
            .collect();
        Ok(entries)
    }

    fn is_post_file(&self, path: &Path) -> bool {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(file_name) => file_name.ends_with(&format!(".{}", self.extension)),
            None => false,
        }
    }
}
