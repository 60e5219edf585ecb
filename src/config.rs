use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::post_list::{SourceDir, DEFAULT_EXTENSION};

const EXE_DIR_VAR: &str = "${exe_dir}";

#[derive(Deserialize)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub catalog_file: PathBuf,
}

#[derive(Deserialize, Default)]
pub struct Ingest {
    pub extension: Option<String>,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub ingest: Ingest,
    pub log: Option<Log>,
}

impl Config {
    pub fn source_dir(&self) -> SourceDir {
        let extension = self.ingest.extension.as_deref().unwrap_or(DEFAULT_EXTENSION);
        SourceDir::new(self.paths.posts_dir.clone(), extension)
    }
}

fn parse_path(path: PathBuf, exe_dir: &Path) -> PathBuf {
    match path.to_str() {
        Some(str_path) if str_path.starts_with(EXE_DIR_VAR) => {
            PathBuf::from(str_path.replace(EXE_DIR_VAR, &exe_dir.to_string_lossy()))
        }
        _ => path,
    }
}

fn exe_dir() -> io::Result<PathBuf> {
    let cur_exe = env::current_exe()?;
    cur_exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Executable has no parent directory"))
}

pub fn parse_config(cfg_content: &str, exe_dir: &Path) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir, exe_dir),
        catalog_file: parse_path(cfg.paths.catalog_file, exe_dir),
    };

    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(|location| parse_path(location, exe_dir));
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content, &exe_dir()?)
}
