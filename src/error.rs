use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::PostId;

/// Failures raised by a [`CatalogStore`](crate::catalog::CatalogStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {kind} slug `{slug}`")]
    DuplicateSlug { kind: &'static str, slug: String },

    #[error("post {0} does not exist")]
    PostNotFound(PostId),

    #[error("IO error on catalog file `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("catalog file `{0}` is not valid")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Anything that aborts a reconciliation pass.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed document `{file}`: {reason}")]
    MalformedDocument { file: PathBuf, reason: String },

    #[error("malformed date in `{file}`: {field} = '{value}'")]
    MalformedDate {
        file: PathBuf,
        field: String,
        value: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error when reading `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = IngestError::MalformedDate {
            file: PathBuf::from("posts/a.md"),
            field: "Published Date".to_string(),
            value: "".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("posts/a.md"));
        assert!(display.contains("Published Date"));

        let err = IngestError::Io {
            path: PathBuf::from("posts"),
            source: io::Error::new(ErrorKind::NotFound, "missing"),
        };
        assert!(format!("{err}").contains("IO error"));

        let err: IngestError = StoreError::DuplicateSlug { kind: "post", slug: "hello".to_string() }.into();
        assert_eq!(format!("{err}"), "duplicate post slug `hello`");
    }
}
