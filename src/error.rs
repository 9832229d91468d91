use std::path::PathBuf;

/// Failure confined to a single region. Other regions of the run are unaffected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegionError {
    #[error("missing column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("cannot read peak table {path}: {message}")]
    Unreadable {
        path: PathBuf,
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("malformed peak table {path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid sample key row {path}:{line}: {message}")]
    InvalidDescriptor {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("zero total signal mass (modal height {modal_height}, {n_peaks} expansion peaks)")]
    DegenerateInput { modal_height: f64, n_peaks: usize },
}

impl RegionError {
    pub fn unreadable(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Unreadable {
            path: path.into(),
            kind: source.kind(),
            message: source.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingColumn { .. } => "missing_column",
            Self::Unreadable { .. } => "unreadable",
            Self::Malformed { .. } => "malformed",
            Self::InvalidDescriptor { .. } => "invalid_descriptor",
            Self::DegenerateInput { .. } => "degenerate_input",
        }
    }
}
