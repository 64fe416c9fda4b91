//! Error types for planetary grids.

use thiserror::Error;

/// Errors raised while configuring or querying a planetary grid.
///
/// Coordinates outside the nominal lat/lon domain are never an error: they
/// clamp to the nearest valid cell. Indices outside a grid's layout always are.
#[derive(Error, Debug)]
pub enum GridError {
    /// Illegal grid parameters (row count, pole position, pixel size, ...).
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),

    /// No Gaussian row table is packaged for this row count.
    #[error("unsupported Gaussian grid size: {0} rows (expected 2N for N in 32, 48, 80, 128, 160, 200, 256, 320, 400, 512, 640)")]
    UnsupportedGaussianSize(usize),

    /// A Gaussian row table resource could not be parsed.
    #[error("failed to load Gaussian table N{n}: {message}")]
    TableLoad { n: usize, message: String },

    /// Row index outside `0..num_rows`.
    #[error("row index {row} out of range (grid has {num_rows} rows)")]
    RowOutOfRange { row: usize, num_rows: usize },

    /// Bin index that does not address a cell of the grid.
    #[error("bin index {bin} out of range (index bound {bound})")]
    BinOutOfRange { bin: u64, bound: u64 },

    /// The grid does not provide this operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The grid is too large for 32-bit legacy bin numbers.
    #[error("grid index bound {bound} exceeds the 32-bit legacy index range")]
    LegacyRangeExceeded { bound: u64 },

    /// Legacy bin number outside `1..=num_bins`.
    #[error("legacy bin {bin} out of range (expected 1..={num_bins})")]
    InvalidLegacyBin { bin: i64, num_bins: u64 },

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GridError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a TableLoad error.
    pub fn table_load(n: usize, msg: impl Into<String>) -> Self {
        Self::TableLoad {
            n,
            message: msg.into(),
        }
    }

    /// Create an Unsupported error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Whether this error stems from grid configuration rather than a query.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GridError::InvalidConfig(_)
                | GridError::UnsupportedGaussianSize(_)
                | GridError::TableLoad { .. }
                | GridError::LegacyRangeExceeded { .. }
                | GridError::Io(_)
                | GridError::Yaml(_)
        )
    }
}

/// Result type for grid operations.
pub type GridResult<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GridError::RowOutOfRange { row: 7, num_rows: 6 };
        assert_eq!(err.to_string(), "row index 7 out of range (grid has 6 rows)");

        let err = GridError::table_load(32, "expected 64 records, found 63");
        assert_eq!(
            err.to_string(),
            "failed to load Gaussian table N32: expected 64 records, found 63"
        );
    }

    #[test]
    fn test_config_error_classification() {
        assert!(GridError::invalid_config("odd row count").is_config_error());
        assert!(GridError::UnsupportedGaussianSize(100).is_config_error());
        assert!(!GridError::BinOutOfRange { bin: 10, bound: 5 }.is_config_error());
        assert!(!GridError::unsupported("center_lat").is_config_error());
    }
}
