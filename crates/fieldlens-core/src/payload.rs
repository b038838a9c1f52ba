//! Metric tensor payload submitted for analysis.

use serde::Serialize;

use crate::error::CoreError;

/// Expression substituted for empty metric components.
pub const ZERO_EXPRESSION: &str = "0";

/// Smallest supported spacetime dimension.
pub const MIN_DIMENSION: usize = 2;

/// Largest supported spacetime dimension.
pub const MAX_DIMENSION: usize = 4;

/// Metric tensor components as entered by the user.
///
/// The grid is always square with side `dimension`, there is one coordinate
/// per dimension, and no cell is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricPayload {
    /// Row-major grid of component expressions (LaTeX or plain text).
    components: Vec<Vec<String>>,

    /// Number of spacetime dimensions.
    dimension: usize,

    /// Coordinate names, in index order.
    coordinates: Vec<String>,
}

impl MetricPayload {
    /// Build a validated payload.
    ///
    /// Cells are trimmed and empty cells become [`ZERO_EXPRESSION`].
    pub fn new(
        components: Vec<Vec<String>>,
        dimension: usize,
        coordinates: Vec<String>,
    ) -> Result<Self, CoreError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&dimension) {
            return Err(CoreError::InvalidInput(format!(
                "Dimension must be between {} and {} (got {})",
                MIN_DIMENSION, MAX_DIMENSION, dimension
            )));
        }

        if coordinates.len() != dimension {
            return Err(CoreError::InvalidInput(format!(
                "Number of coordinates must match dimensions ({})",
                dimension
            )));
        }
        if coordinates.iter().any(|c| c.trim().is_empty()) {
            return Err(CoreError::InvalidInput(
                "Coordinate names must not be empty".to_string(),
            ));
        }

        if components.len() != dimension || components.iter().any(|row| row.len() != dimension) {
            return Err(CoreError::InvalidInput(format!(
                "Metric components must form a {0}x{0} grid",
                dimension
            )));
        }

        let components = components
            .into_iter()
            .map(|row| row.into_iter().map(normalize_cell).collect())
            .collect();
        let coordinates = coordinates
            .into_iter()
            .map(|c| c.trim().to_string())
            .collect();

        Ok(Self {
            components,
            dimension,
            coordinates,
        })
    }

    /// Build a payload from comma-separated coordinate text, taking the
    /// dimension from the coordinate count.
    pub fn from_coordinate_text(
        components: Vec<Vec<String>>,
        coordinates: &str,
    ) -> Result<Self, CoreError> {
        let coordinates = parse_coordinates(coordinates)?;
        let dimension = coordinates.len();
        Self::new(components, dimension, coordinates)
    }

    /// Component grid, row-major.
    pub fn components(&self) -> &[Vec<String>] {
        &self.components
    }

    /// Number of spacetime dimensions.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinate names.
    pub fn coordinates(&self) -> &[String] {
        &self.coordinates
    }

    /// Component `g_{row col}`.
    pub fn component(&self, row: usize, col: usize) -> Option<&str> {
        self.components
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
    }
}

/// Split comma-separated coordinate text into trimmed names.
pub fn parse_coordinates(text: &str) -> Result<Vec<String>, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "Please enter coordinates".to_string(),
        ));
    }
    Ok(text.split(',').map(|c| c.trim().to_string()).collect())
}

fn normalize_cell(cell: String) -> String {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        ZERO_EXPRESSION.to_string()
    } else if trimmed.len() == cell.len() {
        cell
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_cells_become_zero() {
        let payload = MetricPayload::new(
            grid(&[&["-1", ""], &["  ", " r^2 "]]),
            2,
            vec!["t".into(), "r".into()],
        )
        .unwrap();

        assert_eq!(payload.component(0, 1), Some("0"));
        assert_eq!(payload.component(1, 0), Some("0"));
        assert_eq!(payload.component(1, 1), Some("r^2"));
    }

    #[test]
    fn test_coordinate_count_must_match() {
        let components = grid(&[&["1", "0"], &["0", "1"]]);
        let coordinates = vec!["t".into()];
        let err = MetricPayload::new(components, 2, coordinates).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Number of coordinates must match dimensions (2)"
        );
    }

    #[test]
    fn test_grid_must_be_square() {
        let err = MetricPayload::new(
            grid(&[&["1", "0"], &["0"]]),
            2,
            vec!["t".into(), "x".into()],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_dimension_range() {
        let err = MetricPayload::new(grid(&[&["1"]]), 1, vec!["t".into()]).unwrap_err();
        assert!(err.to_string().contains("between 2 and 4"));
    }

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(
            parse_coordinates("t, r, \\theta, \\phi").unwrap(),
            vec!["t", "r", "\\theta", "\\phi"]
        );
        assert_eq!(
            parse_coordinates("   ").unwrap_err().to_string(),
            "Please enter coordinates"
        );
    }

    #[test]
    fn test_from_coordinate_text() {
        let payload = MetricPayload::from_coordinate_text(
            grid(&[&["-1", "0", "0"], &["0", "1", "0"], &["0", "0", "1"]]),
            "t, x, y",
        )
        .unwrap();
        assert_eq!(payload.dimension(), 3);
        assert_eq!(payload.coordinates()[2], "y");
    }
}
