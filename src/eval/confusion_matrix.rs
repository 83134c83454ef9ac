use crate::error;
use crate::util::Result;
use serde::{Deserialize, Serialize};
use snafu::ensure;

/// A square table of classification counts where cell `(i, j)` holds the
/// number of items with true class `i` that were predicted as class `j`.
///
/// Labels are positionally aligned with the row/column indices. The counts
/// and labels are immutable after construction.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfusionMatrix {
    counts: Vec<Vec<u64>>,
    labels: Vec<String>,
}

impl ConfusionMatrix {
    /// Creates a confusion matrix from row-major counts and class labels.
    ///
    /// # Errors
    ///
    /// Fails with `Error::InvalidInput` if the matrix is empty, not square,
    /// or the number of labels does not match its dimension.
    pub fn new(counts: Vec<Vec<u64>>, labels: Vec<String>) -> Result<Self> {
        ensure!(
            !counts.is_empty(),
            error::InvalidInputSnafu {
                details: "a confusion matrix must have at least one row"
            }
        );

        let dimension = counts.len();

        if let Some(row) = counts.iter().find(|row| row.len() != dimension) {
            return error::InvalidInputSnafu {
                details: format!(
                    "a confusion matrix must be square, but a row has {} columns instead of {}",
                    row.len(),
                    dimension
                ),
            }
            .fail();
        }

        ensure!(
            labels.len() == dimension,
            error::InvalidInputSnafu {
                details: format!(
                    "expected {} labels for a {}x{} matrix, got {}",
                    dimension,
                    dimension,
                    dimension,
                    labels.len()
                ),
            }
        );

        Ok(Self { counts, labels })
    }

    /// Number of classes, i.e. rows and columns.
    pub fn dimension(&self) -> usize {
        self.counts.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, class: usize) -> &str {
        &self.labels[class]
    }

    pub fn count(&self, true_class: usize, predicted_class: usize) -> u64 {
        self.counts[true_class][predicted_class]
    }

    /// Sum of the diagonal, i.e. the number of correctly classified items.
    pub fn trace(&self) -> u64 {
        (0..self.dimension()).map(|i| self.counts[i][i]).sum()
    }

    /// Sum over all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn row_sums(&self) -> Vec<u64> {
        self.counts
            .iter()
            .map(|row| row.iter().sum())
            .collect()
    }

    /// Overall accuracy, `trace / total`, always in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Fails with `Error::DegenerateInput` if any row sums to zero.
    pub fn accuracy(&self) -> Result<f64> {
        self.ensure_positive_row_sums()?;

        Ok(self.trace() as f64 / self.total() as f64)
    }

    /// Divides each cell by its row sum, yielding per-true-class prediction
    /// proportions. Each row of the result sums to one.
    ///
    /// # Errors
    ///
    /// Fails with `Error::DegenerateInput` if any row sums to zero.
    pub fn row_normalized(&self) -> Result<Vec<Vec<f64>>> {
        self.ensure_positive_row_sums()?;

        Ok(self
            .counts
            .iter()
            .zip(self.row_sums())
            .map(|(row, sum)| row.iter().map(|&cell| cell as f64 / sum as f64).collect())
            .collect())
    }

    fn ensure_positive_row_sums(&self) -> Result<()> {
        if let Some(row) = self.row_sums().iter().position(|&sum| sum == 0) {
            return error::DegenerateInputSnafu { row }.fail();
        }

        Ok(())
    }
}
