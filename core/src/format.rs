//! Matrix formatter — renders the retention matrix as ordered table rows.
//!
//! Header: placeholder, then `<date>-uu` / `<date>-rate` per date.
//! Body:   one row per base date; placeholder pairs below the diagonal,
//!         `(count, rate%)` on and above it.

use crate::{cohort::RetentionMatrix, config::RetentionConfig, error::RetentionResult};

pub struct MatrixFormatter<'a> {
    placeholder: &'a str,
    delimiter:   char,
}

impl<'a> MatrixFormatter<'a> {
    pub fn new(config: &'a RetentionConfig) -> Self {
        Self {
            placeholder: &config.placeholder,
            delimiter:   config.delimiter,
        }
    }

    /// Header row followed by one row per base date, as cells.
    pub fn rows(&self, matrix: &RetentionMatrix) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(matrix.dates.len() + 1);

        let mut header = vec![self.placeholder.to_string()];
        for date in &matrix.dates {
            header.push(format!("{date}-uu"));
            header.push(format!("{date}-rate"));
        }
        rows.push(header);

        for (i, cohort) in matrix.rows.iter().enumerate() {
            let mut row = vec![cohort.base_date.to_string()];
            for j in 0..matrix.dates.len() {
                if j < i {
                    row.push(self.placeholder.to_string());
                    row.push(self.placeholder.to_string());
                    continue;
                }
                // Cells are diagonal first, then each later date in order.
                let (users, rate) = cohort
                    .cells
                    .get(j - i)
                    .map_or((0, 0.0), |c| (c.users, c.rate));
                row.push(users.to_string());
                row.push(format_rate(rate));
            }
            rows.push(row);
        }
        rows
    }

    /// Rows joined with the configured delimiter.
    pub fn lines(&self, matrix: &RetentionMatrix) -> Vec<String> {
        let sep = self.delimiter.to_string();
        self.rows(matrix).into_iter().map(|row| row.join(&sep)).collect()
    }
}

/// The matrix as pretty-printed JSON, for downstream tooling.
pub fn render_json(matrix: &RetentionMatrix) -> RetentionResult<String> {
    Ok(serde_json::to_string_pretty(matrix)?)
}

/// Two decimal places with a percent suffix, e.g. `50.00%`.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.2}%")
}
