use crate::errors::{AppError, AppResult};
use indicatif::{ProgressBar, ProgressStyle};

/// Creates the progress bar shown while archives are downloaded and extracted.
///
/// # Example
///
/// ```no_run
/// use divvy_tripdata::ui;
///
/// # fn main() -> Result<(), divvy_tripdata::errors::AppError> {
/// let pb = ui::create_progress_bar(12)?;
/// pb.set_message("Downloading 202401-divvy-tripdata.zip");
/// pb.inc(1);
/// pb.finish_with_message("Done");
/// # Ok(())
/// # }
/// ```
pub fn create_progress_bar(total: u64) -> AppResult<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} archives {msg}")
            .map_err(|e| AppError::IoError(format!("Failed to create progress bar template: {e}")))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
