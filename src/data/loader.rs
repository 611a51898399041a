use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::AppError;

use super::types::{UsageLine, UsageSummary};

/// Placeholder model Claude Code writes for locally generated messages
const SYNTHETIC_MODEL: &str = "<synthetic>";

pub(crate) fn load_usage_file(path: &Path) -> Result<UsageSummary, AppError> {
    let file = File::open(path).map_err(|source| AppError::UsageFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(summarize_usage(file))
}

/// Aggregate JSON Lines usage records per model. Blank lines are ignored;
/// unparseable lines and lines without usage are counted as skipped.
pub(crate) fn summarize_usage(reader: impl Read) -> UsageSummary {
    let mut summary = UsageSummary::default();

    for line in BufReader::new(reader).lines() {
        let Ok(line) = line else {
            summary.skipped += 1;
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }

        let (model, usage) = match serde_json::from_str::<UsageLine>(&line) {
            Ok(UsageLine::Flat { model, usage }) => (model, usage),
            Ok(UsageLine::Transcript { message }) => match (message.model, message.usage) {
                (Some(model), Some(usage)) => (model, (&usage).into()),
                _ => {
                    summary.skipped += 1;
                    continue;
                }
            },
            Err(e) => {
                tracing::debug!("Skipping usage line: {}", e);
                summary.skipped += 1;
                continue;
            }
        };

        if model.is_empty() || model == SYNTHETIC_MODEL {
            summary.skipped += 1;
            continue;
        }

        summary.models.entry(model).or_default().add(&usage);
        summary.valid += 1;
    }

    summary
}
