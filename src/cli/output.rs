//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use sigcheck::{CheckSummary, SigCheckError};

/// Writes the success summary to stdout.
pub fn write_summary(summary: &CheckSummary) -> Result<(), SigCheckError> {
    let mut stdout = io::stdout().lock();
    write_summary_to(&mut stdout, summary)
}

/// Writes the success summary to the given writer.
pub fn write_summary_to<W: Write>(
    writer: &mut W,
    summary: &CheckSummary,
) -> Result<(), SigCheckError> {
    writeln!(
        writer,
        "Projects successfully verified ({} repositories checked).",
        summary.scanned
    )
    .map_err(|error| SigCheckError::Io {
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sigcheck::CheckSummary;

    use super::write_summary_to;

    #[rstest]
    fn summary_reports_checked_count() {
        let mut buffer = Vec::new();
        write_summary_to(&mut buffer, &CheckSummary { scanned: 3 }).expect("write should succeed");

        let output = String::from_utf8(buffer).expect("output should be UTF-8");
        assert_eq!(
            output,
            "Projects successfully verified (3 repositories checked).\n"
        );
    }
}
