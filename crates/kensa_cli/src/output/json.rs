//! JSON output formatter

use kensa_core::VerificationReport;
use miette::{IntoDiagnostic, Result};

pub fn output_json(reports: &[VerificationReport]) -> Result<()> {
    println!("{}", serde_json::to_string(reports).into_diagnostic()?);
    Ok(())
}
