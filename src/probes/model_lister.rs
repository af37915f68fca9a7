//! Model lister: prints the models visible to an API key

use crate::core::auth::Credential;
use crate::core::client::ProbeError;
use crate::core::services::GeminiClient;
use crate::core::services::gemini::Listing;
use std::io::{self, Write};

/// Outcome of one listing attempt
pub type ListOutcome = Result<Listing, ProbeError>;

/// Write the report for a listing attempt
pub fn render<W: Write>(outcome: &ListOutcome, out: &mut W) -> io::Result<()> {
    match outcome {
        Ok(listing) => {
            writeln!(out, "Status: {}", listing.status)?;
            writeln!(out, "Found {} models:", listing.models.models.len())?;
            for model in &listing.models.models {
                writeln!(out, " - {}", model.name)?;
            }
        }
        Err(ProbeError::Status { status, body }) => {
            writeln!(out, "Status: {}", status)?;
            writeln!(out, "Response: {}", body)?;
        }
        Err(e) => {
            if let ProbeError::MalformedBody { status, .. } = e {
                writeln!(out, "Status: {}", status)?;
            }
            writeln!(out, "Error: {}", e)?;
        }
    }
    Ok(())
}

/// List models with `credential` and report the result to `out`
pub async fn run<W: Write>(
    client: &GeminiClient,
    credential: &Credential,
    out: &mut W,
) -> io::Result<ListOutcome> {
    let outcome = client.list_models(credential).await;
    render(&outcome, out)?;
    Ok(outcome)
}
