//! Response rendering for the CLI

use clap::ValueEnum;
use serde_json::json;

use crate::run::Outcome;

/// How the reply is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `0x06 0x41`
    #[default]
    Hex,
    /// `06 41`
    Plain,
    /// One JSON object per run
    Json,
}

/// Render an outcome as lines of text
///
/// An empty reply renders no lines in the text formats.
pub fn render(outcome: &Outcome, format: OutputFormat, decode: bool) -> Vec<String> {
    let decoded = if decode { outcome.decode() } else { None };

    match format {
        OutputFormat::Json => {
            let decoded = match decoded {
                Some(Ok(d)) => json!({ "power": d.power, "detail": d.detail }),
                Some(Err(e)) => json!({ "error": e.to_string() }),
                None => serde_json::Value::Null,
            };
            let value = json!({
                "command": outcome.command,
                "packet": outcome.packet.as_bytes(),
                "response": outcome.response.as_bytes(),
                "decoded": decoded,
            });
            vec![value.to_string()]
        }
        OutputFormat::Hex | OutputFormat::Plain => {
            let mut lines = Vec::new();
            if !outcome.response.is_empty() {
                lines.push(if format == OutputFormat::Hex {
                    outcome.response.hex().join(" ")
                } else {
                    outcome.response.to_string()
                });
            }
            match decoded {
                Some(Ok(d)) => match d.detail {
                    Some(detail) => lines.push(format!("Power: {} ({detail})", d.power)),
                    None => lines.push(format!("Power: {}", d.power)),
                },
                Some(Err(e)) => lines.push(format!("Cannot decode reply: {e}")),
                None => {}
            }
            lines
        }
    }
}
