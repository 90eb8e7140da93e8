use anyhow::{Context, Result};
use log::debug;
use std::io::Write;

use crate::minify::Minifier;
use crate::template::RenderedBundle;

/// What happens to the finished artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emit {
    /// Hand the artifact back to the caller; nothing is written
    #[default]
    Return,
    /// Write the artifact to standard output; nothing is returned
    Stdout,
}

/// Produce the final artifact text.
///
/// Only the body goes through `minifier`; the header is kept verbatim so attribution
/// survives compression. The result always ends in exactly one line break.
pub fn finalize(bundle: RenderedBundle, minifier: Option<&dyn Minifier>) -> Result<String> {
    let RenderedBundle { header, body } = bundle;
    let body = match minifier {
        Some(minifier) => {
            let minified = minifier.minify(&body).context("Failed to minify bundle")?;
            debug!("Minified bundle body: {} -> {} bytes", body.len(), minified.len());
            minified.trim_end_matches('\n').to_owned()
        }
        None => body,
    };

    let mut artifact = String::with_capacity(header.len() + body.len() + 1);
    artifact.push_str(&header);
    artifact.push_str(&body);
    artifact.push('\n');
    Ok(artifact)
}

/// Deliver the artifact: write it to `out` for [`Emit::Stdout`], or return it for
/// [`Emit::Return`]. Never both.
pub fn emit<W: Write>(artifact: String, mode: Emit, mut out: W) -> Result<Option<String>> {
    match mode {
        Emit::Return => Ok(Some(artifact)),
        Emit::Stdout => {
            out.write_all(artifact.as_bytes())
                .and_then(|()| out.flush())
                .context("Failed to write bundle to stdout")?;
            Ok(None)
        }
    }
}
