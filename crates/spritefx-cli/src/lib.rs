//! spritefx command-line front end.
//!
//! Decodes an input image, runs one operation or a JSON plan through a
//! [`PostProcessor`], and writes the result as PNG.

pub mod args;
pub mod codec;
pub mod config;
pub mod error;

use spritefx_core::PostProcessor;

pub use args::{Cli, Commands};
pub use error::CliError;

/// Execute a parsed command line.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.engine_config(config::engine_config_from_env());
    let processor = PostProcessor::new(config);

    let requests = cli.command.requests()?;
    for request in &requests {
        if let Err(err) = request.validate() {
            tracing::warn!(operation = request.name(), %err, "rejected request");
            return Err(err.into());
        }
    }

    let io = cli.command.io();
    let image = codec::load_input(&io.input)?;
    tracing::info!(
        width = image.width(),
        height = image.height(),
        mode = %image.mode(),
        operations = requests.len(),
        "loaded input"
    );

    let output = processor.process_chain(&image, &requests)?;
    codec::write_output(&output, &io.output)
}
