use std::time::Instant;

use crate::config::Config;
use crate::error::RsaError;
use crate::formatter;
use crate::models::Operation;
use crate::orchestrator::RsaOrchestrator;
use crate::rsa_service::OpenSslProvider;

// Handler for one encrypt or decrypt invocation, returns the rendered JSON
pub fn run(config: Config, operation: Operation) -> Result<String, RsaError> {
    let start = Instant::now();

    let key_type = config.rsa.key_type(operation);
    let key_string = config.rsa.key_string(key_type);

    tracing::debug!(
        %operation,
        key_type,
        supplied_key = !key_string.is_empty(),
        bits = config.rsa.bits,
        "starting rsa operation"
    );

    let orchestrator = RsaOrchestrator::new(OpenSslProvider::new(config.rsa.bits));
    let result = orchestrator
        .dispatch(operation, key_type, key_string, &config.input)
        .inspect_err(|e| {
            tracing::error!(
                %operation,
                key_type,
                failed_key = e.key_mode().map(|mode| mode.as_str()),
                key_string,
                input = %config.input,
                "{}",
                e
            );
        })?;

    let output = formatter::format(&result, config.output.pretty).inspect_err(|e| {
        tracing::error!(%operation, "{}", e);
    })?;

    // Record operation timing
    let elapsed = start.elapsed();
    tracing::debug!(%operation, ?elapsed, "rsa operation finished");

    Ok(output)
}
