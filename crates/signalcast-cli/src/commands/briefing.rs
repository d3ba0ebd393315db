use serde_json::Value;
use signalcast_core::AnalystClient;

use crate::error::CliError;

use super::CommandResult;

pub async fn run(client: &AnalystClient) -> Result<CommandResult, CliError> {
    let result = match client.request_briefing().await {
        Ok(briefing) => CommandResult::ok(Value::String(briefing)),
        Err(error) => CommandResult::failed(&error),
    };
    Ok(result.with_warning("informational only, not financial advice"))
}

#[cfg(test)]
mod tests {
    use signalcast_core::{BackendError, GenerateResponse};

    use super::*;
    use crate::commands::test_support::scripted_client;

    #[tokio::test]
    async fn briefing_text_becomes_data() {
        let (_backend, client) =
            scripted_client(vec![Ok(GenerateResponse::from_text("  Markets are calm.\n"))]);

        let result = run(&client).await.expect("command");

        assert_eq!(result.data, Value::String(String::from("Markets are calm.")));
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn backend_failure_becomes_envelope_error() {
        let (_backend, client) =
            scripted_client(vec![Err(BackendError::status(429, "RESOURCE_EXHAUSTED"))]);

        let result = run(&client).await.expect("command");

        assert_eq!(result.data, Value::Null);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "acquisition.rate_limited");
    }
}
