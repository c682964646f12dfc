//! Shared helpers for use cases.
//!
//! Every language-model call in the research loop goes through here so the
//! per-call deadline and reasoning-block stripping apply uniformly.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use scholia_domain::{ModelSpec, strip_thinking};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Run `future` under `deadline`, mapping expiry to [`GatewayError::Timeout`].
pub(crate) async fn with_deadline<T>(
    deadline: Duration,
    future: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, GatewayError> {
    match tokio::time::timeout(deadline, future).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout),
    }
}

/// One-shot free-form call: fresh session, one message, reasoning stripped.
pub(crate) async fn ask(
    gateway: &dyn LlmGateway,
    spec: &ModelSpec,
    system_prompt: &str,
    prompt: &str,
    deadline: Duration,
) -> Result<String, GatewayError> {
    with_deadline(deadline, async {
        let session = gateway.create_session(spec, system_prompt).await?;
        let text = session.send(prompt).await?;
        Ok(strip_thinking(&text).to_string())
    })
    .await
}

/// One-shot schema-constrained call.
pub(crate) async fn ask_structured(
    gateway: &dyn LlmGateway,
    spec: &ModelSpec,
    system_prompt: &str,
    prompt: &str,
    schema: &serde_json::Value,
    deadline: Duration,
) -> Result<serde_json::Value, GatewayError> {
    with_deadline(deadline, async {
        let session = gateway.create_session(spec, system_prompt).await?;
        session.send_structured(prompt, schema).await
    })
    .await
}

/// Cancellation-aware wrapper: resolves to `None` if `token` fires first.
pub(crate) async fn unless_cancelled<T>(
    token: &CancellationToken,
    future: impl Future<Output = T>,
) -> Option<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        value = future => Some(value),
    }
}
