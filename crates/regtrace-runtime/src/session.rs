use crate::{Error, Result};
use chrono::Utc;
use regtrace_engine::summarize;
use regtrace_providers::ProviderRegistry;
use regtrace_proxy::Proxy;
use regtrace_types::{TraceSession, TraceSummary};
use std::net::SocketAddr;
use std::process::Stdio;
use uuid::Uuid;

/// A finalized session plus how the monitored process ended
#[derive(Debug)]
pub struct SessionOutcome {
    pub session: TraceSession,
    pub exit_code: i32,
    pub interrupted: bool,
}

/// Environment overrides recognized by the major model-client SDKs, all
/// pointing at the proxy, plus the marker showing tracing is active.
pub fn build_proxy_env(proxy_addr: SocketAddr) -> Vec<(String, String)> {
    let proxy_url = format!("http://{}", proxy_addr);
    vec![
        ("OPENAI_BASE_URL".to_string(), proxy_url.clone()),
        // Older OpenAI SDK versions
        ("OPENAI_API_BASE".to_string(), proxy_url.clone()),
        ("ANTHROPIC_BASE_URL".to_string(), proxy_url.clone()),
        ("AZURE_OPENAI_ENDPOINT".to_string(), proxy_url.clone()),
        // Generic override for custom clients
        ("LLM_API_BASE".to_string(), proxy_url.clone()),
        ("REGTRACE_PROXY".to_string(), proxy_url),
        ("REGTRACE_TRACING".to_string(), "1".to_string()),
    ]
}

/// Run a command behind the interception proxy and capture a session.
///
/// State machine: the session starts when the child launch begins, traces
/// accumulate inside the proxy while the child runs, and the session is
/// finalized (drained exactly once, summarized in one pass) when the child
/// exits or a Ctrl-C arrives. Partial capture after an interrupt is a valid
/// terminal state.
pub async fn run_traced(command: &[String], registry: ProviderRegistry) -> Result<SessionOutcome> {
    let proxy = Proxy::start(registry).await?;
    let env = build_proxy_env(proxy.addr());

    let session_id = Uuid::new_v4();
    let start_time = Utc::now();

    let (exit_code, interrupted) = supervise(command, &env).await?;

    proxy.shutdown().await;
    let traces = proxy.drain();
    let summary = summarize(&traces);

    tracing::info!(
        session = %session_id,
        calls = summary.total_calls,
        exit_code,
        interrupted,
        "trace session finalized"
    );

    Ok(SessionOutcome {
        session: TraceSession {
            id: session_id,
            start_time,
            end_time: Utc::now(),
            command: command.join(" "),
            traces,
            summary,
        },
        exit_code,
        interrupted,
    })
}

/// Run a command with no proxy; the session is empty but still well-formed.
pub async fn run_untraced(command: &[String]) -> Result<SessionOutcome> {
    let session_id = Uuid::new_v4();
    let start_time = Utc::now();

    let (exit_code, interrupted) = supervise(command, &[]).await?;

    Ok(SessionOutcome {
        session: TraceSession {
            id: session_id,
            start_time,
            end_time: Utc::now(),
            command: command.join(" "),
            traces: Vec::new(),
            summary: TraceSummary::default(),
        },
        exit_code,
        interrupted,
    })
}

/// Spawn the child and wait for exit or Ctrl-C. On interrupt the child is
/// killed and the caller still finalizes with whatever was captured.
async fn supervise(command: &[String], env: &[(String, String)]) -> Result<(i32, bool)> {
    let Some((program, args)) = command.split_first() else {
        return Err(Error::InvalidOperation("no command specified".to_string()));
    };

    let mut child = tokio::process::Command::new(program)
        .args(args)
        .envs(env.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()?;

    tokio::select! {
        status = child.wait() => {
            let status = status?;
            Ok((status.code().unwrap_or(1), false))
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, stopping monitored process");
            let _ = child.kill().await;
            Ok((130, true))
        }
    }
}
