//! Formatter that runs an external command over stdin/stdout.

use super::{FormatRequest, Formatter, FormatterOptions};
use crate::error::FormatterError;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::io;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Runs `command --parser=<profile> <options...>`, writing the snippet to
/// stdin and taking stdout as the formatted text.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    command: Vec<String>,
}

impl CommandFormatter {
    /// `command[0]` is the binary, the rest are leading arguments.
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    pub fn prettier() -> Self {
        Self::new(vec!["prettier".to_string()])
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::prettier()
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, source: String, request: FormatRequest) -> BoxFuture<'static, Result<String, FormatterError>> {
        run(self.command.clone(), source, request).boxed()
    }
}

async fn run(command: Vec<String>, input: String, request: FormatRequest) -> Result<String, FormatterError> {
    let Some((tool, base_args)) = command.split_first() else {
        return Err(FormatterError::ExecutionFailed {
            tool: "unknown".to_string(),
            message: "Empty command".to_string(),
        });
    };

    let mut cmd = Command::new(tool);
    cmd.args(base_args)
        .arg(format!("--parser={}", request.profile))
        .args(option_arguments(&request.options))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FormatterError::ToolNotFound { tool: tool.clone() },
        _ => FormatterError::Io {
            message: format!("Failed to spawn '{tool}': {e}"),
        },
    })?;

    let stdin = child.stdin.take();
    let write_input = async move {
        match stdin {
            Some(mut stdin) => stdin.write_all(input.as_bytes()).await,
            None => Ok(()),
        }
    };
    let (written, output) = tokio::join!(write_input, child.wait_with_output());

    let output = output.map_err(|e| FormatterError::Io {
        message: format!("Failed to wait for '{tool}': {e}"),
    })?;

    if !output.status.success() {
        let exit_code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FormatterError::ExecutionFailed {
            tool: tool.clone(),
            message: format!("Exit code {exit_code}: {}", stderr.trim()),
        });
    }

    written.map_err(|e| FormatterError::Io {
        message: format!("Failed to write to stdin: {e}"),
    })?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Command-line flags for formatter options: `printWidth = 80` becomes
/// `--print-width=80`, booleans become `--flag` / `--no-flag`.
fn option_arguments(options: &FormatterOptions) -> Vec<String> {
    options
        .iter()
        .filter_map(|(key, value)| {
            let flag = kebab_case(key);
            match value {
                serde_json::Value::Null => None,
                serde_json::Value::Bool(true) => Some(format!("--{flag}")),
                serde_json::Value::Bool(false) => Some(format!("--no-{flag}")),
                serde_json::Value::String(s) => Some(format!("--{flag}={s}")),
                other => Some(format!("--{flag}={other}")),
            }
        })
        .collect()
}

fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c == '_' {
            out.push('-');
        } else if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
