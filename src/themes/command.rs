use crate::config::ClassifierConfig;
use crate::themes::classifier::{ClassifierError, ClassifierRequest, ThemeClassifier};
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::runtime::Builder;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs an external program per request: request JSON on stdin, reply on
/// stdout.
///
/// The request is written while the reply is read, so a program that answers
/// before draining its input cannot stall the exchange. A program still
/// running at the deadline is killed and reaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: ClassifierConfig::default().timeout(),
        }
    }

    /// `None` for an empty command line.
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn exchange(&self, payload: Vec<u8>) -> Result<String, ClassifierError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ClassifierError::Unavailable(format!("{}: {e}", self.program)))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let outcome = timeout(self.timeout, async {
            let (_, stdout, stderr) =
                tokio::try_join!(write_request(stdin, &payload), read_all(stdout), read_all(stderr))?;
            let status = child.wait().await?;
            Ok::<_, io::Error>((status, stdout, stderr))
        })
        .await;

        match outcome {
            Ok(Ok((status, stdout, stderr))) => self.reply_from(status, stdout, &stderr),
            Ok(Err(err)) => {
                self.reap(&mut child).await;
                Err(ClassifierError::Unavailable(format!("{}: {err}", self.program)))
            }
            Err(_) => {
                self.reap(&mut child).await;
                Err(ClassifierError::TimedOut(self.timeout))
            }
        }
    }

    async fn reap(&self, child: &mut tokio::process::Child) {
        if let Err(err) = child.kill().await {
            warn!(program = %self.program, error = %err, "Could not kill classifier");
        }
    }

    fn reply_from(
        &self,
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: &[u8],
    ) -> Result<String, ClassifierError> {
        if !status.success() {
            let stderr = String::from_utf8_lossy(stderr);
            return Err(ClassifierError::Unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }

        debug!(program = %self.program, bytes = stdout.len(), "Classifier replied");
        String::from_utf8(stdout)
            .map_err(|e| ClassifierError::Malformed(format!("reply is not UTF-8: {e}")))
    }
}

async fn write_request(stdin: Option<ChildStdin>, payload: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    // The program may answer without reading its whole input.
    match stdin.write_all(payload).await {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

async fn read_all(stream: Option<impl AsyncRead + Unpin>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

impl ThemeClassifier for CommandClassifier {
    fn classify(&self, request: &ClassifierRequest) -> Result<String, ClassifierError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ClassifierError::Unavailable(format!("cannot encode request: {e}")))?;

        // Each call gets its own driver so the child is owned, timed and
        // reaped on the calling thread.
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ClassifierError::Unavailable(format!("cannot start runtime: {e}")))?;
        runtime.block_on(self.exchange(payload))
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Stands in when no backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClassifier;

impl ThemeClassifier for UnavailableClassifier {
    fn classify(&self, _request: &ClassifierRequest) -> Result<String, ClassifierError> {
        Err(ClassifierError::Unavailable(
            "no classifier command configured".into(),
        ))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Backend described by the `[classifier]` section.
pub fn classifier_from_config(config: &ClassifierConfig) -> Arc<dyn ThemeClassifier> {
    match config
        .command
        .as_deref()
        .and_then(CommandClassifier::from_command_line)
    {
        Some(command) => Arc::new(command.with_timeout(config.timeout())),
        None => Arc::new(UnavailableClassifier),
    }
}
