//! External layout renderer adapter
//!
//! The renderer is the only blocking collaborator in the pipeline: it takes
//! diagram text and returns a vector artifact. Failures and timeouts are
//! fatal to the current conversion and are never retried here.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, span, warn, Level};

use super::error::{ModelError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default time budget for one external render
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Core trait for external layout renderers
pub trait LayoutRenderer: Send + Sync {
    /// Render diagram text into a vector artifact
    fn render(&self, diagram: &str) -> Result<String>;

    /// Get the name of this renderer
    fn name(&self) -> &str;
}

/// Any `Fn(&str) -> Result<String>` is a renderer
impl<F> LayoutRenderer for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn render(&self, diagram: &str) -> Result<String> {
        self(diagram)
    }

    fn name(&self) -> &str {
        "function"
    }
}

/// Renderer that pipes the diagram through an external program
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRenderer {
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    /// `plantuml -tsvg -pipe`
    pub fn plantuml_svg() -> Self {
        Self::new("plantuml", ["-tsvg", "-pipe", "-charset", "UTF-8"])
    }

    /// `dot -Tplain`
    pub fn graphviz_plain() -> Self {
        Self::new("dot", ["-Tplain"])
    }

    /// `dot -Tsvg`, for final artifacts
    pub fn graphviz_svg() -> Self {
        Self::new("dot", ["-Tsvg"])
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fail(&self, message: impl Into<String>) -> ModelError {
        ModelError::renderer(&self.program, message)
    }
}

impl LayoutRenderer for CommandRenderer {
    fn render(&self, diagram: &str) -> Result<String> {
        let render_span = span!(
            Level::INFO,
            "external_render",
            program = %self.program,
            input_len = diagram.len()
        );
        let _enter = render_span.enter();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.fail(format!("failed to start: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.fail("stdin not captured"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.fail("stdout not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| self.fail("stderr not captured"))?;

        // Pipes drain on their own threads while the child is polled
        let input = diagram.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));
        let out_reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });
        let err_reader = thread::spawn(move || {
            let mut buf = String::new();
            stderr.read_to_string(&mut buf).map(|_| buf)
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Renderer timed out");
                return Err(ModelError::RendererTimeout {
                    program: self.program.clone(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        if let Ok(Err(e)) = writer.join() {
            debug!(error = %e, "Renderer closed stdin early");
        }
        let output = out_reader
            .join()
            .map_err(|_| self.fail("stdout reader panicked"))??;
        let diagnostics = err_reader
            .join()
            .map_err(|_| self.fail("stderr reader panicked"))?
            .unwrap_or_default();

        if !status.success() {
            warn!(%status, "Renderer exited with failure");
            return Err(self.fail(format!("exited with {}: {}", status, diagnostics.trim())));
        }

        let artifact =
            String::from_utf8(output).map_err(|_| self.fail("artifact is not valid UTF-8"))?;
        info!(output_len = artifact.len(), "External render completed");
        Ok(artifact)
    }

    fn name(&self) -> &str {
        &self.program
    }
}
