//! The interactive chat loop.
//!
//! One engine handle lives for the whole session, so whatever context the
//! engine keeps carries over from one line to the next. Lines are handled
//! strictly one at a time: read, ask, print, prompt again.

use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::consts::{ANSWER_LABEL, FAREWELL, PROMPT};
use crate::engine::{Engine, EngineFactory};
use crate::spinner::Spinner;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Show a spinner on stderr while the engine is thinking.
    pub spinner: bool,
}

/// What a session did before it ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Questions answered.
    pub turns: usize,
}

pub struct Session<R, W> {
    engine: Box<dyn Engine>,
    input: Lines<R>,
    output: W,
    options: SessionOptions,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Start the session's single engine handle.
    pub fn start(factory: &dyn EngineFactory, input: R, output: W, options: SessionOptions) -> Self {
        Self {
            engine: factory.start(),
            input: input.lines(),
            output,
            options,
        }
    }

    /// Run until the input ends (normal) or a read or engine call fails
    /// (returned as the error). Nothing is read or asked after either.
    pub async fn run(mut self) -> Result<SessionSummary> {
        let mut turns = 0;

        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            let line = match self.input.next_line().await.context("failed to read input")? {
                Some(line) => line,
                None => {
                    writeln!(self.output, "\n{FAREWELL}")?;
                    self.output.flush()?;
                    return Ok(SessionSummary { turns });
                }
            };

            let query = line.trim();
            if query.is_empty() {
                continue;
            }

            let answer = self.dispatch(query).await?;
            turns += 1;
            tracing::debug!(turn = turns, "answered");

            writeln!(self.output, "\n{ANSWER_LABEL}: {answer}")?;
            self.output.flush()?;
        }
    }

    async fn dispatch(&mut self, query: &str) -> Result<String> {
        let spinner = self.options.spinner.then(|| Spinner::start("thinking"));
        let result = self.engine.ask(query).await;
        if let Some(spinner) = spinner {
            spinner.stop().await;
        }
        result
    }
}
