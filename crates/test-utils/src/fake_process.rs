use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskcron::exec::{CommandLine, InvokeError, InvokeFuture, ProcessInvoker, ProcessOutput};

/// What the fake does when a given program is invoked.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// Complete immediately with this output.
    Output(ProcessOutput),
    /// Complete with this output after a delay.
    Delayed(Duration, ProcessOutput),
    /// Fail to start, as if the program did not exist.
    SpawnError(String),
    /// Never complete.
    Hang,
}

#[derive(Debug, Default)]
struct FakeState {
    responses: HashMap<String, FakeResponse>,
    calls: Vec<String>,
}

/// A fake process capability that:
/// - records every command line it is asked to run
/// - answers with a scripted response per program name
///   (default: exit 0 with empty output)
#[derive(Debug, Clone, Default)]
pub struct FakeProcessInvoker {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProcessInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, program: &str, response: FakeResponse) -> &Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(program.to_string(), response);
        self
    }

    /// Every invoked command line, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, command_line: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == command_line).count()
    }

    /// Poll until `command_line` has been invoked at least `times` times.
    pub async fn wait_for_calls(&self, command_line: &str, times: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
        while self.call_count(command_line) < times {
            if tokio::time::Instant::now() > deadline {
                panic!(
                    "expected {times} call(s) of {command_line:?}, saw {:?}",
                    self.calls()
                );
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl ProcessInvoker for FakeProcessInvoker {
    fn invoke<'a>(&'a self, command: &'a CommandLine) -> InvokeFuture<'a> {
        let response = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(command.to_string());
            state
                .responses
                .get(&command.program)
                .cloned()
                .unwrap_or_else(|| FakeResponse::Output(ProcessOutput::success("")))
        };

        Box::pin(async move {
            match response {
                FakeResponse::Output(out) => Ok(out),
                FakeResponse::Delayed(delay, out) => {
                    tokio::time::sleep(delay).await;
                    Ok(out)
                }
                FakeResponse::SpawnError(msg) => Err(InvokeError::Spawn {
                    program: command.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, msg),
                }),
                FakeResponse::Hang => std::future::pending::<Result<ProcessOutput, InvokeError>>().await,
            }
        })
    }
}
