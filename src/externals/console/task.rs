use futures::StreamExt;
use serde_json::Value;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tracing::{error, info, warn};

use crate::extension::Extension;

/// One line typed into the console.
#[derive(Debug, PartialEq)]
pub enum ConsoleCommand {
    Call { op: String, args: Vec<Value> },
    Status,
    Describe,
    Quit,
    Empty,
}

impl ConsoleCommand {
    /// `<operation> [args...]`; numeric arguments become numbers, the rest strings.
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return ConsoleCommand::Empty;
        };
        match first {
            "status" => ConsoleCommand::Status,
            "describe" => ConsoleCommand::Describe,
            "quit" | "exit" => ConsoleCommand::Quit,
            op => ConsoleCommand::Call {
                op: op.to_owned(),
                args: words
                    .map(|word| match word.parse::<f64>() {
                        Ok(n) => serde_json::json!(n),
                        Err(_) => Value::String(word.to_owned()),
                    })
                    .collect(),
            },
        }
    }
}

/// Run one command against the extension. Returns the text to print, or
/// `None` when the console should stop.
pub fn execute(extension: &Extension, command: ConsoleCommand) -> Option<String> {
    let output = match command {
        ConsoleCommand::Quit => return None,
        ConsoleCommand::Empty => String::new(),
        ConsoleCommand::Status => match serde_json::to_string(&extension.status().report()) {
            Ok(json) => json,
            Err(e) => format!("error: {}", e),
        },
        ConsoleCommand::Describe => match serde_json::to_string_pretty(extension.descriptor()) {
            Ok(json) => json,
            Err(e) => format!("error: {}", e),
        },
        ConsoleCommand::Call { op, args } => match extension.host().call(&op, &args) {
            Ok(value) => value.to_string(),
            Err(e) => format!("error: {}", e),
        },
    };
    Some(output)
}

/// Task: Stand-in block host reading calls from stdin, one per line, until
/// `quit` or end of input.
#[tracing::instrument(skip_all)]
pub async fn task_console_host(extension: &Extension) {
    info!("Started.");
    let mut lines = LinesStream::new(BufReader::new(stdin()).lines());
    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read from stdin. Error: {}", e);
                break;
            }
        };
        match execute(extension, ConsoleCommand::parse(&line)) {
            Some(output) if output.is_empty() => {}
            Some(output) => println!("{}", output),
            None => break,
        }
    }
    warn!("Console closed.");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{blocks::lang::Language, tasks::poll::DEFAULT_POLL_PERIOD, testing::FakeDevice};

    #[test]
    fn test_parse() {
        assert_eq!(ConsoleCommand::parse("   "), ConsoleCommand::Empty);
        assert_eq!(ConsoleCommand::parse("status"), ConsoleCommand::Status);
        assert_eq!(ConsoleCommand::parse("exit"), ConsoleCommand::Quit);
        assert_eq!(
            ConsoleCommand::parse("setMotorValDir M1 4 forward"),
            ConsoleCommand::Call {
                op: "setMotorValDir".into(),
                args: vec![json!("M1"), json!(4f64), json!("forward")],
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute() {
        let device = Arc::new(FakeDevice::new());
        let extension =
            Extension::load(device.clone(), Arc::new(Language::En), DEFAULT_POLL_PERIOD);

        assert_eq!(execute(&extension, ConsoleCommand::Quit), None);
        assert_eq!(
            execute(&extension, ConsoleCommand::parse("status")),
            Some(r#"{"status":1,"msg":"Waiting for the ROBO LT"}"#.into())
        );
        assert_eq!(
            execute(&extension, ConsoleCommand::parse("getButtonBinary I1")),
            Some("true".into())
        );
        assert_eq!(
            execute(&extension, ConsoleCommand::parse("setOutputVal M1 2")),
            Some(String::new())
        );
        let error = execute(&extension, ConsoleCommand::parse("setMotorDir M1 up")).unwrap();
        assert!(error.starts_with("error: Invalid argument 1"));
        assert!(execute(&extension, ConsoleCommand::Describe)
            .unwrap()
            .contains("FischerTechnik ROBO-LT"));

        extension.unload().await;
        assert!(device.sent_speeds().contains(&(0, 25)));
    }
}
