use crate::assistant::{Assistant, SessionOutcome, FAREWELL};
use crate::responder::APOLOGY_MESSAGE;
use anyhow::Result;
use std::io::{self, Write};

/// Line-oriented read loop. Empty input re-prompts; `exit`/`quit`
/// (case-insensitive) and EOF end the session.
pub struct Repl {
    assistant: Assistant,
    assistant_name: String,
    user_name: String,
}

impl Repl {
    pub fn new(assistant: Assistant, assistant_name: String, user_name: String) -> Self {
        Self {
            assistant,
            assistant_name,
            user_name,
        }
    }

    pub async fn run(&self) -> Result<()> {
        println!("{}: Hello! How can I help you today?", self.assistant_name);

        loop {
            print!("{}: ", self.user_name);
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                // EOF
                println!();
                break;
            }

            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                println!("{}: {}", self.assistant_name, FAREWELL);
                break;
            }

            match self.assistant.handle(input).await {
                Ok(SessionOutcome::Continue(reply)) => {
                    println!("\n{}: {}\n", self.assistant_name, reply);
                }
                Ok(SessionOutcome::Exit(farewell)) => {
                    println!("{}: {}", self.assistant_name, farewell);
                    break;
                }
                Err(e) => {
                    tracing::error!("request failed: {:#}", e);
                    println!("{}: {}", self.assistant_name, APOLOGY_MESSAGE);
                }
            }
        }

        Ok(())
    }
}
