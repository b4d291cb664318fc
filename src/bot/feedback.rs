//! Interactive feedback training at the terminal.
//!
//! Shows the engine's reply to each input and asks whether it makes sense.
//! "y" reinforces the pair as-is; "n" asks for a corrected response and
//! trains that instead. Runs until the user quits or stdin closes.

use std::io::{BufRead, Write};

use tracing::info;

use crate::engine::{ResponseEngine, TrainingPair};

/// What the user's verdict means for the shown pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Approve,
    Correct,
    Quit,
    Unknown,
}

/// Terminal inputs for the outer loop. A blank line just re-prompts;
/// only an explicit exit word (or EOF) stops the trainer.
pub fn is_exit(line: &str) -> bool {
    matches!(line, "exit" | "quit")
}

/// Interpret a verdict line. Mirrors the original's loose matching:
/// anything containing 'y' approves, anything containing 'n' corrects.
pub fn parse_verdict(line: &str) -> Verdict {
    let line = line.trim().to_lowercase();
    if line.is_empty() || line == "exit" || line == "quit" {
        return Verdict::Quit;
    }
    if line.contains('y') {
        Verdict::Approve
    } else if line.contains('n') {
        Verdict::Correct
    } else {
        Verdict::Unknown
    }
}

fn prompt(text: &str) -> Result<Option<String>, String> {
    print!("{text}");
    std::io::stdout()
        .flush()
        .map_err(|e| format!("stdout flush failed: {e}"))?;

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| format!("stdin read failed: {e}"))?;
    if read == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

/// Run the feedback loop until the user quits.
pub async fn run<E: ResponseEngine>(engine: &E) -> Result<(), String> {
    info!("Feedback trainer started (type 'exit' to quit)");

    loop {
        let Some(input) = prompt("input -> ")? else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        if is_exit(&input) {
            break;
        }

        let reply = engine.respond(&input).await.map_err(|e| e.to_string())?;
        println!("\n input  -> {input}");
        println!(" output -> {reply}\n");

        let Some(verdict_line) = prompt("Does this make sense? [y/n] ")? else {
            break;
        };

        match parse_verdict(&verdict_line) {
            Verdict::Approve => {
                if let Some(pair) = TrainingPair::new(&input, &reply) {
                    engine.train(&pair).await.map_err(|e| e.to_string())?;
                    info!("Reinforced: \"{}\" -> \"{}\"", pair.input(), pair.response());
                }
            }
            Verdict::Correct => {
                let Some(corrected) = prompt("What should my response be? -> ")? else {
                    break;
                };
                match TrainingPair::new(&input, &corrected) {
                    Some(pair) => {
                        engine.train(&pair).await.map_err(|e| e.to_string())?;
                        info!("Corrected: \"{}\" -> \"{}\"", pair.input(), pair.response());
                    }
                    None => println!("Nothing to train."),
                }
            }
            Verdict::Quit => break,
            Verdict::Unknown => println!("Please type either \"y\" or \"n\""),
        }
    }

    info!("Feedback trainer stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_approve() {
        assert_eq!(parse_verdict("y"), Verdict::Approve);
        assert_eq!(parse_verdict("Yes"), Verdict::Approve);
        assert_eq!(parse_verdict(" yep "), Verdict::Approve);
    }

    #[test]
    fn test_verdict_correct() {
        assert_eq!(parse_verdict("n"), Verdict::Correct);
        assert_eq!(parse_verdict("No"), Verdict::Correct);
    }

    #[test]
    fn test_verdict_quit() {
        assert_eq!(parse_verdict(""), Verdict::Quit);
        assert_eq!(parse_verdict("exit"), Verdict::Quit);
        assert_eq!(parse_verdict("quit"), Verdict::Quit);
    }

    #[test]
    fn test_verdict_unknown() {
        assert_eq!(parse_verdict("ok"), Verdict::Unknown);
        assert_eq!(parse_verdict("???"), Verdict::Unknown);
    }

    #[test]
    fn test_only_exit_words_are_terminal_input() {
        assert!(is_exit("exit"));
        assert!(is_exit("quit"));
        // A blank line is not an exit; the loop re-prompts instead
        assert!(!is_exit(""));
        assert!(!is_exit("hello"));
    }

    #[test]
    fn test_yes_wins_over_no_like_the_original() {
        // "yn" contains both; 'y' is checked first
        assert_eq!(parse_verdict("yn"), Verdict::Approve);
    }
}
