use std::io::{BufRead, Write};

use crate::cli::open_configured_store;
use crate::error::Result;

pub fn run(yes: bool) -> Result<()> {
    let (_settings, store) = open_configured_store()?;

    if !yes {
        let stdin = std::io::stdin();
        let confirmed = confirm(
            &mut stdin.lock(),
            &mut std::io::stdout(),
            "This will delete all loans permanently. Continue? [y/N]: ",
        )?;
        if !confirmed {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    store.clear()?;
    log::info!("cleared all loans from {}", store.location().display());
    println!("All loans deleted.");
    Ok(())
}

/// Only an explicit yes confirms; blank input and end of input decline.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<bool> {
    write!(out, "{question}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str) -> bool {
        let mut out = Vec::new();
        confirm(&mut Cursor::new(answer.as_bytes().to_vec()), &mut out, "Sure? ").unwrap()
    }

    #[test]
    fn test_confirm() {
        assert!(ask("y\n"));
        assert!(ask("YES\n"));
        assert!(!ask("n\n"));
        assert!(!ask("\n"));
        assert!(!ask(""));
    }
}
