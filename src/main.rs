//! refence CLI - restore fenced code blocks in plain text

use std::io::{self, Read, Write};

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Simple usage: read from stdin or file
    let input = if args.len() > 1 && args[1] != "-" {
        std::fs::read_to_string(&args[1])?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    let formatted = refence::format_content(&input);
    io::stdout().write_all(formatted.as_bytes())?;
    io::stdout().write_all(b"\n")?;

    Ok(())
}
