//! Interactive input-file prompt.

use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Asks for a file name until one that exists is entered.
///
/// Returns an error if the input stream ends before a valid name is given.
pub fn ask_for_input<R: BufRead, W: Write>(mut input: R, mut out: W) -> Result<PathBuf> {
    let mut line = String::new();
    loop {
        writeln!(out, "Input file name")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            bail!("no input file name given");
        }

        let name = line.trim();
        let path = PathBuf::from(name);
        if !name.is_empty() && path.is_file() {
            return Ok(path);
        }
        writeln!(out, "Could not find {name}. Try again")?;
    }
}
