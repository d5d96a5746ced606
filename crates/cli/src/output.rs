//! Terminal output.
//!
//! Records are printed as pretty JSON on stdout; status lines also go to
//! stdout, errors to stderr.

use std::io::BufRead;

use secrecy::SecretString;
use serde::Serialize;

use crate::error::CliError;

#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn print_line(line: &str) {
    println!("{line}");
}

#[allow(clippy::print_stderr)]
pub fn print_error(line: &str) {
    eprintln!("{line}");
}

/// One line of standard input, without the line ending.
pub fn read_secret(input: &mut impl BufRead) -> Result<SecretString, CliError> {
    let mut line = String::new();
    input.read_line(&mut line).map_err(CliError::Input)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::from(trimmed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_read_secret_strips_line_ending_only() {
        let mut input = "  pass word \r\nnext\n".as_bytes();
        let first = read_secret(&mut input).unwrap();
        assert_eq!(first.expose_secret(), "  pass word ");
        let second = read_secret(&mut input).unwrap();
        assert_eq!(second.expose_secret(), "next");
        let empty = read_secret(&mut input).unwrap();
        assert_eq!(empty.expose_secret(), "");
    }
}
