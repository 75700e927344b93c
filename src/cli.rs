//! Minimal CLI parsing for configuration overrides.

use std::env;

#[derive(Debug, Default)]
pub struct CliOptions {
    pub root_dir: Option<String>,
    pub ledger_path: Option<String>,
    pub code_pattern: Option<String>,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    fn parse(mut args: impl Iterator<Item = String>) -> Self {
        let mut options = CliOptions::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--root" => options.root_dir = args.next(),
                "--ledger" => options.ledger_path = args.next(),
                "--pattern" => options.code_pattern = args.next(),
                _ if arg.starts_with("--root=") => {
                    options.root_dir = arg.split_once('=').map(|(_, v)| v.to_string());
                }
                _ if arg.starts_with("--ledger=") => {
                    options.ledger_path = arg.split_once('=').map(|(_, v)| v.to_string());
                }
                _ if arg.starts_with("--pattern=") => {
                    options.code_pattern = arg.split_once('=').map(|(_, v)| v.to_string());
                }
                _ => {}
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_separate_values() {
        let options = parse(&["--root", "/media", "--ledger", "state.json"]);
        assert_eq!(options.root_dir.as_deref(), Some("/media"));
        assert_eq!(options.ledger_path.as_deref(), Some("state.json"));
        assert_eq!(options.code_pattern, None);
    }

    #[test]
    fn test_equals_form() {
        let options = parse(&["--pattern=[A-Z]{3}-\\d{3}", "--root=/mnt/media"]);
        assert_eq!(options.code_pattern.as_deref(), Some("[A-Z]{3}-\\d{3}"));
        assert_eq!(options.root_dir.as_deref(), Some("/mnt/media"));
    }

    #[test]
    fn test_unknown_args_ignored() {
        let options = parse(&["--verbose", "positional"]);
        assert!(options.root_dir.is_none());
        assert!(options.ledger_path.is_none());
    }
}
