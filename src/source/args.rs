//! Command-line override source
//!
//! Arguments take the form `--name value`, `--name [value with --dashes]` or
//! a bare `--flag`, which resolves to `"1"`. Anything before the first `--`
//! (the program name, positional arguments) is ignored.

use std::collections::HashMap;

const MARKER: &str = "--";

/// Parsed `--name value` overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    args: HashMap<String, String>,
}

impl CommandLine {
    /// Parse the arguments of the running process
    pub fn from_process() -> Self {
        Self::parse(std::env::args())
    }

    /// Parse an explicit argument list
    ///
    /// Tokens are joined with single spaces before being split on `--`, so a
    /// value may span several tokens: `--name Bob Smith` gives `"Bob Smith"`.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let mut parsed = HashMap::new();
        let mut escaped: Option<(String, String)> = None;

        for chunk in joined.split(MARKER).skip(1) {
            if let Some((name, mut value)) = escaped.take() {
                match chunk.find(']') {
                    None => {
                        value.push_str(MARKER);
                        value.push_str(chunk);
                        escaped = Some((name, value));
                    }
                    Some(end) => {
                        value.push_str(MARKER);
                        value.push_str(&chunk[..end]);
                        parsed.insert(name, value);
                    }
                }
                continue;
            }

            let (name, rest) = chunk.split_once(' ').unwrap_or((chunk, ""));
            if name.is_empty() {
                continue;
            }

            if let (Some(open), false) = (chunk.find('['), chunk.contains(']')) {
                escaped = Some((name.to_string(), chunk[open + 1..].to_string()));
                continue;
            }

            let mut value = rest.trim().trim_start_matches('[').trim_end_matches(']');
            if value.is_empty() {
                value = "1";
            }
            parsed.insert(name.to_string(), value.to_string());
        }

        if let Some((name, _)) = escaped {
            tracing::debug!(argument = %name, "Unterminated [ in command-line argument, ignoring");
        }

        Self { args: parsed }
    }

    /// Value given for `name`, if the argument was present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}
