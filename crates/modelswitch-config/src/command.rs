//! Launch command sanitizing: continuation joining and shell-style word
//! splitting.
//!
//! Only the lexical part of POSIX word splitting is applied (via
//! `shell_words`). There is no variable expansion, globbing, or command
//! substitution.

use crate::config::ModelEntry;
use crate::error::ConfigError;

/// Drop comment lines and join `\`-continued lines with a single space.
/// Whitespace after the continuation backslash is ignored.
pub fn join_continuations(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for line in raw.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        match line.trim_end().strip_suffix('\\') {
            Some(head) => {
                out.push_str(head);
                out.push(' ');
            }
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

/// True when nothing but whitespace, comment lines, and continuations
/// remain.
pub fn is_blank_command(raw: &str) -> bool {
    join_continuations(raw).trim().is_empty()
}

/// Turn a raw (already macro-expanded) command into an argument vector whose
/// first element is the executable.
pub fn sanitize_command(raw: &str) -> Result<Vec<String>, ConfigError> {
    let argv = shell_words::split(&join_continuations(raw)).map_err(|source| {
        ConfigError::InvalidCommand {
            command: raw.to_string(),
            source,
        }
    })?;
    if argv.is_empty() {
        return Err(ConfigError::EmptyCommand {
            command: raw.to_string(),
        });
    }
    Ok(argv)
}

impl ModelEntry {
    /// Argument vector for `cmd`. Call on an expanded entry so `${...}`
    /// placeholders are already replaced.
    pub fn sanitized_command(&self) -> Result<Vec<String>, ConfigError> {
        sanitize_command(&self.cmd)
    }

    /// Argument vector for `cmdStop`, or `None` when no stop command is set.
    pub fn sanitized_stop_command(&self) -> Result<Option<Vec<String>>, ConfigError> {
        if is_blank_command(&self.cmd_stop) {
            return Ok(None);
        }
        sanitize_command(&self.cmd_stop).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn joins_continuation_lines() {
        let entry = ModelEntry {
            cmd: "python model1.py \\\n    --arg1 value1 \\\n    --arg2 value2".into(),
            ..Default::default()
        };
        assert_eq!(
            entry.sanitized_command().unwrap(),
            vec!["python", "model1.py", "--arg1", "value1", "--arg2", "value2"]
        );
    }

    #[test]
    fn whitespace_after_continuation_backslash() {
        let raw = "python model1.py \\ \n    --arg1 value1 \\\t\n    --arg2 value2";
        assert_eq!(
            sanitize_command(raw).unwrap(),
            vec!["python", "model1.py", "--arg1", "value1", "--arg2", "value2"]
        );
    }

    #[test]
    fn stop_command_is_optional() {
        let mut entry = ModelEntry::default();
        assert_eq!(entry.sanitized_stop_command().unwrap(), None);
        entry.cmd_stop = "# nothing to run".into();
        assert_eq!(entry.sanitized_stop_command().unwrap(), None);
        entry.cmd_stop = "docker stop 'my model'".into();
        assert_eq!(
            entry.sanitized_stop_command().unwrap(),
            Some(vec!["docker".to_string(), "stop".to_string(), "my model".to_string()])
        );
    }

    #[test]
    fn continuation_with_crlf_and_no_space_before_backslash() {
        let raw = "llama-server\\\r\n--port 9000";
        assert_eq!(
            sanitize_command(raw).unwrap(),
            vec!["llama-server", "--port", "9000"]
        );
    }

    #[test]
    fn comment_lines_are_dropped() {
        let raw = "llama-server \\\n  # pick a model\n  -m model.gguf \\\n  --port 8080";
        assert_eq!(
            sanitize_command(raw).unwrap(),
            vec!["llama-server", "-m", "model.gguf", "--port", "8080"]
        );
    }

    #[test]
    fn quotes_group_words_and_are_stripped() {
        let raw = r#"run --name "my model" --tpl '{{ .Prompt }}' a"b c"d"#;
        assert_eq!(
            sanitize_command(raw).unwrap(),
            vec!["run", "--name", "my model", "--tpl", "{{ .Prompt }}", "ab cd"]
        );
    }

    #[test]
    fn empty_quotes_make_empty_word() {
        assert_eq!(sanitize_command(r#"cmd "" ''"#).unwrap(), vec!["cmd", "", ""]);
    }

    #[test]
    fn backslash_rules() {
        assert_eq!(sanitize_command(r"a\ b").unwrap(), vec!["a b"]);
        assert_eq!(
            sanitize_command(r#""x\"y" "c:\dir""#).unwrap(),
            vec![r#"x"y"#, r"c:\dir"]
        );
        assert_eq!(sanitize_command(r"'no\escape'").unwrap(), vec![r"no\escape"]);
    }

    #[test]
    fn unterminated_quotes_fail() {
        match sanitize_command("python 'server.py").unwrap_err() {
            ConfigError::InvalidCommand { command, .. } => {
                assert_eq!(command, "python 'server.py");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            sanitize_command(r#"python "server.py"#),
            Err(ConfigError::InvalidCommand { .. })
        ));
    }

    #[test]
    fn commands_without_words_are_rejected() {
        for raw in ["", "  \n ", "# disabled", "  \\\n  # only a comment"] {
            assert!(is_blank_command(raw), "blank: {raw:?}");
            assert!(
                matches!(sanitize_command(raw), Err(ConfigError::EmptyCommand { .. })),
                "empty: {raw:?}"
            );
        }
        assert!(!is_blank_command("llama-server # trailing note"));
    }

    proptest! {
        #[test]
        fn plain_words_round_trip(words in proptest::collection::vec("[A-Za-z0-9_./=-]{1,10}", 1..8)) {
            let line = words.join(" ");
            prop_assert_eq!(sanitize_command(&line).unwrap(), words);
        }
    }
}
