//! Rendering strategies for dialog commands.

use std::borrow::Cow;

use crate::cmd::CommandSpec;
use crate::error::DialogError;

pub trait Renderer {
    fn render_cmd(&self, cmd: &CommandSpec) -> Result<String, DialogError>;

    /// Render for a long-lived process: the shell replaces itself with the
    /// program so the spawned child is the dialog.
    fn render_exec(&self, cmd: &CommandSpec) -> Result<String, DialogError> {
        Ok(format!("exec {}", self.render_cmd(cmd)?))
    }
}

/// POSIX `sh` rendering: `<program> --name[=value]... [cells...] [2>&1]`.
#[derive(Debug, Clone, Default)]
pub struct PosixRenderer;

impl Renderer for PosixRenderer {
    fn render_cmd(&self, cmd: &CommandSpec) -> Result<String, DialogError> {
        if cmd.program.is_empty() {
            return Err(DialogError::Render("program empty".into()));
        }

        let mut parts: Vec<String> = Vec::new();
        parts.push(quote_prog(&cmd.program)?.into_owned());

        for (name, value) in cmd.options.iter() {
            check_name(name)?;
            match value {
                Some(v) => parts.push(format!("--{}={}", name, quote_sh(v)?)),
                None => parts.push(format!("--{}", name)),
            }
        }

        let mut cmd_str = parts.join(" ");

        // rows go one per line, joined by a line continuation so the shell
        // still sees a single command
        for row in &cmd.trailing {
            let cells = row.iter().map(|c| quote_sh(c)).collect::<Result<Vec<_>, _>>()?;
            cmd_str.push_str(" \\\n");
            cmd_str.push_str(&cells.join(" "));
        }

        if cmd.merge_stderr {
            cmd_str.push_str(" 2>&1");
        }

        Ok(cmd_str)
    }
}

fn check_name(name: &str) -> Result<(), DialogError> {
    let ok = !name.is_empty()
        && !name.starts_with('-')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok { Ok(()) } else { Err(DialogError::InvalidArgument(format!("bad option name: {:?}", name))) }
}

fn quote_prog(p: &str) -> Result<Cow<'_, str>, DialogError> {
    if is_simple_word(p) { Ok(Cow::Borrowed(p)) } else { quote_sh(p) }
}

fn is_simple_word(s: &str) -> bool {
    s.chars().all(|c| matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '/' | ':' | '+' | '%' | '@' | ','))
}

fn quote_sh(s: &str) -> Result<Cow<'_, str>, DialogError> {
    shlex::try_quote(s).map_err(|_| DialogError::InvalidArgument(format!("cannot quote {:?}", s)))
}
