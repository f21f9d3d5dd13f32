//! The dialog invoker and its high-level calls.
//!
//! Value-returning calls report a cancelled dialog (exit status 1, or 5 when
//! a `timeout` option fired) as `Ok(None)`; any other non-zero status is
//! [`DialogError::Exit`].

use tracing::debug;

use crate::cmd::{Action, CommandSpec, ListKind, OptionSet, Table};
use crate::error::DialogError;
use crate::exec::{ExecResult, Executor};
use crate::stream::ProgressHandle;

const STATUS_CANCEL: i32 = 1;
const STATUS_TIMEOUT: i32 = 5;

pub struct Zenity<E: Executor> {
    path: String,
    executor: E,
    capture_stderr: bool,
    progress: Option<ProgressHandle>,
}

#[cfg(feature = "exec")]
mod std_ctor {
    use super::*;
    use crate::config::{Config, DEFAULT_PATH};
    use crate::exec::StdExecutor;

    impl Zenity<StdExecutor> {
        pub fn new() -> Self { Self::with_path(DEFAULT_PATH) }

        pub fn with_path(path: impl Into<String>) -> Self {
            Zenity::with_executor(path, StdExecutor::default())
        }

        pub fn from_config(cfg: &Config) -> Self {
            let mut z = Zenity::with_executor(cfg.path.to_string_lossy(), StdExecutor::with_shell(&cfg.shell));
            z.capture_stderr = cfg.capture_stderr;
            z
        }
    }

    impl Default for Zenity<StdExecutor> {
        fn default() -> Self { Self::new() }
    }
}

impl<E: Executor> Zenity<E> {
    pub fn with_executor(path: impl Into<String>, executor: E) -> Self {
        Zenity { path: path.into(), executor, capture_stderr: true, progress: None }
    }

    pub fn path(&self) -> &str { &self.path }
    pub fn executor(&self) -> &E { &self.executor }

    /// Whether value-returning calls merge stderr into their output.
    pub fn set_capture_stderr(&mut self, on: bool) { self.capture_stderr = on; }

    /// Build the command for `action`: caller options first, then the action
    /// flag, `text` and `title`, which replace caller options of the same name.
    pub fn command(&self, action: Action, text: Option<&str>, title: &str, options: OptionSet, merge_stderr: bool) -> CommandSpec {
        let mut mandatory = OptionSet::new();
        mandatory.flag(action.flag());
        if let Some(t) = text { mandatory.set("text", t); }
        mandatory.set("title", title);

        let mut cmd = CommandSpec::new(self.path.clone());
        cmd.options = options;
        cmd.options.merge(mandatory);
        cmd.merge_stderr = merge_stderr;
        cmd
    }

    /// Run a dialog to completion and return what it printed.
    pub fn execute_basic(&self, action: Action, text: Option<&str>, title: &str, options: OptionSet, merge_stderr: bool) -> Result<ExecResult, DialogError> {
        self.run(&self.command(action, text, title, options, merge_stderr))
    }

    pub fn run(&self, cmd: &CommandSpec) -> Result<ExecResult, DialogError> {
        let res = self.executor.exec(cmd)?;
        debug!(status = res.status, bytes = res.stdout.len(), "dialog finished");
        Ok(res)
    }

    pub fn show_error(&self, text: &str, title: &str, options: OptionSet) -> Result<(), DialogError> {
        self.message(Action::Error, text, title, options)
    }

    pub fn show_info(&self, text: &str, title: &str, options: OptionSet) -> Result<(), DialogError> {
        self.message(Action::Info, text, title, options)
    }

    pub fn show_warning(&self, text: &str, title: &str, options: OptionSet) -> Result<(), DialogError> {
        self.message(Action::Warning, text, title, options)
    }

    /// Yes/no question. `true` when the user confirmed.
    pub fn show_question(&self, text: &str, title: &str, options: OptionSet) -> Result<bool, DialogError> {
        let res = self.execute_basic(Action::Question, Some(text), title, options, false)?;
        match res.status {
            0 => Ok(true),
            STATUS_CANCEL | STATUS_TIMEOUT => Ok(false),
            status => Err(exit_error(status, &res)),
        }
    }

    /// Show a file's contents. With `editable`, the edited text is returned;
    /// otherwise the result is always `None`.
    pub fn show_text_info(&self, filename: &str, title: &str, editable: bool, mut options: OptionSet) -> Result<Option<String>, DialogError> {
        options.set("filename", filename);
        if editable {
            options.flag("editable");
        }
        let merge = editable && self.capture_stderr;
        let answer = answer(self.execute_basic(Action::TextInfo, None, title, options, merge)?)?;
        Ok(if editable { answer } else { None })
    }

    pub fn get_entry(&self, text: &str, title: &str, options: OptionSet) -> Result<Option<String>, DialogError> {
        answer(self.execute_basic(Action::Entry, Some(text), title, options, self.capture_stderr)?)
    }

    /// Calendar picker; the date comes back in the launcher's format.
    pub fn get_date(&self, text: &str, title: &str, options: OptionSet) -> Result<Option<String>, DialogError> {
        answer(self.execute_basic(Action::Calendar, Some(text), title, options, self.capture_stderr)?)
    }

    /// File chooser. Multiple selections are split on `|`, or on the
    /// caller's `separator` option.
    pub fn get_file(&self, title: &str, multiple: bool, mut options: OptionSet) -> Result<Option<Vec<String>>, DialogError> {
        if multiple {
            options.flag("multiple");
        }
        let sep = match options.get("separator") {
            Some(Some(s)) if !s.is_empty() => s.to_string(),
            _ => "|".to_string(),
        };
        let res = self.execute_basic(Action::FileSelection, None, title, options, self.capture_stderr)?;
        Ok(answer(res)?.map(|out| split_paths(&out, &sep)))
    }

    /// List selection over `table`. Returns the launcher's raw answer.
    pub fn show_list(&self, text: &str, title: &str, table: &Table, kind: ListKind, mut options: OptionSet) -> Result<Option<String>, DialogError> {
        if table.columns.is_empty() {
            return Err(DialogError::InvalidArgument("list needs at least one column".into()));
        }
        if let Some(flag) = kind.flag() {
            options.flag(flag);
        }
        let mut cmd = self.command(Action::List, Some(text), title, options, self.capture_stderr);
        cmd.push_table(table);
        answer(self.run(&cmd)?)
    }

    /// Open a progress dialog fed through stdin. An already open one is
    /// closed first.
    pub fn show_progress(&mut self, options: OptionSet) -> Result<(), DialogError> {
        self.close_progress()?;
        let mut defaults = OptionSet::new();
        defaults.flag(Action::Progress.flag()).set("percentage", "0").flag("auto-close").flag("auto-kill");

        let mut cmd = CommandSpec::new(self.path.clone());
        cmd.options = options;
        cmd.options.merge(defaults);
        self.progress = Some(self.executor.spawn(&cmd)?);
        Ok(())
    }

    pub fn update_progress(&mut self, percentage: u32, text: &str) -> Result<(), DialogError> {
        self.progress.as_mut().ok_or(DialogError::NoProgress)?.update(percentage, text)
    }

    /// Close the progress dialog, if any.
    pub fn close_progress(&mut self) -> Result<(), DialogError> {
        if let Some(mut handle) = self.progress.take() {
            handle.close()?;
        }
        Ok(())
    }

    pub fn progress(&mut self) -> Option<&mut ProgressHandle> { self.progress.as_mut() }
    pub fn has_progress(&self) -> bool { self.progress.is_some() }

    /// Run `f` with an open progress dialog that is closed afterwards,
    /// whether `f` succeeds or not.
    pub fn with_progress<T, F>(&mut self, options: OptionSet, f: F) -> Result<T, DialogError>
    where
        F: FnOnce(&mut ProgressHandle) -> Result<T, DialogError>,
    {
        self.show_progress(options)?;
        let out = match self.progress.as_mut() {
            Some(handle) => f(handle),
            None => Err(DialogError::NoProgress),
        };
        let closed = self.close_progress();
        let v = out?;
        closed?;
        Ok(v)
    }

    fn message(&self, action: Action, text: &str, title: &str, options: OptionSet) -> Result<(), DialogError> {
        let res = self.execute_basic(action, Some(text), title, options, false)?;
        match res.status {
            0 | STATUS_CANCEL | STATUS_TIMEOUT => Ok(()),
            status => Err(exit_error(status, &res)),
        }
    }
}

fn answer(res: ExecResult) -> Result<Option<String>, DialogError> {
    match res.status {
        0 => Ok(Some(res.text().to_string())),
        STATUS_CANCEL | STATUS_TIMEOUT => Ok(None),
        status => Err(exit_error(status, &res)),
    }
}

fn exit_error(status: i32, res: &ExecResult) -> DialogError {
    let output = if res.stderr.is_empty() { res.text() } else { res.stderr.trim_end() };
    DialogError::Exit { status, output: output.to_string() }
}

/// Split a file-selection answer into paths. Empty output yields no paths.
pub fn split_paths(out: &str, sep: &str) -> Vec<String> {
    if out.is_empty() {
        return Vec::new();
    }
    out.split(sep).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::render::{PosixRenderer, Renderer};

    /// Records rendered lines and replays canned results.
    #[derive(Default)]
    struct Script {
        lines: RefCell<Vec<String>>,
        replies: RefCell<VecDeque<ExecResult>>,
        live: Arc<AtomicUsize>,
        max_live: Arc<AtomicUsize>,
    }

    impl Script {
        fn reply(self, status: i32, stdout: &str) -> Self {
            self.replies.borrow_mut().push_back(ExecResult { status, stdout: stdout.into(), stderr: String::new() });
            self
        }
        fn last(&self) -> Vec<String> {
            let line = self.lines.borrow().last().cloned().unwrap();
            shlex::split(&line).unwrap()
        }
    }

    struct LiveSink { live: Arc<AtomicUsize> }
    impl Write for LiveSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { Ok(buf.len()) }
        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }
    impl Drop for LiveSink {
        fn drop(&mut self) { self.live.fetch_sub(1, Ordering::SeqCst); }
    }

    impl Executor for Script {
        fn exec(&self, cmd: &CommandSpec) -> Result<ExecResult, DialogError> {
            self.lines.borrow_mut().push(PosixRenderer.render_cmd(cmd)?);
            Ok(self.replies.borrow_mut().pop_front().unwrap_or_default())
        }
        fn spawn(&self, cmd: &CommandSpec) -> Result<ProgressHandle, DialogError> {
            self.lines.borrow_mut().push(PosixRenderer.render_cmd(cmd)?);
            let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_live.fetch_max(now, Ordering::SeqCst);
            Ok(ProgressHandle::from_writer(LiveSink { live: self.live.clone() }))
        }
    }

    fn zenity(script: Script) -> Zenity<Script> { Zenity::with_executor("zenity", script) }

    #[test]
    fn mandatory_options_override_caller() {
        let z = zenity(Script::default());
        let opts = OptionSet::new().with("width", "300").with("title", "ignored").with("entry", "x");
        z.get_entry("Name?", "Who", opts).unwrap();
        assert_eq!(z.executor().last(), vec!["zenity", "--width=300", "--title=Who", "--entry", "--text=Name?", "2>&1"]);
    }

    #[test]
    fn message_dialogs_do_not_merge_stderr() {
        let z = zenity(Script::default());
        z.show_error("boom", "Error", OptionSet::new()).unwrap();
        assert_eq!(z.executor().last(), vec!["zenity", "--error", "--text=boom", "--title=Error"]);
    }

    #[test]
    fn entry_cancel_is_none() {
        let z = zenity(Script::default().reply(0, "alice\n").reply(1, ""));
        assert_eq!(z.get_entry("Name?", "Who", OptionSet::new()).unwrap(), Some("alice".into()));
        assert_eq!(z.get_entry("Name?", "Who", OptionSet::new()).unwrap(), None);
    }

    #[test]
    fn unexpected_status_is_error() {
        let z = zenity(Script::default().reply(255, "Gtk-WARNING: cannot open display\n"));
        match z.get_date("When?", "Date", OptionSet::new()) {
            Err(DialogError::Exit { status, output }) => {
                assert_eq!(status, 255);
                assert_eq!(output, "Gtk-WARNING: cannot open display");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn question_maps_status() {
        let z = zenity(Script::default().reply(0, "").reply(1, ""));
        assert!(z.show_question("Sure?", "Q", OptionSet::new()).unwrap());
        assert!(!z.show_question("Sure?", "Q", OptionSet::new()).unwrap());
    }

    #[test]
    fn file_selection_splits_paths() {
        let z = zenity(Script::default().reply(0, "/a/b|/a/c\n").reply(0, "/a/b\n"));
        assert_eq!(z.get_file("Pick", true, OptionSet::new()).unwrap(), Some(vec!["/a/b".to_string(), "/a/c".to_string()]));
        let line = z.executor().lines.borrow()[0].clone();
        assert!(line.contains("--multiple"));
        assert!(!line.contains("--text"));
        assert_eq!(z.get_file("Pick", false, OptionSet::new()).unwrap(), Some(vec!["/a/b".to_string()]));
    }

    #[test]
    fn file_selection_custom_separator() {
        let z = zenity(Script::default().reply(0, "/x,/y\n"));
        let got = z.get_file("Pick", true, OptionSet::new().with("separator", ",")).unwrap();
        assert_eq!(got, Some(vec!["/x".to_string(), "/y".to_string()]));
    }

    #[test]
    fn split_paths_edges() {
        assert_eq!(split_paths("/a/b|/a/c", "|"), vec!["/a/b", "/a/c"]);
        assert_eq!(split_paths("/a/b", "|"), vec!["/a/b"]);
        assert!(split_paths("", "|").is_empty());
    }

    #[test]
    fn text_info_editable_returns_text() {
        let z = zenity(Script::default().reply(0, "edited\n").reply(0, "ignored\n"));
        assert_eq!(z.show_text_info("/tmp/notes.txt", "Notes", true, OptionSet::new()).unwrap(), Some("edited".into()));
        assert_eq!(z.executor().last(), vec!["zenity", "--filename=/tmp/notes.txt", "--editable", "--text-info", "--title=Notes", "2>&1"]);
        assert_eq!(z.show_text_info("/tmp/notes.txt", "Notes", false, OptionSet::new()).unwrap(), None);
        assert!(!z.executor().lines.borrow()[1].contains("--editable"));
    }

    #[test]
    fn list_renders_columns_and_rows() {
        let z = zenity(Script::default().reply(0, "z\n"));
        let table = Table::from_records(&[
            vec![("col1", "x"), ("col2", "y")],
            vec![("col1", "z"), ("col2", "it's `w`")],
        ]).unwrap();
        let got = z.show_list("Select", "List", &table, ListKind::Radio, OptionSet::new()).unwrap();
        assert_eq!(got, Some("z".into()));
        assert_eq!(z.executor().last(), vec![
            "zenity", "--radiolist", "--list", "--text=Select", "--title=List",
            "--column=Col1", "--column=Col2", "x", "y", "z", "it's `w`", "2>&1",
        ]);
    }

    #[test]
    fn list_without_columns_rejected() {
        let z = zenity(Script::default());
        let err = z.show_list("Select", "List", &Table::default(), ListKind::Plain, OptionSet::new()).unwrap_err();
        assert!(matches!(err, DialogError::InvalidArgument(_)));
    }

    #[test]
    fn progress_defaults_and_single_live_handle() {
        let mut z = zenity(Script::default());
        z.show_progress(OptionSet::new().with("percentage", "50").with("title", "Copying")).unwrap();
        assert_eq!(z.executor().last(), vec!["zenity", "--percentage=0", "--title=Copying", "--progress", "--auto-close", "--auto-kill"]);
        z.show_progress(OptionSet::new()).unwrap();
        z.close_progress().unwrap();
        z.show_progress(OptionSet::new()).unwrap();
        assert_eq!(z.executor().max_live.load(Ordering::SeqCst), 1);
        z.close_progress().unwrap();
        assert_eq!(z.executor().live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn update_without_progress_fails() {
        let mut z = zenity(Script::default());
        assert!(matches!(z.update_progress(10, "x"), Err(DialogError::NoProgress)));
        z.close_progress().unwrap();
    }

    #[test]
    fn with_progress_closes_on_error() {
        let mut z = zenity(Script::default());
        let err = z.with_progress(OptionSet::new(), |p| {
            p.update(10, "one")?;
            Err::<(), _>(DialogError::InvalidArgument("stop".into()))
        });
        assert!(err.is_err());
        assert!(!z.has_progress());
        assert_eq!(z.executor().live.load(Ordering::SeqCst), 0);
    }
}
