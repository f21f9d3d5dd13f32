//! Live progress pipe to a long-running dialog process.

use std::io::Write;
use std::process::Child;

use tracing::debug;

use crate::error::DialogError;

/// Writable end of a progress dialog.
///
/// Dropping the handle closes the pipe and reaps the child, so the dialog
/// never outlives its owner.
pub struct ProgressHandle {
    sink: Option<Box<dyn Write + Send>>,
    child: Option<Child>,
}

impl ProgressHandle {
    /// Take ownership of a spawned child; its stdin must be piped.
    pub fn from_child(mut child: Child) -> Result<Self, DialogError> {
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DialogError::InvalidArgument("progress child has no stdin pipe".into()))?;
        Ok(ProgressHandle { sink: Some(Box::new(stdin)), child: Some(child) })
    }

    /// A handle over any writer, without a process behind it.
    pub fn from_writer<W: Write + Send + 'static>(w: W) -> Self {
        ProgressHandle { sink: Some(Box::new(w)), child: None }
    }

    pub fn is_open(&self) -> bool { self.sink.is_some() }

    /// Write `<percentage>\n#<label>\n`. Percentages above 100 are clamped.
    pub fn update(&mut self, percentage: u32, label: &str) -> Result<(), DialogError> {
        let sink = self.sink.as_mut().ok_or(DialogError::NoProgress)?;
        let pct = percentage.min(100);
        write!(sink, "{}\n#{}\n", pct, label.replace('\n', " "))?;
        sink.flush()?;
        Ok(())
    }

    /// Close the pipe and wait for the process. Returns its exit status when
    /// a process is attached.
    pub fn close(&mut self) -> Result<Option<i32>, DialogError> {
        if let Some(mut sink) = self.sink.take() {
            // the dialog may already be gone (auto-close, user cancel)
            let _ = sink.flush();
        }
        match self.child.take() {
            Some(mut child) => {
                let status = child.wait()?;
                debug!(pid = child.id(), status = ?status.code(), "progress dialog closed");
                Ok(Some(status.code().unwrap_or(-1)))
            }
            None => Ok(None),
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressHandle")
            .field("open", &self.is_open())
            .field("pid", &self.child.as_ref().map(|c| c.id()))
            .finish()
    }
}
