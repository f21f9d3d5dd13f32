//! zenity::prelude - grab-and-go imports for scripts

pub use crate::error::DialogError;
pub use crate::cmd::{Action, ListKind, OptionSet, Table};
pub use crate::config::Config;
pub use crate::dialog::Zenity;
pub use crate::stream::ProgressHandle;
#[cfg(feature = "exec")]
pub use crate::exec::StdExecutor;
