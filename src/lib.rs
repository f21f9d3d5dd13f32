//! zenity: typed command construction and invocation for the Zenity dialog launcher.

pub mod error;
pub mod cmd;
pub mod render;
pub mod exec;
pub mod stream;
pub mod dialog;
pub mod config;
pub mod prelude;
pub mod macros;

pub use error::DialogError;
#[cfg(feature = "exec")]
pub use exec::StdExecutor;
pub use dialog::Zenity;
