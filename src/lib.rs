//! Switches the machine-wide JDK on Windows.
//!
//! Installed JDKs are discovered from the registry (`SOFTWARE\JavaSoft`, both
//! bit-width views) and from `JAVA_SDK_*` system variables. Selecting one
//! rewrites the system `JAVA_HOME` and moves its `bin` directory to the front
//! of the system `Path`.

pub mod cli;
pub mod collector;
pub mod environment;
pub mod error;
pub mod path_list;
pub mod platform;
pub mod prompt;
pub mod scanner;
pub mod store;
pub mod switcher;
pub mod versions;

pub use error::{Result, SwitchError};
pub use switcher::{run, Outcome, Selection, Selector, Settings};
pub use versions::{VersionEntry, VersionRegistry};
