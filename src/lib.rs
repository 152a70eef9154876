//! rooda - configuration resolution and prompt assembly for OODA-style AI loops
//!
//! A procedure is four ordered lists of prompt fragments (observe, orient,
//! decide, act). rooda merges configuration from five tiers, picks the AI
//! command to run, assembles the prompt for the selected procedure, and
//! classifies what each execution reported back.
//!
//! ```no_run
//! use rooda::config::{CliFlags, load_config, resolve_ai_command};
//! use rooda::prompt::assemble_prompt;
//!
//! # fn main() -> rooda::Result<()> {
//! let flags = CliFlags::none();
//! let config = load_config(&flags)?;
//! let procedure = config.procedure("build")?;
//! let command = resolve_ai_command(&config, "build", &flags)?;
//! let prompt = assemble_prompt(procedure, &flags.user_context(), std::path::Path::new("."))?;
//! println!("{}\n{}", command, prompt);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod procedures;
pub mod prompt;
pub mod runner;

pub use error::{ErrorKind, Result, RoodaError};
