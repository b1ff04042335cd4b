//! # Commands
//!
//! The user-facing debugger commands, parsed with `clap`.
//!
//! The host forwards the words typed after its prompt to [`run_command`]:
//!
//! ```text
//! context [subcontext...]   (alias: ctx)
//! regs [reg...]
//! ```

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::context::{ContextSession, RefreshReport};
use crate::error::{ContextError, ContextResult};
use crate::inspector::Inspector;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
struct CommandLine
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command
{
    /// Print out the current register, instruction, and stack context.
    #[command(visible_alias = "ctx")]
    Context
    {
        /// Sections to display, e.g. `regs stack` or `r s`
        subcontext: Vec<String>,
    },
    /// Print out all registers and enhance the information.
    Regs
    {
        /// Registers to display instead of the default set
        regs: Vec<String>,
    },
}

/// Parse and execute one command.
///
/// ## Errors
///
/// - `NotRunning`: no live process to inspect
/// - `InvalidArgument`: the words do not form a known command
pub fn run_command(session: &mut ContextSession, inspector: &dyn Inspector, args: &[&str]) -> ContextResult<RefreshReport>
{
    let command = parse(args)?;
    if !inspector.is_alive() {
        return Err(ContextError::NotRunning);
    }

    debug!(?command, "running command");
    match command {
        Command::Context { subcontext } => Ok(session.refresh(inspector, Some(&subcontext))),
        Command::Regs { regs } => {
            let lines = session.render_registers(inspector, Some(&regs));
            Ok(session.write_primary(&lines))
        }
    }
}

fn parse(args: &[&str]) -> ContextResult<Command>
{
    CommandLine::try_parse_from(args)
        .map(|line| line.command)
        .map_err(|err| ContextError::InvalidArgument(err.to_string().trim_end().to_string()))
}
