//! Command dispatch: bridges CLI args -> core managers -> output formatting.

pub mod build_cmd;
pub mod config_cmd;
pub mod fabric;
pub mod interface;
pub mod policy;
pub mod segment;
pub mod switch;
pub mod util;
pub mod vpc;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a project-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Fabric(args) => fabric::handle(ctx, args).await,
        Command::Vrf(args) => segment::handle(ctx, segment::Segment::Vrf, args).await,
        Command::Network(args) => segment::handle(ctx, segment::Segment::Network, args).await,
        Command::Switch(args) => switch::handle(ctx, args).await,
        Command::Interface(args) => interface::handle(ctx, args).await,
        Command::Vpc(args) => vpc::handle(ctx, args).await,
        Command::Policy(args) => policy::handle(ctx, args).await,
        Command::Build(args) => build_cmd::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
