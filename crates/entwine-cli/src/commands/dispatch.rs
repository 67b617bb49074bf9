use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: &Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Check(args) => commands::check::handle(args, ctx, flags),
        Commands::Describe(args) => commands::describe::handle(args, ctx, flags),
        Commands::Relations => commands::relations::handle(ctx, flags),
        Commands::Export(args) => commands::export::handle(args, ctx, flags),
        Commands::Generate(args) => commands::generate::handle(args, ctx, flags),
        Commands::JsonSchema(args) => commands::json_schema::handle(args, ctx, flags),
        Commands::Record(args) => commands::record::handle(args, ctx, flags),
    }
}
