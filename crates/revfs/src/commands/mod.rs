pub mod cat;
pub mod commit;
pub mod init;
pub mod log;
pub mod ls;
pub mod serve;
pub mod stat;
pub mod tag;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new revfs repository
    Init(init::InitArgs),
    /// Record the working directory as a new commit
    Commit(commit::CommitArgs),
    /// Name a revision
    Tag(tag::TagArgs),
    /// Show the commits that touched a path
    Log(log::LogArgs),
    /// List a directory at a revision
    Ls(ls::LsArgs),
    /// Print a file at a revision
    Cat(cat::CatArgs),
    /// Show metadata of a path at a revision
    Stat(stat::StatArgs),
    /// Browse revisions over HTTP
    Serve(serve::ServeArgs),
}

impl Commands {
    pub async fn run(self) -> anyhow::Result<()> {
        match self {
            Commands::Init(args) => init::run(args),
            Commands::Commit(args) => commit::run(args),
            Commands::Tag(args) => tag::run(args),
            Commands::Log(args) => log::run(args),
            Commands::Ls(args) => ls::run(args),
            Commands::Cat(args) => cat::run(args),
            Commands::Stat(args) => stat::run(args),
            Commands::Serve(args) => serve::run(args).await,
        }
    }
}
