pub mod init;
pub mod pull;
pub mod push;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Configure the storage backend
    Init(init::InitArgs),
    /// Upload a file under a cache key
    Push(push::PushArgs),
    /// Download a cache key into a file
    Pull(pull::PullArgs),
}
