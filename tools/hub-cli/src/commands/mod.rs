//! CLI command implementations.

pub mod edit;
pub mod hubs;
pub mod query;
pub mod routes;

use clap::Args;

/// Arguments for the direct and shortest commands.
#[derive(Args)]
pub struct PairArgs {
    /// Source hub (id or name).
    pub from: String,

    /// Destination hub (id or name).
    pub to: String,
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Source hub (id or name).
    pub from: String,

    /// Destination hub (id or name).
    pub to: String,

    /// Road distance in kilometers, up to three decimals.
    #[arg(long)]
    pub km: String,

    /// Travel time in minutes.
    #[arg(long)]
    pub minutes: u32,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Route id.
    pub route_id: String,

    /// New road distance in kilometers.
    #[arg(long)]
    pub km: String,

    /// New travel time in minutes.
    #[arg(long)]
    pub minutes: u32,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Route id.
    pub route_id: String,
}
