use clap::{ArgAction, Parser, Subcommand};

/// Load and read-latency harness for a RedisJSON product keyspace
#[derive(Parser, Debug)]
#[command(term_width = 0)]
pub struct Args {
    /// Increase diagnostic verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load JSON documents derived by cycling the base dataset
    Load {
        /// Total amount of data to write
        #[arg(short, long, default_value = "5000")]
        total: u64,

        /// Count failed batches and keep loading instead of aborting
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Fetch random product keys with a single JSON.MGET
    Mget {
        /// Number of random keys to fetch
        #[arg(allow_hyphen_values = true)]
        n: i64,
    },

    /// Fetch random product keys with pipelined JSON.GETs
    Pipeget {
        /// Number of random keys to fetch
        #[arg(allow_hyphen_values = true)]
        n: i64,
    },
}
