use clap::{Parser, ValueEnum};

/// Drive concurrent transfer scenarios against the in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "transfer-engine")]
#[command(about = "Run concurrent transfer scenarios against the in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Scenario to run
    #[arg(
        long = "scenario",
        value_name = "SCENARIO",
        default_value = "stress",
        help = "Scenario: 'stress' for the conservation workload or 'deadlock' for the naive-path demonstration"
    )]
    pub scenario: Scenario,

    /// Number of accounts to create (stress scenario)
    #[arg(
        long = "accounts",
        value_name = "COUNT",
        default_value_t = 4,
        help = "Number of accounts to create (stress scenario, minimum 2)"
    )]
    pub accounts: u32,

    /// Opening balance for every account
    #[arg(
        long = "initial-balance",
        value_name = "BALANCE",
        default_value_t = 10_000,
        help = "Opening balance for every account (non-negative)"
    )]
    pub initial_balance: i64,

    /// Number of worker threads (stress scenario)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Transfers each worker issues
    #[arg(
        long = "transfers-per-worker",
        value_name = "COUNT",
        default_value_t = 1000,
        help = "Number of transfers each worker issues"
    )]
    pub transfers_per_worker: usize,

    /// Amount moved per transfer
    #[arg(
        long = "amount",
        value_name = "AMOUNT",
        default_value_t = 10,
        help = "Amount moved per transfer (positive)"
    )]
    pub amount: i64,
}

/// Available demo scenarios
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Many workers transferring in opposing directions; verifies conservation
    Stress,
    /// Two naive transfers in opposite directions; demonstrates circular wait
    Deadlock,
}

impl CliArgs {
    /// Effective worker count: the `--workers` value if given and non-zero,
    /// otherwise one worker per logical CPU.
    pub fn worker_count(&self) -> usize {
        self.workers
            .filter(|&workers| workers > 0)
            .unwrap_or_else(num_cpus::get)
    }
}
