//! `octane-migrate migrate` command - run the CSV to Octane migration

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{first_line, truncate_str};
use crate::cli::GlobalOpts;
use crate::core::migration::{MigratedTest, MigrationStats, Migrator, TestApi};
use crate::core::source::RowSource;
use crate::core::{Config, MigrationError};
use crate::octane::{ManualTest, OctaneClient};

#[derive(clap::Args, Debug)]
pub struct MigrateArgs {
    /// CSV export to migrate
    pub file: PathBuf,

    /// Record number to start from, for resuming a stopped run (records 1-2 are headers)
    #[arg(long, short = 's', default_value_t = 1)]
    pub start_record: u64,

    /// Transform rows and print the payloads without contacting the server
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Connection flags; each overrides the config file and environment
#[derive(clap::Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Octane server URL
    #[arg(long)]
    pub server: Option<String>,

    /// Shared space id
    #[arg(long)]
    pub shared_space: Option<u64>,

    /// Workspace id
    #[arg(long)]
    pub workspace: Option<u64>,

    /// API access key id
    #[arg(long)]
    pub client_id: Option<String>,

    /// API access key secret
    #[arg(long)]
    pub client_secret: Option<String>,

    /// User name (when not using an API key)
    #[arg(long)]
    pub user: Option<String>,

    /// Password (when not using an API key)
    #[arg(long)]
    pub password: Option<String>,

    /// Default user name
    #[arg(long)]
    pub default_user_name: Option<String>,

    /// Default user id
    #[arg(long)]
    pub default_user_id: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    pub fn into_config(self) -> Config {
        Config {
            server: self.server,
            shared_space: self.shared_space,
            workspace: self.workspace,
            client_id: self.client_id,
            client_secret: self.client_secret,
            user: self.user,
            password: self.password,
            default_user_name: self.default_user_name,
            default_user_id: self.default_user_id,
            timeout_secs: self.timeout_secs,
        }
    }
}

pub fn run(args: MigrateArgs, global: &GlobalOpts) -> Result<()> {
    if !args.file.exists() {
        return Err(miette::miette!("File not found: {}", args.file.display()));
    }

    // Connection settings are only loaded for live runs
    let settings = if args.dry_run {
        None
    } else {
        let mut config = Config::load(global.config.as_deref())?;
        config.merge(args.connection.into_config());
        Some(config.into_settings()?)
    };

    let source = RowSource::open(&args.file, args.start_record)?;

    println!(
        "{} Migrating tests from {} starting at record {}{}",
        style("→").blue(),
        style(args.file.display()).yellow(),
        style(source.first_yielded()).cyan(),
        if args.dry_run {
            style(" (dry run)").dim().to_string()
        } else {
            String::new()
        }
    );
    println!();

    let (result, stats) = match settings {
        None => migrate(DryRunApi::default(), source),
        Some(settings) => {
            log::info!(
                "Connecting to {} (shared space {}, workspace {})",
                settings.server,
                settings.shared_space,
                settings.workspace
            );
            let client = OctaneClient::connect(settings)?;
            migrate(client, source)
        }
    };

    print_summary(&stats, args.dry_run);

    if let Err(e) = result {
        let hint = match stats.failed_record {
            Some(record) => format!(
                "Stopped at record {}; resume with --start-record {}",
                record, record
            ),
            None => "Migration stopped while reading the CSV file".to_string(),
        };
        return Err(miette::Report::new(e).wrap_err(hint));
    }

    Ok(())
}

fn migrate<A: TestApi>(
    api: A,
    source: RowSource<impl std::io::Read>,
) -> (std::result::Result<(), MigrationError>, MigrationStats) {
    let mut migrator = Migrator::new(api);
    let result = migrator.run(source, print_migrated);
    (result, migrator.stats().clone())
}

fn print_migrated(migrated: &MigratedTest) {
    println!(
        "{} Record {}: Created test {} - {} (parameters table {})",
        style("✓").green(),
        migrated.record,
        style(&migrated.test_id).cyan(),
        truncate_str(first_line(&migrated.name), 40),
        style(&migrated.table_id).dim()
    );
}

fn print_summary(stats: &MigrationStats, dry_run: bool) {
    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Migration Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Rows read:        {}", style(stats.rows_read).cyan());
    println!("  Tests migrated:   {}", style(stats.tests_migrated).green());
    if let Some(record) = stats.last_record {
        println!("  Last record:      {}", record);
    }
    if let Some(record) = stats.failed_record {
        println!("  Failed at record: {}", style(record).red());
    }

    if dry_run {
        println!();
        println!(
            "{}",
            style("Dry run complete. Nothing was sent to the server.").yellow()
        );
    }
}

/// Stands in for the server: prints each payload and hands out `DRY-<n>` ids
#[derive(Debug, Default)]
struct DryRunApi {
    next_id: u64,
}

impl DryRunApi {
    fn id(&mut self) -> String {
        self.next_id += 1;
        format!("DRY-{}", self.next_id)
    }
}

impl TestApi for DryRunApi {
    fn create_manual_test(
        &mut self,
        test: &ManualTest,
    ) -> std::result::Result<Option<ManualTest>, MigrationError> {
        println!("{} POST tests {}", style("○").dim(), test.create_body());
        let id = self.id();
        Ok(Some(test.clone().with_id(id)))
    }

    fn upload_steps(
        &mut self,
        test_id: &str,
        steps_json: &str,
    ) -> std::result::Result<(), MigrationError> {
        println!("  PUT tests/{}/script {}", test_id, steps_json);
        Ok(())
    }

    fn upload_parameters_table(
        &mut self,
        _table_name: &str,
        parameters_json: &str,
    ) -> std::result::Result<Option<String>, MigrationError> {
        println!("  POST test_data_tables {}", parameters_json);
        Ok(Some(self.id()))
    }

    fn attach_parameters_table(
        &mut self,
        test: &ManualTest,
        table_id: &str,
    ) -> std::result::Result<usize, MigrationError> {
        let test_id = test.id.as_deref().unwrap_or_default();
        println!(
            "  PUT tests {}",
            ManualTest::attach_table_body(test_id, table_id)
        );
        Ok(1)
    }
}
