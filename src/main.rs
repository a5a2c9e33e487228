use clap::Parser;
use miette::Result;
use octane_migrate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    octane_migrate::cli::init_logging(&global);

    match cli.command {
        Commands::Migrate(args) => octane_migrate::cli::commands::migrate::run(args, &global),
        Commands::Config(cmd) => octane_migrate::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => octane_migrate::cli::commands::completions::run(args),
    }
}
