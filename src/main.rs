use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use newsdesk::{
    configuration::get_configuration,
    dal::{report_file::CsvReport, work_item_file::FileWorkQueue},
    services::{produce_work_items, Droid},
    startup::{build_batch_runner, run},
};

#[derive(Parser)]
#[command(version, about = "Searches a news site and reports what it finds")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Process every work item in the configured input file
    Consume,
    /// Turn a table of names into a work item
    Produce {
        #[arg(long, env = "NEWSDESK_INPUT_SHEET")]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let configuration = get_configuration().context("Failed to read configuration.")?;

    match cli.command.unwrap_or(Command::Consume) {
        Command::Produce { input } => {
            produce_work_items(&input, &configuration.work_items.input_path)
                .with_context(|| format!("Failed to produce work items from {}", input.display()))?;
        }
        Command::Consume => {
            let runner = build_batch_runner(&configuration)?;
            let automation = Droid::new(&configuration.browser);
            let report = CsvReport::new(configuration.application.output_directory.clone());
            let mut queue = FileWorkQueue::open(
                &configuration.work_items.input_path,
                configuration.work_items.output_path.clone(),
            )
            .context("Failed to load work items.")?;

            run(&runner, &automation, &report, &mut queue).await;
        }
    }

    Ok(())
}
