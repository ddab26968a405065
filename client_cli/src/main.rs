//! Page cursor CLI
//!
//! Pages through an in-memory record source with one of the cursor clients
//! and prints what the table would show after every step.

use std::{
    io::{stdout, IsTerminal as _, Write},
    path::PathBuf,
    sync::Arc,
};

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use page_cursor_client::prelude::*;
use page_cursor_config::parameters::actual;
use page_cursor_core::prelude::*;
use page_cursor_data_model::prelude::*;
use page_cursor_logger::{info, warn};

/// Page through generated accounts with a standard or an advancing-index cursor.
#[derive(clap::Parser, Debug)]
#[command(name = "page-cursor", version, author)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name("PATH"), value_hint(clap::ValueHint::FilePath))]
    config: Option<PathBuf>,
    /// Print page views as JSON instead of tables
    #[arg(long)]
    json: bool,
    /// Cursor flavour to page with
    #[command(subcommand)]
    subcommand: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
enum Subcommand {
    /// Address pages by number, with page count fixed at start
    Standard(RunArgs),
    /// Address pages by scan offset, skipping deleted rows
    Advancing(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Number of generated accounts
    #[arg(short, long, default_value_t = 25)]
    records: usize,
    /// Storage positions to delete once the first page is shown
    #[arg(short, long, value_delimiter = ',')]
    delete: Vec<usize>,
    /// Navigation steps, in order
    #[arg(short, long, value_enum)]
    step: Vec<Step>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum Step {
    First,
    Previous,
    Next,
    Last,
}

impl Step {
    async fn apply(self, client: &impl PageCursorClient) -> Navigation {
        match self {
            Self::First => client.go_first().await,
            Self::Previous => client.go_previous().await,
            Self::Next => client.go_next().await,
            Self::Last => client.go_last().await,
        }
    }
}

/// Where page views end up.
trait Output {
    fn print(&mut self, label: &str, view: &PageView, records: &[Row]) -> Result<()>;
}

struct Tables<W>(W);

impl<W: Write> Output for Tables<W> {
    fn print(&mut self, label: &str, view: &PageView, records: &[Row]) -> Result<()> {
        let out = &mut self.0;
        writeln!(out, "== {label}: {}", view.page_info)?;
        writeln!(out, "{}", view.record_count_info)?;
        for info in [&view.deleted_rows_info, &view.tracked_pages_info]
            .into_iter()
            .flatten()
        {
            writeln!(out, "{info}")?;
        }
        if let Some(error) = &view.error_message {
            writeln!(out, "error: {error}")?;
        }

        let header: Vec<_> = ACCOUNT_COLUMNS.iter().map(|column| column.label()).collect();
        writeln!(out, "{:>4}  {}", "#", header.join(" | "))?;
        for (number, row) in (view.row_number_offset + 1..).zip(records) {
            let cells: Vec<_> = ACCOUNT_COLUMNS.iter().map(|column| row.cell(column)).collect();
            writeln!(out, "{number:>4}  {}", cells.join(" | "))?;
        }
        writeln!(
            out,
            "[prev {}] [next {}]",
            toggle(view.is_prev_disabled),
            toggle(view.is_next_disabled)
        )?;
        Ok(())
    }
}

struct Json<W>(W);

impl<W: Write> Output for Json<W> {
    fn print(&mut self, label: &str, view: &PageView, records: &[Row]) -> Result<()> {
        let value = serde_json::json!({
            "step": label,
            "view": view,
            "records": records,
        });
        writeln!(self.0, "{}", serde_json::to_string_pretty(&value)?)?;
        Ok(())
    }
}

fn toggle(disabled: bool) -> &'static str {
    if disabled {
        "disabled"
    } else {
        "enabled"
    }
}

async fn run(
    client: &impl PageCursorClient,
    source: &RecordSource,
    args: RunArgs,
    output: &mut dyn Output,
) -> Result<()> {
    let outcome = client.initialize().await;
    output.print("initialize", &client.view(), &client.records())?;
    if outcome == Navigation::Failed {
        return Err(eyre!(client
            .error_message()
            .unwrap_or_else(|| "initialization failed".to_owned())));
    }

    for position in args.delete {
        if !source.delete(position) {
            warn!(position, "Nothing to delete at this position");
        }
    }

    for step in args.step {
        let outcome = step.apply(client).await;
        let label = match outcome {
            Navigation::Skipped(skip) => format!("{step:?} skipped, {skip}"),
            _ => format!("{step:?}"),
        };
        output.print(&label, &client.view(), &client.records())?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    page_cursor_logger::install_panic_hook()?;

    let Args {
        config,
        json,
        subcommand,
    } = clap::Parser::parse();

    let config = actual::Root::load(config.as_deref())
        .wrap_err("Failed to load page cursor configuration")?;
    let _logger = page_cursor_logger::init_global(&config.logger, stdout().is_terminal())?;
    info!(?config, "Configuration loaded");

    let mut output: Box<dyn Output> = if json {
        Box::new(Json(stdout().lock()))
    } else {
        Box::new(Tables(stdout().lock()))
    };

    match subcommand {
        Subcommand::Standard(args) => {
            let source = Arc::new(RecordSource::new(RecordSet::accounts(args.records)));
            let client =
                StandardCursorClient::new(Timeout::from_config(source.standard(), &config.client));
            run(&client, &source, args, output.as_mut()).await
        }
        Subcommand::Advancing(args) => {
            let source = Arc::new(RecordSource::new(RecordSet::accounts(args.records)));
            let client = AdvancingIndexCursorClient::new(Timeout::from_config(
                source.advancing(),
                &config.client,
            ));
            run(&client, &source, args, output.as_mut()).await
        }
    }
}
