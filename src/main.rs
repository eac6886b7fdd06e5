use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use console::style;
use tokio::io::AsyncReadExt;
use tracing::{debug, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use uyviet_desk::api::SelectedFile;
use uyviet_desk::config::{self, Settings};
use uyviet_desk::ui::{ConsoleAlerts, FetchNavigator, FsDownloadSink, SpinnerLabel};
use uyviet_desk::{
    GenerateController, GenerateOutcome, HttpClient, Page, StaticDownloadLink, Transport,
    UploadController, UploadOutcome,
};

#[derive(Parser)]
#[command(
    name = "uyviet",
    version,
    about = "Extract project data from documents and generate proposal drafts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the drafting service
    #[arg(long, env = "UYVIET_SERVER", global = true)]
    server: Option<String>,

    /// Directory downloads are saved into
    #[arg(long, env = "UYVIET_OUTPUT_DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a document and show the extracted text and fields
    Extract {
        /// Document to upload (pdf, docx, png, jpg)
        file: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a proposal document from the given text and fields
    Generate {
        #[command(flatten)]
        edits: FieldEdits,
    },
    /// Extract a document, apply edits, then generate the proposal
    Draft {
        /// Document to upload
        file: PathBuf,
        #[command(flatten)]
        edits: FieldEdits,
    },
    /// Download the static tools workbook
    Tools,
}

/// Values the user types over the extracted ones.
#[derive(Args, Debug, Default)]
struct FieldEdits {
    /// Project name
    #[arg(long)]
    project: Option<String>,
    /// Client (investor)
    #[arg(long)]
    client: Option<String>,
    /// Location
    #[arg(long)]
    location: Option<String>,
    /// Scale / area
    #[arg(long)]
    scale: Option<String>,
    /// Replace the preview text with this file ("-" reads stdin)
    #[arg(long)]
    content_file: Option<PathBuf>,
}

impl FieldEdits {
    async fn apply(&self, page: &Page) -> anyhow::Result<()> {
        let edits = [
            (&self.project, &page.project),
            (&self.client, &page.client),
            (&self.location, &page.location),
            (&self.scale, &page.scale),
        ];
        for (value, field) in edits {
            if let Some(value) = value {
                debug!("Editing {}", field.id());
                field.set_value(value.as_str()).await;
            }
        }

        if let Some(ref path) = self.content_file {
            page.preview.set_value(read_content(path).await?).await;
        }
        Ok(())
    }
}

async fn read_content(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("Failed to read content from stdin")?;
        return Ok(content);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Wiring shared by every command.
struct App {
    transport: Arc<dyn Transport>,
    page: Page,
    status: Arc<SpinnerLabel>,
    alerts: Arc<ConsoleAlerts>,
    sink: Arc<FsDownloadSink>,
}

impl App {
    fn new(settings: &Settings) -> anyhow::Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(
            HttpClient::new(settings).context("Failed to create HTTP client")?,
        );
        let status = Arc::new(SpinnerLabel::new());

        Ok(Self {
            transport,
            page: Page::new(status.clone()),
            status,
            alerts: Arc::new(ConsoleAlerts::new()),
            sink: Arc::new(FsDownloadSink::new(&settings.output_dir).announcing()),
        })
    }

    async fn select(&self, path: &Path) -> anyhow::Result<()> {
        let file = SelectedFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.page.file_input.select(file).await;
        Ok(())
    }

    async fn extract(&self) -> anyhow::Result<bool> {
        let controller =
            UploadController::new(self.transport.clone(), self.page.clone(), self.alerts.clone());
        let outcome = controller
            .run()
            .instrument(info_span!("press", button = controller.trigger_id()))
            .await;
        self.status.finish();

        Ok(matches!(outcome?, UploadOutcome::Extracted(_)))
    }

    async fn generate(&self) -> anyhow::Result<bool> {
        let controller = GenerateController::new(
            self.transport.clone(),
            self.page.clone(),
            self.alerts.clone(),
            self.sink.clone(),
        );

        let outcome = controller
            .run()
            .instrument(info_span!("press", button = controller.trigger_id()))
            .await?;

        Ok(matches!(outcome, GenerateOutcome::Downloaded { .. }))
    }

    async fn tools(&self) -> anyhow::Result<()> {
        let navigator = Arc::new(FetchNavigator::new(
            self.transport.clone(),
            self.sink.clone(),
        ));
        let link = StaticDownloadLink::new(navigator);
        link.run()
            .instrument(info_span!("press", button = link.trigger_id()))
            .await?;
        Ok(())
    }

    async fn print_page(&self, json: bool) -> anyhow::Result<()> {
        let fields = [
            &self.page.project,
            &self.page.client,
            &self.page.location,
            &self.page.scale,
        ];

        if json {
            let mut map = serde_json::Map::new();
            for field in fields {
                map.insert(field.id().to_string(), field.value().await.into());
            }
            let out = serde_json::json!({
                "text": self.page.preview.value().await,
                "fields": map,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        for field in fields {
            println!("{:>10}: {}", style(field.id()).bold(), field.value().await);
        }
        println!();
        println!("{}", self.page.preview.value().await);
        Ok(())
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut settings = config::load_settings().await;
    if let Some(server) = cli.server {
        settings.server_url = server;
    }
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }
    if let Some(timeout) = cli.timeout {
        settings.request_timeout = Some(timeout);
    }
    debug!(?settings, "Loaded settings");

    let app = App::new(&settings)?;

    let ok = match cli.command {
        Commands::Extract { file, json } => {
            if let Some(ref path) = file {
                app.select(path).await?;
            }
            let ok = app.extract().await?;
            if ok {
                app.print_page(json).await?;
            }
            ok
        }
        Commands::Generate { edits } => {
            edits.apply(&app.page).await?;
            app.generate().await?
        }
        Commands::Draft { file, edits } => {
            app.select(&file).await?;
            if app.extract().await? {
                edits.apply(&app.page).await?;
                app.generate().await?
            } else {
                false
            }
        }
        Commands::Tools => {
            app.tools().await?;
            true
        }
    };

    Ok(exit_code(ok))
}
