use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use screenlate_config::translator::TranslatorConfig;
use screenlate_core::{PipelineDeps, QueuedRegionSelector, ui_channel};
use screenlate_ocr::{HotkeyManager, OcrTextExtractor, XcapFrameSource, init_ocr_engine, parse_bindings};
use screenlate_translator::{LlamaServer, LlmTranslator, PromptTemplate, Translator};
use screenlate_types::Rect;
use tracing_subscriber::EnvFilter;

mod controller;
mod events;
mod hotkeys;
mod settings;


use self::controller::AppController;
use self::hotkeys::HotkeyRouter;

/// How long in-flight cycles get to finish on exit
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
#[command(version, about = "Translate a screen region with a local LLM", long_about = None)]
struct Cli {
    /// Path to the JSON config file (default: ./config.json if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = settings::load_config(cli.config.as_deref())?;
    let bindings = parse_bindings(&config.hotkeys)?;
    let template = PromptTemplate::new(config.translator.prompt_template.clone())?;

    if cli.check {
        tracing::info!("Configuration is valid");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("screenlate-worker")
        .build()
        .context("Failed to start tokio runtime")?;

    let engine = init_ocr_engine(&config.capture.language)?;
    let extractor = OcrTextExtractor::new(engine, config.capture.preprocess.clone());

    let server = runtime.block_on(start_model_server(&config.translator))?;
    let translator = LlmTranslator::new(
        server,
        template,
        settings::generation_params(&config.translator),
    );
    let metadata = translator.metadata();
    tracing::info!("Translator ready: {} ({})", metadata.name, metadata.model);

    let (ui, ui_rx) = ui_channel();
    let deps = PipelineDeps {
        selector: Arc::new(QueuedRegionSelector::new(ui.clone())),
        frames: Arc::new(XcapFrameSource::new()),
        extractor: Arc::new(extractor),
        translator: Arc::new(translator),
        ui: ui.clone(),
    };

    let app = AppController::new(deps, settings::pipeline_settings(&config));
    if let Some(region) = config.capture.initial_region {
        app.pipeline().set_ocr_region(Rect::from(region));
    }

    // Hotkeys belong to the thread that runs the GUI event loop
    let hotkeys = HotkeyManager::register(bindings)?;
    HotkeyRouter::new(hotkeys.actions(), app.action_sender()).install();

    let mut tasks = {
        let _runtime = runtime.enter();
        app.spawn_tasks(ui)
    };

    let ui_result = screenlate_ui::ui_loop(ui_rx, &config.overlay);

    HotkeyRouter::uninstall();
    drop(hotkeys);

    runtime.block_on(async {
        app.shutdown(SHUTDOWN_GRACE).await;
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Task exited with error: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    });
    runtime.shutdown_timeout(Duration::from_secs(1));

    ui_result
}

async fn start_model_server(config: &TranslatorConfig) -> anyhow::Result<LlamaServer> {
    match &config.endpoint {
        Some(url) => {
            tracing::info!("Using llama.cpp server at {url}");
            Ok(LlamaServer::connect(url.clone()))
        }
        None => {
            let server = LlamaServer::spawn(&settings::server_options(config)).await?;
            tracing::info!("llama.cpp server ready at {}", server.base_url());
            Ok(server)
        }
    }
}
