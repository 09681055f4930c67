//! Invoice Reader CLI
//!
//! ```bash
//! invoice-reader serve --static-dir frontend/dist   # HTTP server (port 5000)
//! invoice-reader extract nota1.jpg nota2.png        # OCR + analysis, JSON to stdout
//! invoice-reader analyze texto.txt --regex          # Analysis only, on extracted text
//! ```

use clap::{Parser, Subcommand};
use invoice_reader::config::{build_pipeline, select_analyzer, PipelineConfig, ServerConfig};
use invoice_reader::{normalize_text, UploadedFile};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "invoice-reader")]
#[command(about = "Read Brazilian invoice photos into JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = invoice_reader::config::DEFAULT_PORT)]
        port: u16,

        /// Directory with the built frontend
        #[arg(long, env = "INVOICE_STATIC_DIR")]
        static_dir: Option<PathBuf>,

        /// AWS region for Textract
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,

        /// Use the regex analyzer even if GEMINI_API_KEY is set
        #[arg(long)]
        regex: bool,
    },

    /// Run OCR and analysis on local images
    Extract {
        /// Image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// AWS region for Textract
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,

        /// Use the regex analyzer even if GEMINI_API_KEY is set
        #[arg(long)]
        regex: bool,
    },

    /// Analyze already extracted text
    Analyze {
        /// Text file (OCR output)
        input: PathBuf,

        /// Use the regex analyzer even if GEMINI_API_KEY is set
        #[arg(long)]
        regex: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            port,
            static_dir,
            region,
            regex,
        } => cmd_serve(ServerConfig { port, static_dir }, region, regex).await,

        Commands::Extract {
            inputs,
            output,
            region,
            regex,
        } => cmd_extract(&inputs, output.as_deref(), region, regex).await,

        Commands::Analyze { input, regex } => cmd_analyze(&input, regex).await,
    };

    if let Err(e) = result {
        log::error!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    config: ServerConfig,
    region: Option<String>,
    force_regex: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(&PipelineConfig {
        aws_region: region,
        force_regex,
    })
    .await;

    invoice_reader::server::start_server(config, pipeline).await?;
    Ok(())
}

async fn cmd_extract(
    inputs: &[PathBuf],
    output: Option<&Path>,
    region: Option<String>,
    force_regex: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut files = Vec::with_capacity(inputs.len());
    for path in inputs {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        log::info!("📄 {} ({} bytes)", path.display(), bytes.len());
        files.push(UploadedFile::new(file_name, bytes));
    }

    let pipeline = build_pipeline(&PipelineConfig {
        aws_region: region,
        force_regex,
    })
    .await;

    let outcome = pipeline.process_batch(&files).await;
    for (name, reason) in &outcome.skipped {
        log::warn!("   skipped {}: {}", name, reason);
    }

    let json = serde_json::to_string_pretty(&outcome.entries)?;
    write_output(&json, output)?;

    log::info!("✨ {} of {} file(s) read", outcome.entries.len(), files.len());
    Ok(())
}

async fn cmd_analyze(input: &Path, force_regex: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = normalize_text(&tokio::fs::read_to_string(input).await?);
    let analyzer = select_analyzer(force_regex);

    let info = analyzer.analyze(&text).await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            log::info!("💾 Saved to: {}", p.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
