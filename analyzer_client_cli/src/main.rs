use std::path::PathBuf;
use std::time::Duration;

use analyzer_client_cli::client::AnalyzerClient;
use analyzer_client_cli::session::TaskSession;
use analyzer_client_cli::{utils, ExportFormat};
use clap::Parser;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV or Excel file of customer comments to analyze
    #[arg(short, long)]
    file: PathBuf,

    /// Base URL of the analyzer API (through the BFF by default)
    #[arg(short, long, default_value = "http://localhost:3000/api")]
    server: Url,

    /// Seconds between status polls
    #[arg(long, default_value_t = 2)]
    poll_interval: u64,

    /// Seconds without progress before the task counts as stalled
    #[arg(long, default_value_t = 60)]
    stall_timeout: u64,

    /// Where to write the analysis results
    #[arg(short, long, default_value = "results.json")]
    output: PathBuf,

    /// Also download an export in this format
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,

    /// Customer segment label forwarded with the upload
    #[arg(long)]
    segment: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let client = AnalyzerClient::new(
        args.server,
        Duration::from_secs(args.poll_interval),
        Duration::from_secs(args.stall_timeout),
    )?;
    let mut session = TaskSession::new();

    let upload = client
        .upload(&mut session, &args.file, args.segment.as_deref())
        .await?;
    println!(
        "uploaded {} ({} rows), task {}",
        upload.file_info.name, upload.file_info.rows, upload.task_id
    );
    if upload.estimated_time_seconds > 0 {
        println!(
            "estimated processing time: {}s",
            upload.estimated_time_seconds
        );
    }

    client.poll_to_completion(&mut session).await?;

    let results = client.fetch_results(&upload.task_id).await?;
    println!(
        "NPS {:.1} | avg churn risk {:.2} | {} pain points",
        results.summary.nps.score,
        results.summary.churn_risk.average,
        results.summary.pain_points.len()
    );
    utils::save_json(&serde_json::to_value(&results)?, &args.output)?;

    if let Some(format) = args.export {
        let blob = client.export(&upload.task_id, format).await?;
        let path = args.output.with_extension(format.as_str());
        utils::save_bytes(&blob, &path)?;
    }

    Ok(())
}
