use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use heart_risk_gateway::predictor::{sample_cases, Classification};

#[derive(Parser)]
#[command(name = "predict-cli")]
#[command(about = "Command-line client for the heart risk gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Prediction route, when the gateway overrides `routes.predict_path`
    #[arg(long, default_value = "/api/predict")]
    predict_path: String,

    /// Status route, when the gateway overrides `routes.status_path`
    #[arg(long, default_value = "/api/status")]
    status_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit measurements from a JSON file or an inline JSON string
    Predict {
        #[arg(long, conflicts_with = "json", required_unless_present = "json")]
        file: Option<PathBuf>,

        #[arg(long)]
        json: Option<String>,
    },
    /// Submit a built-in sample case (1 or 2)
    Sample {
        #[arg(default_value_t = 1)]
        case: usize,
    },
    /// Check gateway status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base_url = cli.url.trim_end_matches('/');
    let predict_url = format!("{}{}", base_url, cli.predict_path);

    match cli.command {
        Commands::Predict { file, json } => {
            let text = match (file, json) {
                (Some(path), _) => std::fs::read_to_string(path)?,
                (None, Some(json)) => json,
                (None, None) => unreachable!("clap requires --file or --json"),
            };
            let body: Value = serde_json::from_str(&text)?;
            let res = client.post(&predict_url).json(&body).send().await?;
            print_response(res).await?;
        }
        Commands::Sample { case } => {
            let cases = sample_cases();
            let Some(sample) = case.checked_sub(1).and_then(|i| cases.get(i)) else {
                return Err(format!("no sample case {} (have 1-{})", case, cases.len()).into());
            };
            println!("{} (expected: {})", sample.description, sample.expected);
            let res = client.post(&predict_url).json(&sample.request).send().await?;
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client.get(format!("{}{}", base_url, cli.status_path)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let Ok(json) = serde_json::from_str::<Value>(&text) else {
        eprintln!("Error: gateway returned status {} with a non-JSON body", status);
        eprintln!("Response: {}", text);
        return Ok(());
    };

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&json)?);

    let label = json
        .get("classification")
        .and_then(Value::as_str)
        .and_then(Classification::parse);
    if let (Some(label), Some(probability)) = (label, json.get("probability").and_then(Value::as_f64)) {
        println!("Classification: {} (probability {:.2})", label, probability);
    }
    Ok(())
}
