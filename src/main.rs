/*
cargo run --release -- \
    --bucket my-qa-dataset \
    --prefix data/

AWS credentials and region are resolved from the environment
(AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY / AWS_REGION or a profile).
*/

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use log::info;
use qa_dataset_prep::config::{self, PipelineConfig};
use qa_dataset_prep::pipeline;
use qa_dataset_prep::store::S3Store;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{create_dir_all, File};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Build a combined OpenAssistant + Alpaca QA dataset and push it to S3")]
struct Cli {
    // Target S3 bucket
    #[arg(long, default_value = "my-qa-dataset")]
    bucket: String,

    // Key prefix for the uploaded partitions
    #[arg(long, default_value = "data/")]
    prefix: String,

    #[arg(long, default_value = config::OASST1_URL)]
    oasst_url: String,

    #[arg(long, default_value = config::ALPACA_URL)]
    alpaca_url: String,

    // Where downloads and outputs land
    #[arg(long, value_name = "DIR", default_value = ".")]
    work_dir: PathBuf,

    // Fraction of records that go to train.jsonl
    #[arg(long, default_value = "0.8")]
    train_frac: f32,

    // Fix the shuffle for a reproducible split
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // logging setup
    create_dir_all(&cli.log_dir)?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = cli.log_dir.join(format!("qa_dataset_prep_{ts}.log"));
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            LogConfig::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, LogConfig::default(), File::create(&log_path)?),
    ])?;
    info!("Starting QA dataset preparation");

    let cfg = PipelineConfig {
        bucket: cli.bucket,
        prefix: cli.prefix,
        oasst_url: cli.oasst_url,
        alpaca_url: cli.alpaca_url,
        work_dir: cli.work_dir,
        train_frac: cli.train_frac,
    };
    info!("Bucket: {}  prefix: {}  train_frac: {}", cfg.bucket, cfg.prefix, cfg.train_frac);

    let aws_cfg = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    let store = S3Store::new(aws_sdk_s3::Client::new(&aws_cfg), cfg.bucket.clone());

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = pipeline::run(&cfg, &store, &mut rng).await?;

    println!("\n=== Prep summary ===");
    println!("OpenAssistant records : {}", report.oasst_records);
    println!("Alpaca records        : {}", report.alpaca_records);
    println!("Train records         : {}", report.train_records);
    println!("Eval records          : {}", report.eval_records);
    println!(
        "Uploaded              : s3://{}/{}{{{},{}}}",
        cfg.bucket,
        cfg.prefix,
        config::TRAIN_FILE,
        config::EVAL_FILE
    );
    println!("Log file              : {:?}", log_path);

    Ok(())
}
