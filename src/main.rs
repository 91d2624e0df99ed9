use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::LevelFilter;
use phish_guard::batch::{analyze_batch, parse_jsonl};
use phish_guard::config::{load_config_or_default, EngineConfig, SignalMode};
use phish_guard::{RiskEngine, RiskResult};
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = Command::new("phish-guard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rule-based phishing risk scoring for URLs, text, emails, attachments and domains")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/phish-guard.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Score a single URL"),
        )
        .arg(
            Arg::new("text")
                .long("text")
                .value_name("TEXT")
                .help("Score free text or a URL"),
        )
        .arg(
            Arg::new("email-subject")
                .long("email-subject")
                .value_name("SUBJECT")
                .help("Subject of an email to analyze"),
        )
        .arg(
            Arg::new("email-sender")
                .long("email-sender")
                .value_name("ADDRESS")
                .help("Sender address of an email to analyze"),
        )
        .arg(
            Arg::new("email-body")
                .long("email-body")
                .value_name("BODY")
                .help("Body of an email to analyze"),
        )
        .arg(
            Arg::new("attachment")
                .long("attachment")
                .value_name("FILE")
                .help("Classify a file as an email attachment"),
        )
        .arg(
            Arg::new("domain")
                .long("domain")
                .value_name("DOMAIN")
                .help("Check a domain against the blacklist"),
        )
        .arg(
            Arg::new("batch")
                .long("batch")
                .value_name("FILE")
                .help("Analyze a JSON Lines file of inputs concurrently"),
        )
        .arg(
            Arg::new("deterministic")
                .long("deterministic")
                .help("Disable random authority and domain-age signals")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logger based on verbose flag
    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        if let Err(e) = generate_default_config(generate_path) {
            eprintln!("❌ {e:#}");
            process::exit(1);
        }
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/etc/phish-guard.yaml");

    if matches.get_flag("test-config") {
        test_config(config_path);
        return;
    }

    let mut config = load_config_or_default(config_path);
    if matches.get_flag("deterministic") {
        config.signals.mode = SignalMode::Disabled;
    }

    let engine = Arc::new(RiskEngine::new(config));
    match run(&matches, engine).await {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Nothing to analyze. Pass --url, --text, --email-*, --attachment, --domain or --batch.");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("❌ {e:#}");
            process::exit(1);
        }
    }
}

/// Runs every requested analysis; returns false when none was requested.
async fn run(matches: &ArgMatches, engine: Arc<RiskEngine>) -> Result<bool> {
    let mut results: Vec<RiskResult> = Vec::new();

    if let Some(url) = matches.get_one::<String>("url") {
        results.push(engine.analyze_url(url));
    }

    if let Some(text) = matches.get_one::<String>("text") {
        results.push(engine.analyze(text));
    }

    let subject = matches.get_one::<String>("email-subject");
    let sender = matches.get_one::<String>("email-sender");
    let body = matches.get_one::<String>("email-body");
    if subject.is_some() || sender.is_some() || body.is_some() {
        results.push(engine.analyze_email(
            subject.map(String::as_str).unwrap_or(""),
            sender.map(String::as_str).unwrap_or(""),
            body.map(String::as_str).unwrap_or(""),
        ));
    }

    if let Some(path) = matches.get_one::<String>("attachment") {
        let content =
            fs::read(path).with_context(|| format!("Failed to read attachment: {path}"))?;
        let filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        results.push(engine.analyze_attachment(&filename, &content));
    }

    if let Some(domain) = matches.get_one::<String>("domain") {
        results.push(engine.domain_reputation(domain));
    }

    if let Some(path) = matches.get_one::<String>("batch") {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file: {path}"))?;
        let inputs = parse_jsonl(&content)?;
        log::info!("Analyzing {} input(s) from {path}", inputs.len());
        results.extend(analyze_batch(Arc::clone(&engine), inputs).await?);
    }

    if results.is_empty() {
        return Ok(false);
    }

    for result in &results {
        println!("{}", serde_json::to_string_pretty(result)?);
    }
    Ok(true)
}

fn generate_default_config(path: &str) -> Result<()> {
    let yaml = EngineConfig::default().to_yaml()?;
    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {path}"))?;
    println!("✅ Default configuration written to: {path}");
    Ok(())
}

fn test_config(path: &str) {
    println!("🔍 Testing configuration...");
    println!();

    match EngineConfig::from_file(path) {
        Ok(config) => {
            println!("Profile: {:?}", config.profile);
            println!("Signal mode: {:?}", config.signals.mode);
            println!("Typosquat rules: {}", config.typosquat_rules.len());
            println!(
                "Keywords: {} url, {} email",
                config.url_keywords.len(),
                config.email_keywords.len()
            );
            println!("Suspicious TLDs: {}", config.suspicious_tlds.len());
            println!("Extended checks: {}", config.extended_checks.enabled);
            println!("✅ Configuration is valid");
        }
        Err(e) => {
            println!("❌ Configuration validation failed:");
            println!("Error: {e:#}");
            process::exit(1);
        }
    }
}
