#![allow(clippy::uninlined_format_args)]

use phish_guard::config::{EngineConfig, SignalMode};
use phish_guard::RiskEngine;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config = EngineConfig::default();
    config.signals.mode = SignalMode::Disabled;
    let engine = RiskEngine::new(config);

    println!("Scoring sample inputs (random signals disabled)...");

    let samples = vec![
        "http://192.168.1.1/login",
        "https://secure-paypal.com.account.verify-user.net/login",
        "support@secure-mail-paypal-verification.com",
        "hello this is a message, please verify your account immediately",
        "https://xn--pple-43d.com",
        "http://example.com?token=dGhpcyBpcyBiYXNlNjQ=",
    ];

    for sample in &samples {
        let result = engine.analyze(sample);
        println!("\nINPUT: {}", sample);
        println!("RISK SCORE: {}", result.score.unwrap_or(0));
        println!("VERDICT: {}", result.reason);
        println!("DETAILS:");
        for finding in &result.findings {
            println!("- {} ({:+})", finding.message, finding.contribution);
        }
    }

    println!("\n=== Email ===");
    let email = engine.analyze_email(
        "Urgent update required",
        "a@xyz-bank.click",
        "Please verify your account at http://g00gle.com.login.top/",
    );
    println!("{}", serde_json::to_string_pretty(&email)?);

    println!("\n=== Attachments ===");
    for name in ["invoice.exe", "invoice.pdf"] {
        let result = engine.analyze_attachment(name, b"");
        println!("{} → {:?}: {}", name, result.risk, result.reason);
    }

    println!("\n=== Domains ===");
    for domain in ["malicious.com", "promo.xyz", "example.com"] {
        let result = engine.domain_reputation(domain);
        println!("{} → {:?}: {}", domain, result.risk, result.reason);
    }

    Ok(())
}
