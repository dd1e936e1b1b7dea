use crate::domain::model::ServiceEndpoints;
use std::io::Write;

pub const TITLE: &str = "🚀 Dr. David Paul's ETH Trading Agent";

pub const PRINCIPLES: [&str; 5] = [
    "Good trades are hard trades",
    "Counter-trend entries within long-term trends",
    "Process focus over profit focus",
    "Entries where masses place stops",
    "Combining fundamental (on-chain) and technical analysis",
];

/// Operator-facing startup text, one entry per output line.
pub fn startup_lines(run_mode: &str, endpoints: &ServiceEndpoints) -> Vec<String> {
    let mut lines = vec![
        TITLE.to_string(),
        "=".repeat(50),
        "🧠 Dr. Paul's Trading Principles Active:".to_string(),
    ];

    lines.extend(PRINCIPLES.iter().map(|p| format!("   • {}", p)));

    lines.push(format!(
        "\n🔴 STARTING {} MODE...",
        run_mode.to_uppercase()
    ));
    lines.push(format!("📊 Dashboard available at: {}", endpoints.dashboard_url));
    lines.push(format!("🔗 API server at: {}", endpoints.api_url));
    lines.push("⚠️  Press Ctrl+C to stop".to_string());

    lines
}

pub fn print_startup<W: Write>(
    out: &mut W,
    run_mode: &str,
    endpoints: &ServiceEndpoints,
) -> std::io::Result<()> {
    for line in startup_lines(run_mode, endpoints) {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}
