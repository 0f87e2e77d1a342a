use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dash_analytics::Distribution;
use dash_core::{DashboardAssembler, DashboardConfig, DashboardContext, SnapshotSource};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("dash")
        .version(dash_core::VERSION)
        .about("Media server dashboard overview renderer")
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("render")
                .about("Assemble the overview page from a snapshot")
                .arg(
                    Arg::new("snapshot")
                        .long("snapshot")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON snapshot of the media server listings"),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("sip")
                        .long("sip")
                        .action(ArgAction::SetTrue)
                        .help("Force SIP analytics on"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .value_parser(["json", "text"])
                        .help("Output format"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print JSON output"),
                ),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate configuration and print the effective values")
                .arg(config_arg()),
        )
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file; environment variables override it")
}

fn init_tracing(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if format == "json" {
        fmt.json().init();
    } else {
        fmt.init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    let config = match path {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    config
        .overlay_env()
        .context("applying environment overrides")
}

fn distribution_line(out: &mut String, label: &str, dist: &Distribution) {
    let buckets: Vec<String> = dist.iter().map(|(k, v)| format!("{k}={v}")).collect();
    let _ = writeln!(out, "  {label}: {}", buckets.join(" "));
}

fn render_text(context: &DashboardContext) -> String {
    let mut out = String::new();
    let server = &context.server;
    let _ = writeln!(out, "Server: {} ({:?})", server.url, server.status);
    let _ = writeln!(out, "  latency: {:.1}ms", server.sdk_latency_ms);

    let rooms = &context.rooms.analytics;
    let _ = writeln!(
        out,
        "Rooms: {} total, {} active, {} participants, {:.1} avg",
        rooms.total_rooms, rooms.active_rooms, rooms.total_participants, rooms.avg_participants
    );
    distribution_line(&mut out, "sizes", &rooms.room_sizes);

    let egress = &context.egress.analytics;
    let _ = writeln!(
        out,
        "Egress: {} jobs, {} active, {:.1}% success",
        egress.total_jobs, egress.active_jobs, egress.success_rate
    );
    distribution_line(&mut out, "types", &egress.egress_types);

    let ingress = &context.ingress.analytics;
    let _ = writeln!(
        out,
        "Ingress: {} endpoints, {} active",
        ingress.total_ingress, ingress.active_ingress
    );
    distribution_line(&mut out, "inputs", &ingress.ingress_types);

    if context.server.sip_enabled {
        let sip = &context.sip.analytics;
        let _ = writeln!(
            out,
            "SIP: {} trunks ({} in, {} out), {} rules",
            sip.total_trunks, sip.inbound_trunks, sip.outbound_trunks, sip.dispatch_rules
        );
        distribution_line(&mut out, "trunks", &sip.trunk_status);
    }

    let connections = &context.connections.analytics;
    let _ = writeln!(
        out,
        "Connections: {} participants, {:.1} minutes",
        connections.participant_count, connections.connection_minutes
    );
    distribution_line(&mut out, "platforms", &connections.platforms);

    for (domain, diagnostic) in context.diagnostics() {
        let _ = writeln!(out, "DEGRADED {domain}: {diagnostic}");
    }
    out
}

async fn render(args: &ArgMatches) -> anyhow::Result<()> {
    let mut config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if args.get_flag("sip") {
        config = config.with_sip(true);
    }

    let path = args
        .get_one::<PathBuf>("snapshot")
        .context("--snapshot is required")?;
    let source = SnapshotSource::load(path).await?;

    let context = DashboardAssembler::new(config, Arc::new(source))
        .assemble()
        .await;

    let output = match args.get_one::<String>("format").map(String::as_str) {
        Some("text") => render_text(&context),
        _ if args.get_flag("pretty") => serde_json::to_string_pretty(&context)?,
        _ => serde_json::to_string(&context)?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

fn check_config(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    print!("{}", toml::to_string(&config)?);
    tracing::info!(server_url = %config.server_url, "configuration valid");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let log_format = matches
        .get_one::<String>("log-format")
        .map_or("text", String::as_str);
    init_tracing(log_format);

    match matches.subcommand() {
        Some(("render", args)) => render(args).await,
        Some(("check-config", args)) => check_config(args),
        _ => Ok(()),
    }
}
