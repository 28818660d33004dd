use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Arg, Command};
use firewatch_core::{
    build_payload, journal, load_json_document, Deliverer, DeliveryReceipt, NotifyError,
    RunContext, EXIT_BAD_ARGUMENTS,
};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with default configuration
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let matches = Command::new("firewatch")
        .version("0.1.0")
        .about("Forwards monitoring alerts to the PagerDuty events API")
        .arg(
            Arg::new("alert-file")
                .value_name("ALERT_FILE")
                .help("Path to the alert JSON document")
                .required(true),
        )
        .arg(
            Arg::new("routing-key")
                .value_name("ROUTING_KEY")
                .help("Routing credential carried inside the event body")
                .required(true),
        )
        .arg(
            Arg::new("hook")
                .value_name("HOOK")
                .help("Placeholder slot kept for caller compatibility; unused")
                .required(true),
        )
        .arg(
            Arg::new("extra")
                .value_name("EXTRA")
                .help("Optional 'debug' flag and an options-file path ending in 'options'")
                .num_args(0..)
                .allow_hyphen_values(true)
                .trailing_var_arg(true),
        )
        .try_get_matches_from(args.iter());

    let matches = match matches {
        Ok(matches) => matches,
        Err(e) if e.kind() == ErrorKind::DisplayHelp || e.kind() == ErrorKind::DisplayVersion => {
            e.exit()
        }
        Err(_) => {
            // The journal line is the contract here, not clap's usage text.
            let ctx = RunContext::new(false);
            journal::record(&ctx, &format!("{} Wrong arguments", ctx.started));
            journal::diagnostic(
                &ctx,
                &format!("# Exiting: Bad arguments. Inputted: {:?}", args),
            );
            std::process::exit(EXIT_BAD_ARGUMENTS);
        }
    };

    let extras: Vec<&String> = matches
        .get_many::<String>("extra")
        .map(|vals| vals.collect())
        .unwrap_or_default();

    let debug_enabled = extras.first().map(|a| a.as_str() == "debug").unwrap_or(false);
    let ctx = RunContext::new(debug_enabled);

    // One self-contained call-summary line per invocation, before anything
    // else happens.
    journal::record(&ctx, &call_summary(&ctx, &args));

    info!("Starting firewatch forwarder");

    let alert_file = matches.get_one::<String>("alert-file").unwrap();
    let routing_key = matches.get_one::<String>("routing-key").unwrap();
    // The options document rides in the trailing arguments; the first one
    // ending in "options" wins. The hook slot is never a candidate.
    let options_file = extras
        .iter()
        .find(|a| a.ends_with("options"))
        .map(|s| s.as_str());

    match run(&ctx, alert_file, routing_key, options_file).await {
        Ok(receipt) => {
            info!("Delivery acknowledged with HTTP {}", receipt.status);
            Ok(())
        }
        Err(err) => {
            journal::diagnostic(&ctx, &err.to_string());
            if matches!(
                err,
                NotifyError::BadArguments
                    | NotifyError::FileNotFound(_)
                    | NotifyError::InvalidJson { .. }
                    | NotifyError::HttpClient(_)
            ) {
                error!("{}", err);
                std::process::exit(err.exit_code());
            }
            // Every other failure class is journaled above and then
            // re-raised through main.
            Err(err.into())
        }
    }
}

async fn run(
    ctx: &RunContext,
    alert_file: &str,
    routing_key: &str,
    options_file: Option<&str>,
) -> Result<DeliveryReceipt, NotifyError> {
    journal::diagnostic(ctx, "# Starting");

    journal::diagnostic(ctx, "# Options file location");
    journal::diagnostic(ctx, options_file.unwrap_or(""));

    let options = match options_file {
        Some(path) => load_json_document(path)?,
        None => Value::Null,
    };
    journal::diagnostic(ctx, "# Processing options");
    journal::diagnostic(ctx, &options.to_string());

    journal::diagnostic(ctx, "# Alert file location");
    journal::diagnostic(ctx, alert_file);
    let alert = load_json_document(alert_file)?;
    journal::diagnostic(ctx, "# Processing alert");
    journal::diagnostic(ctx, &alert.to_string());

    journal::diagnostic(ctx, "# Generating message");
    let payload = build_payload(&alert, &options, routing_key)?;
    journal::diagnostic(ctx, &payload);

    journal::diagnostic(ctx, "# Sending message");
    let deliverer = Deliverer::new()?;
    let receipt = deliverer.deliver(&payload).await?;
    journal::diagnostic(
        ctx,
        &format!("# Response received: HTTP {}", receipt.status),
    );

    Ok(receipt)
}

/// Call-summary journal line: the start stamp plus the first five raw
/// arguments, absent positions rendered as empty strings.
fn call_summary(ctx: &RunContext, args: &[String]) -> String {
    let arg = |idx: usize| args.get(idx).map(String::as_str).unwrap_or("");
    format!(
        "{} {} {} {} {} {}",
        ctx.started,
        arg(1),
        arg(2),
        arg(3),
        arg(4),
        arg(5)
    )
}
