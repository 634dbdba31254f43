//! CLI binary for generating and inspecting PIX payloads.

use std::io::{self, Write as _};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use pix_brcode::DecodedPayload;
use pix_brcode::PixEncoder;
use pix_brcode::client::PixBackendBlockingClient;
use pix_brcode::config::{EncoderConfig, LengthPolicy};
use pix_brcode::models::{EncodeRequest, EncodedPayload, Plan};
use pix_brcode::qr::{DEFAULT_QR_SIZE, QrImageOptions, qr_image_url};

/// Environment variable name for the backend base URL.
const BACKEND_URL_ENV: &str = "PIX_BACKEND_URL";

/// Environment variable name for the backend session token.
const SESSION_TOKEN_ENV: &str = "PIX_SESSION_TOKEN";

/// PIX payment code tool: encode, decode and verify payloads.
#[derive(Debug, Parser)]
#[command(name = "pix", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Encode a payment into a PIX payload.
    Encode {
        /// Payment fields.
        #[command(flatten)]
        payment: PaymentArgs,
        /// Print the payload and checksum as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Decode a payload and verify its checksum.
    Decode {
        /// The PIX payload.
        payload: String,
    },
    /// Print the CRC16/CCITT-FALSE of a text.
    Crc {
        /// Text to checksum.
        text: String,
    },
    /// Encode a payment and print the QR image URL.
    QrUrl {
        /// Payment fields.
        #[command(flatten)]
        payment: PaymentArgs,
        /// Image side in pixels.
        #[arg(long, default_value_t = DEFAULT_QR_SIZE)]
        size: u32,
    },
    /// Fetch the paywall plans and print one payload per plan.
    Plans {
        /// Backend base URL (default: $PIX_BACKEND_URL).
        #[arg(long)]
        backend_url: Option<String>,
        /// Payment fields shared by all plans (amount is ignored).
        #[command(flatten)]
        payment: PaymentArgs,
    },
}

/// Payment fields shared by the encoding subcommands. Unset fields fall
/// back to the `PIX_*` environment configuration.
#[derive(Debug, Args)]
struct PaymentArgs {
    /// Payee PIX key (default: $PIX_KEY).
    #[arg(long)]
    key: Option<String>,
    /// Amount such as 49.90; omit for a static code.
    #[arg(long)]
    amount: Option<String>,
    /// Merchant name, at most 25 characters.
    #[arg(long)]
    name: Option<String>,
    /// Merchant city, at most 15 characters.
    #[arg(long)]
    city: Option<String>,
    /// Reference label for the additional-data field.
    #[arg(long)]
    reference: Option<String>,
    /// Truncate over-long name/city instead of failing.
    #[arg(long)]
    truncate: bool,
}

impl PaymentArgs {
    /// Converts the arguments into an encode request.
    fn to_request(&self) -> EncodeRequest {
        EncodeRequest {
            payee_key: self.key.clone(),
            amount: self.amount.as_deref().map(Into::into),
            merchant_name: self.name.clone(),
            merchant_city: self.city.clone(),
            reference: self.reference.clone(),
        }
    }
}

/// Builds the encoder from the environment, honouring `--truncate`.
fn build_encoder(args: &PaymentArgs) -> pix_brcode::error::Result<PixEncoder> {
    let mut config = EncoderConfig::from_env()?;
    if args.truncate {
        config = config.with_length_policy(LengthPolicy::Truncate);
    }
    Ok(PixEncoder::new(config))
}

/// Prints an error line to stderr.
fn report(context: &str, err: &dyn core::fmt::Display) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    dispatch(cli.command)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(command: Command) -> io::Result<ExitCode> {
    match command {
        Command::Encode { payment, json } => cmd_encode(&payment, json),
        Command::Decode { payload } => cmd_decode(&payload),
        Command::Crc { text } => cmd_crc(&text),
        Command::QrUrl { payment, size } => cmd_qr_url(&payment, size),
        Command::Plans {
            backend_url,
            payment,
        } => cmd_plans(backend_url, &payment),
    }
}

/// Encodes the payment described by `args`.
fn encode_args(args: &PaymentArgs) -> pix_brcode::error::Result<EncodedPayload> {
    build_encoder(args)?.encode_request(&args.to_request())
}

/// Executes the `encode` subcommand.
fn cmd_encode(args: &PaymentArgs, json: bool) -> io::Result<ExitCode> {
    let encoded = match encode_args(args) {
        Ok(encoded) => encoded,
        Err(err) => return report("cannot encode payment", &err),
    };
    if json {
        match serde_json::to_string_pretty(&encoded) {
            Ok(text) => writeln!(io::stdout().lock(), "{text}")?,
            Err(err) => return report("cannot serialize payload", &err),
        }
    } else {
        print_payload(&encoded)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `decode` subcommand.
fn cmd_decode(payload: &str) -> io::Result<ExitCode> {
    match pix_brcode::decode(payload) {
        Ok(decoded) => {
            print_decoded(&decoded)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("invalid payload", &err),
    }
}

/// Executes the `crc` subcommand.
fn cmd_crc(text: &str) -> io::Result<ExitCode> {
    writeln!(io::stdout().lock(), "{}", pix_brcode::crc::checksum_hex(text))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `qr-url` subcommand.
fn cmd_qr_url(args: &PaymentArgs, size: u32) -> io::Result<ExitCode> {
    let url = encode_args(args)
        .and_then(|encoded| qr_image_url(&encoded, &QrImageOptions::default().size(size)));
    match url {
        Ok(url) => {
            writeln!(io::stdout().lock(), "{url}")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("cannot build QR URL", &err),
    }
}

/// Executes the `plans` subcommand: fetches the price list and encodes a
/// payload for each plan.
fn cmd_plans(backend_url: Option<String>, args: &PaymentArgs) -> io::Result<ExitCode> {
    let Some(base_url) = backend_url.or_else(|| read_env(BACKEND_URL_ENV)) else {
        writeln!(
            io::stderr().lock(),
            "{} {} is not set and --backend-url was not given",
            "error:".red().bold(),
            BACKEND_URL_ENV.bold()
        )?;
        return Ok(ExitCode::FAILURE);
    };

    let mut builder = PixBackendBlockingClient::builder().base_url(base_url);
    if let Some(token) = read_env(SESSION_TOKEN_ENV) {
        builder = builder.session_token(token);
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(err) => return report("failed to build client", &err),
    };
    let encoder = match build_encoder(args) {
        Ok(encoder) => encoder,
        Err(err) => return report("invalid configuration", &err),
    };

    let spinner = make_spinner("Fetching plans...");
    let plans = client.plans();
    spinner.finish_and_clear();
    let plans = match plans {
        Ok(plans) => plans,
        Err(err) => return report("failed to fetch plans", &err),
    };

    let base = args.to_request();
    let mut rows = Vec::with_capacity(plans.len());
    for plan in plans {
        let plan_request = plan.encode_request();
        let request = EncodeRequest {
            amount: plan_request.amount,
            reference: base.reference.clone().or(plan_request.reference),
            ..base.clone()
        };
        match encoder.encode_request(&request) {
            Ok(encoded) => rows.push((plan, encoded)),
            Err(err) => return report(&format!("cannot encode plan {}", plan.id), &err),
        }
    }
    print_plans_table(&rows)?;
    Ok(ExitCode::SUCCESS)
}

/// Reads a non-empty environment variable.
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints an encoded payload with its checksum.
fn print_payload(encoded: &EncodedPayload) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "PIX payload".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{encoded}")?;
    writeln!(out)?;
    writeln!(out, "  {} {}", "Checksum:".bold(), encoded.checksum())?;
    Ok(())
}

/// Prints a decoded payload as a table of fields.
fn print_decoded(decoded: &DecodedPayload) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Tag").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    for field in decoded.fields() {
        _ = table.add_row(vec![
            Cell::new(&field.tag),
            Cell::new(tag_name(&field.tag)),
            Cell::new(&field.value),
        ]);
    }

    let payment = decoded.payment();
    writeln!(
        out,
        "{} {}",
        "Checksum OK".green().bold(),
        format_args!("({})", decoded.checksum()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    writeln!(out)?;
    writeln!(
        out,
        "  {} {} ({})",
        "Key:".bold(),
        payment.key(),
        payment.key().kind()
    )?;
    let amount = payment
        .amount()
        .map_or_else(|| "\u{2014}".to_owned(), |value| format!("R$ {value}"));
    writeln!(out, "  {} {amount}", "Amount:".bold())?;
    writeln!(
        out,
        "  {} {} / {}",
        "Merchant:".bold(),
        payment.merchant_name(),
        payment.merchant_city()
    )?;
    writeln!(out, "  {} {}", "Reference:".bold(), payment.reference())?;
    Ok(())
}

/// Prints the plan list with one payload per plan.
fn print_plans_table(rows: &[(Plan, EncodedPayload)]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if rows.is_empty() {
        writeln!(out, "{}", "No plans found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Plan").fg(Color::Cyan),
        Cell::new("Price").fg(Color::Cyan),
        Cell::new("Days").fg(Color::Cyan),
        Cell::new("Payload").fg(Color::Cyan),
    ]);
    for (plan, encoded) in rows {
        let days = plan
            .period_days
            .map_or_else(|| "\u{2014}".to_owned(), |days| days.to_string());
        _ = table.add_row(vec![
            Cell::new(&plan.name),
            Cell::new(format!("R$ {}", plan.price)).fg(Color::Green),
            Cell::new(days),
            Cell::new(encoded.as_str()),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Plans".green().bold(),
        format_args!("({})", rows.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Human-readable name of a top-level `BRCode` tag.
fn tag_name(tag: &str) -> &'static str {
    match tag {
        "00" => "Payload format",
        "01" => "Initiation method",
        "26" => "Merchant account",
        "52" => "Category code",
        "53" => "Currency",
        "54" => "Amount",
        "58" => "Country",
        "59" => "Merchant name",
        "60" => "Merchant city",
        "62" => "Additional data",
        "63" => "CRC16",
        _ => "Unknown",
    }
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output: if stderr itself failed, nothing
            // we can do.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pix_brcode::models::AmountInput;

    fn args() -> PaymentArgs {
        PaymentArgs {
            key: Some("lojista@example.com".to_owned()),
            amount: Some("10.00".to_owned()),
            name: None,
            city: Some("RECIFE".to_owned()),
            reference: None,
            truncate: false,
        }
    }

    #[test]
    fn cli_parses_encode() {
        let cli = Cli::try_parse_from([
            "pix", "encode", "--key", "k@example.com", "--amount", "49.90", "--truncate", "--json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Encode { payment, json: true }
                if payment.truncate && payment.amount.as_deref() == Some("49.90")
        ));
    }

    #[test]
    fn cli_parses_qr_url_default_size() {
        let cli = Cli::try_parse_from(["pix", "qr-url", "--key", "k@example.com"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::QrUrl { size: DEFAULT_QR_SIZE, .. }
        ));
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["pix", "pay"]).is_err());
    }

    #[test]
    fn args_convert_to_request() {
        let request = args().to_request();
        assert_eq!(request.payee_key.as_deref(), Some("lojista@example.com"));
        assert_eq!(request.amount, Some(AmountInput::Text("10.00".to_owned())));
        assert_eq!(request.merchant_city.as_deref(), Some("RECIFE"));
        assert!(request.merchant_name.is_none());
    }

    #[test]
    fn args_encode_with_explicit_key() {
        let encoded = PixEncoder::default()
            .encode_request(&args().to_request())
            .unwrap();
        assert!(encoded.as_str().contains("0119lojista@example.com"));
        assert!(encoded.as_str().contains("6006RECIFE"));
    }

    #[test]
    fn tag_names() {
        assert_eq!(tag_name("54"), "Amount");
        assert_eq!(tag_name("63"), "CRC16");
        assert_eq!(tag_name("99"), "Unknown");
    }
}
