use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use pitchside::contracts::{render_contract, ContractDocument, ContractFont};
use pitchside::models::pitch::{Currency, TransferType};
use pitchside::models::{ContractTerms, PitchDraft, PitchsideConfig, Priority, Session};
use pitchside::seed::SeedFile;
use pitchside::{build_marketplace, ActionGate, MarketError, PitchFilter, PitchSort};

#[derive(Parser, Debug)]
#[command(name = "pitchside", about = "Player transfer marketplace")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/pitchside.toml")]
    config: String,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a TOML fixture into the market
    Seed {
        /// Read the fixture from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Dry-run a pitch draft against the eligibility rules
    Check {
        /// Acting team id
        #[arg(long)]
        team: Uuid,
        /// Read PitchDraft JSON from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Submit a pitch draft
    Pitch {
        /// Acting team id
        #[arg(long)]
        team: Uuid,
        /// Read PitchDraft JSON from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Browse active pitches as an agent
    Pitches {
        /// Acting agent id
        #[arg(long)]
        agent: Uuid,
        /// Filter: permanent or loan
        #[arg(long)]
        transfer_type: Option<String>,
        /// Filter: only international (true) or only domestic (false)
        #[arg(long)]
        international: Option<bool>,
        /// Filter: currency code (USD, EUR, GBP, NGN)
        #[arg(long)]
        currency: Option<String>,
        /// Filter: upper bound on the asking price
        #[arg(long)]
        max_price: Option<Decimal>,
        /// Sort: newest, oldest, price-asc or price-desc
        #[arg(long, default_value = "newest")]
        sort: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },
    /// Render a contract document from ContractTerms JSON, without the store
    Contract {
        /// Read ContractTerms JSON from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,
        /// Write the rasterized PNG here (needs a usable font)
        #[arg(long)]
        png: Option<String>,
        /// Write the styled HTML here
        #[arg(long)]
        html: Option<String>,
    },
    /// Open a conversation, send a message, attach a contract, or print a
    /// timeline
    Message {
        /// Act as this team
        #[arg(long, conflicts_with = "agent")]
        team: Option<Uuid>,
        /// Act as this agent
        #[arg(long)]
        agent: Option<Uuid>,
        /// Open (or return) the conversation for this pitch (agents only)
        #[arg(long, conflicts_with = "conversation")]
        pitch: Option<Uuid>,
        /// Conversation to send to or read from
        #[arg(long)]
        conversation: Option<Uuid>,
        /// Message body; omit to print the timeline
        #[arg(long)]
        body: Option<String>,
        /// Attach a contract built from ContractTerms JSON in this file
        #[arg(long, conflicts_with = "body")]
        attach: Option<String>,
    },
    /// Save, list or remove shortlisted pitches
    Shortlist {
        /// Acting agent id
        #[arg(long)]
        agent: Uuid,
        /// Pitch to save (or, with --remove, to drop); omit to list
        #[arg(long)]
        pitch: Option<Uuid>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        note: Option<String>,
        /// Remove the entry instead of saving it
        #[arg(long)]
        remove: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pretty = cli.pretty;

    // Load config
    let config_str = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config: {}", cli.config))?;
    let config: PitchsideConfig =
        toml::from_str(&config_str).with_context(|| "Failed to parse config")?;

    match cli.command {
        Command::Seed { input } => {
            let market = build_marketplace(&config).context("Failed to open the market")?;
            let seed: SeedFile = toml::from_str(&read_input(input.as_deref())?)
                .context("Failed to parse seed TOML")?;
            let gate = ActionGate::new();
            let summary = run_gated(&gate, pitchside::seed::apply(&market, &seed)).await?;
            print_json(&summary, pretty)?;
        }

        Command::Check { team, input } => {
            let market = build_marketplace(&config).context("Failed to open the market")?;
            let draft: PitchDraft = serde_json::from_str(&read_input(input.as_deref())?)
                .context("Failed to parse PitchDraft JSON")?;
            let report = market.check_pitch(&Session::team(team), team, &draft).await?;
            print_json(&report, pretty)?;
        }

        Command::Pitch { team, input } => {
            let market = build_marketplace(&config).context("Failed to open the market")?;
            let draft: PitchDraft = serde_json::from_str(&read_input(input.as_deref())?)
                .context("Failed to parse PitchDraft JSON")?;
            let gate = ActionGate::new();
            let pitch = run_gated(
                &gate,
                market.create_pitch(&Session::team(team), team, &draft),
            )
            .await?;
            print_json(&pitch, pretty)?;
        }

        Command::Pitches {
            agent,
            transfer_type,
            international,
            currency,
            max_price,
            sort,
            page,
            per_page,
        } => {
            let market = build_marketplace(&config).context("Failed to open the market")?;
            let filter = PitchFilter {
                transfer_type: parse_opt(transfer_type.as_deref(), TransferType::parse, "transfer type")?,
                international,
                currency: parse_opt(currency.as_deref(), Currency::parse, "currency")?,
                max_price,
            };
            let sort = PitchSort::parse(&sort)
                .with_context(|| format!("Unknown sort order: {sort}"))?;
            let listing =
                market.browse_pitches(&Session::agent(agent), &filter, sort, page, per_page)?;
            print_json(&listing, pretty)?;
        }

        Command::Contract { input, png, html } => {
            contract_command(&config, input.as_deref(), png.as_deref(), html.as_deref(), pretty)?;
        }

        Command::Message {
            team,
            agent,
            pitch,
            conversation,
            body,
            attach,
        } => {
            let market = build_marketplace(&config).context("Failed to open the market")?;
            let session = session_from(team, agent)?;
            let gate = ActionGate::new();
            match (pitch, conversation) {
                (Some(pitch_id), None) => {
                    let conversation = run_gated(&gate, async {
                        market.open_conversation(&session, pitch_id)
                    })
                    .await?;
                    print_json(&conversation, pretty)?;
                }
                (None, Some(conversation_id)) => match (body, attach) {
                    (Some(body), None) => {
                        let message = run_gated(
                            &gate,
                            market.send_message(&session, conversation_id, &body),
                        )
                        .await?;
                        print_json(&message, pretty)?;
                    }
                    (None, Some(terms_path)) => {
                        let terms: ContractTerms = serde_json::from_str(
                            &std::fs::read_to_string(&terms_path).with_context(|| {
                                format!("Failed to read terms: {terms_path}")
                            })?,
                        )
                        .context("Failed to parse ContractTerms JSON")?;
                        let cancel = CancellationToken::new();
                        let message = run_gated(
                            &gate,
                            market.attach_contract(&session, conversation_id, &terms, None, &cancel),
                        )
                        .await?;
                        print_json(&message, pretty)?;
                    }
                    (None, None) => {
                        let timeline = market.conversation_timeline(&session, conversation_id)?;
                        print_json(&timeline, pretty)?;
                    }
                    (Some(_), Some(_)) => bail!("--body conflicts with --attach"),
                },
                _ => bail!("pass exactly one of --pitch (open) or --conversation (send/read)"),
            }
        }

        Command::Shortlist {
            agent,
            pitch,
            priority,
            note,
            remove,
        } => {
            let market = build_marketplace(&config).context("Failed to open the market")?;
            let session = Session::agent(agent);
            let gate = ActionGate::new();
            match (pitch, remove) {
                (Some(pitch_id), true) => {
                    run_gated(&gate, async {
                        market.unshortlist_pitch(&session, pitch_id)
                    })
                    .await?;
                    print_json(&serde_json::json!({ "removed": pitch_id }), pretty)?;
                }
                (Some(pitch_id), false) => {
                    let priority = Priority::parse(&priority)
                        .with_context(|| format!("Unknown priority: {priority}"))?;
                    let entry = run_gated(&gate, async {
                        market.shortlist_pitch(&session, pitch_id, priority, note.as_deref())
                    })
                    .await?;
                    print_json(&entry, pretty)?;
                }
                (None, false) => {
                    let views = market.shortlisted(&session)?;
                    print_json(&views, pretty)?;
                }
                (None, true) => bail!("--remove needs --pitch"),
            }
        }
    }

    Ok(())
}

/// Run one mutating action under a fresh gate, recording its outcome.
async fn run_gated<T, F>(gate: &ActionGate, work: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T, MarketError>>,
{
    let permit = gate.begin().map_err(|error| anyhow::anyhow!("{error}"))?;
    match work.await {
        Ok(value) => {
            permit.succeed();
            Ok(value)
        }
        Err(error) => {
            permit.fail(error.to_string());
            Err(error.into())
        }
    }
}

fn contract_command(
    config: &PitchsideConfig,
    input: Option<&str>,
    png: Option<&str>,
    html: Option<&str>,
    pretty: bool,
) -> Result<()> {
    if png.is_none() && html.is_none() {
        bail!("nothing to do: pass --png and/or --html");
    }
    let terms: ContractTerms = serde_json::from_str(&read_input(input)?)
        .context("Failed to parse ContractTerms JSON")?;

    let document = ContractDocument::compose(&terms, chrono::Utc::now().date_naive());
    let mut output = ContractOutput {
        reference: document.reference.clone(),
        html: None,
        png: None,
    };

    if let Some(path) = html {
        std::fs::write(path, document.to_html())
            .with_context(|| format!("Failed to write HTML: {path}"))?;
        output.html = Some(path.to_string());
    }

    if let Some(path) = png {
        let font = ContractFont::discover(config.contracts.font_path.as_deref())
            .context("No usable font for rasterization")?;
        let artifact = render_contract(
            &terms,
            &font,
            config.contracts.page_width,
            config.contracts.page_height,
        )?;
        std::fs::write(path, &artifact.bytes)
            .with_context(|| format!("Failed to write PNG: {path}"))?;
        output.png = Some(path.to_string());
    }

    print_json(&output, pretty)
}

#[derive(serde::Serialize)]
struct ContractOutput {
    reference: String,
    html: Option<String>,
    png: Option<String>,
}

fn session_from(team: Option<Uuid>, agent: Option<Uuid>) -> Result<Session> {
    match (team, agent) {
        (Some(id), None) => Ok(Session::team(id)),
        (None, Some(id)) => Ok(Session::agent(id)),
        _ => bail!("pass exactly one of --team or --agent"),
    }
}

fn parse_opt<T>(
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    what: &str,
) -> Result<Option<T>> {
    match value {
        Some(s) => parse(s)
            .map(Some)
            .with_context(|| format!("Unknown {what}: {s}")),
        None => Ok(None),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    if let Some(path) = path {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read input: {path}"))
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
