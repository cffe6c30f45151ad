use clap::{Parser, Subcommand};
use client::network::{parse_stat_value, Client};
use client::rendering::render;
use log::info;
use shared::{Packet, RegistrationForm, StatsForm};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8881")]
    server: String,

    /// How long to wait for a response in milliseconds
    #[arg(short = 't', long, default_value = "5000")]
    timeout_ms: u64,

    /// Send forms without the submit marker
    #[arg(long)]
    no_submit: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Register {
        user: String,
        pass: String,
        cpass: String,
    },
    /// Show lifetime and last-session stats for a user
    Stats { user: String },
    /// Check a username and password
    Login { user: String, pass: String },
    /// Save a finished session, e.g. `record bob pw total_moves=40 highest_score=512`
    Record {
        user: String,
        pass: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn build_packet(command: Command, submit: bool) -> Result<Packet, Box<dyn std::error::Error>> {
    let packet = match command {
        Command::Register { user, pass, cpass } => {
            let mut form = RegistrationForm::new(&user, &pass, &cpass);
            form.submit = submit;
            Packet::Register(form)
        }
        Command::Stats { user } => {
            let mut form = StatsForm::new(&user);
            form.submit = submit;
            Packet::Stats(form)
        }
        Command::Login { user, pass } => Packet::Login {
            credential: shared::hash(&pass),
            user,
        },
        Command::Record { user, pass, values } => {
            let values = values
                .iter()
                .map(|text| {
                    parse_stat_value(text).ok_or_else(|| format!("invalid stat value {:?}", text))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Packet::RecordSession {
                user,
                credential: shared::hash(&pass),
                values,
            }
        }
    };
    Ok(packet)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let packet = build_packet(args.command, !args.no_submit)?;

    let client = Client::new(&args.server, Duration::from_millis(args.timeout_ms)).await?;
    info!("Sending request to {}", client.server_addr());

    let reply = client.request(&packet).await?;
    let text = render(&reply);
    if !text.is_empty() {
        println!("{}", text);
    }

    Ok(())
}
