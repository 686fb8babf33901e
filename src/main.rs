use clap::{Parser, Subcommand};
use mnet_rs::transport::serial::{SerialConfig, SerialTransport};
use mnet_rs::transport::tcp::{TcpConfig, TcpTransport};
use mnet_rs::{dictionary, events, init_logger, log_info};

#[derive(Parser)]
#[command(name = "mnet-cli")]
#[command(about = "CLI tool for the Mnet wind-turbine controller protocol")]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0), mutually exclusive with --tcp
    #[arg(long)]
    serial: Option<String>,
    /// TCP bridge address (e.g. 10.0.0.5:8400), mutually exclusive with --serial
    #[arg(long)]
    tcp: Option<String>,
    /// Controller node address
    #[arg(long, default_value_t = 0x02)]
    destination: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a single dictionary entry.
    Request { main_id: String, #[arg(default_value_t = 0)] sub_id: u16 },
    /// Read the named wind-speed measurement.
    WindSpeed,
    /// Issue a command (start, stop, reset, manual-start).
    Command { name: String },
    /// List recent events from the event stack.
    Events { #[arg(default_value_t = 20)] limit: u16 },
    /// List the alarm-history table.
    Alarms { #[arg(long)] only_occurred: bool },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();

    match (&cli.serial, &cli.tcp) {
        (Some(port), None) => {
            let transport = SerialTransport::connect(SerialConfig::new(port))?;
            run(cli, transport).await
        }
        (None, Some(address)) => {
            let transport = TcpTransport::connect(TcpConfig::new(address)).await?;
            run(cli, transport).await
        }
        _ => anyhow::bail!("specify exactly one of --serial or --tcp"),
    }
}

async fn run<T: mnet_rs::transport::MnetTransport>(cli: Cli, transport: T) -> anyhow::Result<()> {
    let mut session = mnet_rs::open(transport);
    session.login(cli.destination).await?;
    log_info("logged in");

    match cli.command {
        Commands::Request { main_id, sub_id } => {
            let main_id = u16::from_str_radix(main_id.trim_start_matches("0x"), 16)?;
            let value = session.request_data(cli.destination, main_id, sub_id).await?;
            println!("{value:?}");
        }
        Commands::WindSpeed => {
            let value = session.request_data(cli.destination, dictionary::WIND_SPEED, 0).await?;
            println!("{value:?}");
        }
        Commands::Command { name } => {
            let cmd = match name.as_str() {
                "start" => mnet_rs::constants::CMD_START,
                "stop" => mnet_rs::constants::CMD_STOP,
                "reset" => mnet_rs::constants::CMD_RESET,
                "manual-start" => mnet_rs::constants::CMD_MANUAL_START,
                other => anyhow::bail!("unknown command: {other}"),
            };
            session.send_command(cli.destination, cmd).await?;
        }
        Commands::Events { limit } => {
            let events = events::read_events(&mut session, cli.destination, limit).await?;
            for event in events {
                println!("{} {:?} {} {}", event.index, event.timestamp, event.code, event.text);
            }
        }
        Commands::Alarms { only_occurred } => {
            let alarms = mnet_rs::alarms::read_alarm_history(&mut session, cli.destination, only_occurred).await?;
            for alarm in alarms {
                println!("{} {} occurred={} {:?}", alarm.sub_id, alarm.description, alarm.has_occurred, alarm.last_occurred);
            }
        }
    }

    Ok(())
}
