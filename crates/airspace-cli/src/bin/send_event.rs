use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Args as ClapArgs, Parser, Subcommand};

use airspace_cli::EventClient;
use airspace_core::time::parse_event_time;
use airspace_core::{heading, GateUpdate, HeadingUpdate, PassengerCountUpdate, Point, RunwayUpdate};

#[derive(Parser, Debug)]
#[command(author, version, about = "Publish one event to the airspace server", long_about = None)]
struct Args {
    /// Airspace server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    event: Event,
}

#[derive(Subcommand, Debug)]
enum Event {
    /// New heading, speed and route for a plane
    Heading(HeadingArgs),
    /// Gate arrival, or departure from the gate when --at is omitted
    Gate {
        #[arg(long)]
        plane: String,
        #[arg(long)]
        gate: String,
        /// Arrival time, e.g. "2024-03-01 10:00"
        #[arg(long)]
        at: Option<String>,
    },
    /// Runway arrival, or landing when --at is omitted
    Runway {
        #[arg(long)]
        plane: String,
        #[arg(long)]
        runway: String,
        #[arg(long)]
        at: Option<String>,
    },
    /// Current passenger count
    Count {
        #[arg(long)]
        plane: String,
        #[arg(long)]
        passengers: u32,
    },
}

#[derive(ClapArgs, Debug)]
struct HeadingArgs {
    #[arg(long)]
    plane: String,
    #[arg(long)]
    origin: String,
    #[arg(long)]
    destination: String,
    /// Distance units per hour
    #[arg(long)]
    speed: f64,
    #[arg(long)]
    take_off: String,
    #[arg(long)]
    landing: String,
    /// Compass heading in degrees; computed from the coordinates when omitted
    #[arg(long)]
    direction: Option<f64>,
    #[arg(long, requires_all = ["from_y", "to_x", "to_y"])]
    from_x: Option<f64>,
    #[arg(long)]
    from_y: Option<f64>,
    #[arg(long)]
    to_x: Option<f64>,
    #[arg(long)]
    to_y: Option<f64>,
}

impl HeadingArgs {
    fn direction(&self) -> Result<f64> {
        if let Some(direction) = self.direction {
            return Ok(direction);
        }
        match (self.from_x, self.from_y, self.to_x, self.to_y) {
            (Some(from_x), Some(from_y), Some(to_x), Some(to_y)) => Ok(heading(
                Point::new(from_x, from_y),
                Point::new(to_x, to_y),
            )),
            _ => bail!("either --direction or all of --from-x/--from-y/--to-x/--to-y is required"),
        }
    }
}

fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    parse_event_time(raw).with_context(|| format!("invalid timestamp '{}'", raw))
}

fn parse_optional_time(raw: Option<&str>) -> Result<Option<NaiveDateTime>> {
    raw.map(parse_time).transpose()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = EventClient::new(args.url);

    match args.event {
        Event::Heading(flight) => {
            let update = HeadingUpdate {
                direction: flight.direction()?,
                take_off_time: parse_time(&flight.take_off)?,
                landing_time: parse_time(&flight.landing)?,
                plane: flight.plane,
                speed: flight.speed,
                origin: flight.origin,
                destination: flight.destination,
            };
            println!(
                "Sending heading for {}: {:.1} deg at {} ({} -> {})",
                update.plane, update.direction, update.speed, update.origin, update.destination
            );
            client.send_heading(&update).await?;
        }
        Event::Gate { plane, gate, at } => {
            let update = GateUpdate {
                plane,
                gate,
                arrive_at_time: parse_optional_time(at.as_deref())?,
            };
            println!("Sending gate update for {} at {}", update.plane, update.gate);
            client.send_gate(&update).await?;
        }
        Event::Runway { plane, runway, at } => {
            let update = RunwayUpdate {
                plane,
                runway,
                arrive_at_time: parse_optional_time(at.as_deref())?,
            };
            println!("Sending runway update for {} at {}", update.plane, update.runway);
            client.send_runway(&update).await?;
        }
        Event::Count { plane, passengers } => {
            let update = PassengerCountUpdate {
                plane,
                passenger_count: passengers,
            };
            println!(
                "Sending passenger count for {}: {}",
                update.plane, update.passenger_count
            );
            client.send_passenger_count(&update).await?;
        }
    }

    println!("Accepted");
    Ok(())
}
