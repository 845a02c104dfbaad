// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use seaside_booking::payment::available_payment_methods;
use seaside_booking::{
    BookingError, BookingId, FileStore, Hotel, MobileMoneyProvider, PaymentMethod, RoomFilter,
    RoomId, SimulationConfig, StayDates,
};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Seaside Hotel - book rooms from the command line
///
/// State (signed-in user, bookings, reviews) is kept as JSON files in the data
/// directory, so it carries over between invocations. The cart does not:
/// `book` fills a cart and checks it out in one go.
#[derive(Parser, Debug)]
#[command(name = "seaside")]
#[command(about = "Seaside Hotel booking engine", long_about = None)]
struct Args {
    /// Directory holding user.json, bookings.json and reviews.json
    #[arg(long, env = "SEASIDE_DATA_DIR", default_value = ".seaside")]
    data_dir: PathBuf,

    /// Share of simulated payments that are declined (0.0 - 1.0)
    #[arg(long, env = "SEASIDE_PAYMENT_FAILURE_RATE", default_value_t = SimulationConfig::DEFAULT_PAYMENT_FAILURE_RATE)]
    payment_failure_rate: f64,

    /// Simulated payment processing time in milliseconds
    #[arg(long, env = "SEASIDE_PAYMENT_LATENCY_MS", default_value_t = SimulationConfig::DEFAULT_PAYMENT_LATENCY_MS)]
    payment_latency_ms: u64,

    /// Simulated email delivery time in milliseconds
    #[arg(long, env = "SEASIDE_EMAIL_LATENCY_MS", default_value_t = SimulationConfig::DEFAULT_EMAIL_LATENCY_MS)]
    email_latency_ms: u64,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            payment_latency: Duration::from_millis(self.payment_latency_ms),
            payment_failure_rate: self.payment_failure_rate,
            email_latency: Duration::from_millis(self.email_latency_ms),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List rooms, optionally only those free for the given dates
    Rooms {
        #[arg(long, requires = "check_out")]
        check_in: Option<NaiveDate>,
        #[arg(long, requires = "check_in")]
        check_out: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        guests: u32,
        /// Required amenity (repeatable)
        #[arg(long = "amenity")]
        amenities: Vec<String>,
    },
    /// Sign in with any email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out; this also clears stored bookings
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List accepted payment methods
    PaymentMethods,
    /// Book one or more rooms and pay
    ///
    /// Example: seaside book --stay 1:2025-06-01:2025-06-04:2 --method telebirr --phone 0911000000
    Book {
        /// ROOM:CHECK_IN:CHECK_OUT:GUESTS (repeatable)
        #[arg(long = "stay", required = true)]
        stays: Vec<StayArg>,
        #[arg(long, value_enum, default_value_t = MethodArg::Card)]
        method: MethodArg,
        /// Card token, for card payments
        #[arg(long, default_value = "tok_demo")]
        card_token: String,
        /// Phone number, for mobile money payments
        #[arg(long, required_if_eq_any = [("method", "telebirr"), ("method", "m_pesa"), ("method", "cbe_birr")])]
        phone: Option<String>,
    },
    /// List your active bookings
    Bookings,
    /// Cancel one of your bookings
    Cancel { booking_id: String },
    /// Review a room (rating 1-5)
    Review {
        #[arg(long)]
        room: String,
        #[arg(long)]
        rating: i32,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Show a room's reviews and average rating
    Reviews {
        #[arg(long)]
        room: String,
    },
    /// Booking totals and revenue (admin only)
    Admin,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Card,
    Telebirr,
    #[value(name = "m_pesa")]
    MPesa,
    #[value(name = "cbe_birr")]
    CbeBirr,
}

/// One `--stay` value: `ROOM:CHECK_IN:CHECK_OUT:GUESTS`.
#[derive(Debug, Clone)]
struct StayArg {
    room_id: RoomId,
    stay: StayDates,
    guests: u32,
}

impl FromStr for StayArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [room, check_in, check_out, guests] = parts.as_slice() else {
            return Err("expected ROOM:CHECK_IN:CHECK_OUT:GUESTS".to_owned());
        };
        let check_in = NaiveDate::from_str(check_in).map_err(|e| format!("check-in: {e}"))?;
        let check_out = NaiveDate::from_str(check_out).map_err(|e| format!("check-out: {e}"))?;
        let stay = StayDates::new(check_in, check_out).map_err(|e| e.to_string())?;
        let guests = guests.parse().map_err(|e| format!("guests: {e}"))?;
        Ok(Self {
            room_id: RoomId::from(*room),
            stay,
            guests,
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,seaside_booking=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let store = Arc::new(FileStore::new(&args.data_dir));
    let hotel = Hotel::open(store, &args.simulation());

    if let Err(e) = run(&hotel, args.command).await {
        eprintln!("Error: {e}");
        if e == BookingError::NotAuthenticated {
            eprintln!("Sign in first: seaside login --email <EMAIL> --password <PASSWORD>");
        }
        process::exit(1);
    }
}

async fn run(hotel: &Hotel, command: Command) -> Result<(), BookingError> {
    match command {
        Command::Rooms {
            check_in,
            check_out,
            guests,
            amenities,
        } => {
            let filter = RoomFilter {
                amenities,
                ..RoomFilter::default()
            };
            let rooms = match (check_in, check_out) {
                (Some(check_in), Some(check_out)) => {
                    hotel.search(StayDates::new(check_in, check_out)?, guests)
                }
                _ => hotel
                    .catalog()
                    .rooms()
                    .iter()
                    .filter(|room| room.max_guests >= guests)
                    .collect(),
            };
            for room in rooms.into_iter().filter(|room| filter.matches(room)) {
                let reviews = hotel.reviews().review_count(&room.id);
                let rating = if reviews > 0 {
                    format!("{} ({reviews} reviews)", hotel.reviews().room_rating(&room.id))
                } else {
                    "no reviews".to_owned()
                };
                println!(
                    "{:>2}  {:<24} ${:>4}/night  sleeps {}  {}",
                    room.id, room.name, room.price, room.max_guests, rating
                );
            }
        }
        Command::Login { email, password } => {
            let identity = hotel.login(&email, &password)?;
            println!("Signed in as {} <{}> ({:?})", identity.name, identity.email, identity.role);
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let identity = hotel.register(&name, &email, &password)?;
            println!("Welcome, {}", identity.name);
        }
        Command::Logout => {
            hotel.logout()?;
            println!("Signed out");
        }
        Command::Whoami => match hotel.session().current() {
            Some(identity) => println!("{} <{}> ({:?})", identity.name, identity.email, identity.role),
            None => println!("Not signed in"),
        },
        Command::PaymentMethods => {
            for method in available_payment_methods() {
                println!("{:<10} {}", method.id, method.name);
            }
        }
        Command::Book {
            stays,
            method,
            card_token,
            phone,
        } => {
            hotel.session().require_identity()?;
            for stay in &stays {
                hotel.add_to_cart(&stay.room_id, stay.stay, stay.guests)?;
            }
            println!("Total: ${}", hotel.cart_total());

            let phone = phone.unwrap_or_default();
            let method = match method {
                MethodArg::Card => PaymentMethod::Card { token: card_token },
                MethodArg::Telebirr => mobile_money(MobileMoneyProvider::Telebirr, phone),
                MethodArg::MPesa => mobile_money(MobileMoneyProvider::MPesa, phone),
                MethodArg::CbeBirr => mobile_money(MobileMoneyProvider::CbeBirr, phone),
            };

            match hotel.checkout(&method).await {
                Ok(receipt) => {
                    println!("Booking confirmed: {}", receipt.confirmation_number);
                    println!("Payment reference: {}", receipt.payment.id);
                    for booking in &receipt.bookings {
                        println!(
                            "  {}  {} {} -> {}",
                            booking.id, booking.room_name, booking.check_in, booking.check_out
                        );
                    }
                }
                Err(BookingError::PaymentFailed(e)) => {
                    eprintln!("Payment failed ({e}). Please try again.");
                    process::exit(2);
                }
                Err(e) => return Err(e),
            }
        }
        Command::Bookings => {
            hotel.session().require_identity()?;
            let bookings = hotel.my_bookings();
            if bookings.is_empty() {
                println!("No bookings yet");
            }
            for booking in bookings {
                println!(
                    "{}  {}  {}  {} -> {}  {} guests  ${}",
                    booking.id,
                    booking.confirmation_number,
                    booking.room_name,
                    booking.check_in,
                    booking.check_out,
                    booking.guests,
                    booking.line_total()
                );
            }
        }
        Command::Cancel { booking_id } => {
            match hotel.cancel_booking(&BookingId::new(booking_id)).await? {
                Some(booking) => println!("Cancelled {} ({})", booking.id, booking.room_name),
                None => println!("No such booking"),
            }
        }
        Command::Review {
            room,
            rating,
            comment,
        } => {
            let review = hotel.add_review(&RoomId::new(room), rating, &comment)?;
            println!("Saved {}-star review for room {}", review.rating, review.room_id);
        }
        Command::Reviews { room } => {
            let room_id = RoomId::new(room);
            let reviews = hotel.reviews().room_reviews(&room_id);
            if reviews.is_empty() {
                println!("No reviews yet");
            } else {
                println!("Average rating: {}", hotel.reviews().room_rating(&room_id));
            }
            for review in reviews {
                println!(
                    "{}  {}  {}/5  {}",
                    review.date.format("%Y-%m-%d"),
                    review.user_name,
                    review.rating,
                    review.comment
                );
            }
        }
        Command::Admin => {
            let summary = hotel.admin_summary()?;
            println!("Total bookings: {}", summary.total_bookings);
            println!("Confirmed:      {}", summary.confirmed);
            println!("Cancelled:      {}", summary.cancelled);
            println!("Revenue:        ${}", summary.revenue);
        }
    }

    Ok(())
}

fn mobile_money(provider: MobileMoneyProvider, phone: String) -> PaymentMethod {
    PaymentMethod::MobileMoney { provider, phone }
}
