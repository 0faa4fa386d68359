// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cartao — digital business card editor and exporter
//
// Entry point. Initialises logging and the local stores, then dispatches the
// requested command.

mod commands;
mod services;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use services::app_services::AppServices;
use services::identity::LocalIdentity;

#[derive(Parser)]
#[command(
    name = "cartao",
    about = "Edit, share and export a digital business card",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory (defaults to $XDG_DATA_HOME/cartao)
    #[arg(long, global = true, env = "CARTAO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Signed-in user id; commands that edit a card need one
    #[arg(long, global = true, env = "CARTAO_UID")]
    uid: Option<String>,

    /// Display name used to seed a new card
    #[arg(long, global = true)]
    name: Option<String>,

    /// E-mail used to seed a new card
    #[arg(long, global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum QrFormat {
    Png,
    Svg,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the card with a profile document (JSON)
    Import {
        /// Path to the JSON document
        path: PathBuf,
    },

    /// Edit individual card fields
    Edit(commands::edit::EditArgs),

    /// Show a card as visitors see it
    Show {
        /// Card owner (defaults to --uid)
        card: Option<String>,
    },

    /// Write the card's contact as a vCard
    Vcard {
        /// Card owner (defaults to --uid)
        #[arg(long)]
        card: Option<String>,

        /// Output file (defaults to the contact's file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the QR code for the share URL
    Qr {
        /// Image format
        #[arg(long, value_enum, default_value = "png")]
        format: QrFormat,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the card to a PDF sized after a rendered snapshot
    Pdf {
        /// Rendered card image (PNG, JPEG...)
        #[arg(long)]
        snapshot: PathBuf,

        /// Card owner (defaults to --uid)
        #[arg(long)]
        card: Option<String>,

        /// Output file
        #[arg(short, long, default_value = "card.pdf")]
        output: PathBuf,
    },

    /// Upload a new profile photo
    UploadPhoto {
        /// Image file
        path: PathBuf,
    },

    /// Remove the profile photo and reset its framing
    RemovePhoto,

    /// Set the card address to an office unit, or clear it
    SetUnit {
        /// Unit id (omit to clear the address)
        id: Option<String>,

        /// List the available units instead
        #[arg(long)]
        list: bool,
    },

    /// Adjust how the photo sits inside the avatar frame
    Frame {
        #[arg(long)]
        zoom: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        offset_x: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        offset_y: Option<f64>,

        /// Clamp the values to the editor's slider ranges
        #[arg(long)]
        clamp: bool,
    },

    /// Render the circular avatar from a local copy of the photo
    Avatar {
        /// Image file
        photo: PathBuf,

        /// Frame size in pixels
        #[arg(long, default_value = "96")]
        size: u32,

        /// Output PNG
        #[arg(short, long, default_value = "avatar.png")]
        output: PathBuf,
    },

    /// Share the card link
    Share,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Cartao starting");

    let svc = AppServices::init(cli.data_dir.as_deref())?;
    let identity = LocalIdentity::from_flags(cli.uid, cli.name, cli.email);

    match cli.command {
        Commands::Import { path } => commands::import::run(&svc, identity, path).await,
        Commands::Edit(args) => commands::edit::run(&svc, identity, args).await,
        Commands::Show { card } => commands::show::run(&svc, identity, card).await,
        Commands::Vcard { card, output } => {
            commands::vcard::run(&svc, identity, card, output).await
        }
        Commands::Qr { format, output } => commands::qr::run(&svc, identity, format, output).await,
        Commands::Pdf {
            snapshot,
            card,
            output,
        } => commands::pdf::run(&svc, identity, card, snapshot, output).await,
        Commands::UploadPhoto { path } => commands::photo::upload(&svc, identity, path).await,
        Commands::RemovePhoto => commands::photo::remove(&svc, identity).await,
        Commands::SetUnit { id, list } => commands::unit::run(&svc, identity, id, list).await,
        Commands::Frame {
            zoom,
            offset_x,
            offset_y,
            clamp,
        } => commands::photo::frame(&svc, identity, zoom, offset_x, offset_y, clamp).await,
        Commands::Avatar {
            photo,
            size,
            output,
        } => commands::photo::avatar(&svc, identity, photo, size, output).await,
        Commands::Share => commands::share::run(&svc, identity).await,
    }
}
