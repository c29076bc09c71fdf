//! # qrbill CLI
//!
//! Reads a payment record as JSON and writes the QR-bill in the requested format.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use qrbill::PaymentRecord;

#[derive(Parser, Debug)]
#[command(name = "qrbill", version, about = "Generate Swiss QR-bill codes")]
struct Cli {
    /// JSON payment record. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Png)]
    format: Format,

    /// Output file. Writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Svg,
    Eps,
    Pdf,
    /// The canonical payload text.
    Txt,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    qrbill::assets::init();

    let json = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    let record: PaymentRecord =
        serde_json::from_str(&json).context("parsing payment record")?;

    let bill = record.encode()?;
    let bytes = match cli.format {
        Format::Png => bill.render_png()?,
        Format::Svg => bill.render_svg()?,
        Format::Eps => bill.render_eps()?,
        Format::Pdf => bill.render_pdf()?,
        Format::Txt => bill.as_str().as_bytes().to_vec(),
    };
    tracing::info!(format = ?cli.format, bytes = bytes.len(), "rendered QR-bill");

    match &cli.output {
        Some(path) => {
            fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?
        }
        None => {
            let mut stdout = io::stdout().lock();
            if cli.format != Format::Txt && stdout.is_terminal() {
                bail!("not writing raw image data to terminal, did you forget to redirect the output?");
            }
            stdout.write_all(&bytes).context("writing stdout")?;
        }
    }
    Ok(())
}
