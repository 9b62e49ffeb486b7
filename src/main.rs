mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use mdpass::DerivationRequest;
use mdpass::generator::SATURATION_INDEX;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "mdpass",
    version,
    about = "Deterministic site passwords from a label and a master key"
)]
struct Cli {
    /// Site or account label; prompted for when omitted
    #[arg(short, long)]
    label: Option<String>,

    /// Number of characters to generate
    #[arg(short = 'n', long, default_value = "16")]
    length: String,

    /// Read the key as a single line from stdin instead of a hidden prompt
    #[arg(long)]
    key_stdin: bool,

    /// NFC-normalize label and key before deriving
    #[arg(long)]
    nfc: bool,

    /// Print the intermediate MD5 digest to stderr
    #[arg(long)]
    show_digest: bool,

    /// Print only the password
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let length = mdpass::parse_length(&cli.length)?;
    if length > ui::MAX_OUTPUT_LENGTH {
        anyhow::bail!(
            "Length {} exceeds the maximum of {}",
            length,
            ui::MAX_OUTPUT_LENGTH
        );
    }
    if length > SATURATION_INDEX + 1 {
        ui::warn(&format!(
            "Characters past position {} all repeat the same symbol",
            SATURATION_INDEX + 1
        ))?;
    }

    let label = ui::resolve_label(cli.label.as_deref(), cli.nfc, !cli.key_stdin)?;
    let key = ui::prompt_key(cli.key_stdin, cli.nfc).context("Failed to obtain key")?;

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    let input_info = ui::InputInfo::new(&label, &key);
    let output_config = ui::OutputConfig {
        password_length: length,
        charset_size: mdpass::alphabet_size(),
        distinct_symbols: mdpass::distinct_symbols(),
    };

    let request = DerivationRequest::new(label.as_str(), length, key);

    let start = Instant::now();
    let digest = request.digest();
    let password = mdpass::generate_password(&digest, request.length());
    let elapsed = start.elapsed();

    if cli.show_digest {
        ui::display_digest(&digest)?;
    }

    ui::display_output(&password, &input_info, &output_config, elapsed, &options);

    Ok(())
}
