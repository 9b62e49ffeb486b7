use anyhow::{Context, Result};
use console::{Style, Term};
use mdpass::generator::SATURATION_INDEX;
use rpassword::read_password;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

pub const MIN_SAFE_ENTROPY: f64 = 80.0;
pub const DIGEST_ENTROPY_CAP: f64 = 128.0;

pub const MIN_KEY_BYTES: usize = 8;
pub const MIN_SAFE_PASSWORD_LENGTH: usize = 12;

pub const MAX_INPUT_BYTES: usize = 1024 * 1024;
pub const MAX_OUTPUT_LENGTH: usize = 4096;

pub struct InputInfo {
    pub label_byte_length: usize,
    pub label_char_count: usize,
    pub key_byte_length: usize,
    pub key_char_count: usize,
}

impl InputInfo {
    pub fn new(label: &str, key: &str) -> Self {
        Self {
            label_byte_length: label.len(),
            label_char_count: label.chars().count(),
            key_byte_length: key.len(),
            key_char_count: key.chars().count(),
        }
    }
}

pub struct OutputConfig {
    pub password_length: usize,
    pub charset_size: usize,
    pub distinct_symbols: usize,
}

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn tree_glyphs(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn status_style(secure: bool, options: &DisplayOptions) -> Style {
    if !options.color_support {
        Style::new()
    } else if secure {
        Style::new().green()
    } else {
        Style::new().yellow()
    }
}

pub fn warn(message: &str) -> Result<()> {
    Term::stderr()
        .write_line(&format!("WARNING: {}", message))
        .context("Failed to write warning")
}

fn control_character_positions(s: &str) -> Vec<usize> {
    s.chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos)
        .collect()
}

/// Warns about control characters and, when `interactive`, asks for
/// confirmation on stdin. Piped input only gets the warning since the
/// answer would be read from the same stream.
fn confirm_control_characters(s: &str, input_name: &str, interactive: bool) -> Result<()> {
    let positions = control_character_positions(s);
    if positions.is_empty() {
        return Ok(());
    }

    let term = Term::stderr();
    term.write_line(&format!(
        "WARNING: {} contains {} control character(s) at position(s): {}",
        input_name,
        positions.len(),
        positions
            .iter()
            .map(|pos| pos.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))?;

    if !interactive {
        return Ok(());
    }

    term.write_str("Continue anyway? [y/N]: ")?;
    term.flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    let response = response.trim().to_lowercase();

    term.clear_last_lines(2)?;

    if response != "y" && response != "yes" {
        anyhow::bail!("Aborted");
    }

    Ok(())
}

/// Applies the optional NFC pass and the size limit shared by every field.
pub fn prepare_input(s: &str, input_name: &str, nfc: bool) -> Result<Zeroizing<String>> {
    let prepared = if nfc {
        Zeroizing::new(s.nfc().collect::<String>())
    } else {
        Zeroizing::new(s.to_string())
    };

    if prepared.len() > MAX_INPUT_BYTES {
        anyhow::bail!(
            "{} too long ({} bytes, maximum is {})",
            input_name,
            prepared.len(),
            MAX_INPUT_BYTES
        );
    }

    Ok(prepared)
}

fn validate_input(
    s: &str,
    input_name: &str,
    nfc: bool,
    interactive: bool,
) -> Result<Zeroizing<String>> {
    let prepared = prepare_input(s, input_name, nfc)?;
    confirm_control_characters(&prepared, input_name, interactive)?;
    Ok(prepared)
}

fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

fn read_line_bytes(reader: &mut impl BufRead) -> Result<Zeroizing<Vec<u8>>> {
    let mut raw = Zeroizing::new(Vec::new());
    reader.read_until(b'\n', &mut raw)?;
    Ok(raw)
}

fn decode_line(field: &'static str, raw: &[u8]) -> Result<Zeroizing<String>> {
    let text = mdpass::parse_text(field, raw)?;
    let mut line = Zeroizing::new(text.to_string());
    strip_line_ending(&mut line);
    Ok(line)
}

pub fn resolve_label(
    label: Option<&str>,
    nfc: bool,
    interactive: bool,
) -> Result<Zeroizing<String>> {
    let label = match label {
        Some(label) => Zeroizing::new(label.to_string()),
        None => {
            print!("Label: ");
            io::stdout().flush()?;

            let raw = read_line_bytes(&mut io::stdin().lock())
                .context("Failed to read label")?;
            decode_line("label", &raw)?
        }
    };

    let label = validate_input(&label, "Label", nfc, interactive)?;
    if label.is_empty() {
        warn("Label is empty; the key is hashed without separators")?;
    }

    Ok(label)
}

pub fn prompt_key(from_stdin: bool, nfc: bool) -> Result<Zeroizing<String>> {
    let key = if from_stdin {
        let raw = read_line_bytes(&mut io::stdin().lock()).context("Failed to read key")?;
        decode_line("key", &raw)?
    } else {
        print!("Key: ");
        io::stdout().flush()?;
        Zeroizing::new(read_password().context("Failed to fetch key")?)
    };

    let key = validate_input(&key, "Key", nfc, !from_stdin)?;
    if key.is_empty() {
        warn("Key is empty")?;
    }

    Ok(key)
}

/// Upper bound on the output's entropy: positions past the digest length
/// repeat, and nothing exceeds the 128-bit digest.
pub fn effective_entropy(config: &OutputConfig) -> f64 {
    let independent = config.password_length.min(SATURATION_INDEX + 1);
    (independent as f64 * (config.distinct_symbols as f64).log2()).min(DIGEST_ENTROPY_CAP)
}

pub fn display_digest(digest: &str) -> Result<()> {
    Term::stderr()
        .write_line(&format!("Digest: {}", digest))
        .context("Failed to write digest")
}

pub fn display_output(
    output: &Zeroizing<String>,
    input_info: &InputInfo,
    config: &OutputConfig,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{}", &**output);
    } else {
        println!("Out[0]:\n{}\n", &**output);

        display_settings(input_info, config, options);
        display_stats(effective_entropy(config), output.len(), config, elapsed, options);
    }
}

fn display_settings(input_info: &InputInfo, config: &OutputConfig, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_glyphs(options.unicode_support);

    let label_present = input_info.label_byte_length > 0;
    let key_secure = input_info.key_byte_length >= MIN_KEY_BYTES;

    let label_style = status_style(label_present, options);
    let key_style = status_style(key_secure, options);

    println!("Settings:");

    println!("  {} Digest     MD5 (128-bit)", branch);
    println!("  {} Seeding    MT19937, reseeded per position", branch);

    println!(
        "  {} Label      {} {} {} ({} {})",
        branch,
        label_style.apply_to(format!("[{}]", if label_present { check_ok } else { check_warn })),
        label_style.apply_to(input_info.label_byte_length),
        plural(input_info.label_byte_length, "byte", "bytes"),
        label_style.apply_to(input_info.label_char_count),
        plural(input_info.label_char_count, "char", "chars")
    );

    println!(
        "  {} Key        {} {} {} ({} {})",
        branch,
        key_style.apply_to(format!("[{}]", if key_secure { check_ok } else { check_warn })),
        key_style.apply_to(input_info.key_byte_length),
        plural(input_info.key_byte_length, "byte", "bytes"),
        key_style.apply_to(input_info.key_char_count),
        plural(input_info.key_char_count, "char", "chars")
    );

    println!(
        "  {} Output     {} {}",
        last,
        config.password_length,
        plural(config.password_length, "char", "chars")
    );

    println!();
}

fn display_stats(
    entropy: f64,
    length: usize,
    config: &OutputConfig,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_glyphs(options.unicode_support);

    let strong = entropy >= MIN_SAFE_ENTROPY;
    let (status_icon, status_text) = if strong {
        (check_ok, "Strong")
    } else {
        (check_warn, "Weak")
    };
    let entropy_style = status_style(strong, options);

    let length_secure = config.password_length >= MIN_SAFE_PASSWORD_LENGTH
        && config.password_length <= SATURATION_INDEX + 1;
    let length_style = status_style(length_secure, options);
    let length_status = if length_secure { check_ok } else { check_warn };

    println!("Stats:");

    println!(
        "  {} Entropy    {} {} bits ({})",
        branch,
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(format!("{:.1}", entropy)),
        entropy_style.apply_to(status_text)
    );

    println!(
        "  {} Length     {} {} {}",
        branch,
        length_style.apply_to(format!("[{}]", length_status)),
        length_style.apply_to(length),
        plural(length, "char", "chars")
    );

    println!(
        "  {} Charset    {} chars ({} distinct)",
        branch, config.charset_size, config.distinct_symbols
    );

    println!("  {} Time       {:.3}s", last, elapsed.as_secs_f64());

    println!(
        "\n{} Security: {}",
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(status_text)
    );
}
