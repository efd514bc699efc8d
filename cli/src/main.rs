mod audio;
mod settings;

use audio::{CpalOutput, HoundDecoder};
use base64::Engine;
use clap::{Parser, Subcommand};
use settings::ModemArgs;
use speakwave_core::{play_container, Modulator, WavHeader};
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "speakwave")]
#[command(about = "Send data as sound: Manchester FSK audio in a WAV container")]
struct Cli {
    #[command(flatten)]
    modem: ModemArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Modulate a literal bit string such as 1011_0010
    Bits {
        /// Bits as 0/1 characters (whitespace and '_' are ignored)
        bits: String,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Also print the container as a base64 data URI
        #[arg(long)]
        data_uri: bool,
    },

    /// HDLC-frame a binary file and modulate it
    Encode {
        /// Input binary file
        #[arg(value_name = "INPUT.BIN")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// HDLC-frame a text message and write, print or play it
    Message {
        text: String,

        /// Output WAV file
        #[arg(short, long, value_name = "OUTPUT.WAV")]
        output: Option<PathBuf>,

        /// Print the container as a base64 data URI
        #[arg(long)]
        data_uri: bool,

        /// Play through the default output device
        #[arg(long)]
        play: bool,
    },

    /// Play a WAV file through the default output device
    Play {
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,
    },

    /// Print the header fields of a WAV file
    Inspect {
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,
    },
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bits {
            bits,
            output,
            data_uri,
        } => bits_command(&cli.modem, &bits, &output, data_uri)?,
        Commands::Encode { input, output } => encode_command(&cli.modem, &input, &output)?,
        Commands::Message {
            text,
            output,
            data_uri,
            play,
        } => message_command(&cli.modem, &text, output.as_deref(), data_uri, play)?,
        Commands::Play { input } => play_command(&input)?,
        Commands::Inspect { input } => inspect_command(&input)?,
    }

    Ok(())
}

fn build_modulator(args: &ModemArgs) -> CliResult<Modulator> {
    let settings = args.resolve()?;
    log::debug!("modem settings: {:?}", settings);
    Ok(Modulator::with_layout(settings.config(), settings.layout())?)
}

/// Parse a string of '0'/'1' characters into bits
fn parse_bits(text: &str) -> Result<Vec<u8>, String> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(format!("invalid bit character {:?}", other)),
        })
        .collect()
}

fn data_uri(container: &[u8]) -> String {
    format!(
        "data:audio/wav;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(container)
    )
}

fn write_container(path: &Path, container: &[u8]) -> CliResult<()> {
    std::fs::write(path, container)?;
    println!("Wrote {} bytes to {}", container.len(), path.display());
    Ok(())
}

fn bits_command(args: &ModemArgs, bits: &str, output: &Path, print_uri: bool) -> CliResult<()> {
    let bits = parse_bits(bits)?;
    let modulator = build_modulator(args)?;

    let Some(container) = modulator.encode(&bits)? else {
        println!("Nothing to encode: bit string is empty");
        return Ok(());
    };
    println!(
        "Encoded {} bits to {} audio samples",
        bits.len(),
        container.len() - speakwave_core::WAV_HEADER_SIZE
    );

    write_container(output, &container)?;
    if print_uri {
        println!("{}", data_uri(&container));
    }
    Ok(())
}

fn encode_command(args: &ModemArgs, input: &Path, output: &Path) -> CliResult<()> {
    let data = std::fs::read(input)?;
    println!("Read {} bytes from {}", data.len(), input.display());

    let modulator = build_modulator(args)?;
    let Some(container) = modulator.encode_message(&data)? else {
        println!("Nothing to encode: input file is empty");
        return Ok(());
    };
    println!(
        "Encoded to {} audio samples",
        container.len() - speakwave_core::WAV_HEADER_SIZE
    );

    write_container(output, &container)
}

fn message_command(
    args: &ModemArgs,
    text: &str,
    output: Option<&Path>,
    print_uri: bool,
    play: bool,
) -> CliResult<()> {
    if output.is_none() && !print_uri && !play {
        return Err("nothing to do: pass --output, --data-uri or --play".into());
    }

    let modulator = build_modulator(args)?;
    let Some(container) = modulator.encode_message(text.as_bytes())? else {
        println!("Nothing to encode: message is empty");
        return Ok(());
    };

    if let Some(path) = output {
        write_container(path, &container)?;
    }
    if print_uri {
        println!("{}", data_uri(&container));
    }
    if play {
        let mut output = CpalOutput::open_default()?;
        play_container(&mut HoundDecoder, &mut output, &container)?;
    }
    Ok(())
}

fn play_command(input: &Path) -> CliResult<()> {
    let container = std::fs::read(input)?;
    let mut output = CpalOutput::open_default()?;
    play_container(&mut HoundDecoder, &mut output, &container)?;
    println!("Played {}", input.display());
    Ok(())
}

fn inspect_command(input: &Path) -> CliResult<()> {
    let container = std::fs::read(input)?;
    let reader = hound::WavReader::new(std::io::Cursor::new(&container))?;
    let spec = reader.spec();
    let frames = reader.duration();

    println!("File:            {}", input.display());
    println!("Size:            {} bytes", container.len());
    println!("Channels:        {}", spec.channels);
    println!("Sample rate:     {} Hz", spec.sample_rate);
    println!("Bits per sample: {}", spec.bits_per_sample);
    println!("Sample format:   {:?}", spec.sample_format);
    println!(
        "Duration:        {:.3} s ({} frames)",
        frames as f64 / spec.sample_rate as f64,
        frames
    );

    // Canonical 44-byte layout check; other writers may add extra chunks
    match WavHeader::parse(&container) {
        Ok(header) => println!(
            "Header:          canonical, data size {} bytes, byte rate {}",
            header.data_size, header.byte_rate
        ),
        Err(e) => println!("Header:          non-canonical ({})", e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bits() {
        assert_eq!(parse_bits("1011").unwrap(), vec![1, 0, 1, 1]);
        assert_eq!(parse_bits("10 11_00\n1").unwrap(), vec![1, 0, 1, 1, 0, 0, 1]);
        assert!(parse_bits("").unwrap().is_empty());
        assert!(parse_bits("102").is_err());
    }

    #[test]
    fn test_data_uri_prefix() {
        let uri = data_uri(b"RIFF");
        assert_eq!(uri, "data:audio/wav;base64,UklGRg==");
    }
}
