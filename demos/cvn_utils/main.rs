//! CVN container CLI utility.
//!
//! Provides six subcommands:
//! - `info`: print the kind and header fields of a container
//! - `decode`: extract plaintext, CSV, PNG or WAV from a container
//! - `encode`: obfuscate a plaintext file as a text or table container
//! - `replace`: replace the pixels of a truecolor bitmap from an image
//! - `unwrap`: strip the RIFF framing from a WAV to restore raw audio
//! - `batch`: extract every recognised container under a directory
//!
//! # Usage
//!
//! ```bash
//! cargo run --example cvn_utils info data/item.cv1
//! cargo run --example cvn_utils -- --palette bg/title.pal decode bg/title.cv2 title.png
//! cargo run --example cvn_utils encode item.csv item.cv1 --type table
//! cargo run --example cvn_utils batch data extract --recursive
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cvn_rs::prelude::*;
use cvn_rs::prelude::file::{encoding_for_label, table, unwrap_wav};
use encoding_rs::Encoding;
use log::{info, warn};
use walkdir::WalkDir;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let encoding = encoding_for_label(&cli.global.encoding)?;
	match cli.command {
		Command::Info(opts) => run_info(&cli.global, encoding, opts),
		Command::Decode(opts) => run_decode(&cli.global, encoding, opts),
		Command::Encode(opts) => run_encode(&cli.global, encoding, opts),
		Command::Replace(opts) => run_replace(&cli.global, opts),
		Command::Unwrap(opts) => run_unwrap(opts),
		Command::Batch(opts) => run_batch(&cli.global, encoding, opts),
	}
}

#[derive(Parser)]
#[command(name = "cvn_utils")]
#[command(author = "cvn-rs project")]
#[command(version)]
#[command(about = "Inspect, decode and encode CVN resource containers", long_about = None)]
struct Cli {
	#[command(flatten)]
	global: GlobalArgs,

	#[command(subcommand)]
	command: Command,
}

#[derive(Args)]
struct GlobalArgs {
	/// Text encoding of .cv0/.cv1 containers
	#[arg(short, long, global = true, env = "CVN_ENCODING", default_value = "Shift_JIS")]
	encoding: String,

	/// Companion palette for indexed bitmaps
	#[arg(short, long, global = true, env = "CVN_PALETTE", value_name = "PALETTE")]
	palette: Option<PathBuf>,

	/// Container kind, overriding extension inference
	#[arg(short = 't', long = "type", global = true, value_enum)]
	kind: Option<Kind>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
	Text,
	Table,
	Bitmap,
	Audio,
}

impl From<Kind> for FileType {
	fn from(kind: Kind) -> Self {
		match kind {
			Kind::Text => FileType::Text,
			Kind::Table => FileType::Table,
			Kind::Bitmap => FileType::Bitmap,
			Kind::Audio => FileType::Audio,
		}
	}
}

#[derive(Subcommand)]
enum Command {
	/// Print the kind and header fields of a container
	Info(InfoArgs),
	/// Extract the decoded content of a container
	Decode(DecodeArgs),
	/// Obfuscate a plaintext file as a text or table container
	Encode(EncodeArgs),
	/// Replace the pixels of a truecolor bitmap
	Replace(ReplaceArgs),
	/// Restore raw audio from a WAV produced by `decode`
	Unwrap(UnwrapArgs),
	/// Extract every recognised container under a directory
	Batch(BatchArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Container to inspect
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Print machine-readable JSON
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args)]
struct DecodeArgs {
	/// Container to decode
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Output file (.txt/.csv, image format by extension, .wav)
	#[arg(value_name = "OUTPUT")]
	output: PathBuf,
}

#[derive(Args)]
struct EncodeArgs {
	/// Plaintext input
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Container to write
	#[arg(value_name = "OUTPUT")]
	output: PathBuf,
}

#[derive(Args)]
struct ReplaceArgs {
	/// Bitmap container to modify
	#[arg(value_name = "CV2")]
	container: PathBuf,

	/// Image with the same dimensions
	#[arg(value_name = "IMAGE")]
	image: PathBuf,

	/// Bitmap container to write
	#[arg(value_name = "OUTPUT")]
	output: PathBuf,
}

#[derive(Args)]
struct UnwrapArgs {
	/// WAV file whose header has the synthesized layout
	#[arg(value_name = "WAV")]
	input: PathBuf,

	/// Raw audio container to write
	#[arg(value_name = "OUTPUT")]
	output: PathBuf,
}

#[derive(Args)]
struct BatchArgs {
	/// Directory to scan
	#[arg(value_name = "DIR")]
	root: PathBuf,

	/// Directory receiving the extracted files
	#[arg(value_name = "OUTDIR")]
	output: PathBuf,

	/// Recurse into sub-directories while scanning
	#[arg(short, long, default_value_t = false)]
	recursive: bool,
}

fn open(global: &GlobalArgs, encoding: &'static Encoding, path: &Path) -> Result<AnyContainer> {
	let mut container = open_path(path, global.kind.map(FileType::from), global.palette.as_deref())
		.with_context(|| format!("Failed to open {}", path.display()))?;
	container.set_encoding(encoding);
	Ok(container)
}

fn run_info(global: &GlobalArgs, encoding: &'static Encoding, opts: InfoArgs) -> Result<()> {
	let container = open(global, encoding, &opts.file)?;
	let summary = container.summary();

	if opts.json {
		println!("{}", serde_json::to_string_pretty(&summary)?);
		return Ok(());
	}

	println!("{}", opts.file.display());
	match summary {
		Summary::Text {
			encoding,
			bytes,
			chars,
		} => {
			println!("  type:     text ({encoding})");
			println!("  size:     {bytes} bytes, {chars} chars");
		}
		Summary::Table {
			encoding,
			records,
			max_fields,
		} => {
			println!("  type:     table ({encoding})");
			println!("  records:  {records}, up to {max_fields} fields");
		}
		Summary::Bitmap {
			header,
			has_palette,
		} => {
			println!("  type:     bitmap");
			println!("  header:   {header}");
			println!("  reserved: {}", hex::encode(header.reserved()));
			println!("  palette:  {}", if has_palette { "yes" } else { "no" });
		}
		Summary::Audio {
			source_len,
			wav_len,
			format,
		} => {
			println!("  type:     audio");
			println!("  format:   {format}");
			println!("  size:     {source_len} bytes raw, {wav_len} bytes as WAV");
			if let AnyContainer::Audio(file) = &container
				&& let Some(stream) = file.stream()
			{
				println!("  params:   {}", hex::encode(stream.param_block()));
			}
		}
		Summary::Empty {
			file_type,
		} => println!("  type:     {file_type} (empty)"),
	}
	Ok(())
}

fn run_decode(global: &GlobalArgs, encoding: &'static Encoding, opts: DecodeArgs) -> Result<()> {
	let mut container = open(global, encoding, &opts.input)?;
	container
		.extract(&opts.output)
		.with_context(|| format!("Failed to extract {}", opts.output.display()))?;
	info!("{} -> {}", opts.input.display(), opts.output.display());
	Ok(())
}

fn run_encode(global: &GlobalArgs, encoding: &'static Encoding, opts: EncodeArgs) -> Result<()> {
	let kind = match global.kind {
		Some(kind) => FileType::from(kind),
		None => FileType::from_path(&opts.output)?,
	};
	let plain = fs::read(&opts.input).with_context(|| format!("Failed to read {}", opts.input.display()))?;

	match kind {
		FileType::Text => {
			let mut text = TextFile::new();
			text.set_encoding(encoding);
			text.set_data(plain)?;
			text.save(&opts.output)?;
		}
		FileType::Table => {
			let (decoded, _, had_errors) = encoding.decode(&plain);
			if had_errors {
				warn!("{} is not valid {}", opts.input.display(), encoding.name());
			}
			let records = table::parse(&decoded);
			info!("Encoding {} records", records.len());

			let mut table = TableFile::new();
			table.set_encoding(encoding);
			table.set_records(records);
			table.save(&opts.output)?;
		}
		other => bail!("encode only produces text or table containers, not {other}"),
	}
	info!("{} -> {}", opts.input.display(), opts.output.display());
	Ok(())
}

fn run_replace(global: &GlobalArgs, opts: ReplaceArgs) -> Result<()> {
	let mut bitmap = BitmapFile::open(&opts.container, global.palette.as_deref())
		.with_context(|| format!("Failed to open {}", opts.container.display()))?;
	let image = image::open(&opts.image)
		.with_context(|| format!("Failed to read {}", opts.image.display()))?
		.to_rgba8();

	bitmap.set_data(Pixels::from_rgba_image(&image))?;
	bitmap.save(&opts.output)?;
	info!("{} + {} -> {}", opts.container.display(), opts.image.display(), opts.output.display());
	Ok(())
}

fn run_unwrap(opts: UnwrapArgs) -> Result<()> {
	let wav = fs::read(&opts.input).with_context(|| format!("Failed to read {}", opts.input.display()))?;
	let raw = unwrap_wav(&wav)?;
	fs::write(&opts.output, &raw)?;
	info!("{} -> {} ({} bytes)", opts.input.display(), opts.output.display(), raw.len());
	Ok(())
}

fn interchange_extension(file_type: FileType) -> &'static str {
	match file_type {
		FileType::Text => "txt",
		FileType::Table => "csv",
		FileType::Bitmap => "png",
		FileType::Audio => "wav",
	}
}

fn run_batch(global: &GlobalArgs, encoding: &'static Encoding, opts: BatchArgs) -> Result<()> {
	if !opts.root.is_dir() {
		bail!("{} is not a directory", opts.root.display());
	}
	let max_depth = if opts.recursive {
		usize::MAX
	} else {
		1
	};

	let mut extracted = 0usize;
	let mut failed = 0usize;
	for entry in WalkDir::new(&opts.root).max_depth(max_depth).follow_links(false).into_iter() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				warn!("{err}");
				continue;
			}
		};
		if !entry.file_type().is_file() {
			continue;
		}
		let Ok(file_type) = FileType::from_path(entry.path()) else {
			continue;
		};

		let relative = entry.path().strip_prefix(&opts.root).unwrap_or(entry.path());
		let output = opts.output.join(relative).with_extension(interchange_extension(file_type));
		if let Some(parent) = output.parent() {
			fs::create_dir_all(parent)?;
		}

		let result = open(global, encoding, entry.path()).and_then(|mut container| {
			container.extract(&output)?;
			Ok(())
		});
		match result {
			Ok(()) => {
				info!("{} -> {}", entry.path().display(), output.display());
				extracted += 1;
			}
			Err(err) => {
				warn!("{}: {err:#}", entry.path().display());
				failed += 1;
			}
		}
	}

	info!("Extracted {extracted} containers, {failed} failed");
	Ok(())
}
