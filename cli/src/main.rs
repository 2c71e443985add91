use std::io::{BufWriter, Cursor, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity::Verbosity;
use cosmic_text::{Attrs, Buffer, Color as TextColor, FontSystem, Metrics, Shaping, SwashCache};
use gprint_core::image::MemoryImage;
use gprint_core::registry;
use gprint_core::vars::{ColorModel, Vars};
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};

#[derive(Parser)]
struct Cli {
	/// Path to the file to be printed, or `-` for stdin.
	file: PathBuf,

	/// Path to write the driver's wire-protocol output to; defaults to
	/// stdout so the CLI composes with a CUPS backend or a raw device.
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Printer driver id from the registry (see `--list-printers`).
	#[arg(short = 'm', long, default_value = "escp2-generic")]
	printer: String,

	#[arg(long)]
	list_printers: bool,

	/// Resolution id, e.g. `360x360` (must be one this printer offers).
	#[arg(short, long)]
	resolution: Option<String>,

	/// Page size name, e.g. `A4`, `Letter`, `Roll`.
	#[arg(short = 'P', long)]
	media_size: Option<String>,

	/// Show the rendered page instead of driving the printer.
	#[arg(short, long)]
	show: bool,

	/// Rotate the source image by 0, 90, 180, or 270 degrees.
	#[arg(long, default_value_t = 0)]
	rotate: usize,

	/// Treat `file` as a text file to be typeset instead of decoded as
	/// an image (only sensible for the thermal receipt family).
	#[arg(short, long)]
	text: bool,

	/// Font size for `--text`.
	#[arg(long, default_value_t = 18.0)]
	size: f32,

	/// Font weight for `--text`. Good numbers are 600 and 800.
	#[arg(long, default_value_t = 800)]
	weight: u16,

	/// Line height factor for `--text`, multiplied by `--size`.
	#[arg(long, default_value_t = 1.0)]
	line_height: f32,

	#[arg(long, default_value_t = 1.0)]
	brightness: f64,

	#[arg(long, default_value_t = 1.0)]
	contrast: f64,

	#[arg(long, default_value_t = 1.0)]
	gamma: f64,

	#[arg(long, default_value_t = 1.0)]
	density: f64,

	#[command(flatten)]
	verbose: Verbosity,
}

fn load_picture(cli: &Cli, data: &[u8]) -> Result<RgbImage> {
	log::trace!("decoding image...");
	let img = ImageReader::new(Cursor::new(data)).with_guessed_format()?.decode()?;
	let img = match cli.rotate {
		0 => img,
		90 => img.rotate90(),
		180 => img.rotate180(),
		270 => img.rotate270(),
		other => anyhow::bail!("invalid rotation: {other}"),
	};
	Ok(img.into_rgb8())
}

/// Typesets `data` as text, grounded on the original's `cosmic-text`
/// receipt-label renderer, generalized to an arbitrary page width
/// matching the selected printer's dot limit.
fn render_text(cli: &Cli, data: &[u8], width: u32) -> Result<RgbImage> {
	let text = String::from_utf8(data.to_vec()).context("text input must be UTF-8")?;

	let mut font_system = FontSystem::new();
	let mut cache = SwashCache::new();
	let metrics = Metrics::new(cli.size, cli.size * cli.line_height);
	let mut buffer = Buffer::new(&mut font_system, metrics);
	let mut buffer = buffer.borrow_with(&mut font_system);
	buffer.set_size(Some(width as f32), None);
	let mut attrs = Attrs::new();
	attrs.weight.0 = cli.weight;

	buffer.set_text(&text, attrs, Shaping::Advanced);
	buffer.shape_until_scroll(true);

	let mut pixels = vec![0xffu8; 0];
	let mut height = 0usize;

	buffer.draw(&mut cache, TextColor::rgb(0, 0, 0), |x, y, w, h, color| {
		let a = color.a();
		if x < 0 || y < 0 || x as u32 >= width || w != 1 || h != 1 || a == 0 {
			return;
		}
		let (x, y) = (x as usize, y as usize);
		if y >= height {
			height = y + 1;
			pixels.resize(3 * width as usize * height, 0xff);
		}
		let scale = |c: u8| {
			let c = c as f32 / 255.0;
			let a = a as f32 / 255.0;
			((c * a + (1.0 - a)) * 255.0).clamp(0.0, 255.0) as u8
		};
		let base = (y * width as usize + x) * 3;
		pixels[base] = scale(color.r());
		pixels[base + 1] = scale(color.g());
		pixels[base + 2] = scale(color.b());
	});

	RgbImage::from_vec(width, height.max(1) as u32, pixels).context("text layout produced an empty buffer")
}

fn build_vars(cli: &Cli) -> Vars {
	let mut vars = Vars::default_vars();
	vars.set_float("brightness", cli.brightness);
	vars.set_float("contrast", cli.contrast);
	vars.set_float("gamma", cli.gamma);
	vars.set_float("density", cli.density);
	vars.set_input_color_model(ColorModel::Rgb);
	if let Some(r) = &cli.resolution {
		vars.set_str("resolution", r.clone());
	}
	if let Some(m) = &cli.media_size {
		vars.set_str("media_size", m.clone());
	}
	vars
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	env_logger::builder().filter_level(cli.verbose.log_level_filter()).init();

	if cli.list_printers {
		for i in 0..registry::printer_count() {
			let p = registry::printer_by_index(i).unwrap();
			println!("{}\t{}", p.driver_id, p.long_name);
		}
		return Ok(());
	}

	let printer = registry::printer_by_driver(&cli.printer).with_context(|| format!("no such printer `{}`", cli.printer))?;
	let (limit_width, _) = (printer.vtable.limit)(printer);

	let data = if cli.file == Path::new("-") {
		let mut data = Vec::new();
		std::io::stdin().read_to_end(&mut data)?;
		data
	} else {
		std::fs::read(&cli.file)?
	};

	let img = if cli.text {
		render_text(&cli, &data, limit_width as u32)?
	} else {
		load_picture(&cli, &data)?
	};

	if cli.show {
		let temppath = Path::new("/tmp/gprint-preview.png");
		DynamicImage::ImageRgb8(img).save_with_format(temppath, ImageFormat::Png)?;
		open::that(temppath)?;
		return Ok(());
	}

	let vars = build_vars(&cli);
	let (width, height) = img.dimensions();
	let mut image = MemoryImage::new(width as i32, height as i32, 3, img.into_raw());

	log::trace!("printing to {:?}...", cli.output.as_deref().unwrap_or(Path::new("-")));
	match &cli.output {
		Some(path) => {
			let mut sink = gprint_core::backend::FileSink::create(path)?;
			registry::print(printer, &vars, &mut image, &mut sink)?;
		}
		None => {
			let mut sink = BufWriter::new(std::io::stdout());
			registry::print(printer, &vars, &mut image, &mut sink)?;
		}
	}

	Ok(())
}
