//! CUPS filter entry point: `job_id user title ncopies options [file]`,
//! generalized from `ppa6-cups`'s fixed-printer job parser to dispatch
//! through [`gprint_core::registry`] by device URI instead of always
//! opening the one PeriPage A6.

use std::io::{BufWriter, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use gprint_core::image::MemoryImage;
use gprint_core::registry;
use gprint_core::vars::Vars;
use image::ImageReader;

#[derive(Debug)]
struct Job {
	id: String,
	user: String,
	title: String,
	num: u32,
	options: String,
	path: Option<PathBuf>,
}

fn parse_cli() -> Option<Job> {
	let mut args = std::env::args().skip(1);
	Some(Job {
		id: args.next()?,
		user: args.next()?,
		title: args.next()?,
		num: args.next()?.parse().ok()?,
		options: args.next()?,
		path: args.next().map(PathBuf::from),
	})
}

/// CUPS options are space-separated `key=value` (or bare flag) tokens;
/// translates the handful this filter understands onto [`Vars`] fields.
fn apply_options(vars: &mut Vars, options: &str) {
	for token in options.split_whitespace() {
		let Some((key, value)) = token.split_once('=') else { continue };
		match key {
			"Resolution" => vars.set_str("resolution", value.to_string()),
			"MediaSize" | "PageSize" => vars.set_str("media_size", value.to_string()),
			"MediaType" => vars.set_str("media_type", value.to_string()),
			"InputSlot" => vars.set_str("media_source", value.to_string()),
			"InkType" => vars.set_str("ink_type", value.to_string()),
			_ => {}
		}
	}
}

/// `DeviceURI`, e.g. `gprint://escp2-generic`, selects which registered
/// printer family this filter invocation targets.
fn printer_driver_id() -> String {
	std::env::var("DEVICE_URI")
		.ok()
		.and_then(|uri| uri.strip_prefix("gprint://").map(str::to_string))
		.unwrap_or_else(|| "escp2-generic".to_string())
}

fn main() -> Result<()> {
	env_logger::init();

	let Some(job) = parse_cli() else {
		eprintln!("usage: gprint-cups job_id user job_name ncopies options [file]");
		std::process::exit(1);
	};
	log::info!("job {} ({:?}) for {}, {} copies", job.id, job.title, job.user, job.num);

	let driver_id = printer_driver_id();
	let printer = registry::printer_by_driver(&driver_id).with_context(|| format!("unknown device `{driver_id}`"))?;

	let data = match job.path.as_deref() {
		Some(path) => std::fs::read(path).with_context(|| format!("reading {path:?}"))?,
		None => {
			let mut buf = Vec::new();
			std::io::stdin().read_to_end(&mut buf)?;
			buf
		}
	};

	let decoded = ImageReader::new(std::io::Cursor::new(&data)).with_guessed_format()?.decode()?.into_rgb8();
	let (width, height) = decoded.dimensions();

	let mut vars = Vars::default_vars();
	apply_options(&mut vars, &job.options);

	let stdout = std::io::stdout();
	let mut sink = BufWriter::new(stdout.lock());

	for copy in 0..job.num.max(1) {
		log::trace!("printing copy {copy}...");
		let mut image = MemoryImage::new(width as i32, height as i32, 3, decoded.clone().into_raw());
		registry::print(printer, &vars, &mut image, &mut sink)?;
	}

	Ok(())
}
