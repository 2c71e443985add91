//! Process-wide debug configuration, read once from the environment.
//!
//! Mirrors the original `STP_DEBUG`/`STP_PRINT_MESSAGES_TO_STDERR`
//! environment variables: `STP_DEBUG` is a bitmask selecting which
//! subsystem traces are emitted (via the `log` crate, same as `ppa6`'s
//! USB layer), `STP_PRINT_MESSAGES_TO_STDERR` additionally echoes
//! `errfunc`-style diagnostics straight to stderr for hosts that don't
//! install a `log` subscriber.

use std::sync::OnceLock;

/// Bit positions within `STP_DEBUG`. Five subsystems, never combined
/// with arbitrary user data beyond `from_bits_truncate`, so a full
/// bitflags dependency would be overkill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugFlags(u64);

impl DebugFlags {
	pub const COLOR: DebugFlags = DebugFlags(1 << 0);
	pub const DITHER: DebugFlags = DebugFlags(1 << 1);
	pub const WEAVE: DebugFlags = DebugFlags(1 << 2);
	pub const DRIVER: DebugFlags = DebugFlags(1 << 3);
	pub const VARS: DebugFlags = DebugFlags(1 << 4);
	const ALL_BITS: u64 = Self::COLOR.0 | Self::DITHER.0 | Self::WEAVE.0 | Self::DRIVER.0 | Self::VARS.0;

	pub const fn bits(self) -> u64 {
		self.0
	}

	pub const fn contains(self, other: Self) -> bool {
		(self.0 & other.0) == other.0
	}

	pub const fn from_bits_truncate(bits: u64) -> Self {
		DebugFlags(bits & Self::ALL_BITS)
	}
}

impl std::ops::BitOr for DebugFlags {
	type Output = Self;
	fn bitor(self, rhs: Self) -> Self {
		DebugFlags(self.0 | rhs.0)
	}
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
	pub debug: DebugFlags,
	pub messages_to_stderr: bool,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
	/// Read `STP_DEBUG` and `STP_PRINT_MESSAGES_TO_STDERR` from the
	/// environment. Cached process-wide after the first call.
	pub fn global() -> &'static Config {
		CONFIG.get_or_init(Config::from_env)
	}

	fn from_env() -> Self {
		let bits = std::env::var("STP_DEBUG")
			.ok()
			.and_then(|s| {
				if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
					u64::from_str_radix(hex, 16).ok()
				} else {
					s.parse::<u64>().ok()
				}
			})
			.unwrap_or(0);
		Config {
			debug: DebugFlags::from_bits_truncate(bits),
			messages_to_stderr: std::env::var("STP_PRINT_MESSAGES_TO_STDERR")
				.map(|v| v != "0" && !v.is_empty())
				.unwrap_or(false),
		}
	}

	/// Emit a diagnostic line the way the original `errfunc` callback
	/// would: always through `log::error!`, and additionally to stderr
	/// when `STP_PRINT_MESSAGES_TO_STDERR` is set.
	pub fn errfunc(&self, msg: &str) {
		log::error!("{msg}");
		if self.messages_to_stderr {
			eprintln!("{msg}");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_flags_truncate_unknown_bits() {
		let f = DebugFlags::from_bits_truncate(0xFFFF_FFFF);
		assert!(f.contains(DebugFlags::COLOR));
		assert!(f.contains(DebugFlags::DITHER));
		assert_eq!(f.bits(), 0b11111);
	}
}
