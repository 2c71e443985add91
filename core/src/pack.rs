//! TIFF packbits run-length compression, shared by the weave scheduler
//! and the ESC/P2 emitter (spec.md §8 scenario 4: encode-then-decode
//! round trips to the original bytes).
//!
//! Grounded on `original_source/print-escp2.c`'s `pack_line`/the TIFF 6.0
//! PackBits scheme it implements: runs of 2-128 identical bytes become a
//! `(-(n-1), byte)` pair, literal spans of 1-128 bytes become
//! `(n-1, ...bytes)`.

/// Encodes `input` into TIFF packbits form, appending to `out`.
pub fn pack(input: &[u8], out: &mut Vec<u8>) {
	let mut i = 0;
	while i < input.len() {
		let run_len = run_length(input, i);
		if run_len >= 2 {
			out.push((1 - run_len as i32) as u8);
			out.push(input[i]);
			i += run_len;
		} else {
			let lit_len = literal_length(input, i);
			out.push((lit_len - 1) as u8);
			out.extend_from_slice(&input[i..i + lit_len]);
			i += lit_len;
		}
	}
}

fn run_length(input: &[u8], start: usize) -> usize {
	let max = (input.len() - start).min(128);
	let mut n = 1;
	while n < max && input[start + n] == input[start] {
		n += 1;
	}
	n
}

/// Length of the literal span starting at `start`: runs until the next
/// repeat of >=2 identical bytes, or the 128-byte literal cap.
fn literal_length(input: &[u8], start: usize) -> usize {
	let max = (input.len() - start).min(128);
	let mut n = 1;
	while n < max {
		if run_length(input, start + n) >= 2 {
			break;
		}
		n += 1;
	}
	n
}

/// Decodes a TIFF packbits stream back into raw bytes.
pub fn unpack(input: &[u8], out: &mut Vec<u8>) {
	let mut i = 0;
	while i < input.len() {
		let n = input[i] as i8;
		i += 1;
		if n >= 0 {
			let len = n as usize + 1;
			out.extend_from_slice(&input[i..i + len]);
			i += len;
		} else if n != -128 {
			let len = (1 - n as i32) as usize;
			out.extend(std::iter::repeat(input[i]).take(len));
			i += 1;
		}
		// n == -128 is a no-op placeholder per the TIFF spec.
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn round_trip(input: &[u8]) {
		let mut packed = Vec::new();
		pack(input, &mut packed);
		let mut restored = Vec::new();
		unpack(&packed, &mut restored);
		assert_eq!(restored, input);
	}

	#[test]
	fn round_trips_empty() {
		round_trip(&[]);
	}

	#[test]
	fn round_trips_all_zero_row() {
		round_trip(&[0u8; 512]);
	}

	#[test]
	fn round_trips_noise() {
		let data: Vec<u8> = (0..257u32).map(|i| (i * 37 % 251) as u8).collect();
		round_trip(&data);
	}

	#[test]
	fn round_trips_mixed_runs_and_literals() {
		let mut data = vec![1, 2, 3, 4];
		data.extend(std::iter::repeat(9u8).take(200));
		data.extend_from_slice(&[5, 6, 7]);
		round_trip(&data);
	}

	#[test]
	fn pack_compresses_long_runs() {
		let data = vec![0xAAu8; 300];
		let mut packed = Vec::new();
		pack(&data, &mut packed);
		assert!(packed.len() < data.len());
	}
}
