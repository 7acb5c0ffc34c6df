//! Quote-aware CSV reader producing [`NodeRecord`]s.

use log::debug;

use super::types::NodeRecord;

pub const DEFAULT_SIZE: f32 = 5.0;
pub const DEFAULT_COORD: f32 = 0.0;

const KNOWN_COLUMNS: &[&str] = &[
	"id",
	"label",
	"category",
	"type",
	"description",
	"size",
	"x",
	"y",
	"z",
];

/// Split one line into raw (untrimmed) fields.
///
/// A `"` toggles the in-quotes flag and is dropped; a `,` only separates
/// fields outside quotes. There is no escaped-quote form.
pub fn parse_line(line: &str) -> Vec<String> {
	let mut fields = Vec::new();
	let mut current = String::new();
	let mut in_quotes = false;

	for ch in line.chars() {
		match ch {
			'"' => in_quotes = !in_quotes,
			',' if !in_quotes => fields.push(std::mem::take(&mut current)),
			_ => current.push(ch),
		}
	}
	fields.push(current);
	fields
}

/// Parse the whole document. The first line is the header; rows whose field
/// count differs from it are skipped without error. Positions are multiplied
/// by `spread` after defaulting.
pub fn parse_records(text: &str, spread: f32) -> Vec<NodeRecord> {
	let mut lines = text.split('\n');
	let Some(header_line) = lines.next() else {
		return Vec::new();
	};
	let headers: Vec<String> = header_line
		.split(',')
		.map(|h| h.trim().to_string())
		.collect();

	let mut records = Vec::new();
	for (n, line) in lines.enumerate() {
		let values = parse_line(line);
		if values.len() != headers.len() {
			debug!(
				"skipping row {}: {} fields, header has {}",
				n + 2,
				values.len(),
				headers.len()
			);
			continue;
		}
		records.push(build_record(&headers, &values, spread));
	}
	records
}

fn build_record(headers: &[String], values: &[String], spread: f32) -> NodeRecord {
	let column = |name: &str| -> &str {
		headers
			.iter()
			.position(|h| h == name)
			.map(|i| values[i].trim())
			.unwrap_or("")
	};

	let extra = headers
		.iter()
		.zip(values)
		.filter(|(h, _)| !KNOWN_COLUMNS.contains(&h.as_str()))
		.map(|(h, v)| (h.clone(), v.trim().to_string()))
		.collect();

	NodeRecord {
		id: column("id").to_string(),
		label: column("label").to_string(),
		category: column("category").to_string(),
		kind: column("type").to_string(),
		description: column("description").to_string(),
		size: number_or(column("size"), DEFAULT_SIZE),
		x: number_or(column("x"), DEFAULT_COORD) * spread,
		y: number_or(column("y"), DEFAULT_COORD) * spread,
		z: number_or(column("z"), DEFAULT_COORD) * spread,
		extra,
	}
}

/// Lenient float parse: zero, NaN and garbage all fall back to `default`.
pub fn number_or(raw: &str, default: f32) -> f32 {
	match parse_float_prefix(raw) {
		Some(v) if v != 0.0 && !v.is_nan() => v,
		_ => default,
	}
}

/// Parse the longest leading decimal literal, ignoring whatever follows it
/// (`"12px"` is 12). Leading whitespace is skipped.
pub fn parse_float_prefix(raw: &str) -> Option<f32> {
	let s = raw.trim_start();
	let bytes = s.as_bytes();
	let mut end = 0;

	if matches!(bytes.first(), Some(b'+' | b'-')) {
		end += 1;
	}
	if s[end..].starts_with("Infinity") {
		return s[..end + "Infinity".len()].parse().ok();
	}

	let int_start = end;
	while bytes.get(end).is_some_and(u8::is_ascii_digit) {
		end += 1;
	}
	let mut digits = end - int_start;
	if bytes.get(end) == Some(&b'.') {
		let frac_start = end + 1;
		let mut frac_end = frac_start;
		while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
			frac_end += 1;
		}
		digits += frac_end - frac_start;
		if digits > 0 {
			end = frac_end;
		}
	}
	if digits == 0 {
		return None;
	}

	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let mut exp_end = end + 1;
		if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
			exp_end += 1;
		}
		let exp_digits_start = exp_end;
		while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
			exp_end += 1;
		}
		if exp_end > exp_digits_start {
			end = exp_end;
		}
	}

	s[..end].parse().ok()
}
