//! Minimal GDSII binary export.
//!
//! Emits a single-structure GDSII stream: library header and units, one
//! structure named after the layout, a BOUNDARY rectangle per component and
//! a PATH per route. Coordinates are written in database units of 1 nm
//! (user unit 1 µm).

use crate::error::RenderResult;
use crate::layout::Layout;

// Record types
const HEADER: u8 = 0x00;
const BGNLIB: u8 = 0x01;
const LIBNAME: u8 = 0x02;
const UNITS: u8 = 0x03;
const ENDLIB: u8 = 0x04;
const BGNSTR: u8 = 0x05;
const STRNAME: u8 = 0x06;
const ENDSTR: u8 = 0x07;
const BOUNDARY: u8 = 0x08;
const PATH: u8 = 0x09;
const LAYER: u8 = 0x0D;
const DATATYPE: u8 = 0x0E;
const WIDTH: u8 = 0x0F;
const XY: u8 = 0x10;
const ENDEL: u8 = 0x11;

// Data types
const DT_NONE: u8 = 0x00;
const DT_I16: u8 = 0x02;
const DT_I32: u8 = 0x03;
const DT_REAL8: u8 = 0x05;
const DT_ASCII: u8 = 0x06;

/// Layer for component geometry.
const COMPONENT_LAYER: i16 = 1;
/// Layer for routed waveguides.
const ROUTE_LAYER: i16 = 2;
/// Route width in database units (0.5 µm).
const ROUTE_WIDTH_NM: i32 = 500;

/// Microns to database units (nm).
fn db(value: f64) -> i32 {
    (value * 1000.0).round() as i32
}

/// Serialize a layout as a GDSII stream.
pub fn write_layout(layout: &Layout) -> RenderResult<Vec<u8>> {
    let mut out = Vec::new();

    record_i16(&mut out, HEADER, &[600]);
    record_i16(&mut out, BGNLIB, &[0; 12]);
    record_ascii(&mut out, LIBNAME, "QLAB");
    // 0.001 user units (µm) per database unit, database unit = 1e-9 m.
    record_real8(&mut out, UNITS, &[1e-3, 1e-9]);

    record_i16(&mut out, BGNSTR, &[0; 12]);
    record_ascii(&mut out, STRNAME, &sanitize_name(layout.name()));

    for component in layout.components() {
        let (w, h) = component.kind.footprint();
        let (x0, y0) = (db(component.x - w / 2.0), db(component.y - h / 2.0));
        let (x1, y1) = (db(component.x + w / 2.0), db(component.y + h / 2.0));

        record_none(&mut out, BOUNDARY);
        record_i16(&mut out, LAYER, &[COMPONENT_LAYER]);
        record_i16(&mut out, DATATYPE, &[0]);
        // Closed rectangle: 5 points, first repeated last.
        record_i32(
            &mut out,
            XY,
            &[x0, y0, x1, y0, x1, y1, x0, y1, x0, y0],
        );
        record_none(&mut out, ENDEL);
    }

    for (from, to) in layout.routes() {
        let a = &layout.components()[*from];
        let b = &layout.components()[*to];

        record_none(&mut out, PATH);
        record_i16(&mut out, LAYER, &[ROUTE_LAYER]);
        record_i16(&mut out, DATATYPE, &[0]);
        record_i32_width(&mut out, ROUTE_WIDTH_NM);
        record_i32(&mut out, XY, &[db(a.x), db(a.y), db(b.x), db(b.y)]);
        record_none(&mut out, ENDEL);
    }

    record_none(&mut out, ENDSTR);
    record_none(&mut out, ENDLIB);

    Ok(out)
}

/// GDS structure names allow a restricted character set.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .take(32)
        .collect();
    if cleaned.is_empty() {
        "TOP".to_string()
    } else {
        cleaned
    }
}

// =============================================================================
// Record encoding
// =============================================================================

fn record(out: &mut Vec<u8>, record_type: u8, data_type: u8, data: &[u8]) {
    debug_assert!(data.len() % 2 == 0, "GDS records must be even-length");
    let total = (4 + data.len()) as u16;
    out.extend_from_slice(&total.to_be_bytes());
    out.push(record_type);
    out.push(data_type);
    out.extend_from_slice(data);
}

fn record_none(out: &mut Vec<u8>, record_type: u8) {
    record(out, record_type, DT_NONE, &[]);
}

fn record_i16(out: &mut Vec<u8>, record_type: u8, values: &[i16]) {
    let mut data = Vec::with_capacity(values.len() * 2);
    for v in values {
        data.extend_from_slice(&v.to_be_bytes());
    }
    record(out, record_type, DT_I16, &data);
}

fn record_i32(out: &mut Vec<u8>, record_type: u8, values: &[i32]) {
    let mut data = Vec::with_capacity(values.len() * 4);
    for v in values {
        data.extend_from_slice(&v.to_be_bytes());
    }
    record(out, record_type, DT_I32, &data);
}

fn record_i32_width(out: &mut Vec<u8>, width: i32) {
    record(out, WIDTH, DT_I32, &width.to_be_bytes());
}

fn record_ascii(out: &mut Vec<u8>, record_type: u8, text: &str) {
    let mut data = text.as_bytes().to_vec();
    if data.len() % 2 != 0 {
        data.push(0); // pad to even length
    }
    record(out, record_type, DT_ASCII, &data);
}

fn record_real8(out: &mut Vec<u8>, record_type: u8, values: &[f64]) {
    let mut data = Vec::with_capacity(values.len() * 8);
    for v in values {
        data.extend_from_slice(&encode_real8(*v));
    }
    record(out, record_type, DT_REAL8, &data);
}

/// Encode an excess-64, base-16 GDSII 8-byte real.
fn encode_real8(value: f64) -> [u8; 8] {
    if value == 0.0 {
        return [0; 8];
    }

    let negative = value < 0.0;
    let mut mantissa = value.abs();
    let mut exponent: i32 = 0;

    // Normalize mantissa into [1/16, 1).
    while mantissa >= 1.0 {
        mantissa /= 16.0;
        exponent += 1;
    }
    while mantissa < 1.0 / 16.0 {
        mantissa *= 16.0;
        exponent -= 1;
    }

    let mut bytes = [0u8; 8];
    bytes[0] = (exponent + 64) as u8 | if negative { 0x80 } else { 0x00 };
    let frac = (mantissa * 2f64.powi(56)) as u64;
    bytes[1..8].copy_from_slice(&frac.to_be_bytes()[1..8]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ComponentKind;

    fn decode_real8(bytes: [u8; 8]) -> f64 {
        if bytes == [0; 8] {
            return 0.0;
        }
        let sign = if bytes[0] & 0x80 != 0 { -1.0 } else { 1.0 };
        let exponent = i32::from(bytes[0] & 0x7F) - 64;
        let mut frac_bytes = [0u8; 8];
        frac_bytes[1..8].copy_from_slice(&bytes[1..8]);
        let frac = u64::from_be_bytes(frac_bytes) as f64 / 2f64.powi(56);
        sign * frac * 16f64.powi(exponent)
    }

    #[test]
    fn test_real8_known_value() {
        // 2.0 = 0.125 * 16^1
        assert_eq!(encode_real8(2.0), [0x41, 0x20, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode_real8(0.0), [0; 8]);
    }

    #[test]
    fn test_real8_roundtrip() {
        for value in [1.0, -1.0, 1e-3, 1e-9, 0.625, 123456.789] {
            let decoded = decode_real8(encode_real8(value));
            assert!(
                (decoded - value).abs() <= value.abs() * 1e-12,
                "{value} decoded as {decoded}"
            );
        }
    }

    #[test]
    fn test_stream_framing() {
        let mut layout = Layout::new("mzi_chip");
        let a = layout.add(ComponentKind::Source, 0.0, 0.0);
        let b = layout.add(ComponentKind::Coupler, 20.0, 0.0);
        layout.route(a, b).unwrap();

        let bytes = write_layout(&layout).unwrap();

        // HEADER record: length 6, type 0x00, i16 data, version 600.
        assert_eq!(&bytes[..6], &[0x00, 0x06, HEADER, DT_I16, 0x02, 0x58]);
        // Terminated by ENDLIB.
        assert_eq!(&bytes[bytes.len() - 4..], &[0x00, 0x04, ENDLIB, DT_NONE]);

        // Every record length is even and the stream walks cleanly.
        let mut pos = 0usize;
        while pos < bytes.len() {
            let len = u16::from_be_bytes([bytes[pos], bytes[pos + 1]]) as usize;
            assert!(len >= 4 && len % 2 == 0, "bad record length {len}");
            pos += len;
        }
        assert_eq!(pos, bytes.len());
    }

    #[test]
    fn test_structure_name_sanitized() {
        let layout = Layout::new("my chip #1");
        let bytes = write_layout(&layout).unwrap();
        let name: &[u8] = b"my_chip__1";
        assert!(
            bytes.windows(name.len()).any(|w| w == name),
            "sanitized structure name not found"
        );
    }
}
