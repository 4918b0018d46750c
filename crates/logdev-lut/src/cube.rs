//! Resolve/Adobe `.cube` LUT format.
//!
//! ```text
//! # Comment
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! ...
//! ```
//!
//! A file may carry a 1D table, a 3D table, or both (Resolve shaper
//! style). With both, the 1D rows come first and are applied first.
//!
//! | Keyword | Applies to |
//! |---------|------------|
//! | `DOMAIN_MIN` / `DOMAIN_MAX` | the single table, or the shaper when both exist |
//! | `LUT_1D_INPUT_RANGE lo hi` | the 1D table |
//! | `LUT_3D_INPUT_RANGE lo hi` | the 3D table |

use crate::{Lut, Lut1D, Lut3D, LutError, LutResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a `.cube` file.
pub fn read<P: AsRef<Path>>(path: P) -> LutResult<Lut> {
    let file = File::open(path.as_ref())?;
    parse(BufReader::new(file))
}

/// Parses `.cube` text from a reader.
pub fn parse<R: BufRead>(reader: R) -> LutResult<Lut> {
    let mut size_1d: Option<usize> = None;
    let mut size_3d: Option<usize> = None;
    let mut domain: Option<([f32; 3], [f32; 3])> = None;
    let mut range_1d: Option<(f32, f32)> = None;
    let mut range_3d: Option<(f32, f32)> = None;
    let mut rows: Vec<[f32; 3]> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let lineno = idx + 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else { continue };
        let err = |msg: String| LutError::Parse { line: lineno, msg };

        match head {
            "TITLE" => {}
            "LUT_1D_SIZE" => size_1d = Some(parse_size(parts.next(), lineno)?),
            "LUT_3D_SIZE" => size_3d = Some(parse_size(parts.next(), lineno)?),
            "DOMAIN_MIN" => {
                let min = parse_triplet(parts, lineno)?;
                domain = Some((min, domain.map_or([1.0; 3], |d| d.1)));
            }
            "DOMAIN_MAX" => {
                let max = parse_triplet(parts, lineno)?;
                domain = Some((domain.map_or([0.0; 3], |d| d.0), max));
            }
            "LUT_1D_INPUT_RANGE" => range_1d = Some(parse_pair(parts, lineno)?),
            "LUT_3D_INPUT_RANGE" => range_3d = Some(parse_pair(parts, lineno)?),
            _ if head.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+' || c == '.') => {
                let rgb = parse_triplet(line.split_whitespace(), lineno)?;
                rows.push(rgb);
            }
            other => return Err(err(format!("unknown keyword {other:?}"))),
        }
    }

    if size_1d.is_none() && size_3d.is_none() {
        return Err(missing_size());
    }
    let n1 = size_1d.unwrap_or(0);
    let expected = size_3d
        .map_or(Some(0), |n| n.checked_mul(n).and_then(|sq| sq.checked_mul(n)))
        .and_then(|n3| n3.checked_add(n1))
        .ok_or_else(|| LutError::InvalidSize("declared table size overflows".into()))?;
    if rows.len() != expected {
        return Err(LutError::InvalidSize(format!(
            "expected {expected} table rows, found {}",
            rows.len()
        )));
    }

    let shaper = match size_1d {
        Some(_) => {
            let (min, max) = match (range_1d, domain) {
                (Some((lo, hi)), _) => ([lo; 3], [hi; 3]),
                (None, Some(d)) => d,
                (None, None) => ([0.0; 3], [1.0; 3]),
            };
            let curve = &rows[..n1];
            let lut = Lut1D::from_rgb(
                curve.iter().map(|v| v[0]).collect(),
                curve.iter().map(|v| v[1]).collect(),
                curve.iter().map(|v| v[2]).collect(),
            )?
            .with_domain(min, max)?;
            Some(lut)
        }
        None => None,
    };

    let cube = match size_3d {
        Some(size) => {
            let (min, max) = match (range_3d, domain, &shaper) {
                (Some((lo, hi)), _, _) => ([lo; 3], [hi; 3]),
                (None, Some(d), None) => d,
                _ => ([0.0; 3], [1.0; 3]),
            };
            Some(Lut3D::from_data(rows[n1..].to_vec(), size)?.with_domain(min, max)?)
        }
        None => None,
    };

    match (shaper, cube) {
        (Some(s), Some(c)) => Ok(Lut::Sequence(vec![Lut::OneD(s), Lut::ThreeD(c)])),
        (Some(s), None) => Ok(Lut::OneD(s)),
        (None, Some(c)) => Ok(Lut::ThreeD(c)),
        (None, None) => Err(missing_size()),
    }
}

fn missing_size() -> LutError {
    LutError::InvalidSize("missing LUT_1D_SIZE or LUT_3D_SIZE".into())
}

/// Writes a 3D LUT as `.cube`.
pub fn write_3d<P: AsRef<Path>>(path: P, lut: &Lut3D) -> LutResult<()> {
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    writeln!(w, "LUT_3D_SIZE {}", lut.size)?;
    write_domain(&mut w, lut.domain_min, lut.domain_max)?;
    for rgb in &lut.data {
        writeln!(w, "{:.6} {:.6} {:.6}", rgb[0], rgb[1], rgb[2])?;
    }
    w.flush()?;
    Ok(())
}

/// Writes a 1D LUT as `.cube`.
pub fn write_1d<P: AsRef<Path>>(path: P, lut: &Lut1D) -> LutResult<()> {
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    writeln!(w, "LUT_1D_SIZE {}", lut.size())?;
    write_domain(&mut w, lut.domain_min, lut.domain_max)?;
    for i in 0..lut.size() {
        writeln!(w, "{:.6} {:.6} {:.6}", lut.r[i], lut.g[i], lut.b[i])?;
    }
    w.flush()?;
    Ok(())
}

fn write_domain<W: Write>(w: &mut W, min: [f32; 3], max: [f32; 3]) -> LutResult<()> {
    if min != [0.0; 3] || max != [1.0; 3] {
        writeln!(w, "DOMAIN_MIN {} {} {}", min[0], min[1], min[2])?;
        writeln!(w, "DOMAIN_MAX {} {} {}", max[0], max[1], max[2])?;
    }
    Ok(())
}

fn parse_size(token: Option<&str>, line: usize) -> LutResult<usize> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| LutError::Parse {
            line,
            msg: "invalid size value".into(),
        })
}

fn parse_floats<'a, I: Iterator<Item = &'a str>, const N: usize>(
    mut parts: I,
    line: usize,
) -> LutResult<[f32; N]> {
    let mut out = [0.0f32; N];
    for v in out.iter_mut() {
        *v = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| LutError::Parse {
                line,
                msg: format!("expected {N} numbers"),
            })?;
    }
    Ok(out)
}

fn parse_triplet<'a, I: Iterator<Item = &'a str>>(parts: I, line: usize) -> LutResult<[f32; 3]> {
    parse_floats::<_, 3>(parts, line)
}

fn parse_pair<'a, I: Iterator<Item = &'a str>>(parts: I, line: usize) -> LutResult<(f32, f32)> {
    let [lo, hi] = parse_floats::<_, 2>(parts, line)?;
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const CUBE_3D: &str = r#"
# Test LUT
TITLE "Test Grade"
LUT_3D_SIZE 2
DOMAIN_MIN 0.0 0.0 0.0
DOMAIN_MAX 1.0 1.0 1.0

0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
1.0 1.0 0.0
0.0 0.0 1.0
1.0 0.0 1.0
0.0 1.0 1.0
1.0 1.0 1.0
"#;

    #[test]
    fn parse_3d_cube() {
        let lut = parse(Cursor::new(CUBE_3D)).unwrap();
        let cube = lut.as_3d().expect("3D table");
        assert_eq!(cube.size, 2);
        let out = cube.apply([0.25, 0.5, 0.75]);
        assert_relative_eq!(out[0], 0.25, epsilon = 1e-6);
        assert_relative_eq!(out[2], 0.75, epsilon = 1e-6);
    }

    #[test]
    fn parse_1d_cube() {
        let text = "TITLE \"Gamma\"\nLUT_1D_SIZE 3\nDOMAIN_MAX 2 2 2\n0 0 0\n0.25 0.25 0.25\n1 1 1\n";
        let Lut::OneD(curve) = parse(Cursor::new(text)).unwrap() else {
            panic!("expected a 1D LUT");
        };
        assert_eq!(curve.size(), 3);
        assert_eq!(curve.domain_max, [2.0; 3]);
        assert_relative_eq!(curve.apply_rgb([1.0; 3])[0], 0.25, epsilon = 1e-6);
    }

    #[test]
    fn parse_shaper_and_cube() {
        let mut text = String::from("LUT_1D_SIZE 2\nLUT_1D_INPUT_RANGE 0 4\nLUT_3D_SIZE 2\n");
        text.push_str("0 0 0\n1 1 1\n");
        for line in CUBE_3D.lines().filter(|l| l.starts_with(['0', '1'])) {
            text.push_str(line);
            text.push('\n');
        }
        let lut = parse(Cursor::new(text)).unwrap();
        assert!(matches!(&lut, Lut::Sequence(items) if items.len() == 2));
        // 2.0 through a 0..4 shaper is 0.5, then the identity cube
        assert_relative_eq!(lut.apply_rgb([2.0; 3])[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn rejects_short_table() {
        let text = "LUT_3D_SIZE 2\n0 0 0\n1 1 1\n";
        assert!(matches!(parse(Cursor::new(text)), Err(LutError::InvalidSize(_))));
    }

    #[test]
    fn rejects_oversized_header() {
        for text in ["LUT_3D_SIZE 4194304\n0 0 0\n", "LUT_1D_SIZE 18446744073709551615\nLUT_3D_SIZE 2\n0 0 0\n"] {
            assert!(matches!(parse(Cursor::new(text)), Err(LutError::InvalidSize(_))), "{text}");
        }
    }

    #[test]
    fn rejects_garbage() {
        let text = "LUT_3D_SIZE 2\nhello world\n";
        assert!(matches!(
            parse(Cursor::new(text)),
            Err(LutError::Parse { line: 2, .. })
        ));
        assert!(parse(Cursor::new("0 0 0\n")).is_err());
    }

    #[test]
    fn write_then_read_3d() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.cube");
        let lut = Lut3D::identity(4).with_domain([0.0; 3], [2.0; 3]).unwrap();

        write_3d(&path, &lut).unwrap();
        let loaded = read(&path).unwrap();
        let cube = loaded.as_3d().unwrap();
        assert_eq!(cube.size, 4);
        assert_eq!(cube.domain_max, [2.0; 3]);
    }

    #[test]
    fn write_then_read_1d() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.cube");
        write_1d(&path, &Lut1D::identity(8)).unwrap();
        assert!(matches!(read(&path).unwrap(), Lut::OneD(c) if c.size() == 8));
    }
}
