//! Reading and writing pre-normalized coefficient tables.
//!
//! One record per line, whitespace separated:
//!
//! ```text
//! # n  m  main_cos  main_sin  secular_cos  secular_sin
//! 1 0 -29404.5 0.0 6.7 0.0
//! ```
//!
//! Values are taken as-is; no Schmidt normalization is applied on load, so a
//! raw WMM.COF file is not a valid input.

use crate::{index, CoefficientEntry, Model, Result, WmmError, NMAX, TOTAL_COEFFS};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

fn parse_field<T: FromStr>(elements: &[&str], at: usize, name: &str, line: usize) -> Result<T> {
    elements[at].parse::<T>().map_err(|_| WmmError::Table {
        line,
        reason: format!("unable to read {} from '{}'", name, elements[at]),
    })
}

impl Model {
    /// Build a model from a coefficient table in the text format above.
    ///
    /// Every (n, m) with `m <= n <= NMAX` must appear exactly once.
    pub fn from_reader<R: BufRead>(epoch: f64, earth_radius: f64, reader: R) -> Result<Model> {
        let mut coefficients = [CoefficientEntry::ZERO; TOTAL_COEFFS];
        let mut present = [false; TOTAL_COEFFS];

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let elements: Vec<&str> = line.split_whitespace().collect();
            if elements.len() != 6 {
                return Err(WmmError::Table {
                    line: line_no,
                    reason: format!("expected 6 fields, found {}", elements.len()),
                });
            }
            let n: usize = parse_field(&elements, 0, "degree", line_no)?;
            let m: usize = parse_field(&elements, 1, "order", line_no)?;
            if n > NMAX || m > n {
                return Err(WmmError::Table {
                    line: line_no,
                    reason: format!("degree {} order {} is outside the model", n, m),
                });
            }
            let idx = index(n, m);
            if present[idx] {
                return Err(WmmError::Table {
                    line: line_no,
                    reason: format!("duplicate entry for degree {} order {}", n, m),
                });
            }
            present[idx] = true;
            coefficients[idx] = CoefficientEntry::new(
                parse_field(&elements, 2, "main cosine term", line_no)?,
                parse_field(&elements, 3, "main sine term", line_no)?,
                parse_field(&elements, 4, "secular cosine rate", line_no)?,
                parse_field(&elements, 5, "secular sine rate", line_no)?,
            );
        }

        for m in 0..=NMAX {
            for n in m..=NMAX {
                if !present[index(n, m)] {
                    return Err(WmmError::MissingCoefficient { n, m });
                }
            }
        }
        debug!(epoch, earth_radius, entries = TOTAL_COEFFS, "coefficient table loaded");

        Ok(Model::new(epoch, earth_radius, coefficients))
    }

    /// Write the coefficient table in the format read by [`Model::from_reader`].
    pub fn write_table<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "# n m main_cos main_sin secular_cos secular_sin")?;
        for n in 0..=NMAX {
            for m in 0..=n {
                let c = self.coefficient(n, m);
                writeln!(
                    writer,
                    "{} {} {:?} {:?} {:?} {:?}",
                    n, m, c.main_cos, c.main_sin, c.secular_cos, c.secular_sin
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EARTH_RADIUS, WMM2020, WMM2020_EPOCH};

    fn wmm2020_text() -> String {
        let mut out = Vec::new();
        WMM2020.write_table(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn load(text: &str) -> Result<Model> {
        Model::from_reader(WMM2020_EPOCH, EARTH_RADIUS, text.as_bytes())
    }

    #[test]
    fn test_written_table_loads_back() {
        let text = wmm2020_text();
        assert_eq!(text.lines().count(), TOTAL_COEFFS + 1);
        assert_eq!(load(&text).unwrap(), WMM2020);
    }

    #[test]
    fn test_record_order_is_free() {
        let text = wmm2020_text();
        let mut lines: Vec<&str> = text.lines().collect();
        lines.reverse();
        lines.insert(10, "");
        lines.insert(20, "   # interleaved comment");
        assert_eq!(load(&lines.join("\n")).unwrap(), WMM2020);
    }

    #[test]
    fn test_missing_entry() {
        let text: String = wmm2020_text()
            .lines()
            .filter(|l| !l.starts_with("7 3 "))
            .map(|l| format!("{}\n", l))
            .collect();
        match load(&text) {
            Err(WmmError::MissingCoefficient { n: 7, m: 3 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_records() {
        let cases = [
            ("1 0 -29404.5 0.0 6.7", "expected 6 fields"),
            ("1 0 -29404.5 zero 6.7 0.0", "main sine term"),
            ("13 0 1.0 0.0 0.0 0.0", "outside the model"),
            ("2 3 1.0 0.0 0.0 0.0", "outside the model"),
            ("1 -1 1.0 0.0 0.0 0.0", "order"),
        ];
        for (record, expected) in cases {
            let text = format!("# header\n{}\n", record);
            match load(&text) {
                Err(WmmError::Table { line: 2, reason }) => {
                    assert!(reason.contains(expected), "{}: {}", record, reason)
                }
                other => panic!("{}: unexpected {:?}", record, other),
            }
        }
    }

    #[test]
    fn test_duplicate_entry() {
        let text = format!("{}1 1 0.0 0.0 0.0 0.0\n", wmm2020_text());
        match load(&text) {
            Err(WmmError::Table { line, reason }) => {
                assert_eq!(line, TOTAL_COEFFS + 2);
                assert!(reason.contains("duplicate"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
