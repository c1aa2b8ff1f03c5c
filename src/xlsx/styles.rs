//! XLSX number-format styles, used to tell dates from plain numbers.

use std::collections::HashMap;

/// Days from 1970-01-01 to 1899-12-31, the day before Excel serial 1.
const EXCEL_EPOCH_OFFSET: i64 = -25_568;

const SECONDS_PER_DAY: i64 = 86_400;

/// Number formats parsed from `xl/styles.xml`.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// Cell formats (`cellXfs`): style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse styles from `xl/styles.xml`. Malformed content yields what was
    /// read up to the error; styles only refine how numbers are shown.
    pub fn parse(xml: &str) -> Self {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e))
                | Ok(quick_xml::events::Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"numFmt" if in_num_fmts => {
                        let mut id = None;
                        let mut code = String::new();
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"numFmtId" => {
                                    id = String::from_utf8_lossy(&attr.value).parse().ok()
                                }
                                b"formatCode" => {
                                    code = attr
                                        .unescape_value()
                                        .map(|v| v.into_owned())
                                        .unwrap_or_default()
                                }
                                _ => {}
                            }
                        }
                        if let Some(id) = id {
                            styles.num_fmts.insert(id, code);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        let num_fmt_id = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"numFmtId")
                            .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok())
                            .unwrap_or(0);
                        styles.cell_xfs.push(num_fmt_id);
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::End(ref e)) => match e.local_name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(_) => break,
                _ => {}
            }
            buf.clear();
        }

        styles
    }

    /// Whether the cell style at `style_index` formats numbers as dates or times.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        self.cell_xfs
            .get(style_index)
            .is_some_and(|&id| self.is_date_format(id))
    }

    /// Whether a numFmtId is a date or time format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Built-in ids: 14-22 dates, 45-47 times
        if (14..=22).contains(&num_fmt_id) || (45..=47).contains(&num_fmt_id) {
            return true;
        }

        self.num_fmts
            .get(&num_fmt_id)
            .is_some_and(|code| is_date_format_code(code))
    }
}

/// Whether a custom format code contains date or time tokens.
///
/// Quoted literals, bracketed sections (`[Red]`, `[$-409]`) and
/// backslash-escaped characters are ignored.
fn is_date_format_code(format_code: &str) -> bool {
    let mut in_bracket = false;
    let mut in_quote = false;
    let mut escaped = false;

    for c in format_code.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if !in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            '[' if !in_quote => in_bracket = true,
            ']' if !in_quote => in_bracket = false,
            _ if in_quote || in_bracket => {}
            _ => {
                if matches!(c.to_ascii_lowercase(), 'd' | 'm' | 'y' | 'h' | 's') {
                    return true;
                }
            }
        }
    }

    false
}

/// Convert an Excel serial date (1900 date system) to a timestamp string.
///
/// Dated serials give `YYYY-MM-DD HH:MM:SS`, always with the time part;
/// values below one day give a bare `HH:MM:SS`.
pub fn serial_to_timestamp(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let mut days = serial.trunc() as i64;
    let mut seconds = (serial.fract() * SECONDS_PER_DAY as f64).round() as i64;
    if seconds >= SECONDS_PER_DAY {
        days += 1;
        seconds -= SECONDS_PER_DAY;
    }

    let time = format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    );

    if days == 0 {
        return Some(time);
    }

    // Serial 60 is the non-existent 1900-02-29 kept for Lotus 1-2-3 compatibility
    if days >= 60 {
        days -= 1;
    }

    let (year, month, day) = civil_from_days(EXCEL_EPOCH_OFFSET + days);
    Some(format!("{:04}-{:02}-{:02} {}", year, month, day, time))
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_date_formats() {
        let styles = Styles::default();
        assert!(styles.is_date_format(14));
        assert!(styles.is_date_format(22));
        assert!(styles.is_date_format(46));
        assert!(!styles.is_date_format(0));
        assert!(!styles.is_date_format(2));
    }

    #[test]
    fn test_custom_date_format_detection() {
        assert!(is_date_format_code("yyyy-mm-dd"));
        assert!(is_date_format_code("d/m/yy"));
        assert!(is_date_format_code("[$-409]mmmm\\ d\\,\\ yyyy;@"));
        assert!(is_date_format_code("h:mm AM/PM"));

        assert!(!is_date_format_code("0.00"));
        assert!(!is_date_format_code("#,##0"));
        assert!(!is_date_format_code("\"$\"#,##0.00"));
        assert!(!is_date_format_code("[Red]0.00"));
        assert!(!is_date_format_code("General"));
    }

    #[test]
    fn test_parse_cell_xfs() {
        let xml = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1"><numFmt numFmtId="164" formatCode="dd/mm/yyyy"/></numFmts>
  <cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0" fontId="0"/>
    <xf numFmtId="164" fontId="0" applyNumberFormat="1"/>
    <xf numFmtId="14"><alignment horizontal="left"/></xf>
    <xf numFmtId="4"/>
  </cellXfs>
</styleSheet>"#;

        let styles = Styles::parse(xml);
        assert!(!styles.is_date_style(0));
        assert!(styles.is_date_style(1));
        assert!(styles.is_date_style(2));
        assert!(!styles.is_date_style(3));
        assert!(!styles.is_date_style(99));
    }

    #[test]
    fn test_serial_to_timestamp() {
        assert_eq!(serial_to_timestamp(1.0).as_deref(), Some("1900-01-01 00:00:00"));
        assert_eq!(serial_to_timestamp(59.0).as_deref(), Some("1900-02-28 00:00:00"));
        assert_eq!(serial_to_timestamp(61.0).as_deref(), Some("1900-03-01 00:00:00"));
        assert_eq!(serial_to_timestamp(44197.0).as_deref(), Some("2021-01-01 00:00:00"));
        assert_eq!(serial_to_timestamp(45658.0).as_deref(), Some("2025-01-01 00:00:00"));
        assert_eq!(
            serial_to_timestamp(44197.5).as_deref(),
            Some("2021-01-01 12:00:00")
        );
        // rounding up to midnight rolls over to the next day
        assert_eq!(
            serial_to_timestamp(44197.999_999_9).as_deref(),
            Some("2021-01-02 00:00:00")
        );
        assert_eq!(serial_to_timestamp(0.75).as_deref(), Some("18:00:00"));
        assert_eq!(serial_to_timestamp(-1.0), None);
    }
}
