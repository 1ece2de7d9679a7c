//! Markup adapter
//!
//! Scans `Record`/`record` elements, taking the date from `startDate` (or
//! `date`) and heart rate from the numeric `value` attribute. The remaining
//! canonical metrics are not present in markup exports; when synthesis is on
//! they are backfilled and tagged as synthesized.

use crate::error::ComputeError;
use crate::normalizer::MIN_POPULATED_FIELDS;
use crate::types::{keys, Field, Record};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use super::{FormatAdapter, ParseContext};

const RECORD_TAGS: [&[u8]; 2] = [b"Record", b"record"];
const DATE_ATTRS: [&[u8]; 2] = [b"startDate", b"date"];

/// XML export adapter
pub struct XmlAdapter;

impl FormatAdapter for XmlAdapter {
    fn parse(&self, bytes: &[u8], ctx: &mut ParseContext<'_>) -> Result<Vec<Record>, ComputeError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ComputeError::ParseError(format!("XML is not valid UTF-8: {e}")))?;

        let mut reader = Reader::from_str(text);
        let mut elements = 0usize;
        let mut records = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if !RECORD_TAGS.contains(&e.name().as_ref()) {
                        continue;
                    }
                    elements += 1;
                    let mut record = read_element(&e)?;
                    if ctx.synthesize {
                        ctx.generator.fill_missing(&mut record);
                    }
                    if record.len() >= MIN_POPULATED_FIELDS {
                        records.push(record);
                    } else {
                        debug!(element = elements, "skipping sparse XML record");
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(ComputeError::ParseError(format!("malformed XML: {e}"))),
            }
        }

        if elements == 0 {
            if !ctx.synthesize {
                debug!("no record elements found");
                return Ok(records);
            }
            warn!(
                days = ctx.sample_days,
                "no record elements found, substituting sample data"
            );
            return Ok(ctx.generator.generate(ctx.sample_days));
        }

        Ok(records)
    }
}

fn read_element(element: &BytesStart<'_>) -> Result<Record, ComputeError> {
    let mut record = Record::new();

    for name in DATE_ATTRS {
        if let Some(date) = attribute(element, name)? {
            record.insert(keys::DATE, Field::measured(date));
            break;
        }
    }

    let heart_rate = attribute(element, b"value")?
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite());
    if let Some(hr) = heart_rate {
        record.insert(keys::HEART_RATE, Field::measured(hr));
    }

    Ok(record)
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ComputeError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ComputeError::ParseError(format!("malformed attribute: {e}")))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| ComputeError::ParseError(format!("malformed attribute value: {e}")))?;
            if value.is_empty() {
                return Ok(None);
            }
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleGenerator;
    use crate::types::{DataOrigin, Provenance};

    fn parse(input: &str, synthesize: bool) -> Result<Vec<Record>, ComputeError> {
        let mut generator = SampleGenerator::seeded(5);
        let mut ctx = ParseContext {
            synthesize,
            sample_days: 30,
            generator: &mut generator,
        };
        XmlAdapter.parse(input.as_bytes(), &mut ctx)
    }

    const HEALTH_EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HealthData locale="en_US">
  <Record type="HKQuantityTypeIdentifierHeartRate" startDate="2024-01-15" value="72"/>
  <record date="2024-01-16" value="81.5"></record>
  <Record startDate="2024-01-17" value="n/a"/>
  <Workout startDate="2024-01-17"/>
</HealthData>"#;

    #[test]
    fn test_parse_records_with_backfill() {
        let records = parse(HEALTH_EXPORT, true).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date(), Some("2024-01-15"));
        assert_eq!(records[0].heart_rate(), Some(72.0));
        assert_eq!(records[0].provenance(keys::HEART_RATE), Some(Provenance::Measured));
        assert_eq!(records[0].provenance(keys::STEPS), Some(Provenance::Synthesized));
        assert_eq!(records[1].date(), Some("2024-01-16"));
        assert_eq!(records[1].heart_rate(), Some(81.5));

        // non-numeric value is replaced, and says so
        assert_eq!(records[2].provenance(keys::HEART_RATE), Some(Provenance::Synthesized));
        assert_eq!(DataOrigin::from_records(&records), DataOrigin::Augmented);
    }

    #[test]
    fn test_parse_without_synthesis() {
        let records = parse(HEALTH_EXPORT, false).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 2);
        assert!(records[0].get(keys::STEPS).is_none());
        assert_eq!(DataOrigin::from_records(&records), DataOrigin::Measured);
    }

    #[test]
    fn test_no_elements_falls_back_to_sample() {
        let records = parse("<HealthData><Workout/></HealthData>", true).unwrap();
        assert_eq!(records.len(), 30);
        assert_eq!(DataOrigin::from_records(&records), DataOrigin::Synthesized);

        let records = parse("<HealthData/>", false).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_malformed_markup() {
        let err = parse("<HealthData><Record value=\"70\"></HealthData>", true).unwrap_err();
        assert!(matches!(err, ComputeError::ParseError(_)));
    }
}
