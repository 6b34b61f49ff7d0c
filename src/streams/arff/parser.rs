use crate::core::attributes::{AttributeKind, AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::AttributeValue;
use crate::utils::file_parsing::{split_csv_preserving_quotes, strip_surrounding_quotes};
use std::io::{BufRead, Error, ErrorKind, Seek};
use std::sync::Arc;

#[derive(Debug)]
pub(super) enum ParsedAttribute {
    Numeric,
    Nominal(Vec<String>),
}

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

/// Reads the header up to and including `@data`.
///
/// Returns the schema and the byte offset of the first data line. Without an
/// explicit `class_index` the last attribute is the class.
pub(super) fn parse_header<R: BufRead + Seek>(
    reader: &mut R,
    class_index: Option<usize>,
) -> Result<(InstanceHeader, u64), Error> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<AttributeRef> = Vec::new();
    let mut line = String::new();
    let mut pending_line: Option<String> = None;

    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "ARFF file ended before @data",
            ));
        }
        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.trim().to_lowercase();
        if low.starts_with("@relation") {
            let raw = line.trim()["@relation".len()..].trim();
            relation = Some(strip_surrounding_quotes(raw).to_string());
            break;
        } else if low.starts_with("@attribute") || low.starts_with("@data") {
            pending_line = Some(line.clone());
            break;
        }
    }

    let data_start_pos: u64;
    loop {
        if let Some(pending) = pending_line.take() {
            line = pending;
        } else {
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                return Err(Error::new(
                    ErrorKind::UnexpectedEof,
                    "ARFF file ended before @data",
                ));
            }
        }

        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.trim().to_lowercase();
        if low.starts_with("@attribute") {
            let (name, kind) = parse_attribute_line(&line)?;
            let attribute: AttributeRef = match kind {
                ParsedAttribute::Numeric => Arc::new(NumericAttribute::new(name)),
                ParsedAttribute::Nominal(values) => {
                    Arc::new(NominalAttribute::with_values(name, values))
                }
            };
            attributes.push(attribute);
        } else if low.starts_with("@data") {
            data_start_pos = reader.stream_position()?;
            break;
        } else {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unsupported header directive: {}", line.trim()),
            ));
        }
    }

    if attributes.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "ARFF header declares no attributes",
        ));
    }

    let class_index = class_index.unwrap_or(attributes.len() - 1);
    if class_index >= attributes.len() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "class index {class_index} is out of range for {} attributes",
                attributes.len()
            ),
        ));
    }

    let header = InstanceHeader::new(
        relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attributes,
        class_index,
    );

    Ok((header, data_start_pos))
}

pub(super) fn parse_attribute_line(line: &str) -> Result<(String, ParsedAttribute), Error> {
    let rest = {
        let l = line.trim();
        if !l.to_ascii_lowercase().starts_with("@attribute") {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Line is not '@attribute'",
            ));
        }
        l["@attribute".len()..].trim()
    };

    let (name, after_name) = if let Some(quote) = rest.chars().next().filter(|c| *c == '\'' || *c == '"') {
        let end = rest[1..].find(quote).map(|i| i + 1).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                "Attribute name without closing quote marks",
            )
        })?;
        (rest[1..end].to_string(), rest[end + 1..].trim())
    } else {
        let mut it = rest.splitn(2, char::is_whitespace);
        let name = it.next().unwrap_or_default().to_string();
        let after = it
            .next()
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Attribute type is missing"))?;
        (name, after.trim())
    };

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok((name, ParsedAttribute::Numeric));
    }

    if after_name.starts_with('{') {
        let close = after_name
            .rfind('}')
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Nominal set without closing '}'"))?;

        let values = split_csv_preserving_quotes(&after_name[1..close])
            .iter()
            .map(|s| strip_surrounding_quotes(s.trim()).to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if values.is_empty() {
            return Err(Error::new(ErrorKind::InvalidData, "Empty nominal domain"));
        }

        return Ok((name, ParsedAttribute::Nominal(values)));
    }

    Err(Error::new(
        ErrorKind::InvalidData,
        format!("Attribute kind not supported: {after_name}"),
    ))
}

pub(super) fn parse_instance_values(
    header: &InstanceHeader,
    line: &str,
) -> Result<Vec<AttributeValue>, Error> {
    let tokens = split_csv_preserving_quotes(line);
    if tokens.len() != header.number_of_attributes() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "Number of columns ({}) differs from number of attributes ({})",
                tokens.len(),
                header.number_of_attributes()
            ),
        ));
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (idx, raw) in tokens.iter().enumerate() {
        let raw = raw.trim();
        if raw == "?" {
            values.push(AttributeValue::Missing);
            continue;
        }

        match header.attribute_kind(idx) {
            Some(AttributeKind::Numeric) => {
                let v: f64 = raw.parse().map_err(|_| {
                    Error::new(
                        ErrorKind::InvalidData,
                        format!("Invalid numeric value '{raw}' for attribute #{idx}"),
                    )
                })?;
                values.push(AttributeValue::Numeric(v));
            }
            Some(AttributeKind::Nominal) => {
                let key = strip_surrounding_quotes(raw);
                if let Some(nominal) = header.nominal_domain(idx)
                    && !nominal.contains(key)
                {
                    return Err(Error::new(
                        ErrorKind::InvalidData,
                        format!("Nominal value '{key}' not found in domain of attribute #{idx}"),
                    ));
                }
                values.push(AttributeValue::nominal(key));
            }
            None => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("No attribute declared for column #{idx}"),
                ));
            }
        }
    }

    Ok(values)
}
