use indexmap::IndexMap;

use crate::constants::Measure;
use crate::dictionary::RawHeader;
use crate::io_utils::{self, Endian};
use crate::variable::{MissingValues, RawVariable};

/// One missing value attached to a logical variable.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingValue {
    Number(f64),
    Text(Vec<u8>),
}

/// A reconciled variable: the unit the case decoder iterates per row.
///
/// Fuses the raw variable record with the long-name, missing-value,
/// value-label, and display records that refer to it.
#[derive(Debug, Clone)]
pub struct LogicalVariable {
    /// Position in the raw variable list (continuations included).
    pub source_index: usize,
    /// The 8-byte short name from the variable record.
    pub short_name: String,
    /// Display name: the long-name override when present, else the short
    /// name.
    pub name: String,
    pub label: Option<String>,
    pub decimals: u8,
    /// Width in bytes. For string variables this drives how many 8-byte
    /// chunks the case decoder consumes.
    pub width: usize,
    pub is_numeric: bool,
    pub format_type: u16,
    /// Numeric and/or long-string missing values, in record order.
    pub missing_values: Vec<MissingValue>,
    /// Value labels in record order. Numeric keys are decimal-formatted
    /// with the variable's decimal count; string keys are the raw bytes,
    /// trailing padding trimmed.
    pub value_labels: IndexMap<String, String>,
    pub measure: Measure,
}

impl LogicalVariable {
    /// 8-byte chunks one case of this variable occupies.
    pub fn chunks(&self) -> usize {
        if self.is_numeric {
            1
        } else {
            (self.width.max(1) - 1) / 8 + 1
        }
    }
}

/// Fuse the dictionary records into the ordered logical variable list
/// that drives case decoding.
pub fn reconcile(raw: &RawHeader, endian: Endian) -> Vec<LogicalVariable> {
    let mut vars = Vec::new();
    let mut display_ordinal = 0;

    for (source_index, record) in raw.variables.iter().enumerate() {
        // Continuations are absorbed by their anchors; they consume no
        // display entry.
        let RawVariable::Anchor(anchor) = record else {
            continue;
        };

        let mut var = LogicalVariable {
            source_index,
            short_name: anchor.short_name.clone(),
            name: anchor.short_name.clone(),
            label: anchor.label.clone(),
            decimals: anchor.print_format.decimals,
            width: anchor.print_format.width as usize,
            is_numeric: anchor.is_numeric(),
            format_type: anchor.print_format.format_type,
            missing_values: flatten_missing(&anchor.missing_values),
            value_labels: IndexMap::new(),
            measure: Measure::Unknown,
        };

        if let Some(pairs) = &raw.long_names {
            if let Some((_, long)) = pairs
                .iter()
                .find(|(short, _)| short.eq_ignore_ascii_case(&var.short_name))
            {
                var.name = long.clone();
            }
        }

        if let Some(entries) = &raw.long_string_missing {
            for entry in entries
                .iter()
                .filter(|e| e.var_name.eq_ignore_ascii_case(&var.short_name))
            {
                var.missing_values
                    .extend(entry.values.iter().cloned().map(MissingValue::Text));
            }
        }

        attach_value_labels(&mut var, raw, endian);

        if let Some(entries) = &raw.var_display {
            if let Some(entry) = entries.get(display_ordinal) {
                var.measure = entry.measure;
            }
        }
        display_ordinal += 1;

        vars.push(var);
    }

    fold_by_roles(vars, raw)
}

/// Attach value labels from the type 3/4 groups (keyed by data-element
/// index) and the long-string label sets (keyed by name).
fn attach_value_labels(var: &mut LogicalVariable, raw: &RawHeader, endian: Endian) {
    for group in &raw.value_labels {
        if !group.variable_indices.contains(&var.source_index) {
            continue;
        }
        for (key, label) in &group.labels {
            let key_str = if var.is_numeric {
                let value = match endian {
                    Endian::Little => f64::from_le_bytes(*key),
                    Endian::Big => f64::from_be_bytes(*key),
                };
                format!("{value:.prec$}", prec = var.decimals as usize)
            } else {
                io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(key))
            };
            let label_str =
                io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(label));
            var.value_labels.insert(key_str, label_str);
        }
    }

    if let Some(sets) = &raw.long_string_labels {
        for set in sets
            .iter()
            .filter(|s| s.var_name.eq_ignore_ascii_case(&var.short_name))
        {
            for (value, label) in &set.labels {
                let key_str =
                    io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(value));
                let label_str =
                    io_utils::bytes_to_string_lossy(io_utils::trim_trailing_padding(label));
                var.value_labels.insert(key_str, label_str);
            }
        }
    }
}

/// When a variable-attributes role list is present it names the real
/// variables; everything else is a very-long-string segment whose width
/// folds into the nearest preceding real variable. Each parent's width is
/// then reduced by 3 bytes per folded child to cancel the inter-segment
/// padding the raw widths overcount.
fn fold_by_roles(vars: Vec<LogicalVariable>, raw: &RawHeader) -> Vec<LogicalVariable> {
    let Some(attrs) = &raw.var_attributes else {
        return vars;
    };

    let mut folded: Vec<(LogicalVariable, usize)> = Vec::with_capacity(vars.len());
    for var in vars {
        let is_real = attrs
            .roles
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(&var.short_name));
        if is_real {
            folded.push((var, 0));
        } else if let Some((parent, children)) = folded.last_mut() {
            parent.width += var.width;
            *children += 1;
        }
    }

    folded
        .into_iter()
        .map(|(mut var, children)| {
            var.width = var.width.saturating_sub(3 * children);
            var
        })
        .collect()
}

fn flatten_missing(missing: &MissingValues) -> Vec<MissingValue> {
    match missing {
        MissingValues::None => Vec::new(),
        MissingValues::DiscreteNumeric(values) => {
            values.iter().map(|&v| MissingValue::Number(v)).collect()
        }
        MissingValues::Range { low, high } => {
            vec![MissingValue::Number(*low), MissingValue::Number(*high)]
        }
        MissingValues::RangeAndValue { low, high, value } => vec![
            MissingValue::Number(*low),
            MissingValue::Number(*high),
            MissingValue::Number(*value),
        ],
        MissingValues::DiscreteString(values) => {
            values.iter().cloned().map(MissingValue::Text).collect()
        }
    }
}
