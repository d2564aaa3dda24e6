//! InfluxDB line protocol rendering of metrics.
//!
//! Lines carry no timestamp; the receiving server stamps them on ingest.

use influxdb_line_protocol::LineProtocolBuilder;

use super::{FieldValue, Metric};

// The builder changes type after the first field, so dispatch on the value
// at each call site.
macro_rules! add_field {
    ($builder:expr, $key:expr, $value:expr) => {
        match $value {
            FieldValue::Integer(i) => $builder.field($key, *i),
            FieldValue::Float(v) => $builder.field($key, *v),
            FieldValue::Text(s) => $builder.field($key, s.as_str()),
        }
    };
}

/// Append one newline-terminated line for `metric` to `buf`.
///
/// Non-finite floats have no line protocol representation and are left
/// out. `buf` comes back unchanged when no field is left to write.
fn write_metric(buf: Vec<u8>, metric: &Metric) -> Vec<u8> {
    let mut fields = metric
        .fields
        .iter()
        .filter(|(_, value)| !matches!(value, FieldValue::Float(v) if !v.is_finite()));
    let Some((key, value)) = fields.next() else {
        return buf;
    };

    let mut builder = LineProtocolBuilder::new_with(buf).measurement(&metric.measurement);
    for (tag_key, tag_value) in &metric.tags {
        builder = builder.tag(tag_key, tag_value);
    }

    let mut builder = add_field!(builder, key, value);
    for (key, value) in fields {
        builder = add_field!(builder, key, value);
    }
    builder.close_line().build()
}

/// Render one metric as a line, without the trailing newline.
///
/// Returns `None` when no field is left to write.
pub fn to_line(metric: &Metric) -> Option<String> {
    let mut line = write_metric(Vec::new(), metric);
    line.pop()?;
    Some(String::from_utf8_lossy(&line).into_owned())
}

/// Render metrics as a newline-terminated batch.
pub fn to_lines(metrics: &[Metric]) -> String {
    let buf = metrics.iter().fold(Vec::new(), write_metric);
    String::from_utf8_lossy(&buf).into_owned()
}
