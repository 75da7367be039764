use std::io::Write;

use passport::{ConnectionStatus, PassportError};
use serde_json::{json, Value};

/// Write a response body. Pretty-printed for humans, one line in JSON mode.
pub fn write_value<W: Write>(writer: &mut W, value: &Value, json_mode: bool) -> std::io::Result<()> {
    if json_mode {
        serde_json::to_writer(&mut *writer, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Write a converted amount.
pub fn write_amount<W: Write>(
    writer: &mut W,
    input: &str,
    output: &str,
    precision: u32,
    json_mode: bool,
) -> std::io::Result<()> {
    if json_mode {
        let v = json!({ "input": input, "output": output, "precision": precision });
        return write_value(writer, &v, true);
    }
    writeln!(writer, "{output}")?;
    writer.flush()
}

/// Write a connection status as `status<TAB>label`.
pub fn write_status<W: Write>(
    writer: &mut W,
    status: ConnectionStatus,
    json_mode: bool,
) -> std::io::Result<()> {
    if json_mode {
        let v = json!({ "status": status, "label": status.label() });
        return write_value(writer, &v, true);
    }
    writeln!(writer, "{status}\t{}", status.label())?;
    writer.flush()
}

/// Write a failed call together with the side effects it asks for.
pub fn write_failure<W: Write>(
    writer: &mut W,
    err: &PassportError,
    json_mode: bool,
) -> std::io::Result<()> {
    let outcome = err.outcome();
    if json_mode {
        let v = json!({ "error": err.to_string(), "outcome": outcome });
        return write_value(writer, &v, true);
    }

    writeln!(writer, "error: {err}")?;
    if let Some(notice) = &outcome.notify {
        writeln!(writer, "notice: {}: {}", notice.title, notice.message)?;
    }
    if let Some(route) = outcome.redirect {
        writeln!(writer, "redirect: {route}")?;
    }
    writer.flush()
}
