use std::io::{self, Write};

use super::{GroupReport, RaceReport, RequestReport};

const SEPARATOR: &str = "**************************************************";

/// Writes the human-readable dump of every unique response and the targets
/// behind it. Bodies are copied byte for byte, whatever their encoding.
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn write_text<W: Write>(out: &mut W, report: &RaceReport) -> io::Result<()> {
    writeln!(out, "Unique Responses:")?;
    writeln!(out)?;
    for group in &report.responses {
        write_group(out, group)?;
    }
    Ok(())
}

/// Writes each non-fatal error to stderr as `[ERROR] <message>`.
pub fn print_runtime_errors(errors: &[String]) {
    for error in errors {
        eprintln!("[ERROR] {}", error);
    }
}

fn write_group<W: Write>(out: &mut W, group: &GroupReport) -> io::Result<()> {
    let response = &group.response;
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "RESPONSE:")?;
    writeln!(out, "[Status Code] {}", response.status_code)?;
    writeln!(out, "[Protocol] {}", response.protocol)?;
    if !response.headers.is_empty() {
        writeln!(out, "[Headers]")?;
        for (name, values) in &response.headers {
            writeln!(out, "\t{}: {}", name, bracketed(values))?;
        }
    }
    writeln!(
        out,
        "[Location] {}",
        response.location.as_deref().unwrap_or_default()
    )?;
    writeln!(out, "[Body]")?;
    out.write_all(&response.body_bytes)?;
    writeln!(out)?;
    writeln!(out, "Similar: {}", group.similar)?;
    writeln!(out, "REQUESTS:")?;
    for request in &group.requests {
        write_request(out, request)?;
    }
    Ok(())
}

fn write_request<W: Write>(out: &mut W, request: &RequestReport) -> io::Result<()> {
    writeln!(out, "\tURL: {}", request.url)?;
    writeln!(out, "\tMethod: {}", request.method)?;
    writeln!(out, "\tBody: {}", request.body)?;
    writeln!(out, "\tCookies: {}", bracketed(&request.cookies))?;
    if !request.headers.is_empty() {
        writeln!(out, "\tHeaders: {}", bracketed(&request.headers))?;
    }
    if let Some(proxy) = request.proxy.as_deref() {
        writeln!(out, "\tProxy: {}", proxy)?;
    }
    writeln!(out, "\tRedirects: {}", request.redirects)?;
    writeln!(out)
}

fn bracketed(values: &[String]) -> String {
    format!("[{}]", values.join(" "))
}
