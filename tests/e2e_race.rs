mod support_race;

use tempfile::tempdir;

use support_race::{run_race, spawn_http_server_or_skip, write_config};

fn describe(output: &std::process::Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_console_report_groups_identical_responses() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip("OK")? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = write_config(dir.path(), &format!("{}/coupon", url), 3)?;

    let output = run_race([config.as_str()], dir.path())?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    for needle in [
        "Unique Responses:",
        "[Status Code] 200",
        "Similar: 2",
        "\tMethod: POST",
        "\tCookies: [session=abc]",
    ] {
        if !stdout.contains(needle) {
            return Err(format!("Missing {:?}\n{}", needle, describe(&output)));
        }
    }
    if stdout.matches("RESPONSE:").count() != 1 {
        return Err(format!("Expected a single unique response\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_json_report_keeps_markup() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip("<b>ok</b>")? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = write_config(dir.path(), &url, 2)?;

    let output = run_race([config.as_str(), "--output", "json"], dir.path())?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(|err| format!("{}\n{}", err, describe(&output)))?;
    let body = report
        .pointer("/responses/0/response/body")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| format!("Missing body\n{}", describe(&output)))?;
    if body != "<b>ok</b>" {
        return Err(format!("Unexpected body: {}", body));
    }
    let unique = report
        .pointer("/summary/unique_responses")
        .and_then(serde_json::Value::as_u64);
    if unique != Some(1) {
        return Err(format!("Unexpected summary\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_count_override_and_default_config_file() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip("OK")? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    write_config(dir.path(), &url, 2)?;

    let output = run_race(["--count", "4"], dir.path())?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("Similar: 3") {
        return Err(format!("Expected count override\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_unreachable_target_prints_errors_and_succeeds() -> Result<(), String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("addr failed: {}", err))?;
    drop(listener);

    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = write_config(dir.path(), &format!("http://{}/", addr), 2)?;
    let output = run_race([config.as_str()], dir.path())?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.matches("[ERROR]").count() != 2 {
        return Err(format!("Expected two errors\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_malformed_cookie_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("race.toml");
    let content = "[[targets]]\nmethod = \"GET\"\nurl = \"http://127.0.0.1:9/\"\ncookies = [\"nocookie\"]\n";
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let output = run_race(["race.toml"], dir.path())?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", describe(&output)));
    }
    Ok(())
}
