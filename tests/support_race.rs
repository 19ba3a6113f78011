use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server that answers every request with `body`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server(body: &'static str) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream, body));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

/// Like [`spawn_http_server`], but skips when sockets are not permitted.
///
/// # Errors
///
/// Returns an error if the server fails for any other reason.
pub fn spawn_http_server_or_skip(
    body: &'static str,
) -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_http_server(body) {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(mut stream: TcpStream, body: &str) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    if read_request(&mut stream).is_err() {
        return;
    }
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: &mut TcpStream) -> std::io::Result<()> {
    let mut received = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            return Ok(());
        }
        received.extend_from_slice(chunk.get(..read).unwrap_or_default());
        let text = String::from_utf8_lossy(&received);
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text
            .get(..header_end)
            .unwrap_or_default()
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if received.len() >= header_end.saturating_add(4).saturating_add(content_length) {
            return Ok(());
        }
    }
}

/// Writes a one-target TOML config pointing at `url`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_config(dir: &Path, url: &str, count: usize) -> Result<String, String> {
    let path = dir.join("race.toml");
    let content = format!(
        "count = {}\ntimeout_secs = 10\n\n[[targets]]\nmethod = \"POST\"\nurl = \"{}\"\nbody = \"code=FREE\"\ncookies = [\"session=abc\"]\n",
        count, url
    );
    std::fs::write(&path, content).map_err(|err| format!("write config failed: {}", err))?;
    Ok(path.to_string_lossy().into_owned())
}

/// Run the `race-the-web` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_race<I, S>(args: I, current_dir: &Path) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = race_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(current_dir)
        .env("RACE_LOG", "error")
        .output()
        .map_err(|err| format!("run race-the-web failed: {}", err))
}

fn race_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_race-the-web").map_or_else(
        || Err("CARGO_BIN_EXE_race-the-web missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
